use super::TrailmapError;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// one invocation of a command line program that reads stdin and writes stdout
#[derive(Clone, Debug, PartialEq)]
pub struct ExternalTool {
    pub binary: String,
    pub args: Vec<String>,
}

/// result of a finished invocation
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub success: bool,
    pub status: String,
}

impl ExternalTool {
    pub fn new(binary: &str, args: &[String]) -> ExternalTool {
        ExternalTool {
            binary: binary.to_string(),
            args: args.to_vec(),
        }
    }

    /// true if the binary exists as a path or can be found on PATH
    pub fn is_available(&self) -> bool {
        if Path::new(&self.binary).is_file() {
            return true;
        }
        if self.binary.contains(std::path::MAIN_SEPARATOR) {
            return false;
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(&self.binary).is_file()))
            .unwrap_or(false)
    }

    /// runs the program, feeding `input` to stdin. stderr is passed through to
    /// the terminal. a non-zero exit is reported in the output, not as an error.
    pub fn run(&self, input: Option<Vec<u8>>) -> Result<ToolOutput, TrailmapError> {
        let stdin = if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.error(format!("unable to start: {e}")))?;

        // stdin is written from a separate thread so a large output cannot
        // block the child while we are still writing its input
        let writer = match (input, child.stdin.take()) {
            (Some(bytes), Some(mut pipe)) => Some(std::thread::spawn(move || {
                let result = pipe.write_all(&bytes);
                drop(pipe);
                result
            })),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .map_err(|e| self.error(format!("failed while running: {e}")))?;
        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    log::warn!("{} closed its input early", self.binary);
                }
                Ok(Err(e)) => return Err(self.error(format!("failure writing input: {e}"))),
                Err(_) => return Err(self.error(String::from("input writer panicked"))),
            }
        }

        Ok(ToolOutput {
            stdout: output.stdout,
            success: output.status.success(),
            status: output.status.to_string(),
        })
    }

    /// runs the program and fails unless it exits successfully
    pub fn run_checked(&self, input: Option<Vec<u8>>) -> Result<Vec<u8>, TrailmapError> {
        let output = self.run(input)?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(self.error(format!("exited with {}", output.status)))
        }
    }

    fn error(&self, message: String) -> TrailmapError {
        TrailmapError::ExternalToolError {
            binary: self.binary.clone(),
            message,
        }
    }
}
