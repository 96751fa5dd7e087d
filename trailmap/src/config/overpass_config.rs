use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// where and how long to query the overpass API
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    /// tried first
    pub url: String,
    /// tried in order after the primary url fails
    pub mirrors: Vec<String>,
    /// server-side query timeout in seconds. the client waits 30s longer.
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        OverpassConfig {
            url: String::from("https://overpass-api.de/api/interpreter"),
            mirrors: vec![
                String::from("https://overpass-api.de/api/interpreter"),
                String::from("https://overpass.kumi.systems/api/interpreter"),
                String::from("https://maps.mail.ru/osm/tools/overpass/api/interpreter"),
            ],
            timeout_secs: 180,
        }
    }
}

impl OverpassConfig {
    const CLIENT_GRACE_SECS: u64 = 30;

    /// the primary url followed by each mirror, without repeats
    pub fn endpoints(&self) -> Vec<String> {
        std::iter::once(&self.url)
            .chain(self.mirrors.iter())
            .filter(|u| !u.trim().is_empty())
            .unique()
            .cloned()
            .collect()
    }

    pub fn client_timeout_secs(&self) -> u64 {
        self.timeout_secs + Self::CLIENT_GRACE_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_dedup() {
        let conf = OverpassConfig::default();
        let endpoints = conf.endpoints();
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0], conf.url);
        assert_eq!(conf.client_timeout_secs(), 210);
    }
}
