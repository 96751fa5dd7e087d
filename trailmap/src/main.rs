use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trailmap::{
    app::{build_map, render::MapRenderer, MapBuildOptions},
    config::TrailmapConfig,
    model::{overpass::OverpassClient, TrailmapError},
};
use trailmap_conflate::{
    model::graph::FeatureGraph,
    pipeline::{ConflationInputs, ConflationPipeline},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct TrailmapAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// fetch trails, merge rail and points of interest, and render the svg map
    Build {
        #[arg(long, help = "skip all overpass queries and use the cached trail graph")]
        offline: bool,
        #[arg(long, help = "skip the rail network")]
        no_rail: bool,
        #[arg(long, help = "skip trailhead label enrichment")]
        no_trailheads: bool,
        #[arg(long, help = "skip amenity icons")]
        no_amenities: bool,
        #[arg(long, value_name = "DIR", help = "directory to copy the output svg into")]
        out: Option<String>,
        #[arg(long, help = "path to .toml or .json file with trailmap parameters")]
        configuration_file: Option<String>,
    },
    /// run the conflation passes over GeoJSON files already on disk
    Conflate {
        #[arg(long, help = "trail network GeoJSON")]
        trails_file: String,
        #[arg(long, help = "rail network GeoJSON")]
        rail_file: Option<String>,
        #[arg(long, help = "output path for the conflated GeoJSON")]
        output_file: String,
        #[arg(long, help = "path to .toml or .json file with trailmap parameters")]
        configuration_file: Option<String>,
    },
    /// extend the station label paths of an svg produced by transitmap
    FixLabels {
        #[arg(long, help = "svg file, rewritten in place")]
        svg_file: String,
        #[arg(long, help = "path to .toml or .json file with trailmap parameters")]
        configuration_file: Option<String>,
    },
}

fn read_config(configuration_file: &Option<String>) -> Result<TrailmapConfig, TrailmapError> {
    match configuration_file {
        None => Ok(TrailmapConfig::default()),
        Some(f) => {
            log::info!("reading trailmap configuration from {f}");
            TrailmapConfig::try_from(f)
        }
    }
}

pub fn run(app: &App) -> Result<(), TrailmapError> {
    env_logger::init();
    match app {
        App::Build {
            offline,
            no_rail,
            no_trailheads,
            no_amenities,
            out,
            configuration_file,
        } => {
            let conf = read_config(configuration_file)?;
            let options = MapBuildOptions {
                offline: *offline,
                no_rail: *no_rail,
                no_trailheads: *no_trailheads,
                no_amenities: *no_amenities,
                out: out.as_ref().map(PathBuf::from),
            };
            let client = OverpassClient::new(&conf.overpass)?;
            let (svg, report) = build_map(&conf, &options, &client)?;
            log::debug!("{}", serde_json::to_string_pretty(&report)?);
            eprintln!("finished, map written to {}", svg.display());
            Ok(())
        }
        App::Conflate {
            trails_file,
            rail_file,
            output_file,
            configuration_file,
        } => {
            let conf = read_config(configuration_file)?;
            let primary = FeatureGraph::from_geojson_str(&std::fs::read_to_string(trails_file)?)?;
            let secondary = match rail_file {
                Some(f) => Some(FeatureGraph::from_geojson_str(&std::fs::read_to_string(f)?)?),
                None => None,
            };
            let pipeline = ConflationPipeline::new(conf.conflation.clone())?;
            let inputs = ConflationInputs {
                primary,
                secondary,
                ..Default::default()
            };
            let (graph, report) = pipeline.run(inputs)?;
            std::fs::write(output_file, graph.to_geojson_string(&conf.conflation.priorities)?)?;
            eprintln!("{report}");
            eprintln!("finished, conflated graph written to {output_file}");
            Ok(())
        }
        App::FixLabels {
            svg_file,
            configuration_file,
        } => {
            let conf = read_config(configuration_file)?;
            let renderer = MapRenderer::new(&conf.renderer)?;
            let svg = std::fs::read_to_string(svg_file)?;
            let fixed = renderer.fix_label_paths(&svg);
            if fixed != svg {
                std::fs::write(svg_file, fixed)?;
            }
            eprintln!("finished.");
            Ok(())
        }
    }
}

fn main() {
    let args = TrailmapAppArguments::parse();
    if let Err(e) = run(&args.app) {
        log::error!("trailmap failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
