use super::{filter_excluded_routes, render::MapRenderer, TrailCache};
use crate::config::TrailmapConfig;
use crate::model::osm::build_route_graph;
use crate::model::overpass::{ElementSource, OverpassElement, OverpassQuery};
use crate::model::{ExternalTool, TrailmapError};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use trailmap_conflate::model::graph::FeatureGraph;
use trailmap_conflate::model::poi::PoiObservation;
use trailmap_conflate::pipeline::{ConflationInputs, ConflationPipeline, ConflationReport};

/// switches for one map build, as given on the command line
#[derive(Clone, Debug, Default)]
pub struct MapBuildOptions {
    /// use the cached trail graph and skip every network query
    pub offline: bool,
    pub no_rail: bool,
    pub no_trailheads: bool,
    pub no_amenities: bool,
    /// directory that also receives a copy of the svg
    pub out: Option<PathBuf>,
}

/// the trail graph as fetched, plus the trailhead elements fetched with it
struct FetchedTrails {
    graph: FeatureGraph,
    trailheads: Option<Vec<OverpassElement>>,
}

/// warns about any external program that cannot be found
pub fn check_binaries(tools: &[ExternalTool]) -> Vec<String> {
    let missing = tools
        .iter()
        .filter(|t| !t.is_available())
        .map(|t| t.binary.clone())
        .unique()
        .collect_vec();
    if !missing.is_empty() {
        log::warn!("missing binaries: {}", missing.join(", "));
        log::warn!("download the loom tools from https://github.com/ad-freiburg/loom/releases");
        log::warn!("and place them in this directory or on PATH before running");
    }
    missing
}

fn fetch_trails(
    config: &TrailmapConfig,
    options: &MapBuildOptions,
    source: &dyn ElementSource,
) -> Result<FetchedTrails, TrailmapError> {
    let cache = TrailCache::new(&config.cache_file);
    if options.offline {
        log::info!("offline mode, loading {}", config.cache_file);
        return Ok(FetchedTrails {
            graph: cache.load()?,
            trailheads: None,
        });
    }

    let route_query = OverpassQuery::bicycle_routes(config.bbox, config.overpass.timeout_secs);
    let elements = match source.query(&route_query) {
        Ok(elements) => elements,
        Err(e) if cache.exists() => {
            log::warn!("failed to fetch bicycle routes ({e}), falling back to cache");
            return Ok(FetchedTrails {
                graph: cache.load()?,
                trailheads: None,
            });
        }
        Err(e) => return Err(e),
    };

    let trailhead_query = OverpassQuery::trailheads(config.bbox, &config.trail_parking_re);
    let trailheads = match source.query(&trailhead_query) {
        Ok(t) => {
            log::info!("found {} trailheads and trail parking lots", t.len());
            Some(t)
        }
        Err(e) => {
            log::warn!("failed to fetch trailheads ({e}), continuing without them");
            None
        }
    };

    let (graph, _) = build_route_graph(
        &elements,
        trailheads.as_deref(),
        config.trailhead_snap_dist,
        config.conflation.spatial_index,
    )?;
    cache.store(&graph, &config.conflation.priorities)?;
    Ok(FetchedTrails { graph, trailheads })
}

fn load_rail(config: &TrailmapConfig) -> Option<FeatureGraph> {
    match config.rail.load() {
        Ok(graph) if graph.n_points() == 0 => {
            log::warn!("rail network is empty, continuing without it");
            None
        }
        Ok(graph) => Some(graph),
        Err(e) => {
            log::warn!("failed to load rail network ({e}), continuing without it");
            None
        }
    }
}

fn fetch_amenities(
    config: &TrailmapConfig,
    source: &dyn ElementSource,
) -> Option<Vec<PoiObservation>> {
    let query = OverpassQuery::amenities(config.bbox, &config.trail_parking_re);
    match source.query(&query) {
        Ok(elements) => {
            log::info!("found {} amenity elements", elements.len());
            Some(to_observations(&elements))
        }
        Err(e) => {
            log::warn!("failed to fetch amenities ({e}), skipping amenity icons");
            None
        }
    }
}

fn to_observations(elements: &[OverpassElement]) -> Vec<PoiObservation> {
    elements
        .iter()
        .filter_map(OverpassElement::to_observation)
        .collect_vec()
}

/// fetches every input, runs the conflation passes and writes the conflated
/// graph to the filtered file.
pub fn prepare_graph(
    config: &TrailmapConfig,
    options: &MapBuildOptions,
    source: &dyn ElementSource,
) -> Result<(FeatureGraph, ConflationReport), TrailmapError> {
    log::info!("(((1))) fetching trail network");
    let FetchedTrails {
        mut graph,
        trailheads,
    } = fetch_trails(config, options, source)?;

    log::info!("(((2))) filtering excluded routes");
    let removed = filter_excluded_routes(&mut graph, &config.exclude_routes);
    log::info!("removed {removed} edges belonging to excluded routes");

    let secondary = if options.no_rail {
        log::info!("(((3))) loading rail network (skipped)");
        None
    } else {
        log::info!("(((3))) loading rail network");
        load_rail(config)
    };

    let trailheads = if options.no_trailheads || options.offline {
        None
    } else {
        trailheads.as_deref().map(to_observations)
    };

    let amenities = if options.no_amenities || options.offline {
        log::info!("(((4))) fetching amenities (skipped)");
        None
    } else {
        log::info!("(((4))) fetching amenities");
        fetch_amenities(config, source)
    };

    log::info!("(((5))) conflating");
    let pipeline = ConflationPipeline::new(config.conflation.clone())?;
    let inputs = ConflationInputs {
        primary: graph,
        secondary,
        trailheads,
        amenities,
    };
    let (graph, report) = pipeline.run(inputs)?;
    for line in report.to_string().lines() {
        log::info!("  {line}");
    }

    let text = graph.to_geojson_string(&config.conflation.priorities)?;
    std::fs::write(&config.filtered_file, text)?;
    log::info!("conflated graph saved to {}", config.filtered_file);
    Ok((graph, report))
}

/// renders the conflated graph to the output svg, copying it to the output
/// directory if one was given. returns the path of the final svg.
pub fn render_map(
    config: &TrailmapConfig,
    options: &MapBuildOptions,
    graph: &FeatureGraph,
) -> Result<PathBuf, TrailmapError> {
    log::info!("(((6))) rendering svg via loom | transitmap");
    let renderer = MapRenderer::new(&config.renderer)?;
    let text = graph.to_geojson_string(&config.conflation.priorities)?;
    let svg = renderer.render(&text)?;
    std::fs::write(&config.output_svg, svg)?;

    match &options.out {
        None => {
            log::info!("svg saved to {}", config.output_svg);
            Ok(PathBuf::from(&config.output_svg))
        }
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_name = Path::new(&config.output_svg)
                .file_name()
                .ok_or_else(|| {
                    TrailmapError::ConfigurationError(format!(
                        "output_svg '{}' has no file name",
                        config.output_svg
                    ))
                })?;
            let dest = dir.join(file_name);
            std::fs::copy(&config.output_svg, &dest)?;
            log::info!("svg copied to {}", dest.display());
            Ok(dest)
        }
    }
}

/// the full build: check tools, prepare the graph, render it
pub fn build_map(
    config: &TrailmapConfig,
    options: &MapBuildOptions,
    source: &dyn ElementSource,
) -> Result<(PathBuf, ConflationReport), TrailmapError> {
    let mut tools = MapRenderer::new(&config.renderer)?.required_tools();
    if !options.no_rail {
        tools.extend(config.rail.required_tools());
    }
    check_binaries(&tools);

    let (graph, report) = prepare_graph(config, options, source)?;
    let svg = render_map(config, options, &graph)?;
    Ok((svg, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::overpass::RelationMember;
    use std::collections::HashMap;
    use trailmap_conflate::model::graph::NodeId;

    /// answers the three queries from memory
    struct StubSource {
        routes: Vec<OverpassElement>,
        trailheads: Vec<OverpassElement>,
        amenities: Vec<OverpassElement>,
        config: TrailmapConfig,
    }

    impl ElementSource for StubSource {
        fn query(&self, query: &OverpassQuery) -> Result<Vec<OverpassElement>, TrailmapError> {
            let c = &self.config;
            if *query == OverpassQuery::bicycle_routes(c.bbox, c.overpass.timeout_secs) {
                Ok(self.routes.clone())
            } else if *query == OverpassQuery::trailheads(c.bbox, &c.trail_parking_re) {
                Ok(self.trailheads.clone())
            } else if *query == OverpassQuery::amenities(c.bbox, &c.trail_parking_re) {
                Ok(self.amenities.clone())
            } else {
                Err(TrailmapError::OverpassUnavailable(String::from("unexpected query")))
            }
        }
    }

    /// fails every query
    struct OfflineSource;

    impl ElementSource for OfflineSource {
        fn query(&self, _query: &OverpassQuery) -> Result<Vec<OverpassElement>, TrailmapError> {
            Err(TrailmapError::OverpassUnavailable(String::from("no network")))
        }
    }

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node(id: i64, lon: f64, lat: f64, t: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Node {
            id,
            lat,
            lon,
            tags: tags(t),
        }
    }

    fn test_config(name: &str) -> TrailmapConfig {
        let dir = std::env::temp_dir().join(format!("trailmap_map_build_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = |f: &str| dir.join(f).to_string_lossy().to_string();
        TrailmapConfig {
            cache_file: path("cache.json"),
            filtered_file: path("filtered.json"),
            output_svg: path("map.svg"),
            exclude_routes: ["Excluded Connector".to_string()].into(),
            ..Default::default()
        }
    }

    fn stub(config: &TrailmapConfig) -> StubSource {
        let member = |w: i64| RelationMember {
            member_type: String::from("way"),
            reference: w,
            role: String::new(),
        };
        let routes = vec![
            node(1, -75.20, 40.00, &[]),
            node(2, -75.19, 40.00, &[]),
            node(3, -75.18, 40.00, &[]),
            node(4, -75.17, 40.00, &[]),
            node(5, -75.17, 40.01, &[]),
            OverpassElement::Way {
                id: 10,
                nodes: vec![1, 2, 3, 4],
                tags: HashMap::new(),
                center: None,
            },
            OverpassElement::Way {
                id: 11,
                nodes: vec![4, 5],
                tags: HashMap::new(),
                center: None,
            },
            OverpassElement::Relation {
                id: 100,
                members: vec![member(10)],
                tags: tags(&[
                    ("type", "route"),
                    ("route", "bicycle"),
                    ("name", "Wissahickon Valley Trail"),
                ]),
                center: None,
            },
            OverpassElement::Relation {
                id: 101,
                members: vec![member(11)],
                tags: tags(&[
                    ("type", "route"),
                    ("route", "bicycle"),
                    ("name", "Excluded Connector"),
                ]),
                center: None,
            },
        ];
        let trailheads = vec![node(
            900,
            -75.1802,
            40.0003,
            &[("highway", "trailhead"), ("name", "Valley Green Trailhead")],
        )];
        let amenities = vec![node(
            950,
            -75.2001,
            40.0001,
            &[("amenity", "drinking_water"), ("name", "Fountain")],
        )];
        StubSource {
            routes,
            trailheads,
            amenities,
            config: config.clone(),
        }
    }

    #[test]
    fn test_prepare_graph_online() {
        let config = test_config("online");
        let source = stub(&config);
        let options = MapBuildOptions {
            no_rail: true,
            ..Default::default()
        };
        let (graph, report) = prepare_graph(&config, &options, &source).unwrap();

        assert!(Path::new(&config.cache_file).is_file());
        assert!(Path::new(&config.filtered_file).is_file());
        assert!(report.absorption.is_none());
        assert!(report.trailheads.is_some());
        assert!(report.amenities.is_some());
        assert_eq!(report.dangling_references, 0);
        // the excluded route's only edge is gone
        assert!(graph
            .edges()
            .iter()
            .all(|e| e.lines.iter().all(|l| l.label != "Excluded Connector")));
        // the snapped trailhead split the way and carries its name
        let trailhead = graph.get_point(&NodeId::primary("3")).unwrap();
        assert!(trailhead.station_label.starts_with("Valley Green"));
    }

    #[test]
    fn test_offline_uses_cache() {
        let config = test_config("offline");
        let source = stub(&config);
        let online = MapBuildOptions {
            no_rail: true,
            ..Default::default()
        };
        prepare_graph(&config, &online, &source).unwrap();

        let offline = MapBuildOptions {
            offline: true,
            no_rail: true,
            ..Default::default()
        };
        let (_, report) = prepare_graph(&config, &offline, &OfflineSource).unwrap();
        assert!(report.trailheads.is_none());
        assert!(report.amenities.is_none());
        assert!(report.points > 0);
    }

    #[test]
    fn test_offline_without_cache_is_fatal() {
        let config = test_config("missing_cache");
        let _ = std::fs::remove_file(&config.cache_file);
        let options = MapBuildOptions {
            offline: true,
            no_rail: true,
            ..Default::default()
        };
        let result = prepare_graph(&config, &options, &OfflineSource);
        assert!(matches!(result, Err(TrailmapError::MissingCache(_))));
    }

    #[test]
    fn test_unavailable_rail_is_skipped() {
        let mut config = test_config("no_rail_file");
        config.rail = crate::model::rail::RailSource::GeoJsonFile {
            path: String::from("/nonexistent/rail.json"),
        };
        let source = stub(&config);
        let (_, report) = prepare_graph(&config, &MapBuildOptions::default(), &source).unwrap();
        assert!(report.absorption.is_none());
    }

    #[test]
    fn test_check_binaries_reports_missing() {
        let tools = vec![
            ExternalTool::new("./no-such-loom", &[]),
            ExternalTool::new("./no-such-loom", &[]),
        ];
        assert_eq!(check_binaries(&tools), vec![String::from("./no-such-loom")]);
    }
}
