use crate::config::ConflationConfig;
use crate::model::ConflationError;
use crate::model::graph::FeatureGraph;
use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// shortens raw trailhead/parking names into station labels.
///
/// the rules are applied as a single step repeatedly until the label stops
/// changing, so normalizing an already normalized label is a no-op.
pub struct LabelNormalizer {
    suffix: Regex,
    connector: Regex,
    punctuation: Regex,
    /// route name patterns, longest name first
    routes: Vec<Regex>,
    route_names_lower: HashSet<String>,
    min_chars: usize,
}

impl LabelNormalizer {
    const SUFFIX_REGEX: &str = r"(?i)[\s,\-]*\b(trailhead|trail\s+head|parking\s+area|parking\s+lot|parking|access\s+point|access\s+area|access)\b[\s,\-]*$";
    const CONNECTOR_REGEX: &str = r"(?i)^\s*(\band\b|\bor\b|&|\bat\b|\bnear\b|[-,/])\s*|\s*(\band\b|\bor\b|&|\bat\b|\bnear\b|[-,/])\s*$";
    const PUNCTUATION_REGEX: &str = r"[\s,.\-&/]+";
    const CONNECTOR_PASSES: usize = 3;
    const TRIM_CHARS: [char; 6] = [' ', ',', '.', '-', '&', '/'];

    pub fn new(
        route_names: &BTreeSet<String>,
        config: &ConflationConfig,
    ) -> Result<LabelNormalizer, ConflationError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                ConflationError::LabelPatternError(format!(
                    "internal error building label regex: {e}"
                ))
            })
        };
        let routes = route_names
            .iter()
            .map(|r| r.trim())
            .filter(|r| r.chars().count() >= config.route_name_min_chars)
            .sorted_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)))
            .map(|r| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(r)))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ConflationError::LabelPatternError(format!(
                            "failure building pattern for route '{r}': {e}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LabelNormalizer {
            suffix: compile(Self::SUFFIX_REGEX)?,
            connector: compile(Self::CONNECTOR_REGEX)?,
            punctuation: compile(Self::PUNCTUATION_REGEX)?,
            routes,
            route_names_lower: route_names.iter().map(|r| r.trim().to_lowercase()).collect(),
            min_chars: config.label_min_chars,
        })
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut current = String::from(raw);
        loop {
            let next = self.normalize_once(&current);
            // every step only removes characters, so this terminates
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// true if the label is exactly one of the known route names
    pub fn is_route_name(&self, label: &str) -> bool {
        self.route_names_lower.contains(&label.trim().to_lowercase())
    }

    fn normalize_once(&self, raw: &str) -> String {
        let after_suffix = self.suffix.replace_all(raw, "").trim().to_string();

        let mut after_routes = after_suffix.clone();
        for route in self.routes.iter() {
            let candidate = route.replace_all(&after_routes, "").to_string();
            let cleaned = self.punctuation.replace_all(&candidate, " ");
            // a route name embedded in a proper noun is left alone
            if self.too_short(cleaned.trim()) {
                continue;
            }
            after_routes = candidate;
        }

        for _ in 0..Self::CONNECTOR_PASSES {
            after_routes = self
                .connector
                .replace_all(&after_routes, "")
                .trim_matches(&Self::TRIM_CHARS[..])
                .to_string();
        }

        let result = if self.too_short(&after_routes) {
            after_suffix
        } else {
            after_routes
        };
        let result = result.trim();
        if self.too_short(result) {
            String::from(raw)
        } else {
            String::from(result)
        }
    }

    fn too_short(&self, s: &str) -> bool {
        s.chars().count() < self.min_chars
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationSummary {
    pub normalized: usize,
    /// labels removed because they only repeated a route name
    pub cleared: usize,
}

/// normalizes the label of every active, labeled node except rail stations,
/// whose names come from the schedule feed and are kept verbatim. a label
/// that ends up equal to a route name is cleared unless it came from an
/// authoritative name tag.
pub fn normalize_labels(
    graph: &mut FeatureGraph,
    config: &ConflationConfig,
) -> Result<NormalizationSummary, ConflationError> {
    let normalizer = LabelNormalizer::new(&graph.route_names(), config)?;
    let mut summary = NormalizationSummary::default();
    for node in graph.points_mut() {
        if !node.is_active() || !node.is_labeled() || node.is_rail_station() {
            continue;
        }
        let old_label = node.label().to_string();
        let mut new_label = normalizer.normalize(&old_label);
        if normalizer.is_route_name(&new_label) && !node.osm_named {
            new_label.clear();
            summary.cleared += 1;
        }
        if new_label != old_label {
            log::debug!("label of {}: '{old_label}' -> '{new_label}'", node.id());
            node.station_label = new_label;
            summary.normalized += 1;
        }
    }
    log::info!(
        "normalized {} station labels, cleared {} route-name-only labels",
        summary.normalized,
        summary.cleared
    );
    Ok(summary)
}
