use super::FilterQuery;
use crate::config::BoundingBox;
use itertools::Itertools;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Way => write!(f, "way"),
            ElementKind::Relation => write!(f, "relation"),
        }
    }
}

/// how overpass should print the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// full tags, node coordinates and way/relation members
    Body,
    /// like body, plus a center point for ways and relations
    Center,
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Body => write!(f, "out body;"),
            OutputMode::Center => write!(f, "out center;"),
        }
    }
}

/// one element selector: an element kind plus the tag clauses it must satisfy
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassStatement {
    pub kind: ElementKind,
    pub filters: Vec<FilterQuery>,
}

impl OverpassStatement {
    pub fn new(kind: ElementKind, filters: Vec<FilterQuery>) -> OverpassStatement {
        OverpassStatement { kind, filters }
    }

    fn render(&self, bbox: &BoundingBox) -> String {
        format!("{}{}({});", self.kind, self.filters.iter().join(""), bbox)
    }
}

/// an overpass QL query: the union of a set of statements within one bounding
/// box, optionally recursed down to member ways and nodes.
/// see <https://wiki.openstreetmap.org/wiki/Overpass_API/Language_Guide>
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    pub timeout_secs: u64,
    pub bbox: BoundingBox,
    pub statements: Vec<OverpassStatement>,
    pub recurse_down: bool,
    pub output: OutputMode,
}

impl OverpassQuery {
    /// timeout used for the smaller point-of-interest queries
    pub const POI_TIMEOUT_SECS: u64 = 60;

    /// every bicycle route relation in the box, with its member ways and nodes
    pub fn bicycle_routes(bbox: BoundingBox, timeout_secs: u64) -> OverpassQuery {
        OverpassQuery {
            timeout_secs,
            bbox,
            statements: vec![OverpassStatement::new(
                ElementKind::Relation,
                vec![
                    FilterQuery::equals("type", "route"),
                    FilterQuery::equals("route", "bicycle"),
                ],
            )],
            recurse_down: true,
            output: OutputMode::Body,
        }
    }

    /// tag clauses identifying a trailhead node
    pub fn trailhead_filters() -> Vec<Vec<FilterQuery>> {
        vec![
            vec![FilterQuery::equals("highway", "trailhead")],
            vec![
                FilterQuery::equals("tourism", "information"),
                FilterQuery::equals("information", "trailhead"),
            ],
        ]
    }

    /// tagged trailheads plus parking lots whose name matches `parking_pattern`
    pub fn trailheads(bbox: BoundingBox, parking_pattern: &str) -> OverpassQuery {
        let parking = vec![
            FilterQuery::equals("amenity", "parking"),
            FilterQuery::matches_ignore_case("name", parking_pattern),
        ];
        let mut statements = Self::trailhead_filters()
            .into_iter()
            .map(|f| OverpassStatement::new(ElementKind::Node, f))
            .collect_vec();
        statements.push(OverpassStatement::new(ElementKind::Node, parking.clone()));
        statements.push(OverpassStatement::new(ElementKind::Way, parking));
        OverpassQuery {
            timeout_secs: Self::POI_TIMEOUT_SECS,
            bbox,
            statements,
            recurse_down: false,
            output: OutputMode::Center,
        }
    }

    /// repair stands, maps, water, public toilets and trail parking lots
    pub fn amenities(bbox: BoundingBox, parking_pattern: &str) -> OverpassQuery {
        use ElementKind as K;
        use FilterQuery as F;
        let toilets = vec![
            F::equals("amenity", "toilets"),
            F::not_equals("access", "private"),
        ];
        let statements = vec![
            OverpassStatement::new(K::Node, vec![F::equals("amenity", "bicycle_repair_station")]),
            OverpassStatement::new(
                K::Node,
                vec![F::equals("tourism", "information"), F::equals("information", "map")],
            ),
            OverpassStatement::new(K::Node, vec![F::equals("amenity", "drinking_water")]),
            OverpassStatement::new(K::Node, toilets.clone()),
            OverpassStatement::new(K::Way, toilets),
            OverpassStatement::new(
                K::Way,
                vec![
                    F::equals("amenity", "parking"),
                    F::matches_ignore_case("name", parking_pattern),
                ],
            ),
        ];
        OverpassQuery {
            timeout_secs: Self::POI_TIMEOUT_SECS,
            bbox,
            statements,
            recurse_down: false,
            output: OutputMode::Center,
        }
    }
}

impl Display for OverpassQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[out:json][timeout:{}];", self.timeout_secs)?;
        writeln!(f, "(")?;
        for statement in self.statements.iter() {
            writeln!(f, "  {}", statement.render(&self.bbox))?;
        }
        writeln!(f, ");")?;
        if self.recurse_down {
            writeln!(f, "(._;>;);")?;
        }
        write!(f, "{}", self.output)
    }
}
