use super::route_color;
use crate::model::overpass::OverpassElement;
use itertools::Itertools;
use trailmap_conflate::model::graph::Line;

/// a bicycle route relation reduced to what the map needs
#[derive(Clone, Debug, PartialEq)]
pub struct BicycleRoute {
    pub id: String,
    pub name: String,
    pub color: String,
    /// member ways in relation order
    pub way_refs: Vec<i64>,
}

impl BicycleRoute {
    /// reads a route relation. other element kinds are not routes.
    pub fn from_element(element: &OverpassElement) -> Option<BicycleRoute> {
        let OverpassElement::Relation {
            id, members, tags, ..
        } = element
        else {
            return None;
        };
        let name = ["name", "ref"]
            .iter()
            .filter_map(|k| tags.get(*k))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("Route {id}"));
        let color = route_color(tags, &name);
        let way_refs = members
            .iter()
            .filter(|m| m.member_type == "way")
            .map(|m| m.reference)
            .collect_vec();
        Some(BicycleRoute {
            id: id.to_string(),
            name,
            color,
            way_refs,
        })
    }

    pub fn line(&self) -> Line {
        Line::new(self.id.clone(), self.name.clone(), self.color.clone())
    }
}
