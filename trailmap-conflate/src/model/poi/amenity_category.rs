use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display};

/// the fixed set of amenity kinds rendered as icons on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityCategory {
    Toilets,
    Water,
    Repair,
    Information,
    Parking,
}

impl AmenityCategory {
    pub const ALL: [AmenityCategory; 5] = [
        AmenityCategory::Toilets,
        AmenityCategory::Water,
        AmenityCategory::Repair,
        AmenityCategory::Information,
        AmenityCategory::Parking,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            AmenityCategory::Toilets => "\u{1F6BB}\u{FE0F}",
            AmenityCategory::Water => "\u{1F6B0}\u{FE0F}",
            AmenityCategory::Repair => "\u{1F527}\u{FE0F}",
            AmenityCategory::Information => "\u{2139}\u{FE0F}",
            AmenityCategory::Parking => "\u{1F17F}\u{FE0F}",
        }
    }

    /// classifies an OSM element by its tags. returns None for elements that
    /// are not one of the mapped amenities. an element matching several kinds
    /// takes the first of repair, information map, water, toilets, parking.
    pub fn from_tags(tags: &HashMap<String, String>) -> Option<AmenityCategory> {
        let tag = |k: &str| tags.get(k).map(String::as_str);
        let amenity = tag("amenity");
        if amenity == Some("bicycle_repair_station") {
            Some(AmenityCategory::Repair)
        } else if tag("tourism") == Some("information") && tag("information") == Some("map") {
            Some(AmenityCategory::Information)
        } else {
            match amenity {
                Some("drinking_water") => Some(AmenityCategory::Water),
                Some("toilets") => Some(AmenityCategory::Toilets),
                Some("parking") => Some(AmenityCategory::Parking),
                _ => None,
            }
        }
    }
}

impl Display for AmenityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AmenityCategory::Toilets => "toilets",
            AmenityCategory::Water => "water",
            AmenityCategory::Repair => "repair",
            AmenityCategory::Information => "information",
            AmenityCategory::Parking => "parking",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_tags() {
        assert_eq!(
            AmenityCategory::from_tags(&tags(&[("amenity", "drinking_water")])),
            Some(AmenityCategory::Water)
        );
        assert_eq!(
            AmenityCategory::from_tags(&tags(&[("tourism", "information"), ("information", "map")])),
            Some(AmenityCategory::Information)
        );
        assert_eq!(
            AmenityCategory::from_tags(&tags(&[("tourism", "information"), ("information", "board")])),
            None
        );
        assert_eq!(AmenityCategory::from_tags(&tags(&[("highway", "path")])), None);
    }

    #[test]
    fn test_information_map_takes_precedence() {
        for amenity in ["parking", "toilets", "drinking_water"] {
            let t = tags(&[
                ("amenity", amenity),
                ("tourism", "information"),
                ("information", "map"),
            ]);
            assert_eq!(
                AmenityCategory::from_tags(&t),
                Some(AmenityCategory::Information),
                "amenity={amenity}"
            );
        }
        let t = tags(&[
            ("amenity", "bicycle_repair_station"),
            ("tourism", "information"),
            ("information", "map"),
        ]);
        assert_eq!(AmenityCategory::from_tags(&t), Some(AmenityCategory::Repair));
        assert_eq!(
            AmenityCategory::from_tags(&tags(&[("amenity", "toilets")])),
            Some(AmenityCategory::Toilets)
        );
    }
}
