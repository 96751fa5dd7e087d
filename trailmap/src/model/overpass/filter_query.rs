use super::FilterOp;
use regex::RegexBuilder;
use std::{collections::HashMap, fmt::Display};

/// a single tag clause of an overpass statement, such as `["amenity"="parking"]`.
/// see <https://wiki.openstreetmap.org/wiki/Overpass_API/Language_Guide#Tag_request_clauses_(or_%22tag_filters%22)>
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    tag: String,
    op: FilterOp,
    value: String,
}

impl FilterQuery {
    pub fn equals(tag: &str, value: &str) -> FilterQuery {
        FilterQuery {
            tag: tag.to_string(),
            op: FilterOp::Equals,
            value: value.to_string(),
        }
    }

    pub fn not_equals(tag: &str, value: &str) -> FilterQuery {
        FilterQuery {
            tag: tag.to_string(),
            op: FilterOp::NotEquals,
            value: value.to_string(),
        }
    }

    pub fn matches_ignore_case(tag: &str, pattern: &str) -> FilterQuery {
        FilterQuery {
            tag: tag.to_string(),
            op: FilterOp::MatchesIgnoreCase,
            value: pattern.to_string(),
        }
    }

    /// evaluates the clause against an element's tags the way overpass does:
    /// `!=` also accepts elements that lack the tag entirely.
    pub fn filter(&self, tags: &HashMap<String, String>) -> bool {
        let value = tags.get(&self.tag);
        match (self.op, value) {
            (FilterOp::Equals, Some(v)) => *v == self.value,
            (FilterOp::NotEquals, Some(v)) => *v != self.value,
            (FilterOp::NotEquals, None) => true,
            (FilterOp::MatchesIgnoreCase, Some(v)) => RegexBuilder::new(&self.value)
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(v))
                .unwrap_or(false),
            (_, None) => false,
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Display for FilterQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = match self.op {
            FilterOp::MatchesIgnoreCase => ",i",
            _ => "",
        };
        write!(
            f,
            "[\"{}\"{}\"{}\"{}]",
            escape(&self.tag),
            self.op,
            escape(&self.value),
            suffix
        )
    }
}
