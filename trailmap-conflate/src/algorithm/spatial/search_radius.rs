/// a maximum search distance together with whether the boundary itself
/// counts as a hit. the thresholds in this domain mix both conventions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchRadius {
    /// distance < radius
    Exclusive(f64),
    /// distance <= radius
    Inclusive(f64),
}

impl SearchRadius {
    pub fn radius(&self) -> f64 {
        match self {
            SearchRadius::Exclusive(r) | SearchRadius::Inclusive(r) => *r,
        }
    }

    /// tests a squared distance against this radius
    pub fn admits_squared(&self, distance_squared: f64) -> bool {
        let r = self.radius();
        match self {
            SearchRadius::Exclusive(_) => distance_squared < r * r,
            SearchRadius::Inclusive(_) => distance_squared <= r * r,
        }
    }

    pub fn admits(&self, distance: f64) -> bool {
        match self {
            SearchRadius::Exclusive(r) => distance < *r,
            SearchRadius::Inclusive(r) => distance <= *r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary() {
        assert!(!SearchRadius::Exclusive(0.5).admits(0.5));
        assert!(SearchRadius::Inclusive(0.5).admits(0.5));
        assert!(!SearchRadius::Exclusive(0.5).admits_squared(0.25));
        assert!(SearchRadius::Inclusive(0.5).admits_squared(0.25));
        assert!(!SearchRadius::Exclusive(0.0).admits(0.0));
    }
}
