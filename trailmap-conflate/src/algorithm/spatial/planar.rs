use geo::{Closest, ClosestPoint, Coord, Line, LineString, Point};

pub fn distance_squared(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    distance_squared(a, b).sqrt()
}

/// the point on a polyline closest to a query point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// index of the segment (coordinate pair starting at this index)
    pub segment_index: usize,
    pub coord: Coord<f64>,
    pub distance: f64,
}

/// projects `query` onto every segment of `linestring` and returns the
/// closest projection. the first segment wins ties.
pub fn project_onto(linestring: &LineString<f64>, query: Coord<f64>) -> Option<SegmentProjection> {
    let point = Point::from(query);
    let mut best: Option<SegmentProjection> = None;
    for (segment_index, line) in linestring.lines().enumerate() {
        let coord = project_onto_line(&line, point);
        let distance = distance(query, coord);
        let better = match &best {
            Some(b) => distance < b.distance,
            None => true,
        };
        if better {
            best = Some(SegmentProjection {
                segment_index,
                coord,
                distance,
            });
        }
    }
    best
}

fn project_onto_line(line: &Line<f64>, point: Point<f64>) -> Coord<f64> {
    match line.closest_point(&point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p.0,
        // zero-length segment
        Closest::Indeterminate => line.start,
    }
}
