use super::{EdgeSegment, Feature, NodeId, NodeLines, NodeState, PointNode};
use crate::model::ConflationError;
use itertools::Itertools;
use std::collections::{BTreeSet, HashMap, HashSet};

/// the shared in-memory graph of point nodes and edge segments.
///
/// points are only ever appended, so the id lookup stays valid for the life of
/// the graph. "removing" a node means hiding it via [`FeatureGraph::hide`].
#[derive(Default, Debug, Clone)]
pub struct FeatureGraph {
    points: Vec<PointNode>,
    edges: Vec<EdgeSegment>,
    /// position of each point id in `points`
    index: HashMap<NodeId, usize>,
}

impl FeatureGraph {
    pub fn empty() -> FeatureGraph {
        FeatureGraph::default()
    }

    /// builds a graph from points and edges. when an id occurs more than once,
    /// the first occurrence is kept and later ones are dropped with a warning.
    pub fn new(points: Vec<PointNode>, edges: Vec<EdgeSegment>) -> FeatureGraph {
        let mut graph = FeatureGraph {
            points: Vec::with_capacity(points.len()),
            edges,
            index: HashMap::new(),
        };
        for point in points {
            if let Err(e) = graph.add_point(point) {
                log::warn!("{e}, dropping duplicate");
            }
        }
        graph
    }

    pub fn from_features(features: Vec<Feature>) -> FeatureGraph {
        let (points, edges): (Vec<_>, Vec<_>) = features.into_iter().partition_map(|f| match f {
            Feature::Point(p) => itertools::Either::Left(p),
            Feature::Edge(e) => itertools::Either::Right(e),
        });
        FeatureGraph::new(points, edges)
    }

    pub fn into_parts(self) -> (Vec<PointNode>, Vec<EdgeSegment>) {
        (self.points, self.edges)
    }

    pub fn points(&self) -> &[PointNode] {
        &self.points
    }

    pub fn edges(&self) -> &[EdgeSegment] {
        &self.edges
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.index.contains_key(node_id)
    }

    pub fn point_index(&self, node_id: &NodeId) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    pub fn get_point(&self, node_id: &NodeId) -> Option<&PointNode> {
        self.point_index(node_id).and_then(|i| self.points.get(i))
    }

    pub fn get_point_mut(&mut self, node_id: &NodeId) -> Option<&mut PointNode> {
        match self.point_index(node_id) {
            Some(i) => self.points.get_mut(i),
            None => None,
        }
    }

    /// helper with error handling for getting the point for a given node id
    pub fn get_point_data(&self, node_id: &NodeId) -> Result<&PointNode, ConflationError> {
        self.get_point(node_id)
            .ok_or_else(|| ConflationError::GraphMissingNodeId(node_id.clone()))
    }

    pub fn point_at(&self, index: usize) -> Option<&PointNode> {
        self.points.get(index)
    }

    pub fn point_at_mut(&mut self, index: usize) -> Option<&mut PointNode> {
        self.points.get_mut(index)
    }

    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut PointNode> {
        self.points.iter_mut()
    }

    pub fn edge_at_mut(&mut self, index: usize) -> Option<&mut EdgeSegment> {
        self.edges.get_mut(index)
    }

    pub fn add_point(&mut self, point: PointNode) -> Result<usize, ConflationError> {
        if self.index.contains_key(point.id()) {
            return Err(ConflationError::DuplicateNodeId(point.id().clone()));
        }
        let idx = self.points.len();
        self.index.insert(point.id().clone(), idx);
        self.points.push(point);
        Ok(idx)
    }

    pub fn add_edge(&mut self, edge: EdgeSegment) {
        self.edges.push(edge);
    }

    /// keeps only the edges for which `keep` returns true. only valid before
    /// conflation begins; the passes themselves never remove edges.
    pub fn retain_edges(&mut self, keep: impl FnMut(&EdgeSegment) -> bool) {
        self.edges.retain(keep);
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut EdgeSegment> {
        self.edges.iter_mut()
    }

    /// number of edge endpoints incident to each node id. ids referenced by
    /// edges but missing from the point list are included.
    pub fn incidence_degree(&self) -> HashMap<NodeId, usize> {
        let mut degree: HashMap<NodeId, usize> = HashMap::new();
        for edge in self.edges.iter() {
            for node_id in [&edge.from, &edge.to] {
                if !node_id.is_empty() {
                    *degree.entry(node_id.clone()).or_default() += 1;
                }
            }
        }
        degree
    }

    /// ids of all degree-1 point nodes, in order of first appearance in the edge list
    pub fn endpoints(&self) -> Vec<NodeId> {
        let degree = self.incidence_degree();
        self.edges
            .iter()
            .flat_map(|e| [&e.from, &e.to])
            .unique()
            .filter(|id| degree.get(*id) == Some(&1) && self.contains_node(id))
            .cloned()
            .collect_vec()
    }

    /// the set of line ids incident to each node
    pub fn node_lines(&self) -> NodeLines {
        let mut lines: NodeLines = HashMap::new();
        for edge in self.edges.iter() {
            let ids: HashSet<String> = edge.line_ids().map(String::from).collect();
            for node_id in [&edge.from, &edge.to] {
                if !node_id.is_empty() {
                    lines
                        .entry(node_id.clone())
                        .or_default()
                        .extend(ids.iter().cloned());
                }
            }
        }
        lines
    }

    /// every non-empty route label present on the edges
    pub fn route_names(&self) -> BTreeSet<String> {
        self.edges
            .iter()
            .flat_map(|e| e.lines.iter())
            .map(|l| l.label.trim())
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    /// all node ids directly connected to `node_id` by an edge
    pub fn neighbors(&self, node_id: &NodeId) -> HashSet<NodeId> {
        let mut neighbors = HashSet::new();
        for edge in self.edges.iter() {
            if &edge.from == node_id && !edge.to.is_empty() {
                neighbors.insert(edge.to.clone());
            }
            if &edge.to == node_id && !edge.from.is_empty() {
                neighbors.insert(edge.from.clone());
            }
        }
        neighbors
    }

    /// re-points every edge endpoint referencing `old_id` to `new_id`, placing
    /// the polyline end on the coordinate of `new_id`. returns the number of
    /// endpoints changed.
    pub fn repoint(&mut self, old_id: &NodeId, new_id: &NodeId) -> Result<usize, ConflationError> {
        let coord = self.get_point_data(new_id)?.coord;
        let changed = self
            .edges
            .iter_mut()
            .map(|e| e.repoint(old_id, new_id, coord))
            .sum();
        Ok(changed)
    }

    /// soft-deletes a node. returns false if the id is not a point of this graph.
    pub fn hide(&mut self, node_id: &NodeId, state: NodeState) -> bool {
        match self.get_point_mut(node_id) {
            Some(point) => {
                point.hide(state);
                true
            }
            None => false,
        }
    }

    /// number of edge endpoints that name a node id with no point in this graph
    pub fn dangling_references(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| [&e.from, &e.to])
            .filter(|id| !id.is_empty() && !self.contains_node(id))
            .count()
    }

    pub fn degenerate_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.is_degenerate()).count()
    }

    pub fn labeled_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.is_active() && p.is_labeled())
            .count()
    }
}
