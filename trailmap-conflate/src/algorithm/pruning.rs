use crate::model::graph::{FeatureGraph, NodeState};

/// hides every active node that is unlabeled, not a rail station and not a
/// true endpoint (incident degree other than 1). returns the number hidden.
pub fn prune_nodes(graph: &mut FeatureGraph) -> usize {
    let degree = graph.incidence_degree();
    let mut hidden = 0;
    for node in graph.points_mut() {
        if !node.is_active() || node.is_rail_station() || node.is_labeled() {
            continue;
        }
        if degree.get(node.id()).copied().unwrap_or_default() != 1 {
            node.hide(NodeState::Hidden);
            hidden += 1;
        }
    }
    log::info!("hid {hidden} unnamed non-endpoint nodes (rail stations preserved)");
    hidden
}
