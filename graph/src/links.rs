use crate::{GraphDefinition, LinkDefinition, LinkId, NodeId};
use std::collections::HashSet;

pub fn incoming_links(graph: &GraphDefinition, node: NodeId) -> Vec<&LinkDefinition> {
    graph.links.iter().filter(|link| link.to_node == node).collect()
}

/// Walks back from `link` to the nodes that actually produce its value.
/// Pass-through nodes are replaced by whatever feeds them; cycles and
/// dangling links resolve to nothing.
pub fn resolve_upstream(graph: &GraphDefinition, link: LinkId) -> Vec<NodeId> {
    let Some(start) = graph.link(link) else {
        return Vec::new();
    };
    let mut resolved = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut pending = vec![start.from_node];
    while let Some(node_id) = pending.pop() {
        if !visited.insert(node_id) {
            continue;
        }
        let Some(node) = graph.node(node_id) else {
            continue;
        };
        if !node.pass_through {
            resolved.push(node_id);
            continue;
        }
        let mut feeders: Vec<NodeId> = incoming_links(graph, node_id)
            .into_iter()
            .map(|l| l.from_node)
            .collect();
        feeders.reverse();
        pending.extend(feeders);
    }
    resolved
}
