//! Reference host backed by a [`GraphDefinition`], used by the CLI and tests.

use crate::host::{
    BooleanValueSource, Canvas, ConnectedNodes, Group, GroupMembership, GroupProvider,
    ModeApplier, SortMode, ValueSources,
};
use crate::{
    links, GraphDefinition, GraphError, GraphId, GroupDefinition, LinkDefinition, LinkId, NodeId,
    RunMode,
};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanWidget {
    pub value: bool,
}

impl BooleanValueSource for BooleanWidget {
    fn read_current_boolean_value(&self) -> Option<bool> {
        Some(self.value)
    }
}

#[derive(Debug)]
pub struct MemoryHost {
    graph: GraphDefinition,
    widgets: HashMap<NodeId, BooleanWidget>,
    active: HashMap<String, bool>,
    snapshot: HashMap<NodeId, Vec<Value>>,
    resized: HashMap<NodeId, usize>,
    dirty: bool,
}

impl MemoryHost {
    pub fn new(graph: GraphDefinition) -> Self {
        let widgets = graph
            .nodes
            .iter()
            .filter_map(|node| {
                node.boolean_widget
                    .map(|value| (node.id, BooleanWidget { value }))
            })
            .collect();
        Self {
            graph,
            widgets,
            active: HashMap::new(),
            snapshot: HashMap::new(),
            resized: HashMap::new(),
            dirty: false,
        }
    }

    pub fn graph(&self) -> &GraphDefinition {
        &self.graph
    }

    pub fn into_graph(self) -> GraphDefinition {
        self.graph
    }

    pub fn set_current_graph(&mut self, graph: GraphId) {
        self.graph.current_graph = graph;
    }

    pub fn add_group(&mut self, group: GroupDefinition) {
        self.graph.groups.push(group);
    }

    pub fn remove_group(&mut self, title: &str) -> Result<(), GraphError> {
        let before = self.graph.groups.len();
        self.graph.groups.retain(|group| group.title != title);
        if self.graph.groups.len() == before {
            return Err(GraphError::UnknownGroup(title.to_string()));
        }
        self.active.remove(title);
        Ok(())
    }

    pub fn set_boolean_widget(&mut self, node: NodeId, value: Option<bool>) {
        match value {
            Some(value) => {
                self.widgets.insert(node, BooleanWidget { value });
            }
            None => {
                self.widgets.remove(&node);
            }
        }
    }

    pub fn set_widget_values(&mut self, node: NodeId, values: Vec<Value>) -> Result<(), GraphError> {
        let definition = self
            .graph
            .node_mut(node)
            .ok_or(GraphError::UnknownNode(node))?;
        definition.widgets_values = values;
        Ok(())
    }

    pub fn connect(
        &mut self,
        from_node: NodeId,
        to_node: NodeId,
        to_input: &str,
    ) -> Result<LinkId, GraphError> {
        if self.graph.node(from_node).is_none() {
            return Err(GraphError::UnknownNode(from_node));
        }
        let id = self.graph.next_link_id();
        self.graph.links.push(LinkDefinition {
            id,
            from_node,
            from_slot: 0,
            to_node,
            to_input: to_input.to_string(),
        });
        Ok(id)
    }

    /// Captures every node's widget values, as graph-to-prompt serialization does.
    pub fn capture_snapshot(&mut self) {
        self.snapshot = self
            .graph
            .nodes
            .iter()
            .map(|node| (node.id, node.widgets_values.clone()))
            .collect();
    }

    pub fn clear_snapshot(&mut self) {
        self.snapshot.clear();
    }

    pub fn node_mode(&self, node: NodeId) -> Option<RunMode> {
        self.graph.node(node).map(|node| node.mode)
    }

    pub fn group_active(&self, title: &str) -> bool {
        if let Some(active) = self.active.get(title) {
            return *active;
        }
        self.computed_active(title)
    }

    pub fn resized_input_count(&self, node: NodeId) -> Option<usize> {
        self.resized.get(&node).copied()
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn computed_active(&self, title: &str) -> bool {
        self.graph
            .group_members(title)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| self.node_mode(id))
            .any(|mode| mode == RunMode::Always)
    }

    fn snapshot_group(&self, group: &GroupDefinition) -> Group {
        Group {
            title: group.title.clone(),
            color: group.color.clone(),
            graph: group.graph,
            has_active_node: self.group_active(&group.title),
        }
    }
}

impl GroupProvider for MemoryHost {
    fn groups(&self, sort: SortMode) -> Vec<Group> {
        let mut groups: Vec<&GroupDefinition> = self.graph.groups.iter().collect();
        match sort {
            SortMode::Alphanumeric => groups.sort_by(|a, b| a.title.cmp(&b.title)),
            SortMode::Position | SortMode::CustomAlphabet => groups.sort_by(|a, b| {
                a.bounding[1]
                    .total_cmp(&b.bounding[1])
                    .then_with(|| a.bounding[0].total_cmp(&b.bounding[0]))
            }),
        }
        groups
            .into_iter()
            .map(|group| self.snapshot_group(group))
            .collect()
    }

    fn current_graph(&self) -> GraphId {
        self.graph.current_graph
    }
}

impl ConnectedNodes for MemoryHost {
    fn resolve_upstream(&self, link: LinkId) -> Vec<NodeId> {
        links::resolve_upstream(&self.graph, link)
    }
}

impl GroupMembership for MemoryHost {
    fn members_of(&self, title: &str) -> Vec<NodeId> {
        self.graph.group_members(title).unwrap_or_default()
    }

    fn set_group_active(&mut self, title: &str, active: bool) {
        self.active.insert(title.to_string(), active);
    }
}

impl ModeApplier for MemoryHost {
    fn apply_run_mode(&mut self, nodes: &[NodeId], mode: RunMode) {
        for id in nodes {
            match self.graph.node_mut(*id) {
                Some(node) => node.mode = mode,
                None => log::warn!("cannot apply {} to missing node {id}", mode.label()),
            }
        }
    }
}

impl ValueSources for MemoryHost {
    fn boolean_source(&self, node: NodeId) -> Option<&dyn BooleanValueSource> {
        self.widgets
            .get(&node)
            .map(|widget| widget as &dyn BooleanValueSource)
    }

    fn serialized_values(&self, node: NodeId) -> Option<&[Value]> {
        self.snapshot.get(&node).map(|values| values.as_slice())
    }
}

impl Canvas for MemoryHost {
    fn node_resized(&mut self, node: NodeId, input_count: usize) {
        self.resized.insert(node, input_count);
    }

    fn set_dirty(&mut self) {
        self.dirty = true;
    }
}
