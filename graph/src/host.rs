//! Collaborator interfaces the group controller consumes from its host editor.

use crate::{GraphId, LinkId, NodeId, RunMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Position,
    Alphanumeric,
    CustomAlphabet,
}

impl SortMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "position" => Some(SortMode::Position),
            "alphanumeric" => Some(SortMode::Alphanumeric),
            "custom alphabet" => Some(SortMode::CustomAlphabet),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Position => "position",
            SortMode::Alphanumeric => "alphanumeric",
            SortMode::CustomAlphabet => "custom alphabet",
        }
    }
}

/// Snapshot of a group as the host reports it. The title is the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub title: String,
    pub color: Option<String>,
    pub graph: GraphId,
    pub has_active_node: bool,
}

impl Group {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            color: None,
            graph: crate::ROOT_GRAPH,
            has_active_node: true,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn in_graph(mut self, graph: GraphId) -> Self {
        self.graph = graph;
        self
    }
}

pub trait GroupProvider {
    /// Ordered groups for `sort`. Custom alphabet ordering is not the
    /// provider's job; it may return any order for that mode.
    fn groups(&self, sort: SortMode) -> Vec<Group>;
    /// The graph (or subgraph) currently open in the editor.
    fn current_graph(&self) -> GraphId;
}

pub trait ConnectedNodes {
    /// Source nodes feeding `link`, with pass-through nodes skipped.
    fn resolve_upstream(&self, link: LinkId) -> Vec<NodeId>;
}

pub trait GroupMembership {
    fn members_of(&self, title: &str) -> Vec<NodeId>;
    fn set_group_active(&mut self, title: &str, active: bool);
}

pub trait ModeApplier {
    fn apply_run_mode(&mut self, nodes: &[NodeId], mode: RunMode);
}

/// Capability an upstream node type may offer: a boolean it can report
/// without serialization.
pub trait BooleanValueSource {
    fn read_current_boolean_value(&self) -> Option<bool>;
}

pub trait ValueSources {
    fn boolean_source(&self, node: NodeId) -> Option<&dyn BooleanValueSource>;
    /// Widget values captured for `node` by the last graph-to-prompt pass.
    fn serialized_values(&self, node: NodeId) -> Option<&[serde_json::Value]>;
}

pub trait Canvas {
    fn node_resized(&mut self, node: NodeId, input_count: usize);
    fn set_dirty(&mut self);
}

pub trait Host: GroupProvider + ConnectedNodes + GroupMembership + ModeApplier + ValueSources + Canvas {}

impl<T> Host for T where
    T: GroupProvider + ConnectedNodes + GroupMembership + ModeApplier + ValueSources + Canvas
{
}
