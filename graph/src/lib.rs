use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub mod host;
pub mod links;
pub mod memory;

pub use host::{
    BooleanValueSource, Canvas, ConnectedNodes, Group, GroupMembership, GroupProvider, Host,
    ModeApplier, SortMode, ValueSources,
};
pub use links::{incoming_links, resolve_upstream};
pub use memory::{BooleanWidget, MemoryHost};

pub type NodeId = u64;
pub type LinkId = u64;
pub type GraphId = u64;

pub const ROOT_GRAPH: GraphId = 0;

/// Execution mode of a node, numbered the way the editor stores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Always,
    OnEvent,
    Never,
    OnTrigger,
    Bypass,
}

impl RunMode {
    pub fn code(self) -> u8 {
        match self {
            RunMode::Always => 0,
            RunMode::OnEvent => 1,
            RunMode::Never => 2,
            RunMode::OnTrigger => 3,
            RunMode::Bypass => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RunMode::Always),
            1 => Some(RunMode::OnEvent),
            2 => Some(RunMode::Never),
            3 => Some(RunMode::OnTrigger),
            4 => Some(RunMode::Bypass),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RunMode::Always => "always",
            RunMode::OnEvent => "on_event",
            RunMode::Never => "muted",
            RunMode::OnTrigger => "on_trigger",
            RunMode::Bypass => "bypassed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub name: String,
    #[serde(default)]
    pub current_graph: GraphId,
    pub nodes: Vec<NodeDefinition>,
    pub groups: Vec<GroupDefinition>,
    #[serde(default)]
    pub links: Vec<LinkDefinition>,
    #[serde(default)]
    pub controllers: Vec<ControllerDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: NodeId,
    pub kind: String,
    #[serde(default)]
    pub graph: GraphId,
    pub pos: [f32; 2],
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub widgets_values: Vec<serde_json::Value>,
    /// Live boolean widget, when the node type exposes one.
    #[serde(default)]
    pub boolean_widget: Option<bool>,
    #[serde(default)]
    pub pass_through: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub graph: GraphId,
    /// `[x, y, width, height]`
    pub bounding: [f32; 4],
}

impl GroupDefinition {
    pub fn contains(&self, pos: [f32; 2]) -> bool {
        let [x, y, w, h] = self.bounding;
        pos[0] >= x && pos[0] <= x + w && pos[1] >= y && pos[1] <= y + h
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDefinition {
    pub id: LinkId,
    pub from_node: NodeId,
    #[serde(default)]
    pub from_slot: usize,
    pub to_node: NodeId,
    pub to_input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerDefinition {
    pub id: NodeId,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown group '{0}'")]
    UnknownGroup(String),
    #[error("unknown link {0}")]
    UnknownLink(LinkId),
}

impl GraphDefinition {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            current_graph: ROOT_GRAPH,
            nodes: Vec::new(),
            groups: Vec::new(),
            links: Vec::new(),
            controllers: Vec::new(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeDefinition> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn group(&self, title: &str) -> Option<&GroupDefinition> {
        self.groups.iter().find(|group| group.title == title)
    }

    pub fn link(&self, id: LinkId) -> Option<&LinkDefinition> {
        self.links.iter().find(|link| link.id == id)
    }

    /// Nodes positioned inside the group's rectangle on the group's own graph.
    pub fn group_members(&self, title: &str) -> Result<Vec<NodeId>, GraphError> {
        let group = self
            .group(title)
            .ok_or_else(|| GraphError::UnknownGroup(title.to_string()))?;
        Ok(self
            .nodes
            .iter()
            .filter(|node| node.graph == group.graph && group.contains(node.pos))
            .map(|node| node.id)
            .collect())
    }

    pub fn next_link_id(&self) -> LinkId {
        self.links.iter().map(|link| link.id + 1).max().unwrap_or(1)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let data = fs::read(path)?;
        let definition = serde_json::from_slice(&data)?;
        Ok(definition)
    }
}
