use graph::RunMode;

pub const EXPOSED_ACTIONS: [&str; 3] = ["Bypass all", "Enable all", "Toggle all"];

/// What distinguishes the muter from the bypasser: which run mode means
/// "off" and how the node presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeVariant {
    pub name: &'static str,
    pub on_mode: RunMode,
    pub off_mode: RunMode,
    pub help_actions: &'static str,
    pub exposed_actions: &'static [&'static str],
}

pub const MUTER: ModeVariant = ModeVariant {
    name: "Fast Groups Muter Remote",
    on_mode: RunMode::Always,
    off_mode: RunMode::Never,
    help_actions: "mute and unmute",
    exposed_actions: &EXPOSED_ACTIONS,
};

pub const BYPASSER: ModeVariant = ModeVariant {
    name: "Fast Groups Bypasser Remote",
    on_mode: RunMode::Always,
    off_mode: RunMode::Bypass,
    help_actions: "bypass and enable",
    exposed_actions: &EXPOSED_ACTIONS,
};

impl ModeVariant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "muter" | "mute" | "fast groups muter remote" => Some(MUTER),
            "bypasser" | "bypass" | "fast groups bypasser remote" => Some(BYPASSER),
            _ => None,
        }
    }

    pub fn mode_for(&self, enabled: bool) -> RunMode {
        if enabled {
            self.on_mode
        } else {
            self.off_mode
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    BypassAll,
    EnableAll,
    ToggleAll,
}

impl BulkAction {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Bypass all" => Some(BulkAction::BypassAll),
            "Enable all" => Some(BulkAction::EnableAll),
            "Toggle all" => Some(BulkAction::ToggleAll),
            _ => None,
        }
    }
}
