pub mod config;
pub mod controller;
pub mod filter;
pub mod reconcile;
pub mod resolver;
pub mod task;
pub mod variant;

pub use config::RemoteConfig;
pub use controller::{
    ControllerError, LifecycleState, OutputSlot, RemoteGroupController, INITIAL_REFRESH_DELAY,
    PASS_THROUGH_OUTPUT, REFRESH_DEBOUNCE,
};
pub use filter::{filter_and_sort, visible_groups};
pub use reconcile::{input_name, reconcile_inputs, GroupInputMap, InputSlot};
pub use resolver::{coerce_serialized_value, resolve_input_value};
pub use task::{RefreshKind, RefreshTask};
pub use variant::{BulkAction, ModeVariant, BYPASSER, MUTER};
