use crate::config::{default_properties, RemoteConfig, REFRESH_PROPERTIES};
use crate::filter::visible_groups;
use crate::reconcile::{reconcile_inputs, GroupInputMap, InputSlot};
use crate::resolver::resolve_input_value;
use crate::task::{RefreshKind, RefreshTask};
use crate::variant::{BulkAction, ModeVariant};
use graph::{GraphId, Group, Host, LinkId, NodeId, SortMode};
use lifecycle::{LifecycleBus, LifecycleError, LifecycleEvent, Subscription};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(100);
pub const INITIAL_REFRESH_DELAY: Duration = Duration::from_millis(200);

pub const PASS_THROUGH_OUTPUT: &str = "OPT_CONNECTION";
pub const WILDCARD_TYPE: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSlot {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Queued,
    Serializing,
}

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("no input named '{0}'")]
    UnknownInput(String),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

/// A node that mirrors the graph's groups as boolean inputs and, when a
/// prompt is serialized, drives each group's run mode from its input.
#[derive(Debug)]
pub struct RemoteGroupController {
    id: NodeId,
    variant: ModeVariant,
    properties: Map<String, Value>,
    inputs: Vec<InputSlot>,
    outputs: Vec<OutputSlot>,
    group_inputs: GroupInputMap,
    graph: Option<GraphId>,
    refresh: RefreshTask,
    processing_queue: bool,
    state: LifecycleState,
    subscription: Option<Subscription>,
}

impl RemoteGroupController {
    /// Creates the controller and registers its lifecycle listener on `bus`.
    pub fn new<B: LifecycleBus + ?Sized>(id: NodeId, variant: ModeVariant, bus: &mut B) -> Self {
        let subscription = bus.subscribe(&LifecycleEvent::ALL);
        Self {
            id,
            variant,
            properties: default_properties(),
            inputs: Vec::new(),
            outputs: vec![OutputSlot {
                name: PASS_THROUGH_OUTPUT.to_string(),
                kind: WILDCARD_TYPE.to_string(),
            }],
            group_inputs: GroupInputMap::default(),
            graph: None,
            refresh: RefreshTask::default(),
            processing_queue: false,
            state: LifecycleState::Idle,
            subscription: Some(subscription),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn variant(&self) -> ModeVariant {
        self.variant
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn inputs(&self) -> &[InputSlot] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputSlot] {
        &self.outputs
    }

    pub fn group_inputs(&self) -> &GroupInputMap {
        &self.group_inputs
    }

    pub fn processing_queue(&self) -> bool {
        self.processing_queue
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.graph.is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn refresh_task(&self) -> &RefreshTask {
        &self.refresh
    }

    /// Restores inputs saved with a workflow, before the first reconciliation.
    pub fn restore_inputs(&mut self, inputs: Vec<InputSlot>) {
        self.inputs = inputs;
    }

    pub fn on_added(&mut self, graph: GraphId, now: Duration) {
        self.graph = Some(graph);
        self.refresh
            .schedule(RefreshKind::InitialAttach, now, INITIAL_REFRESH_DELAY);
    }

    /// Detaches from the graph, cancels any pending refresh and releases the
    /// lifecycle listener.
    pub fn on_removed<B: LifecycleBus + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Result<(), ControllerError> {
        self.refresh.cancel();
        self.graph = None;
        if let Some(subscription) = self.subscription.take() {
            bus.unsubscribe(subscription.id())?;
        }
        Ok(())
    }

    /// Asks for a reconciliation after the debounce period, superseding any
    /// pending one.
    pub fn request_refresh(&mut self, now: Duration) {
        self.refresh.schedule(RefreshKind::Debounce, now, REFRESH_DEBOUNCE);
    }

    /// Runs the pending timer if due. Returns true when inputs were reconciled.
    pub fn poll_timers<H: Host + ?Sized>(&mut self, now: Duration, host: &mut H) -> bool {
        match self.refresh.poll(now) {
            Some(RefreshKind::InitialAttach) => {
                self.request_refresh(now);
                false
            }
            Some(RefreshKind::Debounce) => self.refresh_inputs(host),
            None => false,
        }
    }

    pub fn set_property(&mut self, key: &str, value: Value, now: Duration) {
        self.properties.insert(key.to_string(), value);
        if REFRESH_PROPERTIES.contains(&key) {
            self.request_refresh(now);
        }
    }

    /// Reconciles inputs against the host's groups right away. Skipped while
    /// the node is not in a graph.
    pub fn refresh_inputs<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.graph.is_none() {
            log::debug!("controller {} not attached, skipping input refresh", self.id);
            return false;
        }
        let config = RemoteConfig::from_properties(&self.properties);
        let groups = visible_groups(&*host, &config);
        self.group_inputs = reconcile_inputs(&mut self.inputs, &groups);
        host.node_resized(self.id, self.inputs.len());
        host.set_dirty();
        true
    }

    fn input_index(&self, name: &str) -> Result<usize, ControllerError> {
        self.inputs
            .iter()
            .position(|input| input.name == name)
            .ok_or_else(|| ControllerError::UnknownInput(name.to_string()))
    }

    pub fn connect_input(&mut self, name: &str, link: LinkId) -> Result<(), ControllerError> {
        let index = self.input_index(name)?;
        self.inputs[index].link = Some(link);
        Ok(())
    }

    pub fn disconnect_input(&mut self, name: &str) -> Result<Option<LinkId>, ControllerError> {
        let index = self.input_index(name)?;
        Ok(self.inputs[index].link.take())
    }

    /// Handles every lifecycle event queued since the last call, in order.
    pub fn process_events<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<usize, ControllerError> {
        let events = match &self.subscription {
            Some(subscription) => subscription.drain()?,
            None => return Ok(0),
        };
        for event in &events {
            self.handle_event(*event, host);
        }
        Ok(events.len())
    }

    pub fn handle_event<H: Host + ?Sized>(&mut self, event: LifecycleEvent, host: &mut H) {
        match event {
            LifecycleEvent::QueueStart => self.on_queue_start(),
            LifecycleEvent::SerializationStart => self.on_serialization_start(host),
            LifecycleEvent::SerializationEnd => self.on_serialization_end(),
            LifecycleEvent::QueueEnd => self.on_queue_end(),
        }
    }

    pub fn on_queue_start(&mut self) {
        self.processing_queue = true;
        self.state = LifecycleState::Queued;
    }

    pub fn on_queue_end(&mut self) {
        self.processing_queue = false;
        self.state = LifecycleState::Idle;
    }

    /// Resolves every mapped input and applies it to its group. Does nothing
    /// outside a queue submission. Unresolvable inputs leave their group alone.
    pub fn on_serialization_start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.processing_queue {
            return;
        }
        self.state = LifecycleState::Serializing;

        let groups = host.groups(SortMode::Position);
        for (title, index) in self.group_inputs.iter() {
            let Some(enabled) = self.resolve_input(index, &*host) else {
                continue;
            };
            if !groups.iter().any(|group| group.title == title) {
                continue;
            }
            self.apply_to_group(title, enabled, host);
        }
    }

    /// Applied modes persist into the submitted execution, so the state is
    /// left as is until the queue ends.
    pub fn on_serialization_end(&mut self) {
        log::trace!("controller {} serialization ended", self.id);
    }

    pub fn resolve_input<H: Host + ?Sized>(&self, index: usize, host: &H) -> Option<bool> {
        resolve_input_value(self.inputs.get(index), host, self.processing_queue)
    }

    fn apply_to_group<H: Host + ?Sized>(&self, title: &str, enabled: bool, host: &mut H) {
        let members = host.members_of(title);
        let mode = self.variant.mode_for(enabled);
        log::trace!(
            "group {title:?}: {} member(s) -> {}",
            members.len(),
            mode.label()
        );
        host.apply_run_mode(&members, mode);
        host.set_group_active(title, enabled);
    }

    /// Runs one of the variant's exposed bulk actions over the mapped groups.
    pub fn handle_action<H: Host + ?Sized>(
        &self,
        label: &str,
        host: &mut H,
    ) -> Result<(), ControllerError> {
        let action = BulkAction::parse(label)
            .filter(|_| self.variant.exposed_actions.contains(&label))
            .ok_or_else(|| {
                log::warn!("controller {} ignoring action {label:?}", self.id);
                ControllerError::UnknownAction(label.to_string())
            })?;
        let groups: Vec<Group> = host.groups(SortMode::Position);
        for title in self.group_inputs.titles() {
            let Some(group) = groups.iter().find(|group| group.title == title) else {
                continue;
            };
            let enabled = match action {
                BulkAction::EnableAll => true,
                BulkAction::BypassAll => false,
                BulkAction::ToggleAll => !group.has_active_node,
            };
            self.apply_to_group(title, enabled, host);
        }
        host.set_dirty();
        Ok(())
    }
}
