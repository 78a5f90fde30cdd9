use std::sync::mpsc::{self, Receiver, Sender};

/// Signals emitted by the host around a prompt submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    QueueStart,
    SerializationStart,
    SerializationEnd,
    QueueEnd,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 4] = [
        LifecycleEvent::QueueStart,
        LifecycleEvent::SerializationStart,
        LifecycleEvent::SerializationEnd,
        LifecycleEvent::QueueEnd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LifecycleEvent::QueueStart => "queue",
            LifecycleEvent::SerializationStart => "graph-to-prompt",
            LifecycleEvent::SerializationEnd => "graph-to-prompt-end",
            LifecycleEvent::QueueEnd => "queue-end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("unknown subscription {0:?}")]
    UnknownSubscription(SubscriptionId),
    #[error("event bus disconnected")]
    Disconnected,
}

/// Receiving end handed to a subscriber. Events arrive in emission order.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: Receiver<LifecycleEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn try_recv(&self) -> Result<Option<LifecycleEvent>, LifecycleError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(LifecycleError::Disconnected),
        }
    }

    /// Drains everything queued so far. Events buffered before the bus went
    /// away are still returned; `Disconnected` only surfaces once none remain.
    pub fn drain(&self) -> Result<Vec<LifecycleEvent>, LifecycleError> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(Some(event)) => events.push(event),
                Ok(None) => return Ok(events),
                Err(err) if events.is_empty() => return Err(err),
                Err(_) => return Ok(events),
            }
        }
    }
}

pub trait LifecycleBus {
    /// Registers a listener for the given signals.
    fn subscribe(&mut self, interest: &[LifecycleEvent]) -> Subscription;
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), LifecycleError>;
    fn listener_count(&self) -> usize;
}

#[derive(Debug)]
struct Listener {
    id: SubscriptionId,
    interest: Vec<LifecycleEvent>,
    sender: Sender<LifecycleEvent>,
}

/// Single-process bus. Each listener owns a channel so a subscriber can
/// drain its events whenever the host hands control to it.
#[derive(Debug, Default)]
pub struct InProcessBus {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl InProcessBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every interested listener and returns how many
    /// received it. Listeners whose receiver was dropped are pruned.
    pub fn emit(&mut self, event: LifecycleEvent) -> usize {
        let mut delivered = 0;
        self.listeners.retain(|listener| {
            if !listener.interest.contains(&event) {
                return true;
            }
            match listener.sender.send(event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    log::debug!(
                        "dropping lifecycle listener {:?}: receiver gone",
                        listener.id
                    );
                    false
                }
            }
        });
        delivered
    }
}

impl LifecycleBus for InProcessBus {
    fn subscribe(&mut self, interest: &[LifecycleEvent]) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = mpsc::channel();
        self.listeners.push(Listener {
            id,
            interest: interest.to_vec(),
            sender,
        });
        Subscription { id, receiver }
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), LifecycleError> {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        if self.listeners.len() == before {
            return Err(LifecycleError::UnknownSubscription(id));
        }
        Ok(())
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
