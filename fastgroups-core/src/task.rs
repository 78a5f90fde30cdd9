use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Wait after attachment for the host to finish populating groups.
    InitialAttach,
    /// Quiet period collapsing bursts of refresh requests.
    Debounce,
}

/// The controller's single pending timer. Scheduling replaces whatever was
/// pending; time is supplied by the caller as a monotonic offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshTask {
    pending: Option<(RefreshKind, Duration)>,
}

impl RefreshTask {
    pub fn schedule(&mut self, kind: RefreshKind, now: Duration, delay: Duration) {
        if let Some((previous, _)) = self.pending {
            log::trace!("replacing pending {previous:?} refresh with {kind:?}");
        }
        self.pending = Some((kind, now + delay));
    }

    /// Returns true when something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Duration> {
        self.pending.map(|(_, due)| due)
    }

    pub fn kind(&self) -> Option<RefreshKind> {
        self.pending.map(|(kind, _)| kind)
    }

    /// Fires the pending task if its deadline has been reached.
    pub fn poll(&mut self, now: Duration) -> Option<RefreshKind> {
        match self.pending {
            Some((kind, due)) if now >= due => {
                self.pending = None;
                Some(kind)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_once_at_deadline() {
        let mut task = RefreshTask::default();
        task.schedule(RefreshKind::Debounce, ms(0), ms(100));
        assert_eq!(task.poll(ms(99)), None);
        assert_eq!(task.poll(ms(100)), Some(RefreshKind::Debounce));
        assert_eq!(task.poll(ms(500)), None);
        assert!(!task.is_pending());
    }

    #[test]
    fn rescheduling_replaces_pending() {
        let mut task = RefreshTask::default();
        task.schedule(RefreshKind::InitialAttach, ms(0), ms(200));
        task.schedule(RefreshKind::Debounce, ms(50), ms(100));
        assert_eq!(task.kind(), Some(RefreshKind::Debounce));
        assert_eq!(task.due_at(), Some(ms(150)));
        assert_eq!(task.poll(ms(150)), Some(RefreshKind::Debounce));
    }

    #[test]
    fn cancel_clears_pending() {
        let mut task = RefreshTask::default();
        assert!(!task.cancel());
        task.schedule(RefreshKind::Debounce, ms(0), ms(100));
        assert!(task.cancel());
        assert_eq!(task.poll(ms(1000)), None);
    }
}
