//! Autoplay scheduling.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::gate::InteractionGate;
use crate::host::CarouselHost;

/// Autoplay sub-state of an active carousel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayState {
    Running,
    Paused,
}

/// Owns at most one pending interval. Holds no slide data; each firing is
/// reported by the host and turned into "go to next" by the controller.
#[derive(Debug)]
pub struct AutoplayScheduler<T> {
    period_ms: u32,
    timer: Option<T>,
}

impl<T> AutoplayScheduler<T> {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn state(&self) -> AutoplayState {
        if self.is_running() {
            AutoplayState::Running
        } else {
            AutoplayState::Paused
        }
    }

    /// Start the interval unless it is already running or the gate forbids
    /// it. Returns `true` when a new interval was started.
    pub fn start<H>(&mut self, host: &mut H, gate: &InteractionGate) -> bool
    where
        H: CarouselHost<Timer = T>,
    {
        if self.timer.is_some() || !gate.may_run() {
            return false;
        }
        debug!("autoplay start ({} ms)", self.period_ms);
        self.timer = Some(host.start_interval(self.period_ms));
        true
    }

    /// Cancel the pending interval. Returns `true` when one was cancelled.
    pub fn stop<H>(&mut self, host: &mut H) -> bool
    where
        H: CarouselHost<Timer = T>,
    {
        match self.timer.take() {
            Some(timer) => {
                debug!("autoplay stop");
                host.cancel_interval(timer);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Signal;
    use crate::memory::MemoryHost;

    #[test]
    fn start_is_idempotent() {
        let mut host = MemoryHost::new(100.0);
        let gate = InteractionGate::new(false);
        let mut sched = AutoplayScheduler::new(3000);
        assert!(sched.start(&mut host, &gate));
        assert!(!sched.start(&mut host, &gate));
        assert_eq!(host.pending_intervals(), 1);
        assert_eq!(sched.state(), AutoplayState::Running);
    }

    #[test]
    fn start_respects_gate() {
        let mut host = MemoryHost::new(100.0);
        let mut gate = InteractionGate::new(false);
        gate.set(Signal::PointerDown, true);
        let mut sched = AutoplayScheduler::new(3000);
        assert!(!sched.start(&mut host, &gate));
        assert_eq!(host.pending_intervals(), 0);

        let mut sched = AutoplayScheduler::new(3000);
        assert!(!sched.start(&mut host, &InteractionGate::new(true)));
    }

    #[test]
    fn stop_cancels_and_is_safe_when_idle() {
        let mut host = MemoryHost::new(100.0);
        let mut sched = AutoplayScheduler::new(3000);
        assert!(!sched.stop(&mut host));
        sched.start(&mut host, &InteractionGate::new(false));
        assert!(sched.stop(&mut host));
        assert_eq!(host.pending_intervals(), 0);
        assert_eq!(sched.state(), AutoplayState::Paused);
    }
}
