//! Timer: deadline-based timers polled from the console's own loop.
//!
//! There is no timer thread. Each timer is a plain value owned by the
//! controller that uses it; the console asks for the nearest deadline,
//! waits on the host for at most that long, then polls. Dropping the owner
//! drops any pending firing with it.

use std::time::{Duration, Instant};

/// Whether a timer re-arms itself after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once, then becomes inactive.
    SingleShot,
    /// Fires every interval until stopped.
    Periodic,
}

/// A stoppable, restartable timer.
#[derive(Debug, Clone)]
pub struct Timer {
    interval: Duration,
    kind: TimerKind,
    deadline: Option<Instant>,
}

impl Timer {
    /// Create an inactive timer.
    pub const fn new(interval: Duration, kind: TimerKind) -> Self {
        Self {
            interval,
            kind,
            deadline: None,
        }
    }

    /// The configured interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval. Takes effect on the next (re)start.
    pub const fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Arm (or re-arm) the timer so it next fires one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Disarm the timer. Pending firings are discarded.
    pub const fn stop(&mut self) {
        self.deadline = None;
    }

    /// Whether the timer is armed.
    pub const fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// The instant of the next firing, if armed.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire if the deadline has passed.
    ///
    /// A periodic timer that fell behind fires once and schedules the next
    /// firing from `now` rather than queueing the missed ones.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.deadline = match self.kind {
            TimerKind::SingleShot => None,
            TimerKind::Periodic => {
                let next = deadline + self.interval;
                Some(if next <= now { now + self.interval } else { next })
            }
        };
        true
    }
}

/// The earliest of several optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_single_shot_fires_once() {
        let t0 = Instant::now();
        let mut timer = Timer::new(60 * MS, TimerKind::SingleShot);
        timer.start(t0);

        assert!(!timer.poll(t0 + 59 * MS));
        assert!(timer.poll(t0 + 60 * MS));
        assert!(!timer.is_active());
        assert!(!timer.poll(t0 + 500 * MS));
    }

    #[test]
    fn test_periodic_rearms() {
        let t0 = Instant::now();
        let mut timer = Timer::new(10 * MS, TimerKind::Periodic);
        timer.start(t0);

        assert!(timer.poll(t0 + 10 * MS));
        assert_eq!(timer.deadline(), Some(t0 + 20 * MS));
        assert!(timer.poll(t0 + 20 * MS));
    }

    #[test]
    fn test_periodic_catches_up_without_queueing() {
        let t0 = Instant::now();
        let mut timer = Timer::new(10 * MS, TimerKind::Periodic);
        timer.start(t0);

        assert!(timer.poll(t0 + 95 * MS));
        assert_eq!(timer.deadline(), Some(t0 + 105 * MS));
        assert!(!timer.poll(t0 + 96 * MS));
    }

    #[test]
    fn test_stop_discards_pending_firing() {
        let t0 = Instant::now();
        let mut timer = Timer::new(10 * MS, TimerKind::Periodic);
        timer.start(t0);
        timer.stop();
        assert!(!timer.poll(t0 + 50 * MS));
    }

    #[test]
    fn test_earliest() {
        let t0 = Instant::now();
        assert_eq!(earliest([None, Some(t0 + MS), Some(t0)]), Some(t0));
        assert_eq!(earliest([None, None]), None);
    }
}
