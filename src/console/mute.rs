//! Focus-driven mute debouncer.
//!
//! Focus often bounces during window switches. Muting is delayed so a loss
//! followed quickly by a gain never reaches the audio layer.

use crate::timer::{Timer, TimerKind};
use std::time::{Duration, Instant};

/// Decides when background muting starts and stops.
#[derive(Debug, Clone)]
pub struct MuteDebouncer {
    timer: Timer,
    enabled: bool,
    muted: bool,
}

impl MuteDebouncer {
    /// Create a debouncer that mutes `delay` after focus is lost, if
    /// `enabled`.
    pub const fn new(enabled: bool, delay: Duration) -> Self {
        Self {
            timer: Timer::new(delay, TimerKind::SingleShot),
            enabled,
            muted: false,
        }
    }

    /// Schedule a mute unless one is already pending.
    pub fn focus_lost(&mut self, now: Instant) {
        if self.enabled && !self.timer.is_active() {
            self.timer.start(now);
        }
    }

    /// Cancel any pending mute. Returns `true` if audio was muted and must
    /// now be restored.
    pub fn focus_gained(&mut self) -> bool {
        self.timer.stop();
        std::mem::replace(&mut self.muted, false)
    }

    /// Returns `true` once, when the pending mute falls due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            self.muted = true;
            return true;
        }
        false
    }

    /// Whether audio is currently muted by this debouncer.
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether a mute is scheduled.
    pub const fn is_pending(&self) -> bool {
        self.timer.is_active()
    }

    /// When the pending mute falls due.
    pub const fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(60);

    #[test]
    fn test_quick_refocus_never_mutes() {
        let t0 = Instant::now();
        let mut mute = MuteDebouncer::new(true, DELAY);
        mute.focus_lost(t0);
        assert!(!mute.poll(t0 + Duration::from_millis(30)));
        assert!(!mute.focus_gained());
        assert!(!mute.poll(t0 + Duration::from_secs(1)));
        assert!(!mute.is_muted());
    }

    #[test]
    fn test_mutes_after_delay_and_restores() {
        let t0 = Instant::now();
        let mut mute = MuteDebouncer::new(true, DELAY);
        mute.focus_lost(t0);
        assert!(mute.poll(t0 + DELAY));
        assert!(mute.is_muted());
        assert!(mute.focus_gained());
        assert!(!mute.is_muted());
    }

    #[test]
    fn test_second_loss_does_not_push_deadline() {
        let t0 = Instant::now();
        let mut mute = MuteDebouncer::new(true, DELAY);
        mute.focus_lost(t0);
        mute.focus_lost(t0 + Duration::from_millis(50));
        assert_eq!(mute.deadline(), Some(t0 + DELAY));
    }

    #[test]
    fn test_disabled_never_schedules() {
        let t0 = Instant::now();
        let mut mute = MuteDebouncer::new(false, DELAY);
        mute.focus_lost(t0);
        assert!(!mute.is_pending());
    }
}
