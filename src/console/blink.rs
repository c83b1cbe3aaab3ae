//! Caret blink controller.

use crate::config::CaretBlurPolicy;
use crate::timer::{Timer, TimerKind};
use std::time::{Duration, Instant};

/// Tracks where the caret is and whether it is currently drawn.
///
/// The caret is drawn when it is enabled (a line is being edited) and the
/// blink phase is "on". A timer flips the phase every half period.
#[derive(Debug, Clone)]
pub struct CaretBlink {
    timer: Timer,
    blinks: bool,
    enabled: bool,
    focused: bool,
    phase: bool,
    pos: (u16, u16),
}

impl CaretBlink {
    /// Create a controller. `None` disables blinking; the caret then stays
    /// drawn whenever it is enabled.
    pub fn new(half_period: Option<Duration>) -> Self {
        Self {
            timer: Timer::new(half_period.unwrap_or_default(), TimerKind::Periodic),
            blinks: half_period.is_some(),
            enabled: false,
            focused: true,
            phase: true,
            pos: (0, 0),
        }
    }

    /// Show or hide the caret altogether.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.enabled = enabled;
        if enabled {
            self.reset(now);
        } else {
            self.timer.stop();
        }
    }

    /// Whether the caret is enabled.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the caret should be painted right now.
    pub const fn is_painted(&self) -> bool {
        self.enabled && self.phase
    }

    /// Current caret cell.
    pub const fn position(&self) -> (u16, u16) {
        self.pos
    }

    /// Whether the blink timer is running.
    pub const fn is_blinking(&self) -> bool {
        self.timer.is_active()
    }

    /// Next phase flip.
    pub const fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Phase visible, timer restarted. Without focus the caret keeps the
    /// steady state chosen when focus was lost.
    pub fn reset(&mut self, now: Instant) {
        if !self.focused {
            return;
        }
        self.phase = true;
        if self.blinks && self.enabled {
            self.timer.start(now);
        }
    }

    /// Flip the phase if the half period elapsed. Returns `true` when the
    /// caret cell needs repainting.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            self.phase = !self.phase;
            return true;
        }
        false
    }

    /// Stop blinking and leave the caret in the steady state `policy` asks
    /// for.
    pub fn focus_lost(&mut self, policy: CaretBlurPolicy) {
        self.focused = false;
        self.timer.stop();
        self.phase = matches!(policy, CaretBlurPolicy::Show);
    }

    /// Resume blinking with the caret visible.
    pub fn focus_gained(&mut self, now: Instant) {
        self.focused = true;
        self.reset(now);
    }

    /// Move the caret. It is blinked out at the old cell and in at the new
    /// one, restarting the half period if the timer was running. Returns
    /// the old cell.
    pub fn move_to(&mut self, pos: (u16, u16), now: Instant) -> (u16, u16) {
        let old = std::mem::replace(&mut self.pos, pos);
        if self.timer.is_active() {
            self.timer.start(now);
        }
        if self.focused {
            self.phase = true;
        }
        old
    }
}
