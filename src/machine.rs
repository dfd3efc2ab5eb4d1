//! Device state machine as a pure transition function.
//!
//! ```text
//!            tap (Pressed)                 3 s after last tap
//!  wake ──► Setup ───────────► Setup(n) ─────────────────────► Countdown
//!            │                                                   │    │
//!            │ 10 s, no taps                      elapsed ≥ n×30 s│    │ Released
//!            ▼                                                   ▼    ▼
//!          Sleep ◄──────────────── Released / 3 passes ──────── Alarm  Sleep
//! ```
//!
//! [`Session::step`] takes the current session, the button status of this
//! iteration and the time, and returns the next session with a single
//! [`Effect`] for the outputs. It performs no I/O.

use crate::alarm::{Alarm, AlarmStep};
use crate::breathe::Breathe;
use crate::button::ButtonStatus;
use crate::config::{SETUP_COUNTDOWN_MS, SETUP_IDLE_MS, TAP_UNIT_MS};

/// Active phase of a wake session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Collecting taps. With no taps yet this is the pure idle state.
    Setup {
        /// Wake time, or the time the button was last down.
        last_activity: u32,
    },
    /// Counting down a duration fixed at entry.
    Countdown {
        started_at: u32,
        duration_ms: u32,
        breathe: Breathe,
    },
    /// Countdown expired, playing the alarm.
    Alarm(Alarm),
}

/// Output work requested by one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Nothing to do.
    None,
    /// A tap was confirmed: play the cue, then return to setup brightness.
    Tap,
    /// Set the LED brightness.
    Brightness(u8),
    /// Alarm step: light and sound on or off.
    Signal(bool),
    /// Hand over to the sleep controller.
    Sleep,
}

/// State of one wake session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    phase: Phase,
    taps: u8,
}

impl Session {
    /// Fresh session right after the wake handshake.
    pub fn new(now_ms: u32) -> Self {
        Self {
            phase: Phase::Setup {
                last_activity: now_ms,
            },
            taps: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Confirmed taps in this session.
    pub fn taps(&self) -> u8 {
        self.taps
    }

    /// Countdown length for the taps collected so far.
    pub fn countdown_duration(&self) -> u32 {
        u32::from(self.taps) * TAP_UNIT_MS
    }

    /// One iteration of the device loop.
    pub fn step(self, status: ButtonStatus, now_ms: u32) -> (Session, Effect) {
        match self.phase {
            Phase::Setup { last_activity } => self.setup(last_activity, status, now_ms),
            Phase::Countdown {
                started_at,
                duration_ms,
                breathe,
            } => self.countdown(started_at, duration_ms, breathe, status, now_ms),
            Phase::Alarm(alarm) => self.alarm(alarm, status, now_ms),
        }
    }

    fn setup(mut self, last_activity: u32, status: ButtonStatus, now_ms: u32) -> (Session, Effect) {
        match status {
            ButtonStatus::Pressed => {
                self.taps = self.taps.saturating_add(1);
                self.phase = Phase::Setup {
                    last_activity: now_ms,
                };
                return (self, Effect::Tap);
            }
            // The countdown timer runs from the release of the last tap.
            ButtonStatus::Held | ButtonStatus::Released => {
                self.phase = Phase::Setup {
                    last_activity: now_ms,
                };
                return (self, Effect::None);
            }
            ButtonStatus::Idle => {}
        }

        let idle_for = now_ms.wrapping_sub(last_activity);
        if self.taps == 0 {
            if idle_for > SETUP_IDLE_MS {
                return (self, Effect::Sleep);
            }
        } else if idle_for > SETUP_COUNTDOWN_MS {
            self.phase = Phase::Countdown {
                started_at: now_ms,
                duration_ms: self.countdown_duration(),
                breathe: Breathe::new(),
            };
        }
        (self, Effect::None)
    }

    fn countdown(
        mut self,
        started_at: u32,
        duration_ms: u32,
        mut breathe: Breathe,
        status: ButtonStatus,
        now_ms: u32,
    ) -> (Session, Effect) {
        if status == ButtonStatus::Released {
            return (self, Effect::Sleep);
        }

        let elapsed = now_ms.wrapping_sub(started_at);
        if elapsed >= duration_ms {
            self.phase = Phase::Alarm(Alarm::new(now_ms));
            return self.step(ButtonStatus::Idle, now_ms);
        }

        let level = breathe.level(elapsed);
        self.phase = Phase::Countdown {
            started_at,
            duration_ms,
            breathe,
        };
        (self, Effect::Brightness(level))
    }

    fn alarm(mut self, mut alarm: Alarm, status: ButtonStatus, now_ms: u32) -> (Session, Effect) {
        if status == ButtonStatus::Released {
            return (self, Effect::Sleep);
        }

        let effect = match alarm.poll(now_ms) {
            AlarmStep::Wait => Effect::None,
            AlarmStep::Signal(on) => Effect::Signal(on),
            AlarmStep::Done => Effect::Sleep,
        };
        self.phase = Phase::Alarm(alarm);
        (self, effect)
    }
}
