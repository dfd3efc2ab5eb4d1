//! Debounced reader for the single push button.
//!
//! The button pin is pulled up and reads low while held. A level is only
//! acted upon once it has been stable for
//! [`GUARD_INTERVAL_US`](crate::config::GUARD_INTERVAL_US); any change restarts
//! the window. A press shorter than the window is absorbed and never seen.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::config::GUARD_INTERVAL_US;

/// Logical state of the button as seen by the device loop.
///
/// `Pressed` and `Released` are edges: each is returned by exactly one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonStatus {
    /// Not touched.
    #[default]
    Idle,
    /// Press edge.
    Pressed,
    /// Still down after the press edge.
    Held,
    /// Release edge.
    Released,
}

impl ButtonStatus {
    /// Steady state an edge decays into once it has been reported.
    fn settled(self) -> Self {
        match self {
            ButtonStatus::Pressed => ButtonStatus::Held,
            ButtonStatus::Released => ButtonStatus::Idle,
            steady => steady,
        }
    }
}

/// Stable-window debouncer, independent of any pin.
#[derive(Debug)]
pub struct Debouncer {
    status: ButtonStatus,
    /// Last raw level seen, `true` while the button is down.
    pressed: bool,
    /// Time of the last raw level change in microseconds.
    changed_at: u32,
}

impl Debouncer {
    /// Creates an idle debouncer with the button released.
    pub const fn new() -> Self {
        Self {
            status: ButtonStatus::Idle,
            pressed: false,
            changed_at: 0,
        }
    }

    /// Current logical status without sampling.
    pub fn status(&self) -> ButtonStatus {
        self.status
    }

    /// Forces `status` and restarts the stable window at `now_us` with the
    /// raw level `pressed`.
    pub fn prime(&mut self, status: ButtonStatus, pressed: bool, now_us: u32) {
        self.status = status;
        self.pressed = pressed;
        self.changed_at = now_us;
    }

    /// Feeds one raw sample and returns the resulting status.
    pub fn update(&mut self, pressed: bool, now_us: u32) -> ButtonStatus {
        if pressed != self.pressed {
            self.pressed = pressed;
            self.changed_at = now_us;
            self.status = self.status.settled();
            return self.status;
        }

        if now_us.wrapping_sub(self.changed_at) < GUARD_INTERVAL_US {
            self.status = self.status.settled();
            return self.status;
        }

        self.status = match (self.status, pressed) {
            (ButtonStatus::Idle, true) => ButtonStatus::Pressed,
            (ButtonStatus::Idle, false) => ButtonStatus::Idle,
            (ButtonStatus::Pressed | ButtonStatus::Held, true) => ButtonStatus::Held,
            (ButtonStatus::Pressed | ButtonStatus::Held, false) => ButtonStatus::Released,
            (ButtonStatus::Released, _) => ButtonStatus::Idle,
        };
        self.status
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Active-low button pin with its debouncer.
pub struct Button<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P: InputPin<Error = Infallible>> Button<P> {
    /// Wraps a pulled-up input pin.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(),
        }
    }

    fn is_pressed(&mut self) -> bool {
        let Ok(low) = self.pin.is_low();
        low
    }

    /// Samples the pin and advances the debouncer.
    pub fn poll(&mut self, now_us: u32) -> ButtonStatus {
        let pressed = self.is_pressed();
        self.debouncer.update(pressed, now_us)
    }

    /// Marks the button as held, so the next settled release is reported.
    ///
    /// Used after wake-up: the press that woke the device is in progress.
    pub fn assume_held(&mut self, now_us: u32) {
        let pressed = self.is_pressed();
        self.debouncer.prime(ButtonStatus::Held, pressed, now_us);
    }

    /// Returns the logical status to `Idle`.
    pub fn reset(&mut self, now_us: u32) {
        let pressed = self.is_pressed();
        self.debouncer.prime(ButtonStatus::Idle, pressed, now_us);
    }

    /// Current logical status without sampling.
    pub fn status(&self) -> ButtonStatus {
        self.debouncer.status()
    }
}
