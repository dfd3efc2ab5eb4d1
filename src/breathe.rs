//! Breathing LED curve shown during the countdown.
//!
//! Each [`BREATHE_CYCLE_MS`] window is one half of a breath. A linear ramp
//! through the window is eased with a quarter cosine, rising from
//! [`BREATHE_MIN`] to [`BREATHE_MAX`] on the inhale and falling back on the
//! exhale. The half in progress is not derived from the elapsed time; it is
//! flipped whenever the ramp wraps around.

use core::f32::consts::{FRAC_PI_2, PI};

use crate::config::{BREATHE_CYCLE_MS, BREATHE_MAX, BREATHE_MIN};

const RANGE: u8 = BREATHE_MAX - BREATHE_MIN;

/// Eased brightness at `x` in `[0, 1]` through a rising or falling half.
pub fn curve(rising: bool, x: f32) -> u8 {
    let range = f32::from(RANGE);
    let level = if rising {
        f32::from(BREATHE_MIN) + range * (1.0 + libm::cosf(PI + x * FRAC_PI_2))
    } else {
        f32::from(BREATHE_MAX) - range * libm::cosf(3.0 * FRAC_PI_2 + x * FRAC_PI_2)
    };
    libm::roundf(level) as u8
}

/// Breathe phase tracker, created fresh for every countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Breathe {
    ramp: u8,
    rising: bool,
}

impl Breathe {
    /// Starts at the bottom of an inhale.
    pub const fn new() -> Self {
        Self {
            ramp: 0,
            rising: true,
        }
    }

    /// Whether the current half is the inhale.
    pub fn is_rising(&self) -> bool {
        self.rising
    }

    /// Brightness for `elapsed_ms` since the countdown started.
    ///
    /// Samples must be taken more often than once per cycle for the phase to
    /// follow the wraps.
    pub fn level(&mut self, elapsed_ms: u32) -> u8 {
        let ramp = ((elapsed_ms % BREATHE_CYCLE_MS) * u32::from(RANGE) / BREATHE_CYCLE_MS) as u8;
        if ramp < self.ramp {
            self.rising = !self.rising;
        }
        self.ramp = ramp;
        curve(self.rising, f32::from(ramp) / f32::from(RANGE))
    }
}

impl Default for Breathe {
    fn default() -> Self {
        Self::new()
    }
}
