//! Monotonic clock driven by a periodic tick interrupt.
//!
//! The tick interrupt is the only writer of [`TickCounter`]; everything else
//! reads it. Elapsed time is the tick count scaled by
//! [`TICK_PERIOD_US`](crate::config::TICK_PERIOD_US) plus the position of the
//! hardware counter within the current tick.
//!
//! The clock stops while the CPU is halted, so readings are only meaningful
//! within one wake session.

use portable_atomic::{AtomicU32, Ordering};

use crate::config::TICK_PERIOD_US;

/// Tick count shared between the tick interrupt and the main loop.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    /// Creates a counter starting at zero.
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    /// Advances the counter by one tick.
    ///
    /// Must only be called from the tick interrupt handler.
    pub fn on_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of ticks since boot, wrapping on overflow.
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the hardware counter within the current tick period.
pub trait SubTick {
    /// Microseconds elapsed since the last tick, in `0..TICK_PERIOD_US`.
    fn sub_tick(&self) -> u32;
}

/// Source of elapsed time since boot.
pub trait Monotonic {
    /// Microseconds since boot, wrapping on overflow.
    fn now_micros(&self) -> u32;

    /// Milliseconds since boot, wrapping on overflow.
    fn now_millis(&self) -> u32 {
        self.now_micros() / 1000
    }
}

/// [`Monotonic`] clock built from a [`TickCounter`] and a [`SubTick`] source.
pub struct TickClock<'a, S> {
    counter: &'a TickCounter,
    sub: S,
}

impl<'a, S: SubTick> TickClock<'a, S> {
    /// Creates a clock reading `counter` and the sub-tick register `sub`.
    pub fn new(counter: &'a TickCounter, sub: S) -> Self {
        Self { counter, sub }
    }

    /// Reads a consistent (ticks, sub-tick) pair.
    ///
    /// A tick landing between the two reads is detected by re-reading the
    /// counter; the pair is then sampled again.
    fn sample(&self) -> (u32, u32) {
        loop {
            let ticks = self.counter.ticks();
            let sub = self.sub.sub_tick();
            if self.counter.ticks() == ticks {
                return (ticks, sub);
            }
        }
    }
}

impl<S: SubTick> Monotonic for TickClock<'_, S> {
    fn now_micros(&self) -> u32 {
        let (ticks, sub) = self.sample();
        ticks.wrapping_mul(TICK_PERIOD_US).wrapping_add(sub)
    }

    // Computed in 64 bits so milliseconds do not jump when the microsecond
    // count wraps after ~71 minutes; long countdowns cross that point.
    fn now_millis(&self) -> u32 {
        let (ticks, sub) = self.sample();
        let micros = u64::from(ticks) * u64::from(TICK_PERIOD_US) + u64::from(sub);
        (micros / 1000) as u32
    }
}
