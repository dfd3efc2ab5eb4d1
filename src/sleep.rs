//! Sleep controller: sleep entry, low-power halt and the wake handshake.
//!
//! Sleep entry and wake-up are one routine. The CPU resumes inside
//! [`Device::enter_sleep`] and must absorb the press that woke it before the
//! session starts, or that press would count as the first tap. This holds
//! for the very first wake after power-on as well.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::button::ButtonStatus;
use crate::clock::Monotonic;
use crate::config::{BRIGHTNESS_NONE, BRIGHTNESS_SETUP};
use crate::device::Device;
use crate::indicator::{Indicator, cue};
use crate::machine::Session;

/// Low-power primitive halting the CPU until the button wake interrupt.
pub trait Halt {
    /// Arms the wake interrupt and halts.
    ///
    /// Returns only after the wake interrupt has fired. The interrupt handler
    /// disarms its own trigger, so it fires once per call.
    fn halt_until_wake(&mut self);
}

impl<C, P, I, H, D> Device<C, P, I, H, D>
where
    C: Monotonic,
    P: InputPin<Error = Infallible>,
    I: Indicator,
    H: Halt,
    D: DelayNs,
{
    /// Plays the off cue, halts, and on wake-up starts a fresh session.
    pub async fn enter_sleep(&mut self) {
        #[cfg(feature = "debug-mode")]
        defmt::info!("Going to sleep after {} taps", self.session.taps());

        cue(&mut self.indicator, &mut self.delay).await;
        self.indicator.set_brightness(BRIGHTNESS_NONE);
        self.indicator.led_off();
        self.indicator.speaker_off();

        self.halt.halt_until_wake();

        self.wake_handshake();
    }

    /// Waits out the waking press, then resets the session.
    fn wake_handshake(&mut self) {
        #[cfg(feature = "debug-mode")]
        defmt::info!("Woken up, waiting for button release...");

        self.button.assume_held(self.clock.now_micros());
        while self.button.poll(self.clock.now_micros()) != ButtonStatus::Released {}

        self.button.reset(self.clock.now_micros());
        self.session = Session::new(self.clock.now_millis());
        self.indicator.set_brightness(BRIGHTNESS_SETUP);

        #[cfg(feature = "debug-mode")]
        defmt::info!("Setup ready");
    }
}
