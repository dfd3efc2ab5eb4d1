//! The device: context owned by the main loop and the loop itself.
//!
//! One cooperative loop polls the button, steps the [`Session`] and applies
//! the resulting [`Effect`] before the next poll. The only concurrent code is
//! the tick interrupt behind the [`Monotonic`] clock.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::button::{Button, ButtonStatus};
use crate::clock::Monotonic;
use crate::config::BRIGHTNESS_SETUP;
use crate::indicator::{Indicator, cue};
use crate::machine::{Effect, Session};
use crate::sleep::Halt;

/// Everything the tea timer owns: clock, button, outputs, halt primitive,
/// delay provider and the session state.
pub struct Device<C, P, I, H, D> {
    pub(crate) clock: C,
    pub(crate) button: Button<P>,
    pub(crate) indicator: I,
    pub(crate) halt: H,
    pub(crate) delay: D,
    pub(crate) session: Session,
}

impl<C, P, I, H, D> Device<C, P, I, H, D>
where
    C: Monotonic,
    P: InputPin<Error = Infallible>,
    I: Indicator,
    H: Halt,
    D: DelayNs,
{
    /// Assembles the device. Nothing happens until [`run`](Self::run).
    pub fn new(clock: C, button: P, indicator: I, halt: H, delay: D) -> Self {
        let session = Session::new(clock.now_millis());
        Self {
            clock,
            button: Button::new(button),
            indicator,
            halt,
            delay,
            session,
        }
    }

    /// Runs the timer forever, starting asleep.
    pub async fn run(&mut self) -> ! {
        self.enter_sleep().await;
        loop {
            self.poll_once().await;
        }
    }

    /// One loop iteration: sample the button, step the session, drive the
    /// outputs.
    pub async fn poll_once(&mut self) {
        let status = self.button.poll(self.clock.now_micros());
        let before = self.session;
        let (session, effect) = before.step(status, self.clock.now_millis());
        self.session = session;

        #[cfg(feature = "debug-mode")]
        log_transition(&before, &session);

        self.apply(effect).await;
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Tap => {
                #[cfg(feature = "debug-mode")]
                defmt::info!("Tap {}", self.session.taps());

                cue(&mut self.indicator, &mut self.delay).await;
                self.indicator.set_brightness(BRIGHTNESS_SETUP);
            }
            Effect::Brightness(level) => self.indicator.set_brightness(level),
            Effect::Signal(on) => self.indicator.signal(on),
            Effect::Sleep => self.enter_sleep().await,
        }
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Last reported button status.
    pub fn button_status(&self) -> ButtonStatus {
        self.button.status()
    }

    /// The output driver.
    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// The halt primitive.
    pub fn halt(&self) -> &H {
        &self.halt
    }
}

#[cfg(feature = "debug-mode")]
fn log_transition(before: &Session, after: &Session) {
    use crate::machine::Phase;

    match (before.phase(), after.phase()) {
        (Phase::Setup { .. }, Phase::Countdown { duration_ms, .. }) => {
            defmt::info!("Countdown started: {} ms", duration_ms);
        }
        (Phase::Countdown { .. }, Phase::Alarm(_)) => defmt::info!("Countdown finished, alarm"),
        _ => {}
    }
}
