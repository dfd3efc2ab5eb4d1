//! LED brightness and speaker tone sharing one PWM timer.
//!
//! The LED duty register and the speaker channel run off the same timer.
//! Brightness is a duty-cycle write; the speaker is switched by enabling or
//! disabling its channel output, which then toggles at the fixed PWM
//! frequency. The device never needs a meaningful brightness while the
//! speaker sounds, other than full brightness for the cue.

use embedded_hal_async::delay::DelayNs;

use crate::config::{BRIGHTNESS_FULL, BRIGHTNESS_NONE, CUE_MS};

/// Output side of the device: one dimmable LED and one speaker.
///
/// All operations are plain register writes and cannot fail.
pub trait Indicator {
    /// Writes the shared duty register, `0..=BRIGHTNESS_FULL`.
    fn set_brightness(&mut self, level: u8);

    /// Starts driving the speaker channel.
    fn speaker_on(&mut self);

    /// Stops driving the speaker channel.
    fn speaker_off(&mut self);

    /// Disconnects the LED output entirely. The next
    /// [`set_brightness`](Indicator::set_brightness) reconnects it.
    fn led_off(&mut self);

    /// One alarm step: full light with sound, or dark and silent.
    fn signal(&mut self, on: bool) {
        if on {
            self.set_brightness(BRIGHTNESS_FULL);
            self.speaker_on();
        } else {
            self.set_brightness(BRIGHTNESS_NONE);
            self.speaker_off();
        }
    }
}

/// Plays the feedback cue: a full-brightness flash with a chirp.
///
/// Leaves the LED at full brightness; the caller restores its own level.
pub async fn cue<I: Indicator, D: DelayNs>(indicator: &mut I, delay: &mut D) {
    indicator.set_brightness(BRIGHTNESS_FULL);
    indicator.speaker_on();
    delay.delay_ms(CUE_MS).await;
    indicator.speaker_off();
}
