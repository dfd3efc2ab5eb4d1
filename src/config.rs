//! Compile-time parameters of the tea timer.
//!
//! There is no runtime configuration: every duration, brightness level and
//! alarm pattern below is baked into the image.

/// Length of one tick interrupt period in microseconds.
pub const TICK_PERIOD_US: u32 = 256;

/// Minimum time a pin level must stay unchanged before it is accepted.
pub const GUARD_INTERVAL_US: u32 = 3_000;

/// Duration of the feedback flash/chirp and of one alarm pattern step.
pub const CUE_MS: u32 = 70;

/// Time without any tap after wake-up before going back to sleep.
pub const SETUP_IDLE_MS: u32 = 10_000;

/// Time after the last tap before the countdown starts.
pub const SETUP_COUNTDOWN_MS: u32 = 3_000;

/// Countdown time contributed by a single tap.
pub const TAP_UNIT_MS: u32 = 30_000;

/// LED off.
pub const BRIGHTNESS_NONE: u8 = 0;

/// Low brightness signalling the device is awake and in setup.
pub const BRIGHTNESS_SETUP: u8 = 40;

/// Full brightness used by the feedback cue and the alarm.
pub const BRIGHTNESS_FULL: u8 = 250;

/// Lower bound of the breathe curve.
pub const BREATHE_MIN: u8 = 5;

/// Upper bound of the breathe curve.
pub const BREATHE_MAX: u8 = 100;

/// Length of one breathe half (inhale or exhale).
pub const BREATHE_CYCLE_MS: u32 = 2_500;

/// Alarm on/off schedule, bit `n` is step `n` (LSB first).
pub const ALARM_PATTERN: u8 = 0b0000101;

/// Number of meaningful steps in [`ALARM_PATTERN`].
pub const ALARM_PATTERN_LEN: u8 = 7;

/// Number of full pattern passes before the alarm gives up.
pub const ALARM_REPEATS: u8 = 3;

/// Frequency of the shared PWM timer, and so the pitch of the speaker tone.
pub const PWM_FREQUENCY_HZ: u32 = 4_000;
