//! Core of a single-button tea steeping timer.
//!
//! # Overview
//!
//! Tap the button to wake the timer; the LED glows dimly to show setup mode.
//! Each further tap adds 30 seconds and is confirmed by a flash and a chirp.
//! Three seconds after the last tap the countdown starts and the LED
//! breathes. When it runs out the alarm beeps three times over, then the
//! timer sleeps again. A tap during countdown or alarm cancels it, and ten
//! seconds without any tap after wake-up sends the timer back to sleep.
//!
//! # Hardware Contract
//!
//! The core only needs:
//! - a tick interrupt calling [`clock::TickCounter::on_tick`] and a sub-tick
//!   register ([`clock::SubTick`])
//! - an active-low button pin (`embedded_hal::digital::InputPin`)
//! - an LED duty register and a speaker channel on one PWM timer
//!   ([`indicator::Indicator`])
//! - a halt primitive woken by a button edge ([`sleep::Halt`])
//! - an async delay (`embedded_hal_async::delay::DelayNs`)
//!
//! # Module Organization
//!
//! - [`config`] - Compile-time timing and brightness constants
//! - [`clock`] - Tick-interrupt driven monotonic clock
//! - [`button`] - Debounced button reader
//! - [`indicator`] - LED brightness and speaker tone driver
//! - [`breathe`] - Countdown breathing curve
//! - [`alarm`] - Alarm pattern sequencer
//! - [`machine`] - Pure device state machine
//! - [`sleep`] - Sleep entry and wake handshake
//! - [`device`] - Main loop context

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod breathe;
pub mod button;
pub mod clock;
pub mod config;
pub mod device;
pub mod indicator;
pub mod machine;
pub mod sleep;

pub use button::ButtonStatus;
pub use device::Device;
pub use machine::{Effect, Phase, Session};
