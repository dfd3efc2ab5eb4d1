//! Firmware for a single-button tea steeping timer.
//!
//! # Overview
//!
//! Tap once to wake the timer, then tap once per 30 seconds of steeping
//! time. The LED breathes while the tea steeps and the timer beeps when it
//! is done. Between sessions the STM32L031 sits in STOP mode and only the
//! button can wake it.
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+, ultra-low-power)
//! - **LED**: one, dimmed by PWM
//! - **Speaker**: piezo on the same PWM timer as the LED
//! - **Button**: one push button to ground
//!
//! # Low Power Operation
//!
//! - MSI oscillator at 2.097 MHz, no external clocks
//! - The main loop polls continuously while awake; a session lasts minutes
//! - STOP mode between sessions, woken by the button EXTI line
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings, PWM indicator and SysTick tick source
//! - [`power`] - Wake interrupt and STOP-mode halt
//!
//! The timer logic itself lives in the `teatimer` library.

#![no_std]
#![no_main]

mod hardware;
mod power;

use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    rcc::{LsConfig, mux::ClockMux},
};
use embassy_time::Delay;
use teatimer::Device;
use teatimer::clock::TickClock;
use {defmt_rtt as _, panic_probe as _};

use hardware::{Peripherals, SysTickSubTick, TICKS, start_tick};
use power::{StopHalt, setup_wake_exti};

/// Creates a low-power clock configuration for STM32L031.
///
/// # Clock Settings
///
/// - **MSI**: 2.097 MHz, also the clock the core wakes from STOP on
/// - **System clock**: MSI (no PLL)
/// - **LSE/LSI**: off, no RTC is used
/// - **Voltage scale**: Range 1
///
/// SysTick and the tick period are derived from this rate, see
/// [`hardware::CORE_CLOCK_HZ`].
fn create_low_power_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE2M),
        hsi: false,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::MSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig::off(),
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Main entry point for the tea timer firmware.
///
/// # Initialization Sequence
///
/// 1. Configure clocks (2.097 MHz MSI)
/// 2. Initialize STM32 peripherals, button pin and PWM timer
/// 3. Start the SysTick tick source
/// 4. Configure the button wake interrupt
/// 5. Hand everything to [`Device::run`], which goes straight to sleep
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_low_power_config();

    let p = embassy_stm32::init(config);
    let mut core = cortex_m::Peripherals::take().unwrap();

    #[cfg(feature = "debug-mode")]
    defmt::info!("Tea timer firmware starting...");

    // Leave time for the debugger to attach before the first STOP.
    #[cfg(feature = "debug-mode")]
    embassy_time::Timer::after_secs(3).await;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Initializing peripherals...");

    let peripherals = Peripherals::new(p);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Starting tick...");

    start_tick(&mut core.SYST);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Setting up wake interrupt...");

    setup_wake_exti();

    let clock = TickClock::new(&TICKS, SysTickSubTick);
    let halt = StopHalt::new(core.SYST, core.SCB);
    let mut device = Device::new(clock, peripherals.button, peripherals.indicator, halt, Delay);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Entering main loop...");

    device.run().await
}
