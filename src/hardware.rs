//! Pin map, shared PWM timer and tick interrupt of the tea timer board.
//!
//! # Pin Assignments
//!
//! - **PA0**: LED - TIM2_CH1, brightness is the channel duty
//! - **PA1**: Piezo speaker - TIM2_CH2, fixed 50 % duty, channel output
//!   switched on and off
//! - **PA2**: Button to ground - internal pull-up, EXTI line 2 wakes from STOP
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK
//!
//! # Tick
//!
//! SysTick runs off the core clock and interrupts once per
//! [`TICK_PERIOD_US`]. The interrupt only bumps [`TICKS`]; the time within
//! the current period is read back from the SysTick current value register.

use cortex_m::peripheral::SYST;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::exception;
use embassy_stm32::gpio::{Input, OutputType, Pull};
use embassy_stm32::peripherals::TIM2;
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use teatimer::clock::{SubTick, TickCounter};
use teatimer::config::{BRIGHTNESS_FULL, PWM_FREQUENCY_HZ, TICK_PERIOD_US};
use teatimer::indicator::Indicator;

/// Core clock: MSI range 5.
pub const CORE_CLOCK_HZ: u32 = 2_097_152;

/// SysTick reload giving one interrupt per tick period, rounded to the
/// nearest cycle.
const SYST_RELOAD: u32 =
    ((CORE_CLOCK_HZ as u64 * TICK_PERIOD_US as u64 + 500_000) / 1_000_000) as u32 - 1;

/// Tick count shared between the SysTick handler and the main loop.
pub static TICKS: TickCounter = TickCounter::new();

#[exception]
fn SysTick() {
    TICKS.on_tick();
}

/// Starts SysTick with its interrupt enabled.
pub fn start_tick(syst: &mut SYST) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(SYST_RELOAD);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Microseconds into the current tick period, from the SysTick down-counter.
pub struct SysTickSubTick;

impl SubTick for SysTickSubTick {
    fn sub_tick(&self) -> u32 {
        let counted = SYST_RELOAD - SYST::get_current().min(SYST_RELOAD);
        counted * TICK_PERIOD_US / (SYST_RELOAD + 1)
    }
}

/// LED and speaker on the two channels of TIM2.
pub struct PwmIndicator {
    pwm: SimplePwm<'static, TIM2>,
}

impl PwmIndicator {
    /// Takes the timer with both channels configured. The speaker channel is
    /// set to a square wave but left disabled.
    pub fn new(mut pwm: SimplePwm<'static, TIM2>) -> Self {
        let mut speaker = pwm.ch2();
        speaker.set_duty_cycle_percent(50);
        speaker.disable();
        pwm.ch1().disable();
        Self { pwm }
    }
}

impl Indicator for PwmIndicator {
    fn set_brightness(&mut self, level: u8) {
        let mut led = self.pwm.ch1();
        led.set_duty_cycle_fraction(level.min(BRIGHTNESS_FULL).into(), BRIGHTNESS_FULL.into());
        led.enable();
    }

    fn speaker_on(&mut self) {
        self.pwm.ch2().enable();
    }

    fn speaker_off(&mut self) {
        self.pwm.ch2().disable();
    }

    fn led_off(&mut self) {
        self.pwm.ch1().disable();
    }
}

/// Top-level peripheral container for the tea timer.
pub struct Peripherals {
    /// Active-low push button (PA2)
    pub button: Input<'static>,
    /// LED and speaker on the shared PWM timer
    pub indicator: PwmIndicator,
}

impl Peripherals {
    /// Initializes the board peripherals from the STM32 peripheral singleton.
    ///
    /// # Initial States
    ///
    /// - PA2: input with pull-up
    /// - TIM2: running at [`PWM_FREQUENCY_HZ`], both channel outputs disabled
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        let pwm = SimplePwm::new(
            p.TIM2,
            Some(PwmPin::new(p.PA0, OutputType::PushPull)),
            Some(PwmPin::new(p.PA1, OutputType::PushPull)),
            None,
            None,
            Hertz::hz(PWM_FREQUENCY_HZ),
            CountingMode::EdgeAlignedUp,
        );

        Self {
            button: Input::new(p.PA2, Pull::Up),
            indicator: PwmIndicator::new(pwm),
        }
    }
}
