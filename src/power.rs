//! Wake interrupt and STOP-mode halt.
//!
//! The button pin also drives EXTI line 2 on its falling edge. While the
//! timer is awake the line is masked. [`StopHalt`] unmasks it and stops the
//! core; the interrupt handler masks the line again, which is how the halt
//! loop learns that the button, and not some other interrupt, woke it.
//!
//! The SysTick interrupt is masked for the duration of the halt. Its counter
//! does not run in STOP mode anyway, so the monotonic clock simply pauses.

use cortex_m::peripheral::{SCB, SYST};
use embassy_stm32::pac;
use pac::interrupt;
use teatimer::sleep::Halt;

/// EXTI line of the button pin (PA2).
const BUTTON_EXTI_LINE: usize = 2;

/// Register index for EXTI lines 0-31.
const EXTI_REG_IDX: usize = 0;

/// Button wake interrupt (EXTI lines 2 and 3).
///
/// Disarms its own line and clears the pending flag. Nothing else runs here.
#[interrupt]
fn EXTI2_3() {
    let exti = pac::EXTI;

    exti.imr(EXTI_REG_IDX)
        .modify(|w| w.set_line(BUTTON_EXTI_LINE, false));
    exti.pr(EXTI_REG_IDX)
        .write(|w| w.set_line(BUTTON_EXTI_LINE, true));
}

/// Configures EXTI line 2 for a falling-edge trigger, initially masked.
///
/// Port A is the reset selection of the line, so SYSCFG is left alone.
pub fn setup_wake_exti() {
    let exti = pac::EXTI;

    exti.imr(EXTI_REG_IDX)
        .modify(|w| w.set_line(BUTTON_EXTI_LINE, false));
    exti.rtsr(EXTI_REG_IDX)
        .modify(|w| w.set_line(BUTTON_EXTI_LINE, false));
    exti.ftsr(EXTI_REG_IDX)
        .modify(|w| w.set_line(BUTTON_EXTI_LINE, true));

    unsafe {
        cortex_m::peripheral::NVIC::unmask(embassy_stm32::interrupt::EXTI2_3);
    };
}

/// Halts in STOP mode until the button wake interrupt.
pub struct StopHalt {
    syst: SYST,
    scb: SCB,
}

impl StopHalt {
    pub fn new(syst: SYST, scb: SCB) -> Self {
        Self { syst, scb }
    }
}

impl Halt for StopHalt {
    fn halt_until_wake(&mut self) {
        let exti = pac::EXTI;

        self.syst.disable_interrupt();

        // Drop any edge latched while awake, then arm.
        exti.pr(EXTI_REG_IDX)
            .write(|w| w.set_line(BUTTON_EXTI_LINE, true));
        exti.imr(EXTI_REG_IDX)
            .modify(|w| w.set_line(BUTTON_EXTI_LINE, true));

        self.scb.set_sleepdeep();
        loop {
            // Interrupts stay masked from the check through the wfi. A pending
            // interrupt still ends the wfi and runs once they are unmasked.
            let armed = cortex_m::interrupt::free(|_| {
                let armed = exti.imr(EXTI_REG_IDX).read().line(BUTTON_EXTI_LINE);
                if armed {
                    cortex_m::asm::wfi();
                }
                armed
            });
            if !armed {
                break;
            }
        }
        self.scb.clear_sleepdeep();
        self.syst.enable_interrupt();
    }
}
