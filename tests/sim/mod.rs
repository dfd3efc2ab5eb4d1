//! Simulated board for driving [`Device`] on the host.
//!
//! All parts share one [`World`]: simulated time, scripted button presses
//! and a log of everything written to the outputs. Every clock read advances
//! time by [`STEP_US`], so busy loops make progress.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;
use teatimer::clock::Monotonic;
use teatimer::indicator::Indicator;
use teatimer::sleep::Halt;
use teatimer::{Device, Phase};

/// Simulated time consumed by one clock read.
pub const STEP_US: u32 = 100;

/// Time spent asleep before the wake press.
pub const SLEEP_GAP_US: u32 = 1_000_000;

/// Output activity, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Brightness(u8),
    SpeakerOn,
    SpeakerOff,
    LedOff,
    Signal(bool),
    DelayMs(u32),
    Halt,
}

pub struct World {
    now_us: Cell<u32>,
    /// Button down intervals `[down, up)` in microseconds.
    presses: RefCell<Vec<(u32, u32)>>,
    ops: RefCell<Vec<(u32, Op)>>,
    sleeps: Cell<u32>,
    /// How long the press that wakes the device is held.
    wake_hold_us: Cell<u32>,
}

impl World {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            now_us: Cell::new(0),
            presses: RefCell::new(Vec::new()),
            ops: RefCell::new(Vec::new()),
            sleeps: Cell::new(0),
            wake_hold_us: Cell::new(150_000),
        })
    }

    pub fn now_us(&self) -> u32 {
        self.now_us.get()
    }

    pub fn now_ms(&self) -> u32 {
        self.now_us.get() / 1000
    }

    fn advance_us(&self, us: u32) {
        self.now_us.set(self.now_us.get() + us);
    }

    /// Schedules a press at `at_ms` held for `hold_ms`.
    pub fn press(&self, at_ms: u32, hold_ms: u32) {
        self.presses
            .borrow_mut()
            .push((at_ms * 1000, (at_ms + hold_ms) * 1000));
    }

    /// Schedules a press at `at_us` held for `hold_us`, with contact bounce
    /// on both edges.
    pub fn bouncy_press(&self, at_us: u32, hold_us: u32) {
        let mut presses = self.presses.borrow_mut();
        for i in 0..5 {
            presses.push((at_us + i * 300, at_us + i * 300 + 150));
        }
        presses.push((at_us + 1_500, at_us + hold_us));
        for i in 0..5 {
            let t = at_us + hold_us + 100 + i * 300;
            presses.push((t, t + 150));
        }
    }

    pub fn set_wake_hold_ms(&self, ms: u32) {
        self.wake_hold_us.set(ms * 1000);
    }

    fn pressed(&self) -> bool {
        let now = self.now_us.get();
        self.presses
            .borrow()
            .iter()
            .any(|&(down, up)| (down..up).contains(&now))
    }

    fn record(&self, op: Op) {
        self.ops.borrow_mut().push((self.now_ms(), op));
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }

    pub fn ops(&self) -> Vec<(u32, Op)> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Alarm signals recorded so far.
    pub fn signals(&self) -> Vec<(u32, bool)> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|&(t, op)| match op {
                Op::Signal(on) => Some((t, on)),
                _ => None,
            })
            .collect()
    }

    /// Number of feedback cues (flash + chirp) recorded so far.
    pub fn cues(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|(_, op)| *op == Op::DelayMs(70))
            .count()
    }
}

pub struct SimClock(Rc<World>);

impl Monotonic for SimClock {
    fn now_micros(&self) -> u32 {
        self.0.advance_us(STEP_US);
        self.0.now_us()
    }
}

pub struct SimPin(Rc<World>);

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.pressed())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.pressed())
    }
}

pub struct SimLed(Rc<World>);

impl Indicator for SimLed {
    fn set_brightness(&mut self, level: u8) {
        self.0.record(Op::Brightness(level));
    }

    fn speaker_on(&mut self) {
        self.0.record(Op::SpeakerOn);
    }

    fn speaker_off(&mut self) {
        self.0.record(Op::SpeakerOff);
    }

    fn led_off(&mut self) {
        self.0.record(Op::LedOff);
    }

    fn signal(&mut self, on: bool) {
        self.0.record(Op::Signal(on));
    }
}

/// Halts by jumping time forward, then presses the button to wake up.
pub struct SimHalt(Rc<World>);

impl Halt for SimHalt {
    fn halt_until_wake(&mut self) {
        let world = &self.0;
        world.record(Op::Halt);
        world.sleeps.set(world.sleeps.get() + 1);
        world.advance_us(SLEEP_GAP_US);
        let down = world.now_us();
        world
            .presses
            .borrow_mut()
            .push((down, down + world.wake_hold_us.get()));
    }
}

pub struct SimDelay(Rc<World>);

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.record(Op::DelayMs(ns / 1_000_000));
        self.0.advance_us(ns / 1000);
    }
}

pub type SimDevice = Device<SimClock, SimPin, SimLed, SimHalt, SimDelay>;

pub fn device(world: &Rc<World>) -> SimDevice {
    Device::new(
        SimClock(world.clone()),
        SimPin(world.clone()),
        SimLed(world.clone()),
        SimHalt(world.clone()),
        SimDelay(world.clone()),
    )
}

/// Powers the device on: it sleeps, is woken by a press and completes the
/// wake handshake. Returns the time setup began.
pub fn boot(world: &World, device: &mut SimDevice) -> u32 {
    embassy_futures::block_on(device.enter_sleep());
    world.now_ms()
}

/// Start time and duration of the running countdown.
pub fn countdown(device: &SimDevice) -> Option<(u32, u32)> {
    match device.session().phase() {
        Phase::Countdown {
            started_at,
            duration_ms,
            ..
        } => Some((*started_at, *duration_ms)),
        _ => None,
    }
}

/// Polls until `done` holds or `limit_ms` of simulated time pass.
pub fn run_until(
    world: &World,
    device: &mut SimDevice,
    limit_ms: u32,
    mut done: impl FnMut(&SimDevice) -> bool,
) -> bool {
    let deadline = world.now_ms() + limit_ms;
    while world.now_ms() < deadline {
        embassy_futures::block_on(device.poll_once());
        if done(device) {
            return true;
        }
    }
    false
}

/// Polls until the device has slept `count` times in total.
pub fn run_until_sleeps(world: &World, device: &mut SimDevice, count: u32, limit_ms: u32) -> bool {
    run_until(world, device, limit_ms, |_| world.sleeps() >= count)
}

pub fn in_countdown(device: &SimDevice) -> bool {
    matches!(device.session().phase(), Phase::Countdown { .. })
}

pub fn in_alarm(device: &SimDevice) -> bool {
    matches!(device.session().phase(), Phase::Alarm(_))
}
