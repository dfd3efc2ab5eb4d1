//! Alarm sequencer: plays [`ALARM_PATTERN`] a fixed number of times.

use crate::config::{ALARM_PATTERN, ALARM_PATTERN_LEN, ALARM_REPEATS, CUE_MS};

/// What the alarm wants from the outputs on this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmStep {
    /// Current step still running, leave the outputs alone.
    Wait,
    /// A new step starts: light and sound on or off.
    Signal(bool),
    /// All passes played.
    Done,
}

/// Position within the alarm schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    pos: u8,
    passes_left: u8,
    step_at: u32,
}

impl Alarm {
    /// Starts the schedule; the first step is due immediately.
    pub fn new(now_ms: u32) -> Self {
        Self {
            pos: 0,
            passes_left: ALARM_REPEATS,
            step_at: now_ms.wrapping_sub(CUE_MS),
        }
    }

    /// Advances the schedule to `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> AlarmStep {
        if self.passes_left == 0 {
            return AlarmStep::Done;
        }
        if now_ms.wrapping_sub(self.step_at) < CUE_MS {
            return AlarmStep::Wait;
        }
        if self.pos == ALARM_PATTERN_LEN {
            self.passes_left -= 1;
            if self.passes_left == 0 {
                return AlarmStep::Done;
            }
            self.pos = 0;
        }

        let on = ALARM_PATTERN & (1 << self.pos) != 0;
        self.pos += 1;
        self.step_at = now_ms;
        AlarmStep::Signal(on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Polls once per millisecond until done, returning the signals and the
    /// time at which the alarm finished.
    fn play(start: u32) -> (Vec<bool>, u32) {
        let mut alarm = Alarm::new(start);
        let mut signals = Vec::new();
        let mut t = start;
        loop {
            match alarm.poll(t) {
                AlarmStep::Wait => {}
                AlarmStep::Signal(on) => signals.push(on),
                AlarmStep::Done => return (signals, t),
            }
            t = t.wrapping_add(1);
        }
    }

    #[test]
    fn first_step_is_immediate() {
        let mut alarm = Alarm::new(5_000);
        assert_eq!(alarm.poll(5_000), AlarmStep::Signal(true));
        assert_eq!(alarm.poll(5_001), AlarmStep::Wait);
    }

    #[test]
    fn plays_pattern_three_times_then_finishes() {
        let (signals, end) = play(1_000);
        let pass = [true, false, true, false, false, false, false];
        let expected: Vec<bool> = pass.iter().copied().cycle().take(21).collect();
        assert_eq!(signals, expected);
        assert_eq!(end, 1_000 + 21 * CUE_MS);
    }

    #[test]
    fn steps_are_spaced_by_step_duration() {
        let mut alarm = Alarm::new(0);
        assert_eq!(alarm.poll(0), AlarmStep::Signal(true));
        assert_eq!(alarm.poll(CUE_MS - 1), AlarmStep::Wait);
        assert_eq!(alarm.poll(CUE_MS), AlarmStep::Signal(false));
        assert_eq!(alarm.poll(2 * CUE_MS), AlarmStep::Signal(true));
    }

    #[test]
    fn stays_done() {
        let (_, end) = play(0);
        let mut alarm = Alarm::new(0);
        for t in 0..=end {
            alarm.poll(t);
        }
        assert_eq!(alarm.poll(end + 1_000), AlarmStep::Done);
    }

    #[test]
    fn survives_clock_wrap() {
        let (signals, _) = play(u32::MAX - 500);
        assert_eq!(signals.len(), 21);
    }
}
