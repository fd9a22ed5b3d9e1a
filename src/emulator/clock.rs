use std::convert::TryFrom;
use std::time::Duration;

/// How often the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;

/// Work that is due after some amount of wall-clock time has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Calls to `Machine::step`.
    pub steps: u32,
    /// Calls to `Machine::tick_timers`.
    pub ticks: u32,
}

/// Paces a machine from a frontend loop.
///
/// Instructions run at a configurable rate, the timers always at 60 Hz,
/// and leftover time carries over to the next call so neither drifts.
#[derive(Debug, Clone)]
pub struct Scheduler {
    step_period: Duration,
    tick_period: Duration,
    step_debt: Duration,
    tick_debt: Duration,
}

impl Scheduler {
    pub fn new(instructions_per_second: u32) -> Scheduler {
        Scheduler {
            // Rates above 1 GHz round down to a zero period
            step_period: (Duration::from_secs(1) / instructions_per_second.max(1)).max(Duration::from_nanos(1)),
            tick_period: Duration::from_secs(1) / TIMER_HZ,
            step_debt: Duration::default(),
            tick_debt: Duration::default(),
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> Schedule {
        Schedule {
            steps: Self::drain(&mut self.step_debt, elapsed, self.step_period),
            ticks: Self::drain(&mut self.tick_debt, elapsed, self.tick_period),
        }
    }

    /// Time until the next timer tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.tick_period - self.tick_debt
    }

    /// Take as many whole periods out of the debt as fit in a `u32`, leaving the rest for later.
    fn drain(debt: &mut Duration, elapsed: Duration, period: Duration) -> u32 {
        *debt += elapsed;
        let due = debt.as_nanos() / period.as_nanos();
        let count = u32::try_from(due).unwrap_or(u32::MAX);
        *debt -= period * count;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_at_60hz_regardless_of_instruction_rate() {
        for &rate in &[60, 500, 1000] {
            let mut scheduler = Scheduler::new(rate);
            let schedule = scheduler.advance(Duration::from_secs(1));
            assert_eq!(schedule.ticks, 60);
            assert_eq!(schedule.steps, rate);
        }
    }

    #[test]
    fn leftover_time_carries_over() {
        let mut scheduler = Scheduler::new(500);
        let half_tick = Duration::from_secs(1) / 120;
        assert_eq!(scheduler.advance(half_tick).ticks, 0);
        assert_eq!(scheduler.advance(half_tick).ticks, 1);
    }

    #[test]
    fn rates_above_one_gigahertz_still_make_progress() {
        let mut scheduler = Scheduler::new(2_000_000_000);
        assert_eq!(scheduler.step_period, Duration::from_nanos(1));
        assert_eq!(scheduler.advance(Duration::from_millis(1)).steps, 1_000_000);
    }

    #[test]
    fn step_count_saturates_and_keeps_the_rest() {
        let mut scheduler = Scheduler::new(u32::MAX);
        let schedule = scheduler.advance(Duration::from_secs(10));
        assert_eq!(schedule.steps, u32::MAX);
        assert_eq!(schedule.ticks, 600);
        assert!(scheduler.advance(Duration::default()).steps > 0);
    }

    #[test]
    fn zero_rate_is_clamped() {
        let mut scheduler = Scheduler::new(0);
        assert_eq!(scheduler.advance(Duration::from_secs(2)).steps, 2);
    }
}
