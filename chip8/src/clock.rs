use std::time::{Duration, Instant};

use emu8_core::TIMER_HZ;

/// Work owed for the time that has passed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    pub steps: u32,
    pub ticks: u32,
}

/// A periodic deadline that never owes more than `cap` periods at once
#[derive(Debug, Clone, Copy)]
struct Cadence {
    period: Duration,
    next: Instant,
    cap: u32,
}

impl Cadence {
    fn new(hz: u32, now: Instant) -> Self {
        let period = Duration::from_secs(1) / hz;
        Cadence {
            period,
            next: now + period,
            cap: (hz / 4).max(1),
        }
    }

    fn due(&mut self, now: Instant) -> u32 {
        let mut count = 0;
        while self.next <= now {
            count += 1;
            self.next += self.period;
            if count == self.cap {
                // Fell too far behind; forget the backlog
                self.next = now + self.period;
                break;
            }
        }
        count
    }
}

/// # Clock
/// Keeps the CPU cadence and the 60Hz timer cadence apart.
///
/// The run loop asks what is `due` each time round and sleeps `until_next` in between.
pub struct Clock {
    cpu: Cadence,
    timers: Cadence,
}

impl Clock {
    pub fn new(clock_hz: u32, now: Instant) -> Self {
        Clock {
            cpu: Cadence::new(clock_hz, now),
            timers: Cadence::new(TIMER_HZ, now),
        }
    }

    pub fn due(&mut self, now: Instant) -> Due {
        Due {
            steps: self.cpu.due(now),
            ticks: self.timers.due(now),
        }
    }

    /// Time left before either cadence owes anything
    pub fn until_next(&self, now: Instant) -> Duration {
        self.cpu
            .next
            .min(self.timers.next)
            .saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_at_start() {
        let start = Instant::now();
        let mut clock = Clock::new(500, start);
        assert_eq!(clock.due(start), Due::default());
    }

    #[test]
    fn test_cadences_are_independent() {
        let start = Instant::now();
        let mut clock = Clock::new(600, start);
        let due = clock.due(start + Duration::from_millis(100));
        assert_eq!(due, Due { steps: 60, ticks: 6 });
    }

    #[test]
    fn test_deadlines_carry_over() {
        let start = Instant::now();
        let mut clock = Clock::new(100, start);
        assert_eq!(clock.due(start + Duration::from_millis(15)).steps, 1);
        assert_eq!(clock.due(start + Duration::from_millis(20)).steps, 1);
        assert_eq!(clock.due(start + Duration::from_millis(25)).steps, 0);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let start = Instant::now();
        let mut clock = Clock::new(500, start);
        let due = clock.due(start + Duration::from_secs(10));
        assert_eq!(due, Due { steps: 125, ticks: 15 });
        assert_eq!(clock.due(start + Duration::from_secs(10)), Due::default());
    }

    #[test]
    fn test_until_next() {
        let start = Instant::now();
        let clock = Clock::new(500, start);
        assert_eq!(clock.until_next(start), Duration::from_millis(2));
        assert_eq!(
            clock.until_next(start + Duration::from_secs(1)),
            Duration::ZERO
        );
    }
}
