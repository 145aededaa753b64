/// # Timers
/// Two 8-bit counters that count down towards 0 at 60Hz.
///
/// They are ticked by whoever drives the machine, independently of the instruction rate.
/// A non-zero `sound` timer is the signal that the buzzer should be on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_delay(&mut self) {
        self.delay = self.delay.saturating_sub(1);
    }

    pub fn tick_sound(&mut self) {
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn tick(&mut self) {
        self.tick_delay();
        self.tick_sound();
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_independently() {
        let mut timers = Timers { delay: 2, sound: 5 };
        timers.tick_delay();
        assert_eq!(timers, Timers { delay: 1, sound: 5 });
        timers.tick_sound();
        assert_eq!(timers, Timers { delay: 1, sound: 4 });
    }

    #[test]
    fn test_stops_at_zero() {
        let mut timers = Timers { delay: 1, sound: 1 };
        timers.tick();
        timers.tick();
        assert_eq!(timers, Timers { delay: 0, sound: 0 });
    }

    #[test]
    fn test_sound_active() {
        let mut timers = Timers { delay: 0, sound: 1 };
        assert!(timers.sound_active());
        timers.tick();
        assert!(!timers.sound_active());
    }
}
