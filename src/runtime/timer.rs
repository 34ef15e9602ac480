//! Debounce deadline
//!
//! Only the latest generation can ever be current, so arming a timer
//! replaces whatever was armed before.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct DebounceTimer {
    armed: Option<(Instant, u64)>,
}

impl DebounceTimer {
    pub fn arm(&mut self, generation: u64, delay: Duration) {
        self.armed = Some((Instant::now() + delay, generation));
    }

    /// Take the generation if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<u64> {
        match self.armed {
            Some((deadline, generation)) if deadline <= now => {
                self.armed = None;
                Some(generation)
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|(deadline, _)| deadline)
    }

    pub fn clear(&mut self) {
        self.armed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_replaces() {
        let mut timer = DebounceTimer::default();
        timer.arm(1, Duration::ZERO);
        timer.arm(2, Duration::ZERO);
        assert_eq!(timer.take_due(Instant::now()), Some(2));
        assert_eq!(timer.take_due(Instant::now()), None);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timer = DebounceTimer::default();
        timer.arm(1, Duration::from_secs(60));
        assert_eq!(timer.take_due(Instant::now()), None);
        assert!(timer.deadline().is_some());
        timer.clear();
        assert!(timer.deadline().is_none());
    }
}
