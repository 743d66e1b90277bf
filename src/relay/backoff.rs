use std::time::Duration;

/// Doubling reconnect delay with an upper bound and an optional attempt cap.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    max_attempts: u32,
    attempt: u32,
}

impl Backoff {
    /// `max_attempts == 0` never gives up.
    pub fn new(initial: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            initial,
            max,
            max_attempts,
            attempt: 0,
        }
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.max_attempts != 0 && self.attempt >= self.max_attempts {
            return None;
        }

        let factor = 1u32.checked_shl(self.attempt.min(31)).unwrap_or(u32::MAX);
        let delay = self.initial.saturating_mul(factor).min(self.max);
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_until_capped() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(5), 0);

        let delays: Vec<u64> = (0..5)
            .filter_map(|_| backoff.next_delay())
            .map(|d| d.as_secs())
            .collect();

        assert_eq!(delays, [1, 2, 4, 5, 5]);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut backoff = Backoff::new(Duration::from_millis(10), Duration::from_secs(1), 2);

        assert!(backoff.next_delay().is_some());
        assert!(backoff.next_delay().is_some());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn reset_starts_from_initial_delay() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(10), 3);
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();

        assert_eq!(backoff.attempt(), 0);
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn unlimited_attempts_never_overflow() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(30), 0);
        for _ in 0..100 {
            assert!(backoff.next_delay().is_some());
        }

        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(30)));
    }
}
