use std::time::{Duration, Instant};

/// Periodic timer polled from the single-threaded game loop.
///
/// A poll fires at most once; if the loop fell behind, the missed
/// periods are skipped rather than replayed.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
    stopped: bool,
}

impl Ticker {
    /// Creates a ticker whose first deadline is one interval after `now`.
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
            stopped: false,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when the deadline has passed, and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.stopped || now < self.next_due {
            return false;
        }

        self.next_due = now + self.interval;
        true
    }

    /// Time left until the next deadline; `None` once stopped.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.stopped {
            return None;
        }
        Some(self.next_due.saturating_duration_since(now))
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Ticker;

    #[test]
    fn fires_only_after_interval_elapses() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(200), start);

        assert!(!ticker.poll(start + Duration::from_millis(199)));
        assert!(ticker.poll(start + Duration::from_millis(200)));
        assert!(!ticker.poll(start + Duration::from_millis(201)));
        assert!(ticker.poll(start + Duration::from_millis(400)));
    }

    #[test]
    fn missed_periods_are_not_replayed() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(80), start);

        let late = start + Duration::from_millis(1_000);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(
            ticker.time_until_due(late),
            Some(Duration::from_millis(80))
        );
    }

    #[test]
    fn stopped_ticker_never_fires() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(10), start);

        ticker.stop();

        assert!(ticker.is_stopped());
        assert!(!ticker.poll(start + Duration::from_secs(5)));
        assert_eq!(ticker.time_until_due(start), None);
    }

    #[test]
    fn time_until_due_saturates_at_zero() {
        let start = Instant::now();
        let ticker = Ticker::new(Duration::from_millis(50), start);

        assert_eq!(
            ticker.time_until_due(start + Duration::from_millis(70)),
            Some(Duration::ZERO)
        );
    }
}
