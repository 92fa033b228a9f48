use std::thread::sleep;
use std::time::Duration;

/// How logical delays map onto wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Delays only move the logical clock.
    Compressed,
    /// Delays also block the current thread for the same amount of time.
    Realtime,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Compressed
    }
}

/// Millisecond clock owned by a single test run. Starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogicalClock {
    now_ms: u64,
    pacing: Pacing,
}

impl LogicalClock {
    pub fn new(pacing: Pacing) -> Self {
        Self { now_ms: 0, pacing }
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn advance(&mut self, ms: u64) {
        if ms == 0 {
            return;
        }
        self.now_ms = self.now_ms.saturating_add(ms);
        if self.pacing == Pacing::Realtime {
            trace!("Sleeping {} ms, logical clock at {} ms", ms, self.now_ms);
            sleep(Duration::from_millis(ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_compressed_clock_does_not_block() {
        let mut clock = LogicalClock::new(Pacing::Compressed);
        let now = Instant::now();
        clock.advance(60_000);
        clock.advance(0);

        assert_eq!(clock.now(), 60_000);
        assert!(now.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_realtime_clock_waits() {
        let mut clock = LogicalClock::new(Pacing::Realtime);
        let now = Instant::now();
        clock.advance(20);

        assert_eq!(clock.now(), 20);
        assert!(now.elapsed() >= Duration::from_millis(20));
    }
}
