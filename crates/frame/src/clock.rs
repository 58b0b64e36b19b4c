/// Delta reported by the very first tick, in seconds.
pub const FIRST_FRAME_DELTA: f64 = 0.01;

/// Result of advancing the clock by one host timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Seconds since the previous tick.
    pub delta: f64,
    /// Accumulated seconds since the loop started.
    pub time: f64,
    /// True only for the tick that started the clock.
    pub first: bool,
}

/// Accumulates elapsed time from monotonic millisecond timestamps.
///
/// The first tick back-dates the previous timestamp by [`FIRST_FRAME_DELTA`]
/// so animation starts moving immediately. `time` is the sum of all deltas and
/// is never reset; a host that pauses ticking sees one large delta on resume.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    time: f64,
    last_time: f64,
    started: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, timestamp_ms: f64) -> ClockTick {
        let current = timestamp_ms * 0.001;
        let first = !self.started;
        if first {
            self.last_time = current - FIRST_FRAME_DELTA;
            self.started = true;
        }
        let delta = current - self.last_time;
        self.last_time = current;
        self.time += delta;
        ClockTick {
            delta,
            time: self.time,
            first,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Timestamp of the previous tick in seconds.
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_backdates_previous_timestamp() {
        let mut clock = FrameClock::new();
        let tick = clock.advance(5000.0);
        assert!(tick.first);
        assert!((tick.delta - FIRST_FRAME_DELTA).abs() < 1e-12);
        assert!((clock.time() - 0.01).abs() < 1e-12);
        assert_eq!(clock.last_time(), 5.0);
    }

    #[test]
    fn only_first_tick_is_flagged() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert!(!clock.advance(16.0).first);
        assert!(!clock.advance(32.0).first);
    }

    #[test]
    fn time_is_sum_of_deltas() {
        let mut clock = FrameClock::new();
        let stamps = [1000.0, 1016.0, 1033.5, 1050.0, 1200.0];
        let mut sum = 0.0;
        for stamp in stamps {
            sum += clock.advance(stamp).delta;
        }
        assert!((clock.time() - sum).abs() < 1e-12);
        // Elapsed host time plus the back-dated first delta.
        assert!((clock.time() - (0.2 + FIRST_FRAME_DELTA)).abs() < 1e-9);
    }

    #[test]
    fn zero_timestamp_starts_cleanly() {
        let mut clock = FrameClock::new();
        let tick = clock.advance(0.0);
        assert!(tick.first);
        assert!((tick.time - 0.01).abs() < 1e-12);
        let tick = clock.advance(0.0);
        assert!(!tick.first);
        assert_eq!(tick.delta, 0.0);
    }

    #[test]
    fn pause_produces_one_large_delta() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.advance(16.0);
        let resumed = clock.advance(10_016.0);
        assert!((resumed.delta - 10.0).abs() < 1e-9);
    }
}
