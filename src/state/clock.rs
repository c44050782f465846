use std::time::Duration;

/// Nominal cadence at which the session clock is advanced while running.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Tick-accumulating stopwatch backing the in-session timer.
///
/// The clock never reads wall time itself: an external driver calls
/// [`Clock::advance`] once per period and the clock only counts those ticks
/// while it is running. Elapsed time is therefore a whole number of periods and
/// can only grow until [`Clock::reset`] is called.
#[derive(Debug, Clone)]
pub struct Clock {
    period: Duration,
    ticks: u32,
    running: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Clock {
    /// Create a stopped clock that advances by `period` on each tick.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ticks: 0,
            running: false,
        }
    }

    /// Begin accepting ticks.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop accepting ticks; the accumulated value is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zero the accumulated value and stop the clock.
    pub fn reset(&mut self) {
        self.stop();
        self.ticks = 0;
    }

    /// Whether the clock currently accepts ticks.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Count one period if running, returning the new elapsed value.
    pub fn advance(&mut self) -> Option<Duration> {
        if !self.running {
            return None;
        }
        self.ticks = self.ticks.saturating_add(1);
        Some(self.elapsed())
    }

    /// Accumulated time.
    pub fn elapsed(&self) -> Duration {
        self.period * self.ticks
    }

    /// Accumulated time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Period between two ticks.
    pub fn period(&self) -> Duration {
        self.period
    }
}
