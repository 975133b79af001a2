//! Single-flight one-second tick source.

use std::future;

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A tick schedule that can be armed and disarmed.
///
/// At most one schedule exists per source. While disarmed, [`tick`](Self::tick)
/// never resolves.
#[derive(Debug)]
pub struct TickSource {
    period: Duration,
    interval: Option<Interval>,
}

impl TickSource {
    /// Creates a disarmed source with a one-second period.
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Creates a disarmed source with a custom period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Returns true while a schedule is active.
    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Starts the schedule. The first tick fires one period from now.
    ///
    /// Arming an armed source keeps the existing schedule.
    pub fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    /// Drops the schedule. No tick is yielded after this returns.
    pub fn disarm(&mut self) {
        self.interval = None;
    }

    /// Waits for the next tick.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}
