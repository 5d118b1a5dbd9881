use async_trait::async_trait;
use chrono::{Timelike, Utc};
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Minute of the hour the recurring trigger fires at.
const TRIGGER_MINUTE: u32 = 1;

/// Anything the scheduler can trigger. The decision cycle implements
/// this; tests substitute counting fakes.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_once(&self);
}

#[async_trait]
impl CycleRunner for crate::cycle::DecisionCycle {
    async fn run_once(&self) {
        self.run().await;
    }
}

/// Trigger cadence. The minute-of-hour delay is computed from the wall
/// clock at the moment the ticker is created, never cached earlier.
enum Cadence {
    MinuteOfHour(u32),
    Fixed {
        first_tick_delay: Duration,
        period: Duration,
    },
}

/// Fires the decision cycle once immediately, then on a fixed cadence,
/// forever. Cycles never overlap: each trigger awaits the cycle to
/// completion, and a reentrancy guard skips a trigger outright if a
/// cycle is somehow still in flight.
pub struct Scheduler {
    cadence: Cadence,
    guard: tokio::sync::Mutex<()>,
}

impl Scheduler {
    /// Hourly cadence aligned to minute `:01` of every hour.
    pub fn hourly() -> Self {
        Self {
            cadence: Cadence::MinuteOfHour(TRIGGER_MINUTE),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Arbitrary cadence, used by tests. The first tick is measured
    /// from scheduler start, not from the end of the initial cycle.
    pub fn with_period(first_tick_delay: Duration, period: Duration) -> Self {
        Self {
            cadence: Cadence::Fixed {
                first_tick_delay,
                period,
            },
            guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Run forever: one immediate cycle, then one per trigger.
    pub async fn run(&self, cycle: Arc<dyn CycleRunner>) {
        let started = Instant::now();
        tracing::info!("scheduler starting, running initial cycle");
        self.trigger(cycle.as_ref()).await;

        // Anchor the ticker only after the initial cycle: its duration
        // must not shift the recurring trigger off its mark.
        let (first_tick, period) = match self.cadence {
            Cadence::MinuteOfHour(minute) => {
                let delay = seconds_until_minute_of_hour(Utc::now(), minute);
                (
                    Instant::now() + Duration::from_secs(delay),
                    Duration::from_secs(3600),
                )
            }
            Cadence::Fixed {
                first_tick_delay,
                period,
            } => (started + first_tick_delay, period),
        };
        tracing::info!(period_secs = period.as_secs(), "recurring trigger armed");

        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.trigger(cycle.as_ref()).await;
        }
    }

    async fn trigger(&self, cycle: &dyn CycleRunner) {
        match self.guard.try_lock() {
            Ok(_held) => cycle.run_once().await,
            Err(_) => {
                tracing::warn!("previous cycle still running, skipping this trigger");
            }
        }
    }
}

/// Seconds from `now` until the next time the wall clock reads the given
/// minute of the hour. Exactly on the mark means the next hour's mark.
fn seconds_until_minute_of_hour(now: chrono::DateTime<Utc>, minute: u32) -> u64 {
    let target = i64::from(minute) * 60;
    let current = i64::from(now.minute()) * 60 + i64::from(now.second());
    let mut delta = target - current;
    if delta <= 0 {
        delta += 3600;
    }
    delta as u64
}
