///! Refresh scheduler
///!
///! Owns the timing of the pipeline: live-call rate limiting, bounded retry on
///! error statuses, demo fallback and the sleep between cycles.
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use tracker_common::{FlightRecord, SourceMode};

use super::demo::DemoGenerator;
use super::feed::{FeedError, FlightFeed};
use super::store::{Snapshot, SnapshotStore};

/// Timing and retry policy for the refresh loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Minimum time between two live feed calls
    pub min_live_interval: Duration,
    /// Retries allowed per cycle for unexpected error statuses
    pub max_retries: u32,
    pub retry_backoff: Duration,
    /// Pause after a cycle that ended on live data
    pub live_sleep: Duration,
    /// Pause after a cycle that ended on demo data
    pub demo_sleep: Duration,
    pub demo_flight_count: usize,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            min_live_interval: Duration::from_secs(60),
            max_retries: 3,
            retry_backoff: Duration::from_secs(5),
            live_sleep: Duration::from_secs(60),
            demo_sleep: Duration::from_secs(90),
            demo_flight_count: 25,
        }
    }
}

impl RefreshPolicy {
    pub fn sleep_after(&self, mode: SourceMode) -> Duration {
        match mode {
            SourceMode::Live => self.live_sleep,
            SourceMode::Demo => self.demo_sleep,
        }
    }
}

/// Why a cycle ended on demo data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Skipped locally, the previous live call was too recent
    RateLimited,
    /// Upstream answered 429
    Throttled,
    Unreachable,
    InvalidPayload,
    /// Error statuses persisted through every retry
    RetriesExhausted,
}

impl FallbackReason {
    fn from_error(error: &FeedError) -> Self {
        match error {
            FeedError::Throttled => FallbackReason::Throttled,
            FeedError::Unreachable(_) => FallbackReason::Unreachable,
            FeedError::InvalidPayload(_) => FallbackReason::InvalidPayload,
            FeedError::Status { .. } => FallbackReason::RetriesExhausted,
        }
    }
}

/// Result of one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Live { flights: usize, retries: u32 },
    Demo { reason: FallbackReason, retries: u32 },
    /// Live call skipped by the rate limit while the current snapshot is live;
    /// nothing was published
    Cached,
}

impl CycleOutcome {
    pub fn source_mode(&self) -> SourceMode {
        match self {
            CycleOutcome::Live { .. } | CycleOutcome::Cached => SourceMode::Live,
            CycleOutcome::Demo { .. } => SourceMode::Demo,
        }
    }
}

/// Periodic refresh task. The only writer of its `SnapshotStore`.
pub struct RefreshScheduler<F> {
    feed: F,
    demo: DemoGenerator,
    store: Arc<SnapshotStore>,
    policy: RefreshPolicy,
    last_live_attempt: Option<Instant>,
}

impl<F: FlightFeed + 'static> RefreshScheduler<F> {
    pub fn new(feed: F, demo: DemoGenerator, store: Arc<SnapshotStore>, policy: RefreshPolicy) -> Self {
        Self {
            feed,
            demo,
            store,
            policy,
            last_live_attempt: None,
        }
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.policy
    }

    /// Spawn the refresh loop on the runtime. The first cycle runs immediately.
    pub fn start(self) -> JoinHandle<()> {
        info!(
            "Starting flight refresh task (live interval: {}s, retries: {}, backoff: {}s)",
            self.policy.min_live_interval.as_secs(),
            self.policy.max_retries,
            self.policy.retry_backoff.as_secs()
        );

        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        loop {
            let outcome = self.run_cycle().await;
            let pause = self.policy.sleep_after(outcome.source_mode());

            let snapshot = self.store.read();
            info!(
                "Serving {} military/private flights [{} MODE], next refresh in {}s",
                snapshot.flights.len(),
                snapshot.source_mode.as_str().to_uppercase(),
                pause.as_secs()
            );

            tokio::time::sleep(pause).await;
        }
    }

    /// Run one refresh cycle and publish its result
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let now = Instant::now();

        if let Some(last) = self.last_live_attempt {
            let elapsed = now.duration_since(last);
            if elapsed < self.policy.min_live_interval {
                let remaining = self.policy.min_live_interval - elapsed;
                info!("Rate limiting: {}s until the next live call", remaining.as_secs());

                if self.store.read().source_mode == SourceMode::Live {
                    debug!("Keeping the current live snapshot");
                    return CycleOutcome::Cached;
                }
                self.publish_demo();
                return CycleOutcome::Demo {
                    reason: FallbackReason::RateLimited,
                    retries: 0,
                };
            }
        }

        self.last_live_attempt = Some(now);
        let mut retries = 0;

        loop {
            info!("Fetching live flight data...");

            match self.feed.fetch().await {
                Ok(flights) => {
                    let count = flights.len();
                    info!("Fetched {} military/private flights", count);
                    self.publish(flights, SourceMode::Live);
                    return CycleOutcome::Live {
                        flights: count,
                        retries,
                    };
                }
                Err(FeedError::Status { status }) if retries < self.policy.max_retries => {
                    retries += 1;
                    warn!(
                        "Feed returned {}, retry {}/{} in {}s",
                        status,
                        retries,
                        self.policy.max_retries,
                        self.policy.retry_backoff.as_secs()
                    );
                    tokio::time::sleep(self.policy.retry_backoff).await;
                }
                Err(e) => {
                    let reason = FallbackReason::from_error(&e);
                    warn!("{}; switching to demo data ({:?})", e, reason);
                    self.publish_demo();
                    return CycleOutcome::Demo { reason, retries };
                }
            }
        }
    }

    fn publish_demo(&self) {
        let flights = self.demo.generate(self.policy.demo_flight_count);
        self.publish(flights, SourceMode::Demo);
    }

    fn publish(&self, flights: Vec<FlightRecord>, source_mode: SourceMode) {
        self.store.replace(Snapshot {
            flights,
            source_mode,
            captured_at: Utc::now(),
            last_live_attempt: self.last_live_attempt,
        });
    }
}
