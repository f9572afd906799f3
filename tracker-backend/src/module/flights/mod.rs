///! Flight data refresh pipeline
///!
///! Periodically polls the OpenSky state feed, keeps military and private
///! aircraft, and publishes the result to an in-memory snapshot. Falls back
///! to synthetic demo data whenever the feed is throttled or failing.
///!
///! ## Main Components
///! - `RefreshScheduler`: rate limit, retry and fallback state machine
///! - `FeedClient`: single HTTP call to the feed
///! - `SnapshotStore`: shared latest snapshot
///! - `FlightQuery`: read-side projections for request handlers

pub mod classifier;
pub mod demo;
pub mod feed;
pub mod query;
pub mod scheduler;
pub mod store;

pub use classifier::classify;
pub use demo::DemoGenerator;
pub use feed::{FeedClient, FeedError, FlightFeed, OPENSKY_STATES_URL};
pub use query::{FlightQuery, QueryError};
pub use scheduler::{CycleOutcome, FallbackReason, RefreshPolicy, RefreshScheduler};
pub use store::{Snapshot, SnapshotStore};
