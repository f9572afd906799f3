///! Read-only projections of the current snapshot
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use tracker_common::{FlightList, FlightRecord, StatusReport};

use super::scheduler::RefreshPolicy;
use super::store::SnapshotStore;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Flight not found: {0}")]
    NotFound(String),
}

/// Read handle given to request handlers. Never blocks the refresh task.
#[derive(Debug, Clone)]
pub struct FlightQuery {
    store: Arc<SnapshotStore>,
    min_live_interval: Duration,
}

impl FlightQuery {
    pub fn new(store: Arc<SnapshotStore>, policy: &RefreshPolicy) -> Self {
        Self {
            store,
            min_live_interval: policy.min_live_interval,
        }
    }

    pub fn list_flights(&self) -> FlightList {
        let snapshot = self.store.read();
        FlightList {
            flights: snapshot.flights.clone(),
            count: snapshot.flights.len(),
            last_updated: snapshot.captured_at,
            demo_mode: snapshot.source_mode.is_demo(),
            status: snapshot.source_mode,
        }
    }

    pub fn get_flight(&self, id: &str) -> Result<FlightRecord, QueryError> {
        self.store
            .read()
            .find(id)
            .cloned()
            .ok_or_else(|| QueryError::NotFound(id.to_string()))
    }

    pub fn status(&self) -> StatusReport {
        let snapshot = self.store.read();
        let next_update_in = snapshot
            .last_live_attempt
            .map(|at| self.min_live_interval.saturating_sub(at.elapsed()).as_secs())
            .unwrap_or(0);

        StatusReport {
            demo_mode: snapshot.source_mode.is_demo(),
            next_update_in,
            flight_count: snapshot.flights.len(),
            api_interval: self.min_live_interval.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::flights::store::Snapshot;
    use chrono::Utc;
    use tokio::time::Instant;
    use tracker_common::{FlightCategory, SourceMode};

    fn record(id: &str, callsign: &str) -> FlightRecord {
        FlightRecord {
            id: id.to_string(),
            callsign: callsign.to_string(),
            origin_country: "France".to_string(),
            destination_country: None,
            longitude: 2.35,
            latitude: 48.85,
            altitude: 1000.0,
            velocity: 100.0,
            heading: 180.0,
            last_contact: None,
            is_european: true,
            category: FlightCategory::Private,
        }
    }

    fn query_with(snapshot: Snapshot) -> FlightQuery {
        let store = Arc::new(SnapshotStore::new());
        store.replace(snapshot);
        FlightQuery::new(store, &RefreshPolicy::default())
    }

    #[test]
    fn test_list_flights() {
        let captured_at = Utc::now();
        let query = query_with(Snapshot {
            flights: vec![record("b1", "F-GABC"), record("a2", "N12")],
            source_mode: SourceMode::Live,
            captured_at,
            last_live_attempt: None,
        });

        let list = query.list_flights();
        assert_eq!(list.count, 2);
        assert_eq!(list.flights[0].id, "b1");
        assert_eq!(list.flights[1].id, "a2");
        assert_eq!(list.last_updated, captured_at);
        assert!(!list.demo_mode);
        assert_eq!(list.status, SourceMode::Live);
    }

    #[test]
    fn test_get_flight() {
        let query = query_with(Snapshot {
            flights: vec![record("b1", "F-GABC")],
            source_mode: SourceMode::Demo,
            captured_at: Utc::now(),
            last_live_attempt: None,
        });

        assert_eq!(query.get_flight("b1").unwrap().callsign, "F-GABC");
        assert!(matches!(query.get_flight("zzz"), Err(QueryError::NotFound(id)) if id == "zzz"));
    }

    #[test]
    fn test_status_before_first_attempt() {
        let store = Arc::new(SnapshotStore::new());
        let status = FlightQuery::new(store, &RefreshPolicy::default()).status();
        assert_eq!(
            status,
            StatusReport {
                demo_mode: true,
                next_update_in: 0,
                flight_count: 0,
                api_interval: 60,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_counts_down() {
        let query = query_with(Snapshot {
            flights: vec![record("b1", "F-GABC")],
            source_mode: SourceMode::Live,
            captured_at: Utc::now(),
            last_live_attempt: Some(Instant::now()),
        });
        assert_eq!(query.status().next_update_in, 60);

        tokio::time::advance(Duration::from_secs(45)).await;
        let status = query.status();
        assert_eq!(status.next_update_in, 15);
        assert_eq!(status.flight_count, 1);
        assert!(!status.demo_mode);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(query.status().next_update_in, 0);
    }
}
