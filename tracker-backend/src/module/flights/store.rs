///! In-memory snapshot of the latest flight set
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tokio::time::Instant;

use tracker_common::{FlightRecord, SourceMode};

/// One published version of the flight set. Never mutated after publication.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Records in feed order
    pub flights: Vec<FlightRecord>,
    pub source_mode: SourceMode,
    pub captured_at: DateTime<Utc>,
    /// Most recent live feed attempt, `None` until the first one
    pub last_live_attempt: Option<Instant>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            flights: Vec::new(),
            source_mode: SourceMode::Demo,
            captured_at: Utc::now(),
            last_live_attempt: None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&FlightRecord> {
        self.flights.iter().find(|f| f.id == id)
    }
}

/// Single-writer, many-reader holder of the current snapshot.
///
/// Writers swap the whole `Arc`; readers clone it, so a reader always sees
/// one complete version.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    pub fn replace(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        // The lock only guards an Arc swap, so a poisoned lock still holds a whole snapshot
        let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = snapshot;
    }

    pub fn read(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_common::FlightCategory;

    fn record(id: &str) -> FlightRecord {
        FlightRecord {
            id: id.to_string(),
            callsign: "N100".to_string(),
            origin_country: "United States".to_string(),
            destination_country: None,
            longitude: 0.0,
            latitude: 0.0,
            altitude: 0.0,
            velocity: 0.0,
            heading: 0.0,
            last_contact: None,
            is_european: false,
            category: FlightCategory::Private,
        }
    }

    fn snapshot(tag: &str, len: usize, mode: SourceMode) -> Snapshot {
        Snapshot {
            flights: (0..len).map(|i| record(&format!("{}-{}", tag, i))).collect(),
            source_mode: mode,
            captured_at: Utc::now(),
            last_live_attempt: None,
        }
    }

    #[test]
    fn test_starts_empty_demo() {
        let store = SnapshotStore::new();
        let snap = store.read();
        assert!(snap.flights.is_empty());
        assert_eq!(snap.source_mode, SourceMode::Demo);
        assert!(snap.last_live_attempt.is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = SnapshotStore::new();
        store.replace(snapshot("a", 3, SourceMode::Live));
        let old = store.read();
        store.replace(snapshot("b", 1, SourceMode::Demo));
        let new = store.read();

        // Readers holding the old version keep it intact
        assert_eq!(old.flights.len(), 3);
        assert_eq!(old.source_mode, SourceMode::Live);
        assert_eq!(new.flights.len(), 1);
        assert_eq!(new.flights[0].id, "b-0");
        assert!(new.find("a-0").is_none());
    }

    #[test]
    fn test_concurrent_reads_never_mix_versions() {
        let store = Arc::new(SnapshotStore::new());
        store.replace(snapshot("v0", 50, SourceMode::Demo));

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for v in 1..200 {
                    let mode = if v % 2 == 0 { SourceMode::Demo } else { SourceMode::Live };
                    store.replace(snapshot(&format!("v{}", v), 50, mode));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = store.read();
                        assert_eq!(snap.flights.len(), 50);
                        let tag = snap.flights[0].id.split('-').next().unwrap().to_string();
                        let version: u32 = tag[1..].parse().unwrap();
                        assert!(snap.flights.iter().all(|f| f.id.starts_with(&format!("{}-", tag))));
                        let expected = if version % 2 == 0 { SourceMode::Demo } else { SourceMode::Live };
                        assert_eq!(snap.source_mode, expected);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
