///! Synthetic flight data used while the live feed is unavailable
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

use tracker_common::{FlightCategory, FlightRecord, is_european_country};

use super::classifier::{MILITARY_PREFIXES, PRIVATE_PREFIXES};

/// Reference city used to place demo aircraft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const CITIES: [City; 10] = [
    City { name: "New York", country: "United States", lat: 40.7128, lon: -74.0060 },
    City { name: "London", country: "United Kingdom", lat: 51.5074, lon: -0.1278 },
    City { name: "Tokyo", country: "Japan", lat: 35.6762, lon: 139.6503 },
    City { name: "Paris", country: "France", lat: 48.8566, lon: 2.3522 },
    City { name: "Sydney", country: "Australia", lat: -33.8688, lon: 151.2093 },
    City { name: "Dubai", country: "UAE", lat: 25.2048, lon: 55.2708 },
    City { name: "Singapore", country: "Singapore", lat: 1.3521, lon: 103.8198 },
    City { name: "Los Angeles", country: "United States", lat: 34.0522, lon: -118.2437 },
    City { name: "Frankfurt", country: "Germany", lat: 50.1109, lon: 8.6821 },
    City { name: "Hong Kong", country: "China", lat: 22.3193, lon: 114.1694 },
];

/// Max distance in degrees between a demo aircraft and its origin city
const POSITION_JITTER_DEG: f64 = 2.0;

/// Demo flight generator.
///
/// Owns its own RNG so tests can seed it and get the same flights every run.
pub struct DemoGenerator {
    rng: Mutex<ChaCha8Rng>,
}

impl DemoGenerator {
    /// Seeded generator, or entropy-seeded when `seed` is `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn generate(&self, count: usize) -> Vec<FlightRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        (0..count).map(|i| demo_flight(&mut *rng, i)).collect()
    }
}

impl Default for DemoGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for DemoGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoGenerator")
            .field("rng", &"<Mutex<ChaCha8Rng>>")
            .finish()
    }
}

fn demo_flight<R: Rng>(rng: &mut R, index: usize) -> FlightRecord {
    let origin_idx = rng.gen_range(0..CITIES.len());
    // Shift by 1..len so the destination never equals the origin
    let dest_idx = (origin_idx + rng.gen_range(1..CITIES.len())) % CITIES.len();
    let origin = &CITIES[origin_idx];
    let destination = &CITIES[dest_idx];

    let (category, prefixes): (FlightCategory, &[&str]) = if rng.gen_bool(0.5) {
        (FlightCategory::Military, &MILITARY_PREFIXES[..])
    } else {
        (FlightCategory::Private, &PRIVATE_PREFIXES[..])
    };
    let prefix = prefixes.choose(rng).copied().unwrap_or("N");

    FlightRecord {
        id: format!("demo{:03}", index),
        callsign: format!("{}{}", prefix, rng.gen_range(10..=999_u32)),
        origin_country: origin.country.to_string(),
        destination_country: Some(destination.country.to_string()),
        longitude: origin.lon + rng.gen_range(-POSITION_JITTER_DEG..=POSITION_JITTER_DEG),
        latitude: origin.lat + rng.gen_range(-POSITION_JITTER_DEG..=POSITION_JITTER_DEG),
        altitude: rng.gen_range(8000..=12000_u32) as f64,
        velocity: rng.gen_range(200..=300_u32) as f64,
        heading: rng.gen_range(0..=359_u32) as f64,
        last_contact: Some(Utc::now()),
        is_european: is_european_country(origin.country),
        category,
    }
}
