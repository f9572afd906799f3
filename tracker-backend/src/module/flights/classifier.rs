///! Callsign classification
use tracker_common::{FlightCategory, UNKNOWN};

pub const MILITARY_PREFIXES: [&str; 6] = ["AF", "NAVY", "ARMY", "MARINE", "CG", "PAT"];
pub const PRIVATE_PREFIXES: [&str; 7] = ["N", "G", "D", "F", "HB", "VP", "C"];

/// Callsigns this short are treated as general aviation
const SHORT_CALLSIGN_MAX_LEN: usize = 5;

/// Decide whether a callsign belongs to a military or private aircraft.
///
/// Rules are checked in order and the first match wins:
/// 1. empty or placeholder callsign: `None`
/// 2. military prefix: `Military`
/// 3. private prefix: `Private`
/// 4. at most 5 characters: `Private`
/// 5. anything else: `None`
pub fn classify(callsign: &str) -> Option<FlightCategory> {
    let callsign = callsign.trim();
    if callsign.is_empty() || callsign == UNKNOWN {
        return None;
    }

    if MILITARY_PREFIXES.iter().any(|p| callsign.starts_with(p)) {
        return Some(FlightCategory::Military);
    }

    if PRIVATE_PREFIXES.iter().any(|p| callsign.starts_with(p)) {
        return Some(FlightCategory::Private);
    }

    if callsign.chars().count() <= SHORT_CALLSIGN_MAX_LEN {
        return Some(FlightCategory::Private);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_military_prefixes() {
        for callsign in ["AF101", "NAVY42", "ARMY7734", "MARINE1", "CG2001", "PAT95123"] {
            assert_eq!(classify(callsign), Some(FlightCategory::Military), "{}", callsign);
        }
    }

    #[test]
    fn test_private_prefixes() {
        for callsign in ["N12345X", "GABCDEF", "DLH400X", "FHBXYZ1", "HB-JNA", "VPCAB12", "CFJKL99"] {
            assert_eq!(classify(callsign), Some(FlightCategory::Private), "{}", callsign);
        }
    }

    #[test]
    fn test_military_wins_over_private() {
        // "CG" would otherwise match the private "C"
        assert_eq!(classify("CG1234"), Some(FlightCategory::Military));
    }

    #[test]
    fn test_empty_and_placeholder() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify(UNKNOWN), None);
    }

    #[test]
    fn test_short_callsign_boundary() {
        assert_eq!(classify("LH400"), Some(FlightCategory::Private));
        assert_eq!(classify("LH4001"), None);
        assert_eq!(classify("UAL1"), Some(FlightCategory::Private));
    }

    #[test]
    fn test_commercial_callsigns_rejected() {
        assert_eq!(classify("BAW123"), None);
        assert_eq!(classify("UAL2204"), None);
        assert_eq!(classify("KLM1023"), None);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(classify("NAVY42 "), Some(FlightCategory::Military));
        assert_eq!(classify(" LH4001 "), None);
    }
}
