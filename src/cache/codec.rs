//! Entry Codec Module
//!
//! Serializes a value together with its absolute expiration into the bytes
//! handed to the store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A stored value and the instant it stops being served.
///
/// The expiration is serialized as an RFC 3339 UTC timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored payload (a string or JSON scalar)
    pub value: Value,
    /// Absolute expiration time
    pub expiration: DateTime<Utc>,
}

/// Longest lifetime an entry can be given; longer requests are clamped so the
/// encoded timestamp always parses back.
pub const MAX_LIFETIME_SECS: u64 = 100 * 365 * 24 * 60 * 60;

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry expiring `duration_seconds` after `now`.
    pub fn new(value: Value, now: DateTime<Utc>, duration_seconds: u64) -> Self {
        let expiration = i64::try_from(duration_seconds.min(MAX_LIFETIME_SECS))
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { value, expiration }
    }

    // == Is Expired ==
    /// True once `now` is strictly past the expiration.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }
}

// == Encode ==
/// Encodes an entry into store bytes.
pub fn encode(entry: &CacheEntry) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(entry)
}

// == Decode ==
/// Decodes store bytes back into an entry.
pub fn decode(bytes: &[u8]) -> serde_json::Result<CacheEntry> {
    serde_json::from_slice(bytes)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_expiration_is_now_plus_duration() {
        let entry = CacheEntry::new(json!("Angga"), fixed_now(), 10);
        assert_eq!(entry.expiration, fixed_now() + Duration::seconds(10));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(json!("v"), fixed_now(), 1);

        assert!(!entry.is_expired_at(fixed_now()));
        assert!(!entry.is_expired_at(entry.expiration), "not expired exactly at the boundary");
        assert!(entry.is_expired_at(entry.expiration + Duration::milliseconds(1)));
    }

    #[test]
    fn test_huge_duration_is_clamped_and_decodable() {
        let entry = CacheEntry::new(json!("v"), fixed_now(), u64::MAX);

        assert_eq!(
            entry.expiration,
            fixed_now() + Duration::seconds(MAX_LIFETIME_SECS as i64)
        );
        assert_eq!(decode(&encode(&entry).unwrap()).unwrap(), entry);
    }

    #[test]
    fn test_encoded_form_uses_utc_timestamp() {
        let entry = CacheEntry::new(json!("Angga"), fixed_now(), 10);
        let bytes = encode(&entry).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            r#"{"value":"Angga","expiration":"2024-05-01T12:00:10Z"}"#
        );
    }

    #[test]
    fn test_round_trip_preserves_scalars_and_subsecond_time() {
        let now = Utc::now();
        for value in [json!("text"), json!(42), json!(1.5), json!(true), json!(null)] {
            let entry = CacheEntry::new(value, now, 30);
            let decoded = decode(&encode(&entry).unwrap()).unwrap();
            assert_eq!(decoded, entry);
        }
    }

    #[test]
    fn test_round_trip_keeps_every_float_digit() {
        let now = Utc::now();
        let floats = [
            8.602436464102345e49,
            0.1 + 0.2,
            f64::MAX,
            f64::MIN_POSITIVE,
            -2.2250738585072014e-308,
        ];
        for f in floats {
            let entry = CacheEntry::new(json!(f), now, 30);
            let decoded = decode(&encode(&entry).unwrap()).unwrap();
            assert_eq!(decoded.value.as_f64(), Some(f));
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"not json").is_err());
        assert!(decode(br#"{"value":"v"}"#).is_err(), "expiration is mandatory");
        assert!(decode(br#"{"value":"v","expiration":"yesterday"}"#).is_err());
    }
}
