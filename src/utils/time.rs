use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Timestamp-derived id that is strictly greater than `last`.
pub fn next_timestamp_id(last: Option<i64>) -> i64 {
    let candidate = now_millis();
    match last {
        Some(last) if candidate <= last => last + 1,
        _ => candidate,
    }
}

/// String flavour of [`next_timestamp_id`] used for quiz and question ids.
pub fn next_string_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let last = existing.into_iter().filter_map(|id| id.parse::<i64>().ok()).max();
    next_timestamp_id(last).to_string()
}

/// RFC 3339, or an offset-less ISO 8601 timestamp taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `deserialize_with` helper for optional timestamps written by other
/// systems. Values that are not a readable timestamp come back as `None`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(JsonValue::as_str).and_then(parse_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_never_go_backwards() {
        let far_future = now_millis() + 60_000;
        assert_eq!(next_timestamp_id(Some(far_future)), far_future + 1);
        assert!(next_timestamp_id(None) > 0);
    }

    #[test]
    fn string_ids_skip_non_numeric() {
        let far_future = (now_millis() + 60_000).to_string();
        let id = next_string_id(["personal", far_future.as_str()]);
        assert_eq!(id.parse::<i64>().unwrap(), far_future.parse::<i64>().unwrap() + 1);
    }

    #[test]
    fn timestamps_with_and_without_offset() {
        let with_offset = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        let naive = parse_timestamp("2024-05-01T10:00:00").unwrap();
        assert_eq!(with_offset, naive);

        let fractional = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(fractional.timestamp_subsec_micros(), 123456);
        assert!(parse_timestamp("2024-05-01 10:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
