// Module name shadows the `serde` crate — use `::serde` for the external crate.
use ::serde::{Deserialize, Deserializer, Serializer};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Format a `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn format_rfc3339_ms(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&format_rfc3339_ms(*dt))
}

/// Serialize `Option<DateTime<Utc>>` as RFC 3339 ms or `null`.
pub fn to_rfc3339_ms_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_some(&format_rfc3339_ms(*dt)),
        None => s.serialize_none(),
    }
}

/// Deserializer helper for PATCH bodies: distinguishes an absent field from
/// an explicit `null`.
///
/// Apply as `#[serde(default, deserialize_with = "patch_field")]` on an
/// `Option<Option<T>>` field — missing deserializes to `None` (leave
/// unchanged), `null` to `Some(None)` (clear), a value to `Some(Some(v))`.
pub fn patch_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Error produced when a date-time input matches none of the accepted formats.
#[derive(Debug, thiserror::Error)]
#[error(
    "unparseable date-time {0:?}; supported formats: ISO-8601 (with/without offset), \
     yyyy-MM-dd, epoch millis/seconds"
)]
pub struct UnparseableInstant(pub String);

/// Parse a JSON value into an instant, accepting the formats the HTTP API
/// documents:
///
/// - strict ISO-8601 with zone (`2025-09-06T23:59:59Z`)
/// - ISO-8601 with offset (`2025-09-06T23:59:59-03:00`)
/// - ISO-8601 local date-time, assumed UTC (`2025-09-06T23:59:59`)
/// - plain date, start of day UTC (`2025-09-06`)
/// - integer epoch milliseconds
/// - 10-digit numeric string, treated as epoch seconds
///
/// `null` and blank strings parse to `None`.
pub fn parse_flexible_instant(
    value: &serde_json::Value,
) -> Result<Option<DateTime<Utc>>, UnparseableInstant> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| UnparseableInstant(n.to_string()))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .map(Some)
                .ok_or_else(|| UnparseableInstant(n.to_string()))
        }
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_instant_str(trimmed)
                .map(Some)
                .ok_or_else(|| UnparseableInstant(trimmed.to_owned()))
        }
        other => Err(UnparseableInstant(other.to_string())),
    }
}

fn parse_instant_str(s: &str) -> Option<DateTime<Utc>> {
    // RFC 3339 covers both the strict-Z and the offset forms.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    // 10-digit numeric strings are epoch seconds.
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.len() == 10 && digits.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = s.parse().ok()?;
        return DateTime::<Utc>::from_timestamp(secs, 0);
    }
    None
}
