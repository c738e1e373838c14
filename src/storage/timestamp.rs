//! Timestamps inside stored documents.
//!
//! Documents hold epoch milliseconds. Older writers stored RFC 3339 strings
//! such as `2024-03-01T18:30:00.000Z`; those are read and converted.
use chrono::DateTime;
use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(u64),
    Text(String),
}

/// Deserialize a timestamp written either as epoch milliseconds or as an
/// RFC 3339 string.
pub(crate) fn deserialize_epoch_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => Ok(ms),
        RawTimestamp::Text(text) => {
            let parsed = DateTime::parse_from_rfc3339(&text).map_err(de::Error::custom)?;
            u64::try_from(parsed.timestamp_millis())
                .map_err(|_| de::Error::custom(format!("timestamp before 1970: {text}")))
        }
    }
}
