//! Lenient deserializers for scalar fields.
//!
//! Multipart forms and query strings carry every value as text, while JSON
//! bodies carry native booleans and numbers. These helpers accept both so a
//! single DTO serves all three transports.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw<T> {
    Native(T),
    Text(String),
}

pub fn option_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Raw<bool>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Native(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "on" => Ok(Some(true)),
            "false" | "0" | "off" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("expected a boolean, got `{other}`"))),
        },
    }
}

pub fn option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Raw<i64>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Native(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an integer, got `{text}`")))
        }
    }
}

pub fn option_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match option_i64(deserializer)? {
        None => Ok(None),
        Some(value) => u64::try_from(value)
            .map(Some)
            .map_err(|_| D::Error::custom("expected a non-negative integer")),
    }
}

/// Trimmed text; empty or whitespace-only values count as absent.
pub fn option_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
