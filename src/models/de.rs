//! Tolerant field decoders for upstream JSON.
//!
//! The upstream service is inconsistent about whether identifiers and
//! amounts are JSON numbers or numeric strings, so these accept both.
//! Decimals are parsed from their textual form and never pass through `f64`
//! arithmetic.

use rust_decimal::Decimal;
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

pub(crate) fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

pub(crate) fn flexible_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a string, number or null, got {}",
            other
        ))),
    }
}

pub(crate) fn flexible_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => parse_decimal(&s).map_err(de::Error::custom),
        Value::Number(n) => parse_decimal(&n.to_string()).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a decimal number, got {}",
            other
        ))),
    }
}

pub(crate) fn flexible_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_decimal(&s).map(Some).map_err(de::Error::custom),
        Value::Number(n) => parse_decimal(&n.to_string()).map(Some).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a decimal number or null, got {}",
            other
        ))),
    }
}

/// Parse plain (`12.50`) or scientific (`1.5e3`) decimal text.
pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| format!("'{}' is not a decimal number: {}", raw, e))
}
