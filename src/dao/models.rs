//! String codecs for the values persisted in the key-value store, plus the
//! write descriptors produced by the engine.

use serde_json::Value;
use thiserror::Error;

/// Pending mutation of the key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    /// Store `value` under `key`, replacing any previous value.
    Set {
        /// Target key.
        key: String,
        /// Serialized value.
        value: String,
    },
    /// Delete `key`.
    Remove {
        /// Target key.
        key: String,
    },
}

impl KvWrite {
    /// Build a [`KvWrite::Set`].
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvWrite::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a [`KvWrite::Remove`].
    pub fn remove(key: impl Into<String>) -> Self {
        KvWrite::Remove { key: key.into() }
    }

    /// Key touched by this write.
    pub fn key(&self) -> &str {
        match self {
            KvWrite::Set { key, .. } | KvWrite::Remove { key } => key,
        }
    }
}

/// Raised when a persisted value does not parse.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Expected a decimal number.
    #[error("invalid number `{0}`")]
    Number(String),
    /// Expected `true` or `false`.
    #[error("invalid flag `{0}`")]
    Flag(String),
    /// Expected a JSON document.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seconds rendered with a single fractional digit.
pub fn encode_seconds(seconds: f64) -> String {
    format!("{seconds:.1}")
}

/// Parse a decimal seconds value.
pub fn decode_seconds(raw: &str) -> Result<f64, DecodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| DecodeError::Number(raw.to_string()))
}

/// JSON array of seconds.
pub fn encode_times(times: &[f64]) -> String {
    Value::from(times.to_vec()).to_string()
}

/// Parse a JSON array of seconds, rejecting negative or non-finite entries.
pub fn decode_times(raw: &str) -> Result<Vec<f64>, DecodeError> {
    let times: Vec<f64> = serde_json::from_str(raw)?;
    if let Some(bad) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
        return Err(DecodeError::Number(bad.to_string()));
    }
    Ok(times)
}

/// JSON array of identifiers.
pub fn encode_identifiers<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    Value::from(ids.into_iter().map(str::to_string).collect::<Vec<_>>()).to_string()
}

/// Parse a JSON array of identifiers.
pub fn decode_identifiers(raw: &str) -> Result<Vec<String>, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Non-negative integer counter.
pub fn encode_count(count: u32) -> String {
    count.to_string()
}

/// Parse a non-negative integer counter.
pub fn decode_count(raw: &str) -> Result<u32, DecodeError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| DecodeError::Number(raw.to_string()))
}

/// Boolean flag as `"true"`/`"false"`.
pub fn encode_flag(flag: bool) -> String {
    if flag { "true" } else { "false" }.to_string()
}

/// Parse a boolean flag.
pub fn decode_flag(raw: &str) -> Result<bool, DecodeError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DecodeError::Flag(other.to_string())),
    }
}
