use serde::{Deserialize, Deserializer, Serialize};

/// One row of the analytics endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Empty when the row carries no timestamp; such rows are skipped by aggregation
    #[serde(alias = "timestamp", default, deserialize_with = "null_as_default")]
    pub time_bucket: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub input_tokens: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub output_tokens: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub reasoning_tokens: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub call_count: i64,
}

impl UsageRecord {
    /// Create a new usage record
    pub fn new(
        time_bucket: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        input_tokens: i64,
        output_tokens: i64,
        reasoning_tokens: i64,
    ) -> Self {
        Self {
            time_bucket: time_bucket.into(),
            model: Some(model.into()),
            api_key: Some(api_key.into()),
            input_tokens,
            output_tokens,
            reasoning_tokens,
            call_count: 0,
        }
    }

    /// Set the number of calls this row represents
    pub fn with_call_count(mut self, call_count: i64) -> Self {
        self.call_count = call_count;
        self
    }

    /// Model name, `None` when missing or empty
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }

    /// API key, `None` when missing or empty
    pub fn api_key_value(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Token counters arrive as JSON numbers that may be `null` or floats
///
/// Counters are whole tokens, so fractional values are truncated (`4.9` reads
/// as 4). Values beyond the `i64` range clamp to its bounds.
fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .unwrap_or(0))
}

/// `null` reads as the type's default instead of failing the whole payload
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
