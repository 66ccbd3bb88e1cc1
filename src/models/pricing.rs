use serde::Serialize;

/// Category reported for model ids that do not resolve to a pricing record
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Cost structure of one canonical model (USD per 1M tokens)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingRecord {
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
    /// Provider name, informational
    pub category: &'static str,
    /// Tokens billed per image for providers that price images separately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_token_ratio: Option<u32>,
}

impl PricingRecord {
    pub fn new(input: f64, output: f64, category: &'static str) -> Self {
        Self {
            input_price_per_million: input,
            output_price_per_million: output,
            category,
            image_token_ratio: None,
        }
    }

    pub fn with_image_ratio(mut self, ratio: u32) -> Self {
        self.image_token_ratio = Some(ratio);
        self
    }

    /// Input price for a single token
    pub fn input_price_per_token(&self) -> f64 {
        self.input_price_per_million / 1_000_000.0
    }

    /// Output price for a single token
    pub fn output_price_per_token(&self) -> f64 {
        self.output_price_per_million / 1_000_000.0
    }
}

/// Pricing and best-of-N count derived from a request-time model id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedModel {
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_token_ratio: Option<u32>,
    pub best_of_n: u32,
}

impl ResolvedModel {
    pub fn from_record(record: &PricingRecord, best_of_n: u32) -> Self {
        Self {
            input_price_per_million: record.input_price_per_million,
            output_price_per_million: record.output_price_per_million,
            category: record.category.to_string(),
            image_token_ratio: record.image_token_ratio,
            best_of_n,
        }
    }

    /// Sentinel for ids that miss the alias map or the pricing table
    pub fn unknown(best_of_n: u32) -> Self {
        Self {
            input_price_per_million: 0.0,
            output_price_per_million: 0.0,
            category: UNKNOWN_CATEGORY.to_string(),
            image_token_ratio: None,
            best_of_n,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == UNKNOWN_CATEGORY
    }
}
