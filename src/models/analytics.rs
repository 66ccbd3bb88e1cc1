// Analytics data model
//
// Bucketing parameters and the aggregated shapes fed to charts and tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Time unit used to bucket usage records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

/// Dimension usage records are grouped by inside each bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Model,
    ApiKey,
    TokenType,
}

/// Whether values are expressed as raw token counts or estimated cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Tokens,
    Cost,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::ApiKey => "api_key",
            Self::TokenType => "token_type",
        }
    }

    /// Column heading for the grouping value
    pub fn label(&self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::ApiKey => "API Key",
            Self::TokenType => "Token Type",
        }
    }
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Cost => "cost",
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "model" => Ok(Self::Model),
            "api_key" => Ok(Self::ApiKey),
            "token_type" => Ok(Self::TokenType),
            other => Err(format!("unknown group_by: {}", other)),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tokens" => Ok(Self::Tokens),
            "cost" => Ok(Self::Cost),
            other => Err(format!("unknown dimension: {}", other)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running token sums for one bucket or one group inside a bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSums {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub reasoning_tokens: i64,
    pub call_count: i64,
}

impl TokenSums {
    /// Accumulate `other`; counters saturate instead of overflowing
    pub fn add(&mut self, other: &TokenSums) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.reasoning_tokens = self.reasoning_tokens.saturating_add(other.reasoning_tokens);
        self.call_count = self.call_count.saturating_add(other.call_count);
    }

    pub fn total_tokens(&self) -> i64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.reasoning_tokens)
    }
}

/// Per-bucket payload; shape depends on the grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BucketData {
    /// `GroupBy::TokenType`: one set of totals for the whole bucket
    TokenTypes(TokenSums),
    /// `GroupBy::Model` / `GroupBy::ApiKey`: totals per group value
    Groups(BTreeMap<String, TokenSums>),
}

impl BucketData {
    /// Sum of everything in the bucket regardless of grouping
    pub fn totals(&self) -> TokenSums {
        match self {
            Self::TokenTypes(sums) => *sums,
            Self::Groups(groups) => {
                let mut total = TokenSums::default();
                for sums in groups.values() {
                    total.add(sums);
                }
                total
            }
        }
    }
}

/// One time bucket of aggregated usage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationBucket {
    /// `YYYY-MM-DD` (daily, weekly week start) or `YYYY-MM` (monthly)
    pub time_bucket: String,
    pub data: BucketData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        for g in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
        assert_eq!("api_key".parse::<GroupBy>().unwrap(), GroupBy::ApiKey);
        assert_eq!("cost".parse::<Dimension>().unwrap(), Dimension::Cost);
        assert!("hourly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&GroupBy::TokenType).unwrap();
        assert_eq!(json, "\"token_type\"");

        let parsed: GroupBy = serde_json::from_str("\"api_key\"").unwrap();
        assert_eq!(parsed, GroupBy::ApiKey);
    }

    #[test]
    fn test_bucket_totals_across_groups() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "gpt-4o".to_string(),
            TokenSums {
                input_tokens: 10,
                output_tokens: 5,
                reasoning_tokens: 1,
                call_count: 1,
            },
        );
        groups.insert(
            "o3".to_string(),
            TokenSums {
                input_tokens: 3,
                output_tokens: 2,
                reasoning_tokens: 4,
                call_count: 2,
            },
        );

        let totals = BucketData::Groups(groups).totals();
        assert_eq!(totals.input_tokens, 13);
        assert_eq!(totals.output_tokens, 7);
        assert_eq!(totals.reasoning_tokens, 5);
        assert_eq!(totals.call_count, 3);
        assert_eq!(totals.total_tokens(), 25);
    }

    #[test]
    fn test_sums_saturate_at_max() {
        let huge = TokenSums {
            input_tokens: i64::MAX,
            output_tokens: i64::MAX,
            reasoning_tokens: 1,
            call_count: i64::MAX,
        };

        let mut total = huge;
        total.add(&huge);

        assert_eq!(total.input_tokens, i64::MAX);
        assert_eq!(total.call_count, i64::MAX);
        assert_eq!(total.reasoning_tokens, 2);
        assert_eq!(total.total_tokens(), i64::MAX);
    }
}
