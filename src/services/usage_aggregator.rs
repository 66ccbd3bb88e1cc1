// Usage aggregation
//
// Buckets raw usage records by UTC day / week (Sunday start) / month and sums
// token counters per bucket, optionally split by model or API key.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{AggregationBucket, BucketData, Granularity, GroupBy, TokenSums, UsageRecord};

/// Group value used when a record has no model / API key
pub const UNKNOWN_GROUP: &str = "unknown";

/// Parse a usage timestamp as UTC
///
/// Accepts RFC 3339, naive ISO date-times (taken as UTC), `YYYY-MM-DD`,
/// `YYYY-MM` and RFC 2822. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Month-only keys such as "2024-03"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }

    None
}

/// Bucket key for a UTC instant
///
/// Keys are zero-padded so lexicographic order equals chronological order.
pub fn bucket_key(timestamp: &DateTime<Utc>, granularity: Granularity) -> String {
    let date = timestamp.date_naive();
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => {
            let offset = date.weekday().num_days_from_sunday() as i64;
            let week_start = date - Duration::days(offset);
            week_start.format("%Y-%m-%d").to_string()
        }
        Granularity::Monthly => date.format("%Y-%m").to_string(),
    }
}

fn group_key(record: &UsageRecord, group_by: GroupBy) -> &str {
    let value = match group_by {
        GroupBy::Model => record.model_name(),
        GroupBy::ApiKey => record.api_key_value(),
        GroupBy::TokenType => None,
    };
    value.unwrap_or(UNKNOWN_GROUP)
}

fn record_sums(record: &UsageRecord) -> TokenSums {
    TokenSums {
        input_tokens: record.input_tokens,
        output_tokens: record.output_tokens,
        reasoning_tokens: record.reasoning_tokens,
        call_count: record.call_count,
    }
}

/// Aggregate usage records into time buckets sorted by ascending key
///
/// Records whose timestamp cannot be parsed are skipped.
pub fn aggregate(
    records: &[UsageRecord],
    granularity: Granularity,
    group_by: GroupBy,
) -> Vec<AggregationBucket> {
    let mut buckets: BTreeMap<String, BucketData> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(timestamp) = parse_timestamp(&record.time_bucket) else {
            debug!(
                "Skipping usage record with unparseable timestamp: {:?}",
                record.time_bucket
            );
            skipped += 1;
            continue;
        };

        let key = bucket_key(&timestamp, granularity);
        let sums = record_sums(record);

        match group_by {
            GroupBy::TokenType => {
                let entry = buckets
                    .entry(key)
                    .or_insert_with(|| BucketData::TokenTypes(TokenSums::default()));
                if let BucketData::TokenTypes(totals) = entry {
                    totals.add(&sums);
                }
            }
            GroupBy::Model | GroupBy::ApiKey => {
                let entry = buckets
                    .entry(key)
                    .or_insert_with(|| BucketData::Groups(BTreeMap::new()));
                if let BucketData::Groups(groups) = entry {
                    groups
                        .entry(group_key(record, group_by).to_string())
                        .or_default()
                        .add(&sums);
                }
            }
        }
    }

    debug!(
        "📊 Aggregated {} records into {} {} buckets by {} ({} skipped)",
        records.len() - skipped,
        buckets.len(),
        granularity,
        group_by,
        skipped
    );

    buckets
        .into_iter()
        .map(|(time_bucket, data)| AggregationBucket { time_bucket, data })
        .collect()
}
