// Usage report views
//
// Chart series, pie slices and table rows derived from aggregated buckets,
// plus a plain-text table renderer for the report binary.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    AggregationBucket, BucketData, Dimension, Granularity, GroupBy, TokenSums, UsageRecord,
};
use crate::services::usage_aggregator::aggregate;
use crate::utils::cost_calculator::{CostBreakdown, CostCalculator};

/// Suffix of per-group chart series keys
pub const SERIES_SUFFIX: &str = "_total";

const TOKEN_TYPE_SERIES: [&str; 3] = ["input_tokens", "output_tokens", "reasoning_tokens"];

/// One x-axis point of a bar/line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub time_bucket: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// One pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: f64,
}

/// One row of the detailed table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub time_bucket: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(flatten)]
    pub sums: TokenSums,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs: Option<CostBreakdown>,
}

/// Every view of one aggregation, as printed by the report binary
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub granularity: Granularity,
    pub group_by: GroupBy,
    pub dimension: Dimension,
    pub buckets: Vec<AggregationBucket>,
    pub chart: Vec<ChartRow>,
    pub totals: Vec<Slice>,
    pub rows: Vec<TableRow>,
}

impl UsageReport {
    pub fn build(
        records: &[UsageRecord],
        granularity: Granularity,
        group_by: GroupBy,
        dimension: Dimension,
        calc: &CostCalculator,
    ) -> Self {
        let buckets = aggregate(records, granularity, group_by);
        let chart = chart_rows(&buckets, group_by, dimension, calc);
        let totals = group_totals(&buckets, group_by, dimension, calc);
        let rows = table_rows(&buckets, granularity, group_by, dimension, calc);

        Self {
            granularity,
            group_by,
            dimension,
            buckets,
            chart,
            totals,
            rows,
        }
    }

    /// Plain-text table of the detailed rows
    pub fn to_table(&self) -> String {
        render_table(&self.rows, self.group_by, self.dimension)
    }
}

/// Model to price a group against: only model groups carry one
fn pricing_model<'a>(group_by: GroupBy, group: &'a str) -> Option<&'a str> {
    match group_by {
        GroupBy::Model => Some(group),
        GroupBy::ApiKey | GroupBy::TokenType => None,
    }
}

fn token_type_values(sums: &TokenSums, dimension: Dimension, calc: &CostCalculator) -> [f64; 3] {
    match dimension {
        Dimension::Tokens => [
            sums.input_tokens as f64,
            sums.output_tokens as f64,
            sums.reasoning_tokens as f64,
        ],
        Dimension::Cost => [
            calc.fallback_cost(sums.input_tokens, true),
            calc.fallback_cost(sums.output_tokens, false),
            calc.fallback_cost(sums.reasoning_tokens, false),
        ],
    }
}

/// Every group value seen in any bucket, sorted
pub fn all_groups(buckets: &[AggregationBucket]) -> Vec<String> {
    let mut groups = BTreeSet::new();
    for bucket in buckets {
        if let BucketData::Groups(map) = &bucket.data {
            groups.extend(map.keys().cloned());
        }
    }
    groups.into_iter().collect()
}

/// Chart series per bucket
///
/// Grouped buckets get one `<group>_total` value for every group seen in any
/// bucket, zero where the group is absent.
pub fn chart_rows(
    buckets: &[AggregationBucket],
    group_by: GroupBy,
    dimension: Dimension,
    calc: &CostCalculator,
) -> Vec<ChartRow> {
    let groups = all_groups(buckets);
    let empty = TokenSums::default();

    buckets
        .iter()
        .map(|bucket| {
            let mut values = BTreeMap::new();
            match &bucket.data {
                BucketData::TokenTypes(sums) => {
                    let series = token_type_values(sums, dimension, calc);
                    for (name, value) in TOKEN_TYPE_SERIES.iter().zip(series) {
                        values.insert(name.to_string(), value);
                    }
                }
                BucketData::Groups(map) => {
                    for group in &groups {
                        let sums = map.get(group).unwrap_or(&empty);
                        let value =
                            calc.value_of(sums, dimension, pricing_model(group_by, group));
                        values.insert(format!("{}{}", group, SERIES_SUFFIX), value);
                    }
                }
            }
            ChartRow {
                time_bucket: bucket.time_bucket.clone(),
                values,
            }
        })
        .collect()
}

/// Totals over the whole range, one slice per token type or group
pub fn group_totals(
    buckets: &[AggregationBucket],
    group_by: GroupBy,
    dimension: Dimension,
    calc: &CostCalculator,
) -> Vec<Slice> {
    if group_by == GroupBy::TokenType {
        let mut total = TokenSums::default();
        for bucket in buckets {
            total.add(&bucket.data.totals());
        }
        let values = token_type_values(&total, dimension, calc);
        return ["Input Tokens", "Output Tokens", "Reasoning Tokens"]
            .iter()
            .zip(values)
            .map(|(name, value)| Slice {
                name: name.to_string(),
                value,
            })
            .collect();
    }

    let mut totals: BTreeMap<&str, TokenSums> = BTreeMap::new();
    for bucket in buckets {
        if let BucketData::Groups(map) = &bucket.data {
            for (group, sums) in map {
                totals.entry(group.as_str()).or_default().add(sums);
            }
        }
    }

    totals
        .into_iter()
        .map(|(group, sums)| Slice {
            name: group.to_string(),
            value: calc.value_of(&sums, dimension, pricing_model(group_by, group)),
        })
        .collect()
}

/// Detailed table rows, one per bucket or per bucket and group
pub fn table_rows(
    buckets: &[AggregationBucket],
    granularity: Granularity,
    group_by: GroupBy,
    dimension: Dimension,
    calc: &CostCalculator,
) -> Vec<TableRow> {
    let costs_for = |sums: &TokenSums, model: Option<&str>| match dimension {
        Dimension::Cost => Some(calc.cost_breakdown(sums, model)),
        Dimension::Tokens => None,
    };

    let mut rows = Vec::new();
    for bucket in buckets {
        let label = format_bucket_label(&bucket.time_bucket, granularity);
        match &bucket.data {
            BucketData::TokenTypes(sums) => rows.push(TableRow {
                time_bucket: bucket.time_bucket.clone(),
                label,
                group: None,
                sums: *sums,
                costs: costs_for(sums, None),
            }),
            BucketData::Groups(map) => {
                for (group, sums) in map {
                    rows.push(TableRow {
                        time_bucket: bucket.time_bucket.clone(),
                        label: label.clone(),
                        group: Some(group.clone()),
                        sums: *sums,
                        costs: costs_for(sums, pricing_model(group_by, group)),
                    });
                }
            }
        }
    }
    rows
}

/// Human-readable bucket label; keys that do not parse come back unchanged
pub fn format_bucket_label(key: &str, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|_| key.to_string()),
        Granularity::Weekly => NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|d| format!("{} (Week Start)", d.format("%b %-d, %Y")))
            .unwrap_or_else(|_| key.to_string()),
        Granularity::Monthly => NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|_| key.to_string()),
    }
}

/// Integer with thousands separators
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render table rows as aligned plain text
pub fn render_table(rows: &[TableRow], group_by: GroupBy, dimension: Dimension) -> String {
    if rows.is_empty() {
        return "No data to display\n".to_string();
    }

    let grouped = group_by != GroupBy::TokenType;

    let mut header: Vec<String> = vec!["Time Bucket".to_string()];
    if grouped {
        header.push(group_by.label().to_string());
    }
    header.extend(
        ["Input Tokens", "Output Tokens", "Reasoning Tokens", "Call Count"]
            .iter()
            .map(|s| s.to_string()),
    );
    if dimension == Dimension::Cost {
        header.extend(
            ["Input Cost", "Output Cost", "Reasoning Cost", "Total Cost"]
                .iter()
                .map(|s| s.to_string()),
        );
    }

    let mut lines: Vec<Vec<String>> = vec![header];
    for row in rows {
        let mut cells = vec![row.label.clone()];
        if grouped {
            cells.push(row.group.clone().unwrap_or_default());
        }
        cells.push(format_count(row.sums.input_tokens));
        cells.push(format_count(row.sums.output_tokens));
        cells.push(format_count(row.sums.reasoning_tokens));
        cells.push(format_count(row.sums.call_count));
        if dimension == Dimension::Cost {
            let costs = row.costs.unwrap_or_default();
            for value in [costs.input, costs.output, costs.reasoning, costs.total] {
                cells.push(format!("${:.6}", value));
            }
        }
        lines.push(cells);
    }

    let columns = lines[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            lines
                .iter()
                .map(|cells| cells[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (index, cells) in lines.iter().enumerate() {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');

        if index == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(input: i64, output: i64, reasoning: i64, calls: i64) -> TokenSums {
        TokenSums {
            input_tokens: input,
            output_tokens: output,
            reasoning_tokens: reasoning,
            call_count: calls,
        }
    }

    fn grouped_buckets() -> Vec<AggregationBucket> {
        let mut first = BTreeMap::new();
        first.insert("gpt-4o".to_string(), sums(1_000_000, 0, 0, 2));
        first.insert("o3".to_string(), sums(10, 10, 10, 1));

        let mut second = BTreeMap::new();
        second.insert("gpt-4o".to_string(), sums(5, 5, 5, 1));

        vec![
            AggregationBucket {
                time_bucket: "2024-03-01".to_string(),
                data: BucketData::Groups(first),
            },
            AggregationBucket {
                time_bucket: "2024-03-02".to_string(),
                data: BucketData::Groups(second),
            },
        ]
    }

    #[test]
    fn test_chart_rows_fill_missing_groups_with_zero() {
        let calc = CostCalculator::default();
        let rows = chart_rows(&grouped_buckets(), GroupBy::Model, Dimension::Tokens, &calc);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values["gpt-4o_total"], 1_000_000.0);
        assert_eq!(rows[0].values["o3_total"], 30.0);
        assert_eq!(rows[1].values["gpt-4o_total"], 15.0);
        assert_eq!(rows[1].values["o3_total"], 0.0);
    }

    #[test]
    fn test_chart_rows_cost_by_model_uses_model_prices() {
        let calc = CostCalculator::default();
        let rows = chart_rows(&grouped_buckets(), GroupBy::Model, Dimension::Cost, &calc);
        // 1M input tokens of gpt-4o at $2.5/M
        assert!((rows[0].values["gpt-4o_total"] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_chart_rows_cost_by_api_key_uses_fallback() {
        let calc = CostCalculator::default();
        let rows = chart_rows(&grouped_buckets(), GroupBy::ApiKey, Dimension::Cost, &calc);
        // 1M input tokens at the $1/M fallback
        assert!((rows[0].values["gpt-4o_total"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chart_rows_serialize_flat() {
        let calc = CostCalculator::default();
        let rows = chart_rows(&grouped_buckets(), GroupBy::Model, Dimension::Tokens, &calc);
        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["time_bucket"], "2024-03-02");
        assert_eq!(json["gpt-4o_total"], 15.0);
    }

    #[test]
    fn test_token_type_chart_and_pie() {
        let buckets = vec![
            AggregationBucket {
                time_bucket: "2024-03".to_string(),
                data: BucketData::TokenTypes(sums(1_000_000, 1_000_000, 500_000, 3)),
            },
            AggregationBucket {
                time_bucket: "2024-04".to_string(),
                data: BucketData::TokenTypes(sums(0, 0, 500_000, 1)),
            },
        ];
        let calc = CostCalculator::default();

        let rows = chart_rows(&buckets, GroupBy::TokenType, Dimension::Tokens, &calc);
        assert_eq!(rows[0].values["reasoning_tokens"], 500_000.0);

        let slices = group_totals(&buckets, GroupBy::TokenType, Dimension::Cost, &calc);
        let names: Vec<_> = slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Input Tokens", "Output Tokens", "Reasoning Tokens"]);
        assert!((slices[0].value - 1.0).abs() < 1e-9);
        assert!((slices[1].value - 2.0).abs() < 1e-9);
        assert!((slices[2].value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_totals_sum_across_buckets() {
        let calc = CostCalculator::default();
        let slices = group_totals(&grouped_buckets(), GroupBy::Model, Dimension::Tokens, &calc);
        assert_eq!(
            slices,
            vec![
                Slice {
                    name: "gpt-4o".to_string(),
                    value: 1_000_015.0
                },
                Slice {
                    name: "o3".to_string(),
                    value: 30.0
                },
            ]
        );
    }

    #[test]
    fn test_table_rows_one_per_group() {
        let calc = CostCalculator::default();
        let rows = table_rows(
            &grouped_buckets(),
            Granularity::Daily,
            GroupBy::Model,
            Dimension::Cost,
            &calc,
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Mar 1, 2024");
        assert_eq!(rows[0].group.as_deref(), Some("gpt-4o"));
        let costs = rows[0].costs.expect("cost mode carries a breakdown");
        assert!((costs.input - 2.5).abs() < 1e-9);
        assert_eq!(rows[2].group.as_deref(), Some("gpt-4o"));
        assert_eq!(rows[2].sums.call_count, 1);
    }

    #[test]
    fn test_table_rows_tokens_mode_has_no_costs() {
        let calc = CostCalculator::default();
        let rows = table_rows(
            &grouped_buckets(),
            Granularity::Daily,
            GroupBy::Model,
            Dimension::Tokens,
            &calc,
        );
        assert!(rows.iter().all(|r| r.costs.is_none()));
    }

    #[test]
    fn test_format_bucket_label() {
        assert_eq!(format_bucket_label("2024-03-01", Granularity::Daily), "Mar 1, 2024");
        assert_eq!(
            format_bucket_label("2024-03-03", Granularity::Weekly),
            "Mar 3, 2024 (Week Start)"
        );
        assert_eq!(format_bucket_label("2024-03", Granularity::Monthly), "Mar 2024");
        assert_eq!(format_bucket_label("garbage", Granularity::Daily), "garbage");
        assert_eq!(format_bucket_label("2024-13", Granularity::Monthly), "2024-13");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(-12_345), "-12,345");
    }

    #[test]
    fn test_render_table() {
        let calc = CostCalculator::default();
        let rows = table_rows(
            &grouped_buckets(),
            Granularity::Daily,
            GroupBy::Model,
            Dimension::Tokens,
            &calc,
        );
        let text = render_table(&rows, GroupBy::Model, Dimension::Tokens);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Time Bucket"));
        assert!(lines[0].contains("Model"));
        assert!(!lines[0].contains("Total Cost"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].contains("1,000,000"));
    }

    #[test]
    fn test_usage_report_build() {
        let records = vec![
            UsageRecord::new("2024-03-01T10:00:00Z", "gpt-4o", "k1", 100, 50, 0).with_call_count(1),
            UsageRecord::new("2024-03-01T22:00:00Z", "o3-B4", "k1", 10, 5, 20).with_call_count(1),
            UsageRecord::new("not a date", "gpt-4o", "k1", 999, 999, 999),
        ];
        let calc = CostCalculator::default();
        let report = UsageReport::build(
            &records,
            Granularity::Daily,
            GroupBy::Model,
            Dimension::Tokens,
            &calc,
        );

        assert_eq!(report.buckets.len(), 1);
        assert_eq!(report.chart.len(), 1);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.totals.len(), 2);
        assert!(report.to_table().contains("o3-B4"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["group_by"], "model");
        assert_eq!(json["buckets"][0]["data"]["gpt-4o"]["input_tokens"], 100);
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(
            render_table(&[], GroupBy::TokenType, Dimension::Cost),
            "No data to display\n"
        );
    }
}
