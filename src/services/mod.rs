pub mod api_client;
pub mod pricing_service;
pub mod pricing_table;
pub mod session_store;
pub mod usage_aggregator;
pub mod usage_report;

pub use api_client::ApiClient;
pub use pricing_service::{resolve_model, PricingService, PricingStatus};
pub use session_store::{
    create_session_store, remember_login, MemorySessionStore, RedisSessionStore, SessionKey,
    SessionStore,
};
pub use usage_aggregator::{aggregate, bucket_key, parse_timestamp};
pub use usage_report::{
    chart_rows, format_bucket_label, group_totals, render_table, table_rows, ChartRow, Slice,
    TableRow, UsageReport,
};
