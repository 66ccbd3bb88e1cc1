pub mod analytics;
pub mod api;
pub mod pricing;
pub mod usage_record;

pub use analytics::{AggregationBucket, BucketData, Dimension, Granularity, GroupBy, TokenSums};
pub use api::{
    AccountSettings, AnalyticsResponse, ApiKeyEntry, ApiKeysResponse, ApiLog, ApiLogsResponse,
    CheckoutSessionResponse, GenerateApiKeyResponse, LoginResponse, MessageResponse,
    NotificationSettings, OverviewResponse, RecentCall, RegisterResponse, UserInfo, UserSettings,
    UserSettingsResponse,
};
pub use pricing::{PricingRecord, ResolvedModel};
pub use usage_record::UsageRecord;
