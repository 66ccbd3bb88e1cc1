use anyhow::{Context, Result};
use tracing::{error, info, warn};

use quality_compute::services::{
    create_session_store, remember_login, ApiClient, SessionKey, SessionStore, UsageReport,
};
use quality_compute::utils::{init_logger, AppError, CostCalculator};
use quality_compute::Settings;

/// Pick an auth token: configured token, then stored session, then a fresh login
async fn obtain_token(
    settings: &Settings,
    client: &ApiClient,
    store: &dyn SessionStore,
) -> Result<String> {
    if let Some(token) = settings.api.auth_token.as_deref().filter(|t| !t.is_empty()) {
        info!("🔑 Using configured auth token");
        return Ok(token.to_string());
    }

    if let Some(token) = store.get(SessionKey::AuthToken).await? {
        info!("🔑 Using stored session token");
        return Ok(token);
    }

    login(settings, client, store).await
}

async fn login(settings: &Settings, client: &ApiClient, store: &dyn SessionStore) -> Result<String> {
    let (Some(email), Some(password)) = (
        settings.api.email.as_deref(),
        settings.api.password.as_deref(),
    ) else {
        anyhow::bail!(
            "No auth token available: set QC_API__AUTH_TOKEN or QC_API__EMAIL and QC_API__PASSWORD"
        );
    };

    let response = client
        .login_user(email, password)
        .await
        .context("Login failed")?;
    remember_login(store, &response).await?;
    info!("✅ Logged in as {}", email);

    Ok(response.token)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file from project root (../.env) or current directory (.env)
    dotenvy::from_path("../.env")
        .or_else(|_| dotenvy::from_path(".env"))
        .ok(); // Ignore error if .env doesn't exist, rely on environment variables

    // Load configuration first (needed for logger initialization)
    let settings = Settings::new()?;

    init_logger(&settings)?;
    info!("📋 Configuration loaded");

    if let Err(e) = settings.validate() {
        error!("❌ Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!("Invalid configuration: {}", e));
    }

    let store = create_session_store(&settings)?;
    let client = ApiClient::new(&settings)?;
    info!("🌐 API client ready for {}", client.base_url());

    let time_range = settings.analytics.time_range.as_str();
    let mut token = obtain_token(&settings, &client, store.as_ref()).await?;

    let records = match client.get_analytics_data(&token, time_range).await {
        Ok(records) => records,
        Err(AppError::Unauthorized(msg)) => {
            // Stored token has expired: drop the session and sign in again
            warn!("⚠️  Auth token rejected ({}), signing in again", msg);
            store.clear().await?;
            token = login(&settings, &client, store.as_ref()).await?;
            client.get_analytics_data(&token, time_range).await?
        }
        Err(e) => return Err(e.into()),
    };
    info!("📥 Fetched {} usage records for {}", records.len(), time_range);

    let calc = CostCalculator::from_settings(&settings);
    let report = UsageReport::build(
        &records,
        settings.analytics.granularity,
        settings.analytics.group_by,
        settings.analytics.dimension,
        &calc,
    );

    match settings.analytics.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report.to_table()),
    }

    Ok(())
}
