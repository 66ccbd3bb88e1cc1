use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Settings;

/// Initialize the logging system
pub fn init_logger(settings: &Settings) -> anyhow::Result<()> {
    let log_level = &settings.logging.level;
    let log_format = &settings.logging.format;

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Report output goes to stdout, so logs go to stderr
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(false)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_level(true)
                        .with_ansi(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::create_test_settings;

    #[test]
    fn test_logger_initialization() {
        let settings = create_test_settings();

        // Only the first installation in a process succeeds
        let first = init_logger(&settings);
        assert!(first.is_ok());

        let second = init_logger(&settings);
        assert!(second.is_err());
    }
}
