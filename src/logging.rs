//! Tracing setup and log hygiene helpers

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL` when both are set. Calling this twice is
/// harmless; the second call keeps the first subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Plain => registry
            .with(fmt::layer().with_target(false).compact())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Redact a secret for logging, keeping only its last four characters when
/// it is long enough for that to be harmless.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 8 {
        return "****".to_string();
    }

    let tail: String = value.chars().skip(count - 4).collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("sk_live_abcdef123456"), "****3456");
    }

    #[test]
    fn test_init_tracing_twice() {
        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            format: LogFormat::Plain,
        };
        init_tracing(&config);
        init_tracing(&config);
    }
}
