//! Tracing subscriber setup

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "crm_rs={level},outreach_ai={level},tower_http={level}",
            level = config.level
        ))
    });

    let builder = fmt().with_env_filter(filter).with_target(true);
    let installed = if config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if let Err(e) = installed {
        eprintln!("Logging already initialised: {}", e);
    }
}
