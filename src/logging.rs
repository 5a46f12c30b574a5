//! Logger setup for the renderer
//!
//! `RUST_LOG` wins when set. Otherwise softrast's own modules log at the
//! configured level and dependencies (macroquad, image) only at warn.

/// How chatty the renderer is
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter in `env_logger` syntax, taking precedence over `RUST_LOG`
    pub filter: Option<String>,
    /// Level for softrast's own modules when no filter applies
    pub level: log::LevelFilter,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            level: log::LevelFilter::Info,
            timestamps: false,
        }
    }
}

/// Install the global logger.
///
/// Returns false if a logger was already installed; the call is then a no-op.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut builder = env_logger::Builder::new();

    match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder
                .filter_level(log::LevelFilter::Warn)
                .filter_module(env!("CARGO_CRATE_NAME"), config.level);
        }
    }

    if !config.timestamps {
        builder.format_timestamp(None);
    }

    let installed = builder.try_init().is_ok();
    if installed {
        log::debug!("logger installed");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_ignored() {
        init_logging(LoggingConfig {
            filter: Some("softrast=debug".to_string()),
            ..LoggingConfig::default()
        });
        assert!(!init_logging(LoggingConfig::default()));
        log::info!("still fine");
    }
}
