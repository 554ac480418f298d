//! Tracing subscriber initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How to set up the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub default_directive: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// Debug output for the given crates, info for everything else.
    pub fn verbose_for(crates: &[&str]) -> Self {
        let mut directive = String::from("info");
        for name in crates {
            directive.push_str(&format!(",{}=debug", name));
        }
        Self {
            default_directive: directive,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| self.default_directive.as_str().into())
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let registry = tracing_subscriber::registry().with(config.filter());

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.default_directive, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_verbose_for() {
        let config = TracingConfig::verbose_for(&["orc_client", "tower_http"]);
        assert_eq!(config.default_directive, "info,orc_client=debug,tower_http=debug");
    }

    #[test]
    fn test_second_init_fails() {
        let config = TracingConfig::default();
        let _ = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(second.is_err());
    }
}
