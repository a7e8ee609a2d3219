use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for service logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// JSON when `MODFLOW_ENV=production`, human-readable otherwise.
    pub fn from_env() -> Self {
        Self::for_environment(std::env::var("MODFLOW_ENV").ok().as_deref())
    }

    fn for_environment(env: Option<&str>) -> Self {
        match env {
            Some(env) if env.eq_ignore_ascii_case("production") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

fn default_directives(service_name: &str) -> String {
    let crate_target = service_name.replace('-', "_");
    format!("info,{crate_target}=debug,modflow_shared=debug,tower_http=debug,lapin=warn")
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));
    let format = LogFormat::from_env();
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }

    tracing::info!(service = service_name, format = ?format, "tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_selects_json() {
        assert_eq!(LogFormat::for_environment(Some("production")), LogFormat::Json);
        assert_eq!(LogFormat::for_environment(Some("PRODUCTION")), LogFormat::Json);
        assert_eq!(LogFormat::for_environment(Some("staging")), LogFormat::Pretty);
        assert_eq!(LogFormat::for_environment(None), LogFormat::Pretty);
    }

    #[test]
    fn service_target_uses_crate_name() {
        let directives = default_directives("modflow-reporting");
        assert!(directives.contains("modflow_reporting=debug"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
