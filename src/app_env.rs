use std::env;
use thiserror::Error;

/// Base URL of the hosted data/auth service, e.g. `https://abcdefgh.supabase.co`
pub const SUPABASE_URL: &str = "SUPABASE_URL";
/// Public "anon" API key for the hosted data/auth service. Sent on every request alongside
/// the signed-in user's access token so the service's row-level policies can apply.
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
/// Address the HTTP server listens on. Defaults to [DEFAULT_BIND_ADDRESS].
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
/// "false" lets session cookies travel over plain HTTP, for local development without TLS.
/// Defaults to "true".
pub const SECURE_COOKIES: &str = "SECURE_COOKIES";
/// Log level configuration for the application. For formatting info, see
/// [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the {0} environment variable must be set")]
    Missing(&'static str),
    #[error("the {variable} environment variable is invalid: {reason}")]
    Invalid {
        variable: &'static str,
        reason: String,
    },
}

/// Where and how to reach the hosted data/auth service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataServiceConfig {
    pub base_url: String,
    pub anon_key: String,
}

/// OTLP endpoints for exporting spans and metrics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryEndpoints {
    pub spans: String,
    pub metrics: String,
}

/// Everything the server needs from its environment in order to start
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_service: DataServiceConfig,
    pub bind_address: String,
    pub telemetry: Option<TelemetryEndpoints>,
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Reads the configuration out of the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Blank values are treated
    /// the same as missing ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = read(SUPABASE_URL).ok_or(ConfigError::Missing(SUPABASE_URL))?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                variable: SUPABASE_URL,
                reason: format!("\"{base_url}\" is not an http(s) URL"),
            });
        }
        let anon_key = read(SUPABASE_ANON_KEY).ok_or(ConfigError::Missing(SUPABASE_ANON_KEY))?;

        let telemetry = match (read(OTEL_SPAN_EXPORT_URL), read(OTEL_METRIC_EXPORT_URL)) {
            (Some(spans), Some(metrics)) => Some(TelemetryEndpoints { spans, metrics }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(OTEL_METRIC_EXPORT_URL)),
            (None, Some(_)) => return Err(ConfigError::Missing(OTEL_SPAN_EXPORT_URL)),
        };

        let secure_cookies = match read(SECURE_COOKIES) {
            None => true,
            Some(value) if value.trim().eq_ignore_ascii_case("true") => true,
            Some(value) if value.trim().eq_ignore_ascii_case("false") => false,
            Some(value) => {
                return Err(ConfigError::Invalid {
                    variable: SECURE_COOKIES,
                    reason: format!("expected \"true\" or \"false\", got \"{value}\""),
                });
            }
        };

        Ok(AppConfig {
            data_service: DataServiceConfig {
                base_url: base_url.trim_end_matches('/').to_owned(),
                anon_key,
            },
            bind_address: read(BIND_ADDRESS).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            telemetry,
            secure_cookies,
        })
    }
}
