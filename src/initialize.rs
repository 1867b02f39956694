use std::env::VarError;
use std::time::Duration;

use axum::Router;
use leptos::prelude::*;
use leptos_axum::{generate_route_list, LeptosRoutes};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::api::{ApiClient, ClientConfig, RechargeApi, DEFAULT_API_URL};
use crate::app::{shell, App};
use crate::errors::{AppError, Result as AppResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub probe_backend: bool,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Result<String, VarError>) -> AppResult<Self> {
        let api_url = optional_env(&lookup, "RECHARGEX_API_URL")?
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_api_url(&api_url)?;

        let request_timeout = match optional_env(&lookup, "RECHARGEX_REQUEST_TIMEOUT_SECS")? {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            api_url,
            request_timeout,
            probe_backend: lookup("RECHARGEX_PROBE_BACKEND")
                .map(|v| v.trim() == "true")
                .unwrap_or(false),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_url.clone(),
            timeout: self.request_timeout,
        }
    }
}

/// `None` when unset; set-but-blank is an error.
fn optional_env(
    lookup: &impl Fn(&str) -> Result<String, VarError>,
    name: &str,
) -> AppResult<Option<String>> {
    match lookup(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                Err(AppError::EmptyEnv(name.to_string()))
            } else {
                Ok(Some(trimmed))
            }
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(AppError::InvalidEnv(name.to_string())),
    }
}

fn validate_api_url(raw: &str) -> AppResult<()> {
    let invalid = |reason: String| AppError::InvalidValue {
        name: "RECHARGEX_API_URL".to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(())
}

fn parse_timeout(raw: &str) -> AppResult<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::InvalidValue {
            name: "RECHARGEX_REQUEST_TIMEOUT_SECS".to_string(),
            reason: format!("expected a positive number of seconds, got {raw:?}"),
        }),
    }
}

/// Check the backend answers before serving. Failure is logged, not fatal:
/// the browser talks to the backend directly.
pub async fn probe_backend(api: &ApiClient) {
    tracing::info!(backend = %api.base_url(), "Probing recharge backend");
    match api.services().await {
        Ok(services) => tracing::info!(count = services.len(), "Backend service catalog reachable"),
        Err(e) => tracing::warn!("Backend probe failed: {e}"),
    }
}

/// Build the Axum router serving the Leptos app
pub fn build_router(config: &Config, api: ApiClient, leptos_options: LeptosOptions) -> Router {
    let routes = generate_route_list(App);
    let client_config = config.client_config();

    Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            move || {
                provide_context(client_config.clone());
                provide_context(api.clone());
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler::<LeptosOptions, _>(
            shell,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(leptos_options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppResult<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned().ok_or(VarError::NotPresent))
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.probe_backend);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("RECHARGEX_API_URL", " https://api.rechargex.test/v1 "),
            ("RECHARGEX_REQUEST_TIMEOUT_SECS", "12"),
            ("RECHARGEX_PROBE_BACKEND", "true"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://api.rechargex.test/v1");
        assert_eq!(config.client_config().timeout, Duration::from_secs(12));
        assert!(config.probe_backend);
    }

    #[test]
    fn blank_url_is_rejected() {
        assert!(matches!(
            config_from(&[("RECHARGEX_API_URL", "  ")]),
            Err(AppError::EmptyEnv(name)) if name == "RECHARGEX_API_URL"
        ));
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert!(matches!(
            config_from(&[("RECHARGEX_API_URL", "ftp://files.example")]),
            Err(AppError::InvalidValue { .. })
        ));
    }

    #[test]
    fn timeout_must_be_positive() {
        for raw in ["0", "-5", "soon"] {
            assert!(
                matches!(
                    config_from(&[("RECHARGEX_REQUEST_TIMEOUT_SECS", raw)]),
                    Err(AppError::InvalidValue { .. })
                ),
                "{raw}"
            );
        }
    }
}
