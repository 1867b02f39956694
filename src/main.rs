#![recursion_limit = "512"]

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> rechargex::errors::Result<()> {
    use leptos::prelude::*;
    use tracing_subscriber::EnvFilter;

    use rechargex::api::{ApiClient, Credential};
    use rechargex::errors::AppError;
    use rechargex::initialize::{build_router, probe_backend, Config};

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Shared transport; each rendered session binds its own credential
    let api = ApiClient::new(&config.client_config(), Credential::default())?;

    if config.probe_backend {
        probe_backend(&api).await;
    }

    // Get Leptos configuration
    let leptos_options = get_configuration(None)
        .map_err(|e| AppError::Server(format!("Failed to load Leptos configuration: {e}")))?
        .leptos_options;

    let addr = leptos_options.site_addr;

    // Build the application router
    let app = build_router(&config, api, leptos_options);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{addr}");
    tracing::info!(backend = %config.api_url, timeout = ?config.request_timeout, "Recharge backend");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
pub fn main() {}
