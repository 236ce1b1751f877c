//! Image Generation Gateway - binary entrypoint.
//!
//! This binary parses configuration, constructs the provider clients, and
//! starts the HTTP server.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagegen_gateway::{
    config::Config,
    generation::OpenAiImageClient,
    identity::SupabaseIdentity,
    server::{create_router, AppState, PublicIdentityConfig, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let supabase_url = config.supabase_url_sanitized();
    let anon_key = config.supabase_anon_key_sanitized();
    let timeout = Duration::from_secs(config.request_timeout);

    info!("Configuration:");
    info!("  Image model: {}", config.image_model);
    info!("  Image response mode: {}", config.image_response_format);
    info!("  Identity provider: {}", supabase_url);
    if config.auth_enabled {
        info!("  Auth: enabled");
    } else {
        warn!("  Auth: DISABLED - image generation is publicly accessible");
        warn!("        Enable for production: --auth-enabled=true");
    }

    // Create the image provider client
    let generator = match OpenAiImageClient::new(
        config.openai_api_key.clone(),
        config.image_model.clone(),
        config.image_response_format,
        timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create image provider client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let generator = match config.openai_base_url {
        Some(ref base_url) => generator.with_base_url(base_url.clone()),
        None => generator,
    };

    // Create the identity provider client
    let identity = match SupabaseIdentity::new(
        supabase_url.clone(),
        anon_key.clone(),
        config.supabase_service_role_key.clone(),
        timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create identity provider client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Assemble application state and router
    let state = AppState::new(
        generator,
        identity,
        PublicIdentityConfig {
            url: supabase_url,
            anon_key,
        },
    );

    let router_config = build_router_config(&config);
    let router = create_router(state, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("");
    info!("Try these endpoints:");
    info!("  curl http://{}/health", addr);
    info!("  curl http://{}/supabase-config", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "imagegen_gateway=debug,tower_http=debug"
    } else {
        "imagegen_gateway=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_auth_enabled(config.auth_enabled);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
