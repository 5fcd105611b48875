use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;

use tms_redirect::api::{self, AppState};
use tms_redirect::bootstrap::{build_gateway, build_handler, build_repository};
use tms_redirect::config::AppConfig;
use tms_redirect::metrics::Metrics;
use tms_redirect::utils::init_tracing;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // TMS_CONFIG wins over the first CLI argument; neither means defaults
    let config_path = std::env::var_os("TMS_CONFIG")
        .map(PathBuf::from)
        .or_else(|| std::env::args_os().nth(1).map(PathBuf::from));

    let config = AppConfig::load(config_path.as_deref())?;
    init_tracing(config.logging.json);

    tracing::info!(
        config = ?config_path,
        store = ?config.store.backend,
        "Starting transport order redirect service"
    );

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 2. Transport order store ===
    let repository = build_repository(&config.store).await?;

    // === 3. Location directory (timeout + retry + circuit breaker) ===
    let gateway = build_gateway(&config.directory, metrics.clone())?;

    // === 4. Redirect command handler ===
    let handler = build_handler(&config, repository.clone(), gateway, metrics.clone());

    let state = web::Data::new(AppState {
        handler,
        repository,
        metrics,
    });

    let bind = (config.server.host.clone(), config.server.port);
    tracing::info!("Listening on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind(bind.clone())
        .with_context(|| format!("Failed to bind {}:{}", bind.0, bind.1))?
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
