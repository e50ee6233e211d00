use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gaboma_geo::build_router;
use gaboma_geo::catalog::{Catalog, catalog_refresher, load_file};
use gaboma_geo::config::Args;
use gaboma_geo::state::{AppState, Limiters};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gaboma_geo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();
    args.validate()?;

    let initial = match &args.catalog_path {
        Some(path) => load_file(path)?,
        None => Vec::new(),
    };
    let catalog = Arc::new(Catalog::new(initial));
    tracing::info!(businesses = catalog.len(), "Catalog loaded");
    if catalog.is_empty() && args.catalog_url.is_none() {
        tracing::warn!("No catalog source configured, ranking endpoints will return nothing");
    }

    if let Some(url) = args.catalog_url.clone() {
        tokio::spawn(catalog_refresher(
            Arc::clone(&catalog),
            reqwest::Client::new(),
            url,
            args.catalog_refresh_every(),
        ));
    }

    let limiters = Limiters::from_args(&args);
    for limiter in limiters.all() {
        tracing::info!(
            limiter = %limiter.name(),
            max_requests = limiter.max_requests(),
            window = ?limiter.window(),
            "Rate limiter configured"
        );
    }
    let sweepers = limiters.spawn_sweepers(args.sweep_every());

    let state = Arc::new(AppState { catalog, limiters });
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://localhost:{}", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for sweeper in sweepers {
        sweeper.close();
    }
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
