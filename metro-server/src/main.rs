use std::net::SocketAddr;
use std::sync::Arc;

use metro_server::service::{MetroSystem, SystemConfig, spawn_weather_task};
use metro_server::topology;
use metro_server::web::{AppState, create_router};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let topology = topology::medellin();

    let mut config = SystemConfig::default();
    if let Ok(seed) = std::env::var("METRO_WEATHER_SEED") {
        match seed.parse() {
            Ok(seed) => config.weather_seed = seed,
            Err(_) => eprintln!("Warning: ignoring non-numeric METRO_WEATHER_SEED"),
        }
    }

    let system = Arc::new(MetroSystem::new(topology, config));

    // Periodic weather tick, cooperatively cancelled at shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let weather_task = spawn_weather_task(system.clone(), shutdown_rx);

    let state = AppState::new(system);
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server address");
    info!(%addr, "metro server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("server error");

    let _ = shutdown_tx.send(true);
    let _ = weather_task.await;
    info!("shutdown complete");
}
