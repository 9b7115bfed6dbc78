use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parkgate_api::config::ServerConfig;
use parkgate_api::router::build_app_router;
use parkgate_api::state::AppState;
use parkgate_coord::{EntryCoordinator, ExitCoordinator, SpotResolver};
use parkgate_store::{seed::seed_lot, DocumentStore, MemoryStore};
use parkgate_triggers::{BarrierCloser, ConsistencyTrigger, LightingSchedule, MarkerSweeper};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "parkgate_api=debug,parkgate_coord=debug,parkgate_store=debug,\
                     parkgate_triggers=debug,tower_http=debug"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    seed_lot(store.as_ref(), config.spot_count)
        .await
        .expect("Failed to seed the lot");
    tracing::info!(spot_count = config.spot_count, "Lot seeded");

    let store: Arc<dyn DocumentStore> = store;

    // --- Coordinators ---
    let entry = Arc::new(EntryCoordinator::new(
        Arc::clone(&store),
        config.protocol.clone(),
    ));
    let exit = Arc::new(ExitCoordinator::new(
        Arc::clone(&store),
        config.protocol.clone(),
    ));
    let resolver = Arc::new(SpotResolver::new(Arc::clone(&store)));

    // --- Reactive rules ---
    // Change-stream consumers run until the bus closes.
    let consistency = ConsistencyTrigger::new(Arc::clone(&store));
    let consistency_handle = tokio::spawn(consistency.run(store.subscribe()));

    let closer = BarrierCloser::new(Arc::clone(&store), config.protocol.barrier_close_delay);
    let closer_handle = tokio::spawn(closer.run(store.subscribe()));

    // Periodic jobs run until cancelled.
    let jobs_cancel = tokio_util::sync::CancellationToken::new();

    let sweeper = MarkerSweeper::new(Arc::clone(&store), config.protocol.confirmation_window);
    let sweeper_handle = tokio::spawn(sweeper.run(jobs_cancel.clone()));

    let lighting = LightingSchedule::new(Arc::clone(&store));
    let lighting_handle = tokio::spawn(lighting.run(jobs_cancel.clone()));

    tracing::info!("Reactive rules started (consistency, barrier closer, sweeper, lighting)");

    // --- App state and router ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        entry,
        exit,
        resolver,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    jobs_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), lighting_handle).await;
    tracing::info!("Periodic jobs stopped");

    // The change bus lives inside the store, which the consumers themselves
    // keep alive; abort them directly.
    consistency_handle.abort();
    closer_handle.abort();
    tracing::info!("Change-stream consumers stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
