use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use spin_persistence::{
    StatsReconciler, connection::connect_and_migrate, repositories::NotificationRepository,
};
use spin_server::{
    config::Config,
    create_routes,
    notifications::{DispatcherConfig, NotificationDispatcher},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Starting SpinON stats server...");

    let config = Arc::new(Config::new());

    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let reconciler = Arc::new(StatsReconciler::new(db.clone()));
    let notification_repository = Arc::new(NotificationRepository::new(db));

    let dispatcher = match NotificationDispatcher::new(
        notification_repository.clone(),
        DispatcherConfig {
            target_url: config.notification_target_url.clone(),
            request_timeout: Duration::from_secs(config.notification_request_timeout_seconds),
        },
    ) {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) => {
            tracing::error!("Failed to create notification dispatcher: {}", e);
            std::process::exit(1);
        }
    };

    let routes = create_routes(
        reconciler,
        dispatcher.clone(),
        notification_repository,
        config.clone(),
    );

    // Daily reminder job
    let interval_minutes = config.notification_interval_minutes.max(1);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
        // first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = dispatcher.run().await {
                tracing::error!("Scheduled notification run failed: {}", e);
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!("Server started successfully on {}. Press Ctrl+C to stop.", addr);
    server.await;
    info!("Server shutdown complete.");
}
