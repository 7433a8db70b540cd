use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use insurance_backoffice::config::{DatabaseConfig, EnvironmentConfig};
use insurance_backoffice::database::{create_pool, run_migrations};
use insurance_backoffice::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("insurance_backoffice=debug,tower_http=info")),
        )
        .init();

    info!("🛡️ Insurance back office API");

    let config = EnvironmentConfig::from_env();
    info!("⚙️ Environment: {}", config.environment);
    let database = DatabaseConfig::from_env()?;

    let pool = match create_pool(&database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Could not connect to the database: {}", e);
            return Err(e);
        }
    };
    run_migrations(&pool).await?;

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(pool, config));

    info!("🌐 Server listening on http://{}", addr);
    info!("   POST /api/vehicle-import - Bulk vehicle import");
    info!("   GET  /api/vehicle-import/template - Import template");
    info!("   POST /api/customer - Create customer");
    info!("   GET  /api/customer/:id - Customer details");
    info!("   GET  /api/vehicle-master/* - Vehicle dropdowns");
    info!("   POST /api/tariff - Create tariff");
    info!("   GET  /api/tariff - List tariffs");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down"),
        _ = terminate => info!("🛑 SIGTERM received, shutting down"),
    }
}
