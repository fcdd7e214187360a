use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod error;
mod middleware;
mod models;
mod routes;
mod store;
mod validation;

use config::{AppConfig, StoreBackend};
use database::{create_database_connection, run_migrations};
use store::{MemoryUmkmStore, PgUmkmStore, SharedStore};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Gagal memasang handler Ctrl-C");
    }
    tracing::info!("Server dimatikan");
}

async fn build_store(config: &AppConfig) -> Result<SharedStore, Box<dyn std::error::Error>> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Memakai penyimpanan memori, data hilang saat server berhenti");
            Ok(Arc::new(MemoryUmkmStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(config::ConfigError::MissingDatabaseUrl)?;

            // Inisialisasi koneksi pool ke database lalu jalankan migrasi
            let pool = create_database_connection(database_url, config.max_connections).await?;
            run_migrations(&pool).await?;

            Ok(Arc::new(PgUmkmStore::new(pool)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load konfigurasi dari .env / environment
    let config = AppConfig::from_env().inspect_err(|err| {
        tracing::error!(error = %err, "Konfigurasi tidak valid");
    })?;

    let store = build_store(&config).await.inspect_err(|err| {
        tracing::error!(error = %err, "Gagal menyiapkan penyimpanan");
    })?;

    let app = routes::create_app(store);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server running at http://{}", addr);
    tracing::info!("🔗 Endpoints available at http://{}/api/umkm", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
