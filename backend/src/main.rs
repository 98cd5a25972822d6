//! Backend entry-point: loads settings, migrates the schema, and serves the
//! hiring REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hr_backend::inbound::http::health::HealthState;
use hr_backend::inbound::http::session_config::{BuildMode, session_settings};
use hr_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use hr_backend::settings::Settings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|err| startup_error("invalid configuration", err))?;
    let session = session_settings(&settings.session_toggles(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("invalid session configuration", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid HR_BIND_ADDR", err))?;
    let database_url = settings
        .database_url()
        .ok_or_else(|| std::io::Error::other("HR_DATABASE_URL must be set"))?
        .to_owned();

    let migrate_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migrate_url))
        .await
        .map_err(|err| startup_error("migration task failed", err))?
        .map_err(|err| startup_error("schema migration failed", err))?;
    info!(applied, "schema up to date");

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size())
            .with_query_deadline(settings.store_timeout()),
    )
    .await
    .map_err(|err| startup_error("database pool", err))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(session, bind_addr, pool)).await?;
    info!(%bind_addr, "listening");
    server.await
}
