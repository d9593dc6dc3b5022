use std::sync::Arc;

use common::utils::logging::init_logging_from_env;
use dotenvy::dotenv;
use migration::MigratorTrait;
use models::EntityDescriptor;
use sea_orm::DatabaseConnection;
use service::{Repository, SeaOrmRepository};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// One Postgres-backed repository per entity, all sharing the pool.
pub fn seaorm_repositories(db: DatabaseConnection) -> impl Fn(&'static EntityDescriptor) -> Arc<dyn Repository> {
    move |descriptor| Arc::new(SeaOrmRepository::new(db.clone(), descriptor)) as Arc<dyn Repository>
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(service = "server", event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: load config, connect, optionally migrate, then serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = configs::AppConfig::load_and_validate()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!(service = "server", event = "migrations_applied", "schema up to date");
    }

    let app = routes::build_router(seaorm_repositories(db), build_cors());

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(service = "server", event = "listening", addr = %listener.local_addr()?, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
