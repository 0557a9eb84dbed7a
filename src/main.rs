use std::net::{Ipv4Addr, SocketAddr};

use bronze_server::{
    config::AppConfig,
    database::client::{Database, DbConfig},
    init,
    middleware::{
        error::{AppError, AppResult},
        mw_ctx,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bronze_server=debug,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "uploads dir = {}, max upload = {} MB",
        config.uploads_dir,
        config.upload_file_size_max_mb
    );

    let db = Database::connect(DbConfig {
        url: &config.db_url,
        database: &config.db_database,
        namespace: &config.db_namespace,
        username: config.db_username.as_deref(),
        password: config.db_password.as_deref(),
    })
    .await?;
    init::run_migrations(&db).await?;

    let ctx_state = mw_ctx::create_ctx_state(db, &config);
    let routes_all = init::main_router(&ctx_state, &config.uploads_dir);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server_port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Generic {
            description: format!("bind {addr}: {e}"),
        })?;
    tracing::info!("->> LISTENING on {addr}");

    axum::serve(listener, routes_all.into_make_service())
        .await
        .map_err(|e| AppError::Generic {
            description: e.to_string(),
        })?;
    Ok(())
}
