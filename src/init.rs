use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    database::client::Database,
    middleware::{
        error::AppResult,
        mw_ctx::{CtxState, UPLOADS_URL_PREFIX},
    },
    routes::{auth_routes, ratings, task_submissions, tasks, users},
};

pub async fn run_migrations(database: &Database) -> AppResult<()> {
    database.run_migrations().await?;
    tracing::info!("->> migrations applied");
    Ok(())
}

pub fn main_router(ctx_state: &Arc<CtxState>, uploads_dir: &str) -> Router {
    Router::new()
        .route("/hc", get(get_hc))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(uploads_dir))
        .merge(auth_routes::routes())
        .merge(users::routes())
        .merge(tasks::routes(ctx_state.upload_max_size_mb))
        .merge(task_submissions::routes(ctx_state.upload_max_size_mb))
        .merge(ratings::routes())
        .with_state(ctx_state.clone())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new()),
        )
}

async fn get_hc() -> Response {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    (StatusCode::OK, format!("v{}", VERSION)).into_response()
}
