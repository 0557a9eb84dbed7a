use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        ctx::Ctx,
        error::{CtxError, CtxResult},
        mw_ctx::CtxState,
    },
    models::{response::ApiResponse, view::user::UserView},
    services::user_service::UserService,
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/users/current", get(get_current_user))
        .route("/api/users/:user_id", get(get_user))
}

async fn get_current_user(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<ApiResponse<UserView>>> {
    let user = UserService::new(&state.db.users)
        .get(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::ok(user.into())))
}

async fn get_user(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(user_id): Path<String>,
) -> CtxResult<Json<ApiResponse<UserView>>> {
    let user = UserService::new(&state.db.users)
        .get(&user_id)
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(ApiResponse::ok(user.into())))
}
