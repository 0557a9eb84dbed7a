use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    middleware::{
        ctx::Ctx,
        error::{CtxError, CtxResult},
        mw_ctx::{CtxState, JWT_KEY},
        utils::extractor_utils::JsonOrFormValidated,
    },
    models::{
        response::ApiResponse,
        view::user::{AuthView, UserView},
    },
    services::auth_service::{AuthService, LoginInput, RegisterInput},
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/register", post(signup))
        .route("/api/login", post(signin))
}

fn add_login_cookie(cookies: &Cookies, token: &str) {
    cookies.add(
        Cookie::build((JWT_KEY, token.to_string()))
            .path("/")
            .http_only(true)
            .into(),
    );
}

async fn signup(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    cookies: Cookies,
    JsonOrFormValidated(body): JsonOrFormValidated<RegisterInput>,
) -> CtxResult<Response> {
    let (token, user) = AuthService::new(&state.db.users, &state.jwt)
        .register(body)
        .await
        .map_err(CtxError::from(&ctx))?;

    add_login_cookie(&cookies, &token);
    let data = AuthView {
        token,
        user: UserView::from(user),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))).into_response())
}

async fn signin(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    cookies: Cookies,
    JsonOrFormValidated(body): JsonOrFormValidated<LoginInput>,
) -> CtxResult<Json<ApiResponse<AuthView>>> {
    let (token, user) = AuthService::new(&state.db.users, &state.jwt)
        .login(body)
        .await
        .map_err(CtxError::from(&ctx))?;

    add_login_cookie(&cookies, &token);
    Ok(Json(ApiResponse::ok(AuthView {
        token,
        user: UserView::from(user),
    })))
}
