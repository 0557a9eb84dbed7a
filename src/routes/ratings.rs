use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::{
    database::repositories::{
        application_repo::ApplicationRepository, rating_repo::RatingRepository,
        task_repo::TaskRepository, user_repo::UserRepository,
    },
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        ctx::Ctx,
        error::{CtxError, CtxResult},
        mw_ctx::CtxState,
        utils::extractor_utils::JsonOrFormValidated,
    },
    models::{
        response::ApiResponse,
        view::rating::{RatingView, UserRatingsView},
    },
    services::rating_service::{RatingInput, RatingService},
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/ratings/submit", post(submit_rating))
        .route("/api/ratings/users/:user_id", get(user_ratings))
        .route(
            "/api/ratings/applications/:application_id",
            get(application_ratings),
        )
}

type RatingServiceImpl<'a> =
    RatingService<'a, RatingRepository, ApplicationRepository, TaskRepository, UserRepository>;

fn rating_service(state: &CtxState) -> RatingServiceImpl<'_> {
    RatingService::new(
        &state.db.ratings,
        &state.db.applications,
        &state.db.tasks,
        &state.db.users,
    )
}

async fn submit_rating(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    JsonOrFormValidated(body): JsonOrFormValidated<RatingInput>,
) -> CtxResult<Response> {
    let rating = rating_service(&state)
        .submit(&auth_data.user_id, body)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    let data = ApiResponse::with_message(RatingView::from(rating), "Rating submitted");
    Ok((StatusCode::CREATED, Json(data)).into_response())
}

async fn user_ratings(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(user_id): Path<String>,
) -> CtxResult<Json<ApiResponse<UserRatingsView>>> {
    let ratings = rating_service(&state)
        .list_for_user(&user_id)
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(ApiResponse::ok(ratings.into())))
}

async fn application_ratings(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(application_id): Path<String>,
) -> CtxResult<Json<ApiResponse<Vec<RatingView>>>> {
    let ratings = rating_service(&state)
        .list_for_application(&application_id)
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(ApiResponse::ok(
        ratings.into_iter().map(RatingView::from).collect(),
    )))
}
