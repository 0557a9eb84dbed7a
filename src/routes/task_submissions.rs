use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use tempfile::NamedTempFile;

use crate::{
    database::repositories::{
        application_repo::ApplicationRepository, submission_repo::SubmissionRepository,
        task_repo::TaskRepository, user_repo::UserRepository, workflow_repo::WorkflowRepository,
    },
    entities::submission::MAX_FILES,
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        error::{AppResult, CtxError, CtxResult},
        mw_ctx::CtxState,
        utils::extractor_utils::JsonOrFormValidated,
    },
    models::{
        response::ApiResponse,
        view::submission::{ReviewView, SubmissionView},
    },
    services::submission_service::{ReviewInput, SubmissionInput, SubmissionService},
    utils::file::convert::{convert_field_file_data, FileUpload},
};

// one param name per segment, `:id` is an application id on the collection
// routes and a submission id on review
pub fn routes(upload_max_size_mb: u64) -> Router<Arc<CtxState>> {
    let max_bytes = (upload_max_size_mb * MAX_FILES as u64 + 1) * 1024 * 1024;
    Router::new()
        .route(
            "/api/task-submissions/:id",
            get(list_submissions)
                .post(create_submission)
                .layer(DefaultBodyLimit::max(max_bytes as usize)),
        )
        .route("/api/task-submissions/:id/review", put(review_submission))
}

type SubmissionServiceImpl<'a> = SubmissionService<
    'a,
    SubmissionRepository,
    ApplicationRepository,
    TaskRepository,
    UserRepository,
    WorkflowRepository,
>;

fn submission_service(state: &CtxState) -> SubmissionServiceImpl<'_> {
    SubmissionService::new(
        &state.db.submissions,
        &state.db.applications,
        &state.db.tasks,
        &state.db.users,
        &state.db.workflow,
    )
}

#[derive(Debug, TryFromMultipart)]
pub struct SubmissionForm {
    pub content: Option<String>,
    pub links: Vec<String>,
    #[form_data(field_name = "submissions[]", limit = "unlimited")]
    pub submissions: Vec<FieldData<NamedTempFile>>,
}

async fn create_submission(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(application_id): Path<String>,
    TypedMultipart(body): TypedMultipart<SubmissionForm>,
) -> CtxResult<Response> {
    let files = body
        .submissions
        .into_iter()
        .map(convert_field_file_data)
        .collect::<AppResult<Vec<FileUpload>>>()
        .map_err(CtxError::from(&auth_data.ctx))?;

    let input = SubmissionInput {
        content: body
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        links: body
            .links
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        files,
    };

    let submission = submission_service(&state)
        .submit(
            &auth_data.user_id,
            &application_id,
            input,
            state.file_storage.as_ref(),
            state.upload_max_size_mb,
        )
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    let data = ApiResponse::with_message(SubmissionView::from(submission), "Work submitted");
    Ok((StatusCode::CREATED, Json(data)).into_response())
}

async fn list_submissions(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(application_id): Path<String>,
) -> CtxResult<Json<ApiResponse<Vec<SubmissionView>>>> {
    let list = submission_service(&state)
        .list(&auth_data.user_id, &application_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::ok(
        list.into_iter().map(SubmissionView::from).collect(),
    )))
}

async fn review_submission(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(submission_id): Path<String>,
    JsonOrFormValidated(body): JsonOrFormValidated<ReviewInput>,
) -> CtxResult<Json<ApiResponse<ReviewView>>> {
    let outcome = submission_service(&state)
        .review(&auth_data.user_id, &submission_id, body)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    let message = format!("Submission {}", outcome.submission.status);
    Ok(Json(ApiResponse::with_message(outcome.into(), message)))
}
