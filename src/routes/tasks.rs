use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use tempfile::NamedTempFile;

use crate::{
    database::repositories::{
        application_repo::ApplicationRepository, payment_repo::PaymentRepository,
        task_repo::TaskRepository, user_repo::UserRepository, workflow_repo::WorkflowRepository,
    },
    entities::task::MAX_ATTACHMENTS,
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        ctx::Ctx,
        error::{AppResult, CtxError, CtxResult},
        mw_ctx::CtxState,
        utils::extractor_utils::JsonOrFormValidated,
    },
    models::{
        response::ApiResponse,
        view::{
            application::ApplicationView,
            task::{PaymentView, TaskView},
        },
    },
    services::{
        application_service::{ApplicationService, ApplyInput},
        task_service::{TaskInput, TaskListQuery, TaskService},
        task_workflow::{CompleteTaskInput, StatusUpdateInput, TaskWorkflow},
    },
    utils::file::convert::{convert_field_file_data, FileUpload},
};

pub fn routes(upload_max_size_mb: u64) -> Router<Arc<CtxState>> {
    let max_bytes = (upload_max_size_mb * MAX_ATTACHMENTS as u64 + 1) * 1024 * 1024;
    Router::new()
        .route("/api/bronze-tasks", post(create_task).get(list_tasks))
        .route("/api/bronze-tasks/posted", get(list_posted))
        .route("/api/bronze-tasks/my-applications", get(list_my_applications))
        .route("/api/bronze-tasks/:task_id", get(get_task))
        .route(
            "/api/bronze-tasks/:task_id/attachments",
            post(upload_attachments).layer(DefaultBodyLimit::max(max_bytes as usize)),
        )
        .route("/api/bronze-tasks/:task_id/apply", post(apply))
        .route("/api/bronze-tasks/:task_id/applications", get(list_applications))
        .route(
            "/api/bronze-tasks/:task_id/applications/:application_id/status",
            put(update_application_status),
        )
        .route("/api/bronze-tasks/:task_id/complete", post(complete_task))
        .route("/api/bronze-tasks/:task_id/payment", get(get_payment))
}

type TaskServiceImpl<'a> = TaskService<'a, TaskRepository, UserRepository, PaymentRepository>;
type ApplicationServiceImpl<'a> =
    ApplicationService<'a, ApplicationRepository, TaskRepository, UserRepository>;
type TaskWorkflowImpl<'a> =
    TaskWorkflow<'a, ApplicationRepository, TaskRepository, UserRepository, WorkflowRepository>;

fn task_service(state: &CtxState) -> TaskServiceImpl<'_> {
    TaskService::new(&state.db.tasks, &state.db.users, &state.db.payments)
}

fn application_service(state: &CtxState) -> ApplicationServiceImpl<'_> {
    ApplicationService::new(&state.db.applications, &state.db.tasks, &state.db.users)
}

fn task_workflow(state: &CtxState) -> TaskWorkflowImpl<'_> {
    TaskWorkflow::new(
        &state.db.applications,
        &state.db.tasks,
        &state.db.users,
        &state.db.workflow,
    )
}

#[derive(Debug, TryFromMultipart)]
pub struct AttachmentsInput {
    #[form_data(field_name = "attachments[]", limit = "unlimited")]
    pub attachments: Vec<FieldData<NamedTempFile>>,
}

async fn create_task(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    JsonOrFormValidated(body): JsonOrFormValidated<TaskInput>,
) -> CtxResult<Response> {
    let task = task_service(&state)
        .create(&auth_data.user_id, body)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    let data = ApiResponse::with_message(TaskView::from(task), "Task created");
    Ok((StatusCode::CREATED, Json(data)).into_response())
}

async fn list_tasks(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Query(query): Query<TaskListQuery>,
) -> CtxResult<Json<ApiResponse<Vec<TaskView>>>> {
    let tasks = task_service(&state)
        .list(query)
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(ApiResponse::ok(
        tasks.into_iter().map(TaskView::from).collect(),
    )))
}

async fn list_posted(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<ApiResponse<Vec<TaskView>>>> {
    let tasks = task_service(&state)
        .list_posted(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::ok(
        tasks.into_iter().map(TaskView::from).collect(),
    )))
}

async fn list_my_applications(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<ApiResponse<Vec<ApplicationView>>>> {
    let applications = application_service(&state)
        .list_mine(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::ok(
        applications.into_iter().map(ApplicationView::from).collect(),
    )))
}

async fn get_task(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(task_id): Path<String>,
) -> CtxResult<Json<ApiResponse<TaskView>>> {
    let task = task_service(&state)
        .get(&task_id)
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(ApiResponse::ok(task.into())))
}

async fn upload_attachments(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(task_id): Path<String>,
    TypedMultipart(body): TypedMultipart<AttachmentsInput>,
) -> CtxResult<Json<ApiResponse<TaskView>>> {
    let files = body
        .attachments
        .into_iter()
        .map(convert_field_file_data)
        .collect::<AppResult<Vec<FileUpload>>>()
        .map_err(CtxError::from(&auth_data.ctx))?;

    let task = task_service(&state)
        .add_attachments(
            &auth_data.user_id,
            &task_id,
            files,
            state.file_storage.as_ref(),
            state.upload_max_size_mb,
        )
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::with_message(
        task.into(),
        "Attachments uploaded",
    )))
}

async fn apply(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(task_id): Path<String>,
    JsonOrFormValidated(body): JsonOrFormValidated<ApplyInput>,
) -> CtxResult<Response> {
    let application = application_service(&state)
        .apply(&auth_data.user_id, &task_id, body)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    let data = ApiResponse::with_message(ApplicationView::from(application), "Application sent");
    Ok((StatusCode::CREATED, Json(data)).into_response())
}

async fn list_applications(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(task_id): Path<String>,
) -> CtxResult<Json<ApiResponse<Vec<ApplicationView>>>> {
    let applications = application_service(&state)
        .list_for_task(&auth_data.user_id, &task_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::ok(
        applications.into_iter().map(ApplicationView::from).collect(),
    )))
}

async fn update_application_status(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path((task_id, application_id)): Path<(String, String)>,
    JsonOrFormValidated(body): JsonOrFormValidated<StatusUpdateInput>,
) -> CtxResult<Json<ApiResponse<ApplicationView>>> {
    let application = task_workflow(&state)
        .update_status(&auth_data.user_id, &task_id, &application_id, body)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    let message = format!("Application {}", application.status);
    Ok(Json(ApiResponse::with_message(application.into(), message)))
}

async fn complete_task(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(task_id): Path<String>,
    JsonOrFormValidated(body): JsonOrFormValidated<CompleteTaskInput>,
) -> CtxResult<Json<ApiResponse<ApplicationView>>> {
    let application = task_workflow(&state)
        .complete(&auth_data.user_id, &task_id, body)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::with_message(
        application.into(),
        "Task completed and payment released",
    )))
}

async fn get_payment(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(task_id): Path<String>,
) -> CtxResult<Json<ApiResponse<PaymentView>>> {
    let payment = task_service(&state)
        .get_payment(&auth_data.user_id, &task_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ApiResponse::ok(payment.into())))
}
