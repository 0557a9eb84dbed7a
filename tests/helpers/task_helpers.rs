use axum_test::{TestResponse, TestServer};
use bronze_server::{
    entities::user::{Badge, UserRole},
    models::view::{application::ApplicationView, task::TaskView},
};
use fake::{faker, Fake};
use serde_json::{json, Value};

use super::user_helpers::{create_fake_login_test_user, TestUser};

pub fn fake_task_input(pay_amount: u64, min_badge: Badge) -> Value {
    json!({
        "title": "Label product images",
        "description": faker::lorem::en::Sentence(8..16).fake::<String>(),
        "category": "Data",
        "pay_amount": pay_amount,
        "duration_hours": 4,
        "skill_tags": ["labeling", "images"],
        "difficulty": "EASY",
        "min_badge": min_badge,
    })
}

pub async fn create_task(server: &TestServer, employer: &TestUser, input: &Value) -> TaskView {
    let response = server
        .post("/api/bronze-tasks")
        .json(input)
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_success();
    super::data::<TaskView>(&response)
}

pub async fn apply(server: &TestServer, worker: &TestUser, task_id: &str) -> TestResponse {
    server
        .post(&format!("/api/bronze-tasks/{task_id}/apply"))
        .json(&json!({ "message": faker::lorem::en::Sentence(3..6).fake::<String>() }))
        .add_header("Cookie", worker.cookie())
        .await
}

pub async fn set_status(
    server: &TestServer,
    employer: &TestUser,
    task_id: &str,
    application_id: &str,
    status: &str,
) -> TestResponse {
    server
        .put(&format!(
            "/api/bronze-tasks/{task_id}/applications/{application_id}/status"
        ))
        .json(&json!({ "status": status }))
        .add_header("Cookie", employer.cookie())
        .await
}

pub async fn complete(
    server: &TestServer,
    employer: &TestUser,
    task_id: &str,
    body: Value,
) -> TestResponse {
    server
        .post(&format!("/api/bronze-tasks/{task_id}/complete"))
        .json(&body)
        .add_header("Cookie", employer.cookie())
        .await
}

pub struct AcceptedTask {
    pub employer: TestUser,
    pub worker: TestUser,
    pub task: TaskView,
    pub application: ApplicationView,
}

/// Employer posts a task and accepts a fresh worker's application.
pub async fn accepted_task(server: &TestServer, pay_amount: u64) -> AcceptedTask {
    let employer = create_fake_login_test_user(server, UserRole::Employer).await;
    let worker = create_fake_login_test_user(server, UserRole::Worker).await;
    let task = create_task(server, &employer, &fake_task_input(pay_amount, Badge::Bronze)).await;

    let response = apply(server, &worker, &task.id).await;
    response.assert_status_success();
    let application = super::data::<ApplicationView>(&response);

    let response = set_status(server, &employer, &task.id, &application.id, "ACCEPTED").await;
    response.assert_status_success();
    let application = super::data::<ApplicationView>(&response);

    AcceptedTask {
        employer,
        worker,
        task,
        application,
    }
}
