mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bronze_server::{
    entities::{
        payment::PaymentStatus,
        task::{Difficulty, TaskStatus},
        user::{Badge, UserRole},
    },
    models::view::task::{PaymentView, TaskView},
};
use helpers::{
    data, error_of,
    task_helpers::{create_task, fake_task_input},
    user_helpers::create_fake_login_test_user,
};
use serde_json::json;

test_with_server!(employer_creates_task_with_pending_payment, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(500, Badge::Bronze)).await;

    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.employer, employer.user.id);
    assert_eq!(task.category, "data");
    assert_eq!(task.difficulty, Difficulty::Easy);
    assert_eq!(task.min_badge, Badge::Bronze);
    assert!(task.attachments.is_empty());

    let response = server
        .get(&format!("/api/bronze-tasks/{}/payment", task.id))
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_success();
    let payment = data::<PaymentView>(&response);
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.amount, 500);
    assert_eq!(payment.task, task.id);
    assert!(payment.worker.is_none());
});

test_with_server!(worker_can_not_create_task, |server, ctx_state, config| {
    let worker = create_fake_login_test_user(&server, UserRole::Worker).await;
    let response = server
        .post("/api/bronze-tasks")
        .json(&fake_task_input(100, Badge::Bronze))
        .add_header("Cookie", worker.cookie())
        .await;
    response.assert_status_forbidden();
});

test_with_server!(create_task_validates_input, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let mut input = fake_task_input(0, Badge::Bronze);
    input["title"] = json!("abc");
    input["duration_hours"] = json!(1000);

    let response = server
        .post("/api/bronze-tasks")
        .json(&input)
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"], "Validation error");
    assert!(body["details"]["title"].is_array());
    assert!(body["details"]["pay_amount"].is_array());
    assert!(body["details"]["duration_hours"].is_array());
});

test_with_server!(create_task_rejects_oversized_pay, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let response = server
        .post("/api/bronze-tasks")
        .json(&fake_task_input(u64::MAX, Badge::Bronze))
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"], "Validation error");
    assert!(body["details"]["pay_amount"].is_array());

    let task = create_task(&server, &employer, &fake_task_input(1_000_000_000, Badge::Bronze)).await;
    assert_eq!(task.pay_amount, 1_000_000_000);
});

test_with_server!(list_filters_and_paginates, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    for _ in 0..3 {
        create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;
    }
    let mut design = fake_task_input(200, Badge::Bronze);
    design["category"] = json!("design");
    design["difficulty"] = json!("HARD");
    create_task(&server, &employer, &design).await;

    let response = server.get("/api/bronze-tasks").await;
    response.assert_status_success();
    assert_eq!(data::<Vec<TaskView>>(&response).len(), 4);

    let response = server
        .get("/api/bronze-tasks")
        .add_query_param("category", "Design")
        .await;
    let tasks = data::<Vec<TaskView>>(&response);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].difficulty, Difficulty::Hard);

    let response = server
        .get("/api/bronze-tasks")
        .add_query_param("start", 1)
        .add_query_param("count", 2)
        .await;
    assert_eq!(data::<Vec<TaskView>>(&response).len(), 2);

    let response = server
        .get("/api/bronze-tasks")
        .add_query_param("status", "COMPLETED")
        .await;
    assert!(data::<Vec<TaskView>>(&response).is_empty());

    let response = server
        .get("/api/bronze-tasks")
        .add_query_param("status", "CANCELLED")
        .await;
    response.assert_status_bad_request();

    let response = server
        .get("/api/bronze-tasks/posted")
        .add_header("Cookie", employer.cookie())
        .await;
    assert_eq!(data::<Vec<TaskView>>(&response).len(), 4);
});

test_with_server!(get_task_by_id, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;
    let bare_id = task.id.trim_start_matches("task:").to_string();

    let response = server.get(&format!("/api/bronze-tasks/{bare_id}")).await;
    response.assert_status_success();
    assert_eq!(data::<TaskView>(&response).id, task.id);

    let response = server.get("/api/bronze-tasks/missing").await;
    response.assert_status_not_found();
    assert_eq!(error_of(&response), "Not found");
});

test_with_server!(employer_uploads_attachments, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;

    let form = MultipartForm::new()
        .add_part(
            "attachments[]",
            Part::bytes(b"col_a,col_b\n1,2\n".to_vec())
                .file_name("Sample data.csv")
                .mime_type("text/csv"),
        )
        .add_part(
            "attachments[]",
            Part::bytes(b"instructions".to_vec())
                .file_name("brief.txt")
                .mime_type("text/plain"),
        );
    let response = server
        .post(&format!("/api/bronze-tasks/{}/attachments", task.id))
        .multipart(form)
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_success();
    let task = data::<TaskView>(&response);
    assert_eq!(task.attachments.len(), 2);
    assert!(task.attachments[0].url.starts_with("/uploads/tasks/"));
    assert!(task.attachments[0].url.ends_with("Sample_data.csv"));
});

test_with_server!(attachment_type_is_filtered, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;

    let form = MultipartForm::new().add_part(
        "attachments[]",
        Part::bytes(b"MZ".to_vec())
            .file_name("tool.exe")
            .mime_type("application/octet-stream"),
    );
    let response = server
        .post(&format!("/api/bronze-tasks/{}/attachments", task.id))
        .multipart(form)
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_bad_request();
    assert_eq!(error_of(&response), "Invalid file");
});

test_with_server!(only_task_employer_uploads, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let other = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;

    let form = MultipartForm::new().add_part(
        "attachments[]",
        Part::bytes(b"hello".to_vec())
            .file_name("brief.txt")
            .mime_type("text/plain"),
    );
    let response = server
        .post(&format!("/api/bronze-tasks/{}/attachments", task.id))
        .multipart(form)
        .add_header("Cookie", other.cookie())
        .await;
    response.assert_status_forbidden();

    let response = server
        .get(&format!("/api/bronze-tasks/{}/payment", task.id))
        .add_header("Cookie", other.cookie())
        .await;
    response.assert_status_forbidden();
});
