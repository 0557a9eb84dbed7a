mod helpers;

use bronze_server::{
    entities::{
        application::ApplicationStatus,
        user::{Badge, UserRole},
    },
    models::view::application::ApplicationView,
};
use helpers::{
    data, error_of,
    task_helpers::{accepted_task, apply, create_task, fake_task_input},
    user_helpers::create_fake_login_test_user,
};

test_with_server!(worker_applies_once, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let worker = create_fake_login_test_user(&server, UserRole::Worker).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;

    let response = apply(&server, &worker, &task.id).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let application = data::<ApplicationView>(&response);
    assert_eq!(application.status, ApplicationStatus::Applied);
    assert_eq!(application.task, task.id);
    assert_eq!(application.worker, worker.user.id);
    assert_eq!(application.timelines.len(), 1);

    let response = apply(&server, &worker, &task.id).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    assert_eq!(error_of(&response), "Application already exists");

    let response = server
        .get("/api/bronze-tasks/my-applications")
        .add_header("Cookie", worker.cookie())
        .await;
    response.assert_status_success();
    assert_eq!(data::<Vec<ApplicationView>>(&response).len(), 1);
});

test_with_server!(employers_can_not_apply, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let other_employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;

    let response = apply(&server, &employer, &task.id).await;
    response.assert_status_forbidden();
    let response = apply(&server, &other_employer, &task.id).await;
    response.assert_status_forbidden();
});

test_with_server!(badge_gates_applications, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let worker = create_fake_login_test_user(&server, UserRole::Worker).await;
    let task = create_task(&server, &employer, &fake_task_input(900, Badge::Gold)).await;
    assert_eq!(task.min_badge, Badge::Gold);

    let response = apply(&server, &worker, &task.id).await;
    response.assert_status_forbidden();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"], "Forbidden");
    assert!(body["message"].as_str().unwrap().contains("GOLD"));
});

test_with_server!(apply_requires_open_task, |server, ctx_state, config| {
    let accepted = accepted_task(&server, 300).await;
    let late_worker = create_fake_login_test_user(&server, UserRole::Worker).await;

    let response = apply(&server, &late_worker, &accepted.task.id).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    assert_eq!(error_of(&response), "Task is not open");
});

test_with_server!(applications_visible_to_task_employer, |server, ctx_state, config| {
    let employer = create_fake_login_test_user(&server, UserRole::Employer).await;
    let task = create_task(&server, &employer, &fake_task_input(100, Badge::Bronze)).await;
    for _ in 0..2 {
        let worker = create_fake_login_test_user(&server, UserRole::Worker).await;
        apply(&server, &worker, &task.id).await.assert_status_success();
    }

    let response = server
        .get(&format!("/api/bronze-tasks/{}/applications", task.id))
        .add_header("Cookie", employer.cookie())
        .await;
    response.assert_status_success();
    assert_eq!(data::<Vec<ApplicationView>>(&response).len(), 2);

    let outsider = create_fake_login_test_user(&server, UserRole::Worker).await;
    let response = server
        .get(&format!("/api/bronze-tasks/{}/applications", task.id))
        .add_header("Cookie", outsider.cookie())
        .await;
    response.assert_status_forbidden();
});
