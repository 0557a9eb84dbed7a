mod helpers;

use axum_test::{TestResponse, TestServer};
use bronze_server::{
    entities::{
        rating::RaterType,
        user::UserRole,
    },
    models::view::rating::{RatingView, UserRatingsView},
};
use helpers::{
    data, error_of,
    task_helpers::{accepted_task, complete, AcceptedTask},
    user_helpers::{create_fake_login_test_user, TestUser},
};
use serde_json::json;

async fn rate(
    server: &TestServer,
    rater: &TestUser,
    application_id: &str,
    stars: u8,
) -> TestResponse {
    server
        .post("/api/ratings/submit")
        .json(&json!({
            "application_id": application_id,
            "stars": stars,
            "review": "Clear brief",
        }))
        .add_header("Cookie", rater.cookie())
        .await
}

async fn completed_task(server: &TestServer) -> AcceptedTask {
    let accepted = accepted_task(server, 100).await;
    complete(server, &accepted.employer, &accepted.task.id, json!({}))
        .await
        .assert_status_success();
    accepted
}

test_with_server!(stars_out_of_range_are_rejected, |server, ctx_state, config| {
    let done = completed_task(&server).await;
    let response = rate(&server, &done.worker, &done.application.id, 6).await;
    response.assert_status_bad_request();
    assert_eq!(error_of(&response), "Validation error");

    let response = rate(&server, &done.worker, &done.application.id, 0).await;
    response.assert_status_bad_request();
});

test_with_server!(rating_needs_completed_application, |server, ctx_state, config| {
    let accepted = accepted_task(&server, 100).await;
    let response = rate(&server, &accepted.employer, &accepted.application.id, 5).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    assert_eq!(error_of(&response), "Application is not completed");
});

test_with_server!(each_side_rates_once, |server, ctx_state, config| {
    let done = completed_task(&server).await;

    let response = rate(&server, &done.worker, &done.application.id, 4).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let rating = data::<RatingView>(&response);
    assert_eq!(rating.rater_type, RaterType::Worker);
    assert_eq!(rating.rated_employer.as_deref(), Some(done.employer.user.id.as_str()));
    assert!(rating.rated_worker.is_none());

    let response = rate(&server, &done.worker, &done.application.id, 5).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    assert_eq!(error_of(&response), "Rating already submitted");

    let response = rate(&server, &done.employer, &done.application.id, 3).await;
    response.assert_status_success();
    let rating = data::<RatingView>(&response);
    assert_eq!(rating.rater_type, RaterType::Employer);
    assert_eq!(rating.rated_worker.as_deref(), Some(done.worker.user.id.as_str()));

    let response = server
        .get(&format!("/api/ratings/applications/{}", done.application.id))
        .await;
    response.assert_status_success();
    assert_eq!(data::<Vec<RatingView>>(&response).len(), 2);
});

test_with_server!(outsiders_can_not_rate, |server, ctx_state, config| {
    let done = completed_task(&server).await;
    let outsider = create_fake_login_test_user(&server, UserRole::Worker).await;
    let response = rate(&server, &outsider, &done.application.id, 5).await;
    response.assert_status_forbidden();
});

test_with_server!(user_ratings_include_summary, |server, ctx_state, config| {
    let first = completed_task(&server).await;
    rate(&server, &first.employer, &first.application.id, 5)
        .await
        .assert_status_success();

    let response = server
        .get(&format!("/api/ratings/users/{}", first.worker.user.id))
        .await;
    response.assert_status_success();
    let ratings = data::<UserRatingsView>(&response);
    assert_eq!(ratings.ratings.len(), 1);
    assert_eq!(ratings.summary.count, 1);
    assert_eq!(ratings.summary.average, 5.0);

    let response = server
        .get(&format!("/api/ratings/users/{}", first.employer.user.id))
        .await;
    let ratings = data::<UserRatingsView>(&response);
    assert!(ratings.ratings.is_empty());
    assert_eq!(ratings.summary.count, 0);
});
