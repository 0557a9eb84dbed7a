#![allow(dead_code)]

pub mod task_helpers;
pub mod test_with_server;
pub mod user_helpers;

use axum_test::TestResponse;
use bronze_server::models::response::ApiResponse;
use serde::de::DeserializeOwned;

/// `data` of a success envelope.
pub fn data<T: DeserializeOwned>(response: &TestResponse) -> T {
    response.json::<ApiResponse<T>>().data
}

/// `error` of a failure envelope.
pub fn error_of(response: &TestResponse) -> String {
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], false);
    body["error"].as_str().unwrap_or_default().to_string()
}
