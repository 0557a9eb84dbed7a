use async_trait::async_trait;
use axum::body::Body;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{
    response::{IntoResponse, Response},
    Form, Json, RequestExt,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::middleware::error::AppError;

pub const MAX_PAGE_COUNT: u16 = 100;
pub const DEFAULT_PAGE_COUNT: u16 = 20;

/// JSON or urlencoded body that has passed `validator` checks.
#[derive(Debug)]
pub struct JsonOrFormValidated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrFormValidated<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<(), Rejection = JsonRejection>,
    Form<T>: FromRequest<(), Rejection = FormRejection>,
    T: DeserializeOwned + Validate + Send + Sync + 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let content_type_header = req.headers().get(CONTENT_TYPE);
        let content_type = content_type_header.and_then(|value| value.to_str().ok());

        if let Some(content_type) = content_type {
            if content_type.starts_with("application/json") {
                let Json(payload) = req
                    .extract::<Json<T>, _>()
                    .await
                    .map_err(|err| body_error(err.body_text()))?;
                payload
                    .validate()
                    .map_err(|err| AppError::from(err).into_response())?;
                return Ok(Self(payload));
            }

            if content_type.starts_with("application/x-www-form-urlencoded") {
                let Form(payload) = req
                    .extract::<Form<T>, _>()
                    .await
                    .map_err(|err| body_error(err.body_text()))?;
                payload
                    .validate()
                    .map_err(|err| AppError::from(err).into_response())?;
                return Ok(Self(payload));
            }
        }

        Err(AppError::Generic {
            description: "Expected a JSON or form body".to_string(),
        }
        .into_response())
    }
}

fn body_error(text: String) -> Response {
    AppError::Validation {
        details: json!({ "body": text }),
    }
    .into_response()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaginationParams {
    pub start: Option<u32>,
    pub count: Option<u16>,
}

impl PaginationParams {
    pub fn start(&self) -> u32 {
        self.start.unwrap_or(0)
    }

    pub fn count(&self) -> u16 {
        self.count
            .unwrap_or(DEFAULT_PAGE_COUNT)
            .clamp(1, MAX_PAGE_COUNT)
    }
}
