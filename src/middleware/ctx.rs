use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use uuid::Uuid;

use super::error::{AppError, AppResult, CtxError, CtxResult};
use crate::middleware::mw_ctx::{CtxState, JWT_KEY};
use crate::utils::jwt::TokenType;

#[derive(Clone, Debug)]
pub struct Ctx {
    result_user_id: AppResult<String>,
    req_id: Uuid,
}

impl Ctx {
    pub fn new(result_user_id: AppResult<String>, req_id: Uuid) -> Self {
        Self {
            result_user_id,
            req_id,
        }
    }

    pub fn req_id(&self) -> Uuid {
        self.req_id
    }

    pub fn user_id(&self) -> CtxResult<String> {
        self.result_user_id.clone().map_err(|error| self.to_ctx_error(error))
    }

    pub fn to_ctx_error(&self, error: AppError) -> CtxError {
        CtxError {
            req_id: self.req_id,
            error,
        }
    }
}

/// Login token from the `jwt` cookie, falling back to an `Authorization: Bearer` header.
pub(crate) fn request_token(parts: &Parts) -> Option<String> {
    let cookies = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = cookies.get(JWT_KEY) {
        return Some(cookie.value().to_string());
    }
    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

#[async_trait]
impl FromRequestParts<Arc<CtxState>> for Ctx {
    type Rejection = CtxError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<CtxState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<Ctx>() {
            return Ok(ctx.clone());
        }

        let jwt_user_id = match request_token(parts) {
            Some(token) => state
                .jwt
                .decode_by_type(&token, TokenType::Login)
                .map(|claims| claims.auth)
                .map_err(|source| AppError::AuthFailJwtInvalid { source }),
            None => Err(AppError::AuthFailNoJwtCookie),
        };

        let ctx = Ctx::new(jwt_user_id, Uuid::new_v4());
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
