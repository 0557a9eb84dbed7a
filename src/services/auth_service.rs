use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::user::{LocalUser, LocalUserCreate, UserRole},
    interfaces::repositories::users::UserRepositoryInterface,
    middleware::error::{AppError, AppResult},
    utils::{
        hash::{hash_password, verify_password},
        jwt::JWT,
        validate_utils::{trim_string, validate_username},
    },
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 6, message = "Min 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub struct AuthService<'a, U>
where
    U: UserRepositoryInterface,
{
    users_repository: &'a U,
    jwt: &'a JWT,
}

impl<'a, U> AuthService<'a, U>
where
    U: UserRepositoryInterface,
{
    pub fn new(users_repository: &'a U, jwt: &'a JWT) -> Self {
        Self {
            users_repository,
            jwt,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> AppResult<(String, LocalUser)> {
        input.validate()?;

        let password_hash =
            hash_password(&input.password).map_err(|e| AppError::Generic { description: e })?;

        let user = self
            .users_repository
            .create_with_password(
                LocalUserCreate {
                    username: input.username,
                    full_name: input.full_name,
                    email: input.email,
                    role: input.role,
                },
                password_hash,
            )
            .await?;

        tracing::info!("registered {} as {}", user.id, user.role);
        let token = self.build_token(&user)?;
        Ok((token, user))
    }

    pub async fn login(&self, input: LoginInput) -> AppResult<(String, LocalUser)> {
        input.validate()?;

        let user = self
            .users_repository
            .get_by_username(input.username.trim())
            .await?
            .ok_or(AppError::AuthenticationFail)?;

        let auth = self
            .users_repository
            .get_password_auth(&user.id)
            .await?
            .ok_or(AppError::AuthenticationFail)?;

        if !verify_password(&auth.token, &input.password) {
            return Err(AppError::AuthenticationFail);
        }

        let token = self.build_token(&user)?;
        Ok((token, user))
    }

    fn build_token(&self, user: &LocalUser) -> AppResult<String> {
        self.jwt
            .create_by_login(&user.id.to_raw())
            .map_err(|e| AppError::Generic { description: e })
    }
}
