use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::user::{Authentication, Badge, LocalUser, LocalUserCreate};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait UserRepositoryInterface {
    /// Creates the user and its password authentication in one transaction.
    async fn create_with_password(
        &self,
        data: LocalUserCreate,
        password_hash: String,
    ) -> AppResult<LocalUser>;
    async fn get_by_id(&self, id: &Thing) -> AppResult<LocalUser>;
    async fn get_by_username(&self, username: &str) -> AppResult<Option<LocalUser>>;
    async fn get_password_auth(&self, user: &Thing) -> AppResult<Option<Authentication>>;
    async fn set_badge(&self, user: &Thing, badge: Badge) -> AppResult<()>;
}
