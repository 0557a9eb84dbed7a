use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::rating::{Rating, RatingCreate};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait RatingRepositoryInterface {
    /// Inserts the rating and recomputes the rated user's average.
    async fn create(&self, data: RatingCreate) -> AppResult<Rating>;
    async fn list_for_user(&self, user: &Thing) -> AppResult<Vec<Rating>>;
    async fn list_for_application(&self, application: &Thing) -> AppResult<Vec<Rating>>;
}
