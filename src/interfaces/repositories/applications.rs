use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::application::TaskApplication;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait ApplicationRepositoryInterface {
    async fn create(
        &self,
        task: &Thing,
        worker: &Thing,
        message: Option<String>,
    ) -> AppResult<TaskApplication>;
    async fn get(&self, id: &Thing) -> AppResult<TaskApplication>;
    async fn list_by_task(&self, task: &Thing) -> AppResult<Vec<TaskApplication>>;
    async fn list_by_worker(&self, worker: &Thing) -> AppResult<Vec<TaskApplication>>;
    async fn get_accepted_for_task(&self, task: &Thing) -> AppResult<Option<TaskApplication>>;
}
