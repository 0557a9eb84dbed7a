use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::file_meta::FileMeta;
use crate::entities::task::{Task, TaskCreate, TaskFilter};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait TaskRepositoryInterface {
    /// Creates the task together with its PENDING payment.
    async fn create(&self, data: TaskCreate) -> AppResult<Task>;
    async fn get(&self, id: &Thing) -> AppResult<Task>;
    async fn list(&self, filter: TaskFilter) -> AppResult<Vec<Task>>;
    async fn list_by_employer(&self, employer: &Thing) -> AppResult<Vec<Task>>;
    async fn add_attachments(
        &self,
        id: &Thing,
        files: Vec<FileMeta>,
        max_attachments: usize,
    ) -> AppResult<Task>;
}
