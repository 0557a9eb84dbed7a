use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::submission::{SubmissionCreate, SubmissionStatus, TaskSubmission};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait SubmissionRepositoryInterface {
    /// Adds the next version and demotes the previous latest one.
    async fn create(&self, data: SubmissionCreate) -> AppResult<TaskSubmission>;
    async fn get(&self, id: &Thing) -> AppResult<TaskSubmission>;
    async fn list_by_application(&self, application: &Thing) -> AppResult<Vec<TaskSubmission>>;
    /// Reviews a latest SUBMITTED submission without touching the application.
    async fn review(
        &self,
        id: &Thing,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> AppResult<TaskSubmission>;
}
