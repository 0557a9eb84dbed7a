use async_trait::async_trait;

use crate::entities::application::TaskApplication;
use crate::entities::workflow::ApplicationTransition;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait WorkflowRepositoryInterface {
    /// Applies the status change and all its effects atomically. Fails with a
    /// conflict when the application is no longer in `transition.from`.
    async fn apply(&self, transition: ApplicationTransition) -> AppResult<TaskApplication>;
}
