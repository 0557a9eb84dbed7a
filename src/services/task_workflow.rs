use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    database::surrdb_utils::THROW_NOT_ACCEPTED,
    entities::{
        application::{
            ApplicationEvent, ApplicationStatus, TaskApplication,
            TABLE_NAME as APPLICATION_TABLE_NAME,
        },
        task::{Task, TABLE_NAME as TASK_TABLE_NAME},
        workflow::{ApplicationTransition, CompletionOptions},
    },
    interfaces::repositories::{
        applications::ApplicationRepositoryInterface, tasks::TaskRepositoryInterface,
        users::UserRepositoryInterface, workflow::WorkflowRepositoryInterface,
    },
    middleware::{
        error::{AppError, AppResult},
        utils::string_utils::record_id,
    },
    services::user_service::UserService,
    utils::validate_utils::trim_option_string,
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct StatusUpdateInput {
    pub status: ApplicationStatus,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct CompleteTaskInput {
    pub application_id: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Stars must be between 1 and 5"))]
    pub rating: Option<u8>,
    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(max = 1000))]
    pub review: Option<String>,
}

/// Drives every application status change. All side effects of a change
/// (escrow, release, stats, approval, rating) commit together or not at all.
pub struct TaskWorkflow<'a, A, T, U, W>
where
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    W: WorkflowRepositoryInterface,
{
    applications_repository: &'a A,
    tasks_repository: &'a T,
    workflow_repository: &'a W,
    user_service: UserService<'a, U>,
}

impl<'a, A, T, U, W> TaskWorkflow<'a, A, T, U, W>
where
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    W: WorkflowRepositoryInterface,
{
    pub fn new(
        applications_repository: &'a A,
        tasks_repository: &'a T,
        users_repository: &'a U,
        workflow_repository: &'a W,
    ) -> Self {
        Self {
            applications_repository,
            tasks_repository,
            workflow_repository,
            user_service: UserService::new(users_repository),
        }
    }

    pub async fn transition(
        &self,
        application: &TaskApplication,
        task: &Task,
        event: ApplicationEvent,
        options: CompletionOptions,
    ) -> AppResult<TaskApplication> {
        let transition = ApplicationTransition::plan(application, task, event, options)?;
        let (from, to) = (transition.from, transition.to);
        let updated = self.workflow_repository.apply(transition).await?;
        tracing::info!("{} moved {from} -> {to}", updated.id);

        if to == ApplicationStatus::Completed {
            // stats and average are committed, the badge follows them
            self.user_service.sync_badge(&updated.worker).await;
        }
        Ok(updated)
    }

    pub async fn update_status(
        &self,
        user_id: &str,
        task_id: &str,
        application_id: &str,
        input: StatusUpdateInput,
    ) -> AppResult<TaskApplication> {
        let event = match input.status {
            ApplicationStatus::Accepted => ApplicationEvent::Accept,
            ApplicationStatus::Rejected => ApplicationEvent::Reject,
            other => {
                return Err(AppError::Validation {
                    details: serde_json::json!({
                        "status": format!("{other} can not be set directly, use ACCEPTED or REJECTED")
                    }),
                })
            }
        };

        let task = self.employer_task(user_id, task_id).await?;
        let application = self
            .applications_repository
            .get(&record_id(APPLICATION_TABLE_NAME, application_id)?)
            .await?;
        if application.task != task.id {
            return Err(AppError::EntityFailIdNotFound {
                ident: application.id.to_raw(),
            });
        }

        self.transition(&application, &task, event, CompletionOptions::default())
            .await
    }

    /// Completes the accepted application of the task and releases its payment.
    pub async fn complete(
        &self,
        user_id: &str,
        task_id: &str,
        input: CompleteTaskInput,
    ) -> AppResult<TaskApplication> {
        input.validate()?;
        let task = self.employer_task(user_id, task_id).await?;

        let application = match input.application_id.as_deref() {
            Some(id) => {
                let application = self
                    .applications_repository
                    .get(&record_id(APPLICATION_TABLE_NAME, id)?)
                    .await?;
                if application.task != task.id {
                    return Err(AppError::EntityFailIdNotFound {
                        ident: application.id.to_raw(),
                    });
                }
                application
            }
            None => self
                .applications_repository
                .get_accepted_for_task(&task.id)
                .await?
                .ok_or(AppError::conflict(THROW_NOT_ACCEPTED))?,
        };

        let options = CompletionOptions {
            approved_submission: None,
            worker_rating: input.rating.map(|stars| (stars, input.review)),
        };
        self.transition(&application, &task, ApplicationEvent::Complete, options)
            .await
    }

    async fn employer_task(&self, user_id: &str, task_id: &str) -> AppResult<Task> {
        let user = self.user_service.get(user_id).await?;
        let task = self
            .tasks_repository
            .get(&record_id(TASK_TABLE_NAME, task_id)?)
            .await?;
        if task.employer != user.id {
            return Err(AppError::Forbidden);
        }
        Ok(task)
    }
}
