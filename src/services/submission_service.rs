use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    database::surrdb_utils::{THROW_NOT_ACCEPTED, THROW_SUBMISSION_REVIEWED},
    entities::{
        application::{ApplicationEvent, ApplicationStatus, TaskApplication, TABLE_NAME as APPLICATION_TABLE_NAME},
        submission::{
            ReviewDecision, SubmissionCreate, SubmissionStatus, TaskSubmission, MAX_FILES,
            TABLE_NAME as SUBMISSION_TABLE_NAME,
        },
        workflow::CompletionOptions,
    },
    interfaces::{
        file_storage::FileStorageInterface,
        repositories::{
            applications::ApplicationRepositoryInterface,
            submissions::SubmissionRepositoryInterface, tasks::TaskRepositoryInterface,
            users::UserRepositoryInterface, workflow::WorkflowRepositoryInterface,
        },
    },
    middleware::{
        error::{AppError, AppResult},
        utils::string_utils::record_id,
    },
    services::{task_workflow::TaskWorkflow, user_service::UserService},
    utils::{
        file::{
            convert::FileUpload,
            uploads::{remove_uploads, store_uploads, UploadFilter},
        },
        validate_utils::{trim_option_string, validate_links},
    },
};

#[derive(Debug, Default, Validate)]
pub struct SubmissionInput {
    #[validate(length(min = 1, max = 10000))]
    pub content: Option<String>,
    #[validate(length(max = 10), custom(function = "validate_links"))]
    pub links: Vec<String>,
    pub files: Vec<FileUpload>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ReviewInput {
    pub status: ReviewDecision,
    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Stars must be between 1 and 5"))]
    pub rating: Option<u8>,
    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(max = 1000))]
    pub review: Option<String>,
}

#[derive(Debug)]
pub struct ReviewOutcome {
    pub submission: TaskSubmission,
    pub application: TaskApplication,
}

pub struct SubmissionService<'a, S, A, T, U, W>
where
    S: SubmissionRepositoryInterface,
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    W: WorkflowRepositoryInterface,
{
    submissions_repository: &'a S,
    applications_repository: &'a A,
    tasks_repository: &'a T,
    user_service: UserService<'a, U>,
    workflow: TaskWorkflow<'a, A, T, U, W>,
}

impl<'a, S, A, T, U, W> SubmissionService<'a, S, A, T, U, W>
where
    S: SubmissionRepositoryInterface,
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    W: WorkflowRepositoryInterface,
{
    pub fn new(
        submissions_repository: &'a S,
        applications_repository: &'a A,
        tasks_repository: &'a T,
        users_repository: &'a U,
        workflow_repository: &'a W,
    ) -> Self {
        Self {
            submissions_repository,
            applications_repository,
            tasks_repository,
            user_service: UserService::new(users_repository),
            workflow: TaskWorkflow::new(
                applications_repository,
                tasks_repository,
                users_repository,
                workflow_repository,
            ),
        }
    }

    pub async fn submit(
        &self,
        user_id: &str,
        application_id: &str,
        input: SubmissionInput,
        storage: &(dyn FileStorageInterface + Send + Sync),
        max_size_mb: u64,
    ) -> AppResult<TaskSubmission> {
        input.validate()?;
        if input.content.is_none() && input.links.is_empty() && input.files.is_empty() {
            return Err(AppError::Validation {
                details: serde_json::json!({
                    "content": "Provide content, links or files"
                }),
            });
        }

        let user = self.user_service.get(user_id).await?;
        let application = self
            .applications_repository
            .get(&record_id(APPLICATION_TABLE_NAME, application_id)?)
            .await?;
        if application.worker != user.id {
            return Err(AppError::Forbidden);
        }
        if application.status != ApplicationStatus::Accepted {
            return Err(AppError::conflict(THROW_NOT_ACCEPTED));
        }

        UploadFilter::new(max_size_mb, MAX_FILES).check_all(&input.files, 0)?;
        let dir = format!("submissions/{}", application.id.id.to_raw());
        let files = store_uploads(storage, &dir, input.files).await?;

        let created = self
            .submissions_repository
            .create(SubmissionCreate {
                application: application.id.clone(),
                task: application.task.clone(),
                worker: application.worker.clone(),
                content: input.content,
                links: input.links,
                files: files.clone(),
            })
            .await;

        match created {
            Ok(submission) => {
                tracing::info!(
                    "{} submitted version {} for {}",
                    user.id,
                    submission.version,
                    application.id
                );
                Ok(submission)
            }
            Err(err) => {
                remove_uploads(storage, &dir, &files).await;
                Err(err)
            }
        }
    }

    /// All versions of the application's work, newest first.
    pub async fn list(&self, user_id: &str, application_id: &str) -> AppResult<Vec<TaskSubmission>> {
        let user = self.user_service.get(user_id).await?;
        let application = self
            .applications_repository
            .get(&record_id(APPLICATION_TABLE_NAME, application_id)?)
            .await?;
        if application.worker != user.id {
            let task = self.tasks_repository.get(&application.task).await?;
            if task.employer != user.id {
                return Err(AppError::Forbidden);
            }
        }
        self.submissions_repository
            .list_by_application(&application.id)
            .await
    }

    pub async fn review(
        &self,
        user_id: &str,
        submission_id: &str,
        input: ReviewInput,
    ) -> AppResult<ReviewOutcome> {
        input.validate()?;
        let user = self.user_service.get(user_id).await?;
        let submission = self
            .submissions_repository
            .get(&record_id(SUBMISSION_TABLE_NAME, submission_id)?)
            .await?;
        let task = self.tasks_repository.get(&submission.task).await?;
        if task.employer != user.id {
            return Err(AppError::Forbidden);
        }
        if submission.status != SubmissionStatus::Submitted || !submission.is_latest {
            return Err(AppError::conflict(THROW_SUBMISSION_REVIEWED));
        }
        let application = self
            .applications_repository
            .get(&submission.application)
            .await?;

        match input.status {
            ReviewDecision::Approved => {
                let options = CompletionOptions {
                    approved_submission: Some((submission.id.clone(), input.feedback)),
                    worker_rating: input.rating.map(|stars| (stars, input.review)),
                };
                let application = self
                    .workflow
                    .transition(&application, &task, ApplicationEvent::Complete, options)
                    .await?;
                let submission = self.submissions_repository.get(&submission.id).await?;
                Ok(ReviewOutcome {
                    submission,
                    application,
                })
            }
            decision => {
                let submission = self
                    .submissions_repository
                    .review(&submission.id, decision.into(), input.feedback)
                    .await?;
                tracing::info!("{} reviewed as {decision}", submission.id);
                Ok(ReviewOutcome {
                    submission,
                    application,
                })
            }
        }
    }
}
