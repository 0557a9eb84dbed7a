use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    database::surrdb_utils::THROW_TASK_NOT_OPEN,
    entities::{
        application::TaskApplication,
        task::{TaskStatus, TABLE_NAME as TASK_TABLE_NAME},
        user::UserRole,
    },
    interfaces::repositories::{
        applications::ApplicationRepositoryInterface, tasks::TaskRepositoryInterface,
        users::UserRepositoryInterface,
    },
    middleware::{
        error::{AppError, AppResult},
        utils::string_utils::record_id,
    },
    services::user_service::UserService,
    utils::validate_utils::trim_option_string,
};

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct ApplyInput {
    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

pub struct ApplicationService<'a, A, T, U>
where
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
{
    applications_repository: &'a A,
    tasks_repository: &'a T,
    user_service: UserService<'a, U>,
}

impl<'a, A, T, U> ApplicationService<'a, A, T, U>
where
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
{
    pub fn new(
        applications_repository: &'a A,
        tasks_repository: &'a T,
        users_repository: &'a U,
    ) -> Self {
        Self {
            applications_repository,
            tasks_repository,
            user_service: UserService::new(users_repository),
        }
    }

    pub async fn apply(
        &self,
        user_id: &str,
        task_id: &str,
        input: ApplyInput,
    ) -> AppResult<TaskApplication> {
        input.validate()?;
        let worker = self
            .user_service
            .get_with_role(user_id, UserRole::Worker)
            .await?;
        let task = self
            .tasks_repository
            .get(&record_id(TASK_TABLE_NAME, task_id)?)
            .await?;

        if task.employer == worker.id {
            return Err(AppError::Forbidden);
        }
        if task.status != TaskStatus::Open {
            return Err(AppError::conflict(THROW_TASK_NOT_OPEN));
        }
        if worker.badge < task.min_badge {
            return Err(AppError::AuthorizationFail {
                required: format!("{} badge", task.min_badge),
            });
        }

        let application = self
            .applications_repository
            .create(&task.id, &worker.id, input.message)
            .await?;
        tracing::info!("{} applied to {}", worker.id, task.id);
        Ok(application)
    }

    pub async fn list_for_task(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> AppResult<Vec<TaskApplication>> {
        let user = self.user_service.get(user_id).await?;
        let task = self
            .tasks_repository
            .get(&record_id(TASK_TABLE_NAME, task_id)?)
            .await?;
        if task.employer != user.id {
            return Err(AppError::Forbidden);
        }
        self.applications_repository.list_by_task(&task.id).await
    }

    pub async fn list_mine(&self, user_id: &str) -> AppResult<Vec<TaskApplication>> {
        let user = self.user_service.get(user_id).await?;
        self.applications_repository.list_by_worker(&user.id).await
    }
}
