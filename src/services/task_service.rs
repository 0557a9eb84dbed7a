use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{
        payment::Payment,
        task::{Difficulty, Task, TaskCreate, TaskFilter, TaskStatus, MAX_ATTACHMENTS, TABLE_NAME},
        user::{Badge, UserRole},
    },
    interfaces::{
        file_storage::FileStorageInterface,
        repositories::{
            payments::PaymentRepositoryInterface, tasks::TaskRepositoryInterface,
            users::UserRepositoryInterface,
        },
    },
    middleware::{
        error::{AppError, AppResult},
        utils::{extractor_utils::PaginationParams, string_utils::record_id},
    },
    services::user_service::UserService,
    utils::{
        file::{
            convert::FileUpload,
            uploads::{remove_uploads, store_uploads, UploadFilter},
        },
        validate_utils::{trim_string, validate_skill_tags},
    },
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TaskInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 5, max = 120, message = "Title must have 5 to 120 characters"))]
    pub title: String,
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 10, max = 5000, message = "Description must have at least 10 characters"))]
    pub description: String,
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 2, max = 50))]
    pub category: String,
    #[validate(range(min = 1, max = 1_000_000_000, message = "Pay amount must be between 1 and 1000000000"))]
    pub pay_amount: u64,
    #[validate(range(min = 1, max = 720))]
    pub duration_hours: u32,
    #[serde(default)]
    #[validate(length(max = 10), custom(function = "validate_skill_tags"))]
    pub skill_tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub min_badge: Option<Badge>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskListQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<TaskStatus>,
    pub start: Option<u32>,
    pub count: Option<u16>,
}

pub struct TaskService<'a, T, U, P>
where
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    P: PaymentRepositoryInterface,
{
    tasks_repository: &'a T,
    payments_repository: &'a P,
    user_service: UserService<'a, U>,
}

impl<'a, T, U, P> TaskService<'a, T, U, P>
where
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    P: PaymentRepositoryInterface,
{
    pub fn new(tasks_repository: &'a T, users_repository: &'a U, payments_repository: &'a P) -> Self {
        Self {
            tasks_repository,
            payments_repository,
            user_service: UserService::new(users_repository),
        }
    }

    pub async fn create(&self, user_id: &str, input: TaskInput) -> AppResult<Task> {
        input.validate()?;
        let employer = self
            .user_service
            .get_with_role(user_id, UserRole::Employer)
            .await?;

        let task = self
            .tasks_repository
            .create(TaskCreate {
                employer: employer.id,
                title: input.title,
                description: input.description,
                category: input.category.to_lowercase(),
                pay_amount: input.pay_amount,
                duration_hours: input.duration_hours,
                skill_tags: input
                    .skill_tags
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .collect(),
                difficulty: input.difficulty.unwrap_or(Difficulty::Easy),
                min_badge: input.min_badge.unwrap_or_default(),
            })
            .await?;

        tracing::info!("task {} created with pay {}", task.id, task.pay_amount);
        Ok(task)
    }

    pub async fn list(&self, query: TaskListQuery) -> AppResult<Vec<Task>> {
        let pagination = PaginationParams {
            start: query.start,
            count: query.count,
        };
        self.tasks_repository
            .list(TaskFilter {
                category: query.category.map(|c| c.trim().to_lowercase()),
                difficulty: query.difficulty,
                status: query.status,
                start: pagination.start(),
                count: pagination.count(),
            })
            .await
    }

    pub async fn get(&self, task_id: &str) -> AppResult<Task> {
        let id = record_id(TABLE_NAME, task_id)?;
        self.tasks_repository.get(&id).await
    }

    pub async fn list_posted(&self, user_id: &str) -> AppResult<Vec<Task>> {
        let employer = self.user_service.get(user_id).await?;
        self.tasks_repository.list_by_employer(&employer.id).await
    }

    pub async fn add_attachments(
        &self,
        user_id: &str,
        task_id: &str,
        files: Vec<FileUpload>,
        storage: &(dyn FileStorageInterface + Send + Sync),
        max_size_mb: u64,
    ) -> AppResult<Task> {
        let task = self.get(task_id).await?;
        let user = self.user_service.get(user_id).await?;
        if task.employer != user.id {
            return Err(AppError::Forbidden);
        }
        if files.is_empty() {
            return Err(AppError::InvalidFile {
                description: "No files in attachments[]".to_string(),
            });
        }

        let filter = UploadFilter::new(max_size_mb, MAX_ATTACHMENTS);
        filter.check_all(&files, task.attachments.len())?;

        let dir = format!("tasks/{}", task.id.id.to_raw());
        let stored = store_uploads(storage, &dir, files).await?;
        match self
            .tasks_repository
            .add_attachments(&task.id, stored.clone(), filter.max_files())
            .await
        {
            Ok(task) => Ok(task),
            Err(err) => {
                remove_uploads(storage, &dir, &stored).await;
                Err(err)
            }
        }
    }

    /// The escrow record, visible to the employer and the escrowed worker.
    pub async fn get_payment(&self, user_id: &str, task_id: &str) -> AppResult<Payment> {
        let task = self.get(task_id).await?;
        let user = self.user_service.get(user_id).await?;
        let payment = self.payments_repository.get_by_task(&task.id).await?;

        let is_worker = payment.worker.as_ref() == Some(&user.id);
        if task.employer != user.id && !is_worker {
            return Err(AppError::Forbidden);
        }
        Ok(payment)
    }
}
