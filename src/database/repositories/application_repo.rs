use crate::{
    database::{
        client::Db,
        surrdb_utils::{
            check_transaction_custom_error, get_record, THROW_APPLICATION_EXISTS,
            THROW_TASK_NOT_OPEN,
        },
    },
    entities::{
        application::{ApplicationStatus, TaskApplication, TABLE_NAME},
        task::{TaskStatus, TABLE_NAME as TASK_TABLE_NAME},
        user::TABLE_NAME as USER_TABLE_NAME,
    },
    interfaces::repositories::applications::ApplicationRepositoryInterface,
    middleware::error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use surrealdb::sql::Thing;

const TASK_WORKER_INDEX: &str = "task_worker_idx";

#[derive(Debug)]
pub struct ApplicationRepository {
    client: Arc<Db>,
}

impl ApplicationRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> AppResult<()> {
        let sql = format!("
        DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS task       ON {TABLE_NAME} TYPE record<{TASK_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS worker     ON {TABLE_NAME} TYPE record<{USER_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS status     ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS message    ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS timelines  ON {TABLE_NAME} TYPE array<{{status: string, date: datetime}}>;
        DEFINE FIELD IF NOT EXISTS applied_at ON {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS {TASK_WORKER_INDEX} ON {TABLE_NAME} FIELDS task, worker UNIQUE;
        DEFINE INDEX IF NOT EXISTS task_status_idx ON {TABLE_NAME} FIELDS task, status;
        DEFINE INDEX IF NOT EXISTS worker_idx ON {TABLE_NAME} FIELDS worker;
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepositoryInterface for ApplicationRepository {
    async fn create(
        &self,
        task: &Thing,
        worker: &Thing,
        message: Option<String>,
    ) -> AppResult<TaskApplication> {
        let sql = format!("
            BEGIN TRANSACTION;
            IF (SELECT VALUE status FROM ONLY $task) != '{open}' {{
                THROW \"{THROW_TASK_NOT_OPEN}\";
            }};
            IF array::len((SELECT VALUE id FROM {TABLE_NAME} WHERE task = $task AND worker = $worker)) > 0 {{
                THROW \"{THROW_APPLICATION_EXISTS}\";
            }};
            LET $application = CREATE ONLY {TABLE_NAME} SET
                task = $task,
                worker = $worker,
                message = $message,
                status = $status,
                timelines = [{{ status: $status, date: time::now() }}];
            SELECT * FROM ONLY $application.id;
            COMMIT TRANSACTION;
        ",
            open = TaskStatus::Open
        );

        let mut res = self
            .client
            .query(sql)
            .bind(("task", task.clone()))
            .bind(("worker", worker.clone()))
            .bind(("message", message))
            .bind(("status", ApplicationStatus::Applied.to_string()))
            .await?;

        check_transaction_custom_error(&mut res, &[(TASK_WORKER_INDEX, THROW_APPLICATION_EXISTS)])?;
        let application = res.take::<Option<TaskApplication>>(res.num_statements() - 1)?;
        application.ok_or(AppError::Generic {
            description: "Application not created".to_string(),
        })
    }

    async fn get(&self, id: &Thing) -> AppResult<TaskApplication> {
        get_record(&self.client, id).await
    }

    async fn list_by_task(&self, task: &Thing) -> AppResult<Vec<TaskApplication>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE task = $task ORDER BY applied_at ASC;"
            ))
            .bind(("task", task.clone()))
            .await?;
        let list = res.take::<Vec<TaskApplication>>(0)?;
        Ok(list)
    }

    async fn list_by_worker(&self, worker: &Thing) -> AppResult<Vec<TaskApplication>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE worker = $worker ORDER BY applied_at DESC;"
            ))
            .bind(("worker", worker.clone()))
            .await?;
        let list = res.take::<Vec<TaskApplication>>(0)?;
        Ok(list)
    }

    async fn get_accepted_for_task(&self, task: &Thing) -> AppResult<Option<TaskApplication>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE task = $task AND status = $status LIMIT 1;"
            ))
            .bind(("task", task.clone()))
            .bind(("status", ApplicationStatus::Accepted.to_string()))
            .await?;
        let application = res.take::<Option<TaskApplication>>(0)?;
        Ok(application)
    }
}
