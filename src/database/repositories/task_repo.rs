use crate::{
    database::{
        client::Db,
        surrdb_utils::{check_transaction_custom_error, get_record, THROW_ATTACHMENT_LIMIT},
    },
    entities::{
        file_meta::FileMeta,
        payment::{PaymentStatus, TABLE_NAME as PAYMENT_TABLE_NAME},
        task::{Task, TaskCreate, TaskFilter, TaskStatus, TABLE_NAME},
        user::TABLE_NAME as USER_TABLE_NAME,
    },
    interfaces::repositories::tasks::TaskRepositoryInterface,
    middleware::error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use surrealdb::sql::Thing;

/// Field type shared by task attachments and submission files.
pub(in crate::database) const FILE_META_TYPE: &str =
    "array<{ file_name: string, url: string, content_type: option<string>, size: int }>";

#[derive(Debug)]
pub struct TaskRepository {
    client: Arc<Db>,
}

impl TaskRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> AppResult<()> {
        let sql = format!("
        DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS employer       ON {TABLE_NAME} TYPE record<{USER_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS title          ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS description    ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS category       ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS pay_amount     ON {TABLE_NAME} TYPE int ASSERT $value >= 1 AND $value <= 1000000000;
        DEFINE FIELD IF NOT EXISTS duration_hours ON {TABLE_NAME} TYPE int ASSERT $value >= 1 AND $value <= 720;
        DEFINE FIELD IF NOT EXISTS skill_tags     ON {TABLE_NAME} TYPE array<string>;
        DEFINE FIELD IF NOT EXISTS difficulty     ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS min_badge      ON {TABLE_NAME} TYPE string DEFAULT 'BRONZE';
        DEFINE FIELD IF NOT EXISTS status         ON {TABLE_NAME} TYPE string DEFAULT '{open}';
        DEFINE FIELD IF NOT EXISTS attachments    ON {TABLE_NAME} TYPE {FILE_META_TYPE} DEFAULT [];
        DEFINE FIELD IF NOT EXISTS created_at     ON {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS status_idx     ON {TABLE_NAME} FIELDS status;
        DEFINE INDEX IF NOT EXISTS employer_idx   ON {TABLE_NAME} FIELDS employer;
    ",
            open = TaskStatus::Open
        );
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepositoryInterface for TaskRepository {
    async fn create(&self, data: TaskCreate) -> AppResult<Task> {
        let sql = format!("
            BEGIN TRANSACTION;
            LET $task = CREATE ONLY {TABLE_NAME} CONTENT $data;
            LET $payment_id = type::thing('{PAYMENT_TABLE_NAME}', record::id($task.id));
            CREATE $payment_id SET
                task = $task.id,
                employer = $task.employer,
                amount = $task.pay_amount,
                status = '{pending}';
            SELECT * FROM ONLY $task.id;
            COMMIT TRANSACTION;
        ",
            pending = PaymentStatus::Pending
        );

        let mut res = self.client.query(sql).bind(("data", data)).await?;

        check_transaction_custom_error(&mut res, &[])?;
        let task = res.take::<Option<Task>>(res.num_statements() - 1)?;
        task.ok_or(AppError::Generic {
            description: "Task not created".to_string(),
        })
    }

    async fn get(&self, id: &Thing) -> AppResult<Task> {
        get_record(&self.client, id).await
    }

    async fn list(&self, filter: TaskFilter) -> AppResult<Vec<Task>> {
        let mut conditions = vec!["status = $status"];
        if filter.category.is_some() {
            conditions.push("category = $category");
        }
        if filter.difficulty.is_some() {
            conditions.push("difficulty = $difficulty");
        }
        let sql = format!(
            "SELECT * FROM {TABLE_NAME} WHERE {} ORDER BY created_at DESC LIMIT BY type::int($limit) START AT type::int($start);",
            conditions.join(" AND ")
        );

        let mut res = self
            .client
            .query(sql)
            .bind(("status", filter.status.unwrap_or(TaskStatus::Open).to_string()))
            .bind(("category", filter.category))
            .bind(("difficulty", filter.difficulty.map(|d| d.to_string())))
            .bind(("limit", filter.count))
            .bind(("start", filter.start))
            .await?;
        let tasks = res.take::<Vec<Task>>(0)?;
        Ok(tasks)
    }

    async fn list_by_employer(&self, employer: &Thing) -> AppResult<Vec<Task>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE employer = $employer ORDER BY created_at DESC;"
            ))
            .bind(("employer", employer.clone()))
            .await?;
        let tasks = res.take::<Vec<Task>>(0)?;
        Ok(tasks)
    }

    async fn add_attachments(
        &self,
        id: &Thing,
        files: Vec<FileMeta>,
        max_attachments: usize,
    ) -> AppResult<Task> {
        let sql = format!("
            BEGIN TRANSACTION;
            LET $current = (SELECT VALUE attachments FROM ONLY $id) ?? [];
            IF array::len($current) + array::len($files) > $max {{
                THROW \"{THROW_ATTACHMENT_LIMIT}\";
            }};
            UPDATE $id SET attachments = array::concat(attachments, $files);
            SELECT * FROM ONLY $id;
            COMMIT TRANSACTION;
        ");

        let mut res = self
            .client
            .query(sql)
            .bind(("id", id.clone()))
            .bind(("files", files))
            .bind(("max", max_attachments))
            .await?;

        check_transaction_custom_error(&mut res, &[])?;
        let task = res.take::<Option<Task>>(res.num_statements() - 1)?;
        task.ok_or(AppError::EntityFailIdNotFound { ident: id.to_raw() })
    }
}
