use crate::{
    database::{
        client::Db,
        repositories::task_repo::FILE_META_TYPE,
        surrdb_utils::{
            check_transaction_custom_error, get_record, THROW_NOT_ACCEPTED,
            THROW_SUBMISSION_REVIEWED,
        },
    },
    entities::{
        application::{ApplicationStatus, TABLE_NAME as APPLICATION_TABLE_NAME},
        submission::{SubmissionCreate, SubmissionStatus, TaskSubmission, TABLE_NAME},
        task::TABLE_NAME as TASK_TABLE_NAME,
        user::TABLE_NAME as USER_TABLE_NAME,
    },
    interfaces::repositories::submissions::SubmissionRepositoryInterface,
    middleware::error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use surrealdb::sql::Thing;

const APPLICATION_VERSION_INDEX: &str = "application_version_idx";
const VERSION_CONFLICT: &str = "Submission already exists";

#[derive(Debug)]
pub struct SubmissionRepository {
    client: Arc<Db>,
}

impl SubmissionRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> AppResult<()> {
        let sql = format!("
        DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS application ON {TABLE_NAME} TYPE record<{APPLICATION_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS task        ON {TABLE_NAME} TYPE record<{TASK_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS worker      ON {TABLE_NAME} TYPE record<{USER_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS status      ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS version     ON {TABLE_NAME} TYPE int ASSERT $value >= 1;
        DEFINE FIELD IF NOT EXISTS is_latest   ON {TABLE_NAME} TYPE bool;
        DEFINE FIELD IF NOT EXISTS content     ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS links       ON {TABLE_NAME} TYPE array<string> DEFAULT [];
        DEFINE FIELD IF NOT EXISTS files       ON {TABLE_NAME} TYPE {FILE_META_TYPE} DEFAULT [];
        DEFINE FIELD IF NOT EXISTS feedback    ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS reviewed_at ON {TABLE_NAME} TYPE option<datetime>;
        DEFINE FIELD IF NOT EXISTS created_at  ON {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS {APPLICATION_VERSION_INDEX} ON {TABLE_NAME} FIELDS application, version UNIQUE;
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionRepositoryInterface for SubmissionRepository {
    async fn create(&self, data: SubmissionCreate) -> AppResult<TaskSubmission> {
        let sql = format!("
            BEGIN TRANSACTION;
            IF (SELECT VALUE status FROM ONLY $application) != '{accepted}' {{
                THROW \"{THROW_NOT_ACCEPTED}\";
            }};
            LET $previous = SELECT VALUE id FROM {TABLE_NAME} WHERE application = $application;
            UPDATE {TABLE_NAME} SET status = '{superseded}'
                WHERE application = $application AND is_latest = true AND status = '{submitted}';
            UPDATE {TABLE_NAME} SET is_latest = false
                WHERE application = $application AND is_latest = true;
            LET $submission = CREATE ONLY {TABLE_NAME} SET
                application = $application,
                task = $task,
                worker = $worker,
                status = '{submitted}',
                version = array::len($previous) + 1,
                is_latest = true,
                content = $content,
                links = $links,
                files = $files;
            SELECT * FROM ONLY $submission.id;
            COMMIT TRANSACTION;
        ",
            accepted = ApplicationStatus::Accepted,
            superseded = SubmissionStatus::Superseded,
            submitted = SubmissionStatus::Submitted,
        );

        let mut res = self
            .client
            .query(sql)
            .bind(("application", data.application))
            .bind(("task", data.task))
            .bind(("worker", data.worker))
            .bind(("content", data.content))
            .bind(("links", data.links))
            .bind(("files", data.files))
            .await?;

        check_transaction_custom_error(&mut res, &[(APPLICATION_VERSION_INDEX, VERSION_CONFLICT)])?;
        let submission = res.take::<Option<TaskSubmission>>(res.num_statements() - 1)?;
        submission.ok_or(AppError::Generic {
            description: "Submission not created".to_string(),
        })
    }

    async fn get(&self, id: &Thing) -> AppResult<TaskSubmission> {
        get_record(&self.client, id).await
    }

    async fn list_by_application(&self, application: &Thing) -> AppResult<Vec<TaskSubmission>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE application = $application ORDER BY version DESC;"
            ))
            .bind(("application", application.clone()))
            .await?;
        let list = res.take::<Vec<TaskSubmission>>(0)?;
        Ok(list)
    }

    async fn review(
        &self,
        id: &Thing,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> AppResult<TaskSubmission> {
        let sql = format!("
            BEGIN TRANSACTION;
            LET $current = SELECT status, is_latest FROM ONLY $id;
            IF $current.status != '{submitted}' OR $current.is_latest != true {{
                THROW \"{THROW_SUBMISSION_REVIEWED}\";
            }};
            UPDATE $id SET status = $status, feedback = $feedback, reviewed_at = time::now();
            SELECT * FROM ONLY $id;
            COMMIT TRANSACTION;
        ",
            submitted = SubmissionStatus::Submitted,
        );

        let mut res = self
            .client
            .query(sql)
            .bind(("id", id.clone()))
            .bind(("status", status.to_string()))
            .bind(("feedback", feedback))
            .await?;

        check_transaction_custom_error(&mut res, &[])?;
        let submission = res.take::<Option<TaskSubmission>>(res.num_statements() - 1)?;
        submission.ok_or(AppError::EntityFailIdNotFound { ident: id.to_raw() })
    }
}
