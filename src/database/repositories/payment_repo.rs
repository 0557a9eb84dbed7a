use crate::{
    database::{client::Db, surrdb_utils::get_record},
    entities::{
        payment::{payment_id, Payment, PaymentStatus, TABLE_NAME},
        task::TABLE_NAME as TASK_TABLE_NAME,
        user::TABLE_NAME as USER_TABLE_NAME,
    },
    interfaces::repositories::payments::PaymentRepositoryInterface,
    middleware::error::AppResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use surrealdb::sql::Thing;

#[derive(Debug)]
pub struct PaymentRepository {
    client: Arc<Db>,
}

impl PaymentRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> AppResult<()> {
        let sql = format!("
        DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS task           ON {TABLE_NAME} TYPE record<{TASK_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS employer       ON {TABLE_NAME} TYPE record<{USER_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS worker         ON {TABLE_NAME} TYPE option<record<{USER_TABLE_NAME}>>;
        DEFINE FIELD IF NOT EXISTS status         ON {TABLE_NAME} TYPE string ASSERT $value INSIDE ['{pending}', '{escrowed}', '{completed}', '{failed}'];
        DEFINE FIELD IF NOT EXISTS amount         ON {TABLE_NAME} TYPE int;
        DEFINE FIELD IF NOT EXISTS transaction_id ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS escrowed_at    ON {TABLE_NAME} TYPE option<datetime>;
        DEFINE FIELD IF NOT EXISTS released_at    ON {TABLE_NAME} TYPE option<datetime>;
        DEFINE FIELD IF NOT EXISTS created_at     ON {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS task_idx       ON {TABLE_NAME} FIELDS task UNIQUE;
    ",
            pending = PaymentStatus::Pending,
            escrowed = PaymentStatus::Escrowed,
            completed = PaymentStatus::Completed,
            failed = PaymentStatus::Failed,
        );
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl PaymentRepositoryInterface for PaymentRepository {
    async fn get_by_task(&self, task: &Thing) -> AppResult<Payment> {
        get_record(&self.client, &payment_id(task)).await
    }
}
