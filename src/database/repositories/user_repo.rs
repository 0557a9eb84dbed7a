use crate::{
    database::{
        client::Db,
        surrdb_utils::{check_transaction_custom_error, get_record, THROW_USERNAME_EXISTS},
    },
    entities::user::{
        AuthType, Authentication, Badge, LocalUser, LocalUserCreate, AUTH_TABLE_NAME, TABLE_NAME,
    },
    interfaces::repositories::users::UserRepositoryInterface,
    middleware::error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use surrealdb::sql::Thing;

const USERNAME_INDEX: &str = "username_idx";

#[derive(Debug)]
pub struct UserRepository {
    client: Arc<Db>,
}

impl UserRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> AppResult<()> {
        let sql = format!("
        DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS username        ON {TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS full_name       ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS email           ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS role            ON {TABLE_NAME} TYPE string ASSERT $value INSIDE ['WORKER', 'EMPLOYER'];
        DEFINE FIELD IF NOT EXISTS badge           ON {TABLE_NAME} TYPE string DEFAULT 'BRONZE';
        DEFINE FIELD IF NOT EXISTS completed_tasks ON {TABLE_NAME} TYPE int DEFAULT 0;
        DEFINE FIELD IF NOT EXISTS total_earnings  ON {TABLE_NAME} TYPE int DEFAULT 0;
        DEFINE FIELD IF NOT EXISTS rating_average  ON {TABLE_NAME} TYPE float DEFAULT 0.0;
        DEFINE FIELD IF NOT EXISTS rating_count    ON {TABLE_NAME} TYPE int DEFAULT 0;
        DEFINE FIELD IF NOT EXISTS created_at      ON {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS {USERNAME_INDEX} ON {TABLE_NAME} FIELDS username UNIQUE;

        DEFINE TABLE IF NOT EXISTS {AUTH_TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS local_user ON {AUTH_TABLE_NAME} TYPE record<{TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS auth_type  ON {AUTH_TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS token      ON {AUTH_TABLE_NAME} TYPE string;
        DEFINE FIELD IF NOT EXISTS created_at ON {AUTH_TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS local_user_auth_idx ON {AUTH_TABLE_NAME} FIELDS local_user, auth_type UNIQUE;
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_with_password(
        &self,
        data: LocalUserCreate,
        password_hash: String,
    ) -> AppResult<LocalUser> {
        let sql = format!("
            BEGIN TRANSACTION;
            IF array::len((SELECT VALUE id FROM {TABLE_NAME} WHERE username = $data.username)) > 0 {{
                THROW \"{THROW_USERNAME_EXISTS}\";
            }};
            LET $user = CREATE ONLY {TABLE_NAME} CONTENT $data;
            CREATE {AUTH_TABLE_NAME} SET local_user = $user.id, auth_type = $auth_type, token = $password_hash;
            SELECT * FROM ONLY $user.id;
            COMMIT TRANSACTION;
        ");

        let mut res = self
            .client
            .query(sql)
            .bind(("data", data))
            .bind(("auth_type", AuthType::Password.to_string()))
            .bind(("password_hash", password_hash))
            .await?;

        check_transaction_custom_error(&mut res, &[(USERNAME_INDEX, THROW_USERNAME_EXISTS)])?;
        let user = res.take::<Option<LocalUser>>(res.num_statements() - 1)?;
        user.ok_or(AppError::Generic {
            description: "User not created".to_string(),
        })
    }

    async fn get_by_id(&self, id: &Thing) -> AppResult<LocalUser> {
        get_record(&self.client, id).await
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<LocalUser>> {
        let mut res = self
            .client
            .query(format!("SELECT * FROM {TABLE_NAME} WHERE username = $username LIMIT 1;"))
            .bind(("username", username.to_string()))
            .await?;
        let user = res.take::<Option<LocalUser>>(0)?;
        Ok(user)
    }

    async fn get_password_auth(&self, user: &Thing) -> AppResult<Option<Authentication>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {AUTH_TABLE_NAME} WHERE local_user = $user AND auth_type = $auth_type LIMIT 1;"
            ))
            .bind(("user", user.clone()))
            .bind(("auth_type", AuthType::Password.to_string()))
            .await?;
        let auth = res.take::<Option<Authentication>>(0)?;
        Ok(auth)
    }

    async fn set_badge(&self, user: &Thing, badge: Badge) -> AppResult<()> {
        let res = self
            .client
            .query("UPDATE $user SET badge = $badge;")
            .bind(("user", user.clone()))
            .bind(("badge", badge.to_string()))
            .await?;
        res.check()?;
        Ok(())
    }
}
