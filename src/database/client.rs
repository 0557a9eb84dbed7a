use std::sync::Arc;

use surrealdb::engine::any::{connect, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::info;

use super::repositories::{
    application_repo::ApplicationRepository, payment_repo::PaymentRepository,
    rating_repo::RatingRepository, submission_repo::SubmissionRepository,
    task_repo::TaskRepository, user_repo::UserRepository, workflow_repo::WorkflowRepository,
};
use crate::middleware::error::AppResult;

pub type Db = Surreal<Any>;

#[derive(Debug)]
pub struct DbConfig<'a> {
    pub url: &'a str,
    pub database: &'a str,
    pub namespace: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

#[derive(Debug)]
pub struct Database {
    pub client: Arc<Db>,
    pub users: UserRepository,
    pub tasks: TaskRepository,
    pub applications: ApplicationRepository,
    pub payments: PaymentRepository,
    pub submissions: SubmissionRepository,
    pub ratings: RatingRepository,
    pub workflow: WorkflowRepository,
}

impl Database {
    pub async fn connect(config: DbConfig<'_>) -> AppResult<Self> {
        info!("->> connecting DB url={} ns={} db={}", config.url, config.namespace, config.database);
        let conn = connect(config.url).await?;

        if let (Some(password), Some(username)) = (config.password, config.username) {
            conn.signin(Root { username, password }).await?;
        }

        conn.use_ns(config.namespace)
            .use_db(config.database)
            .await?;

        let version = conn.version().await?;
        info!("->> connected DB version: {version}");

        let client = Arc::new(conn);
        Ok(Self {
            users: UserRepository::new(client.clone()),
            tasks: TaskRepository::new(client.clone()),
            applications: ApplicationRepository::new(client.clone()),
            payments: PaymentRepository::new(client.clone()),
            submissions: SubmissionRepository::new(client.clone()),
            ratings: RatingRepository::new(client.clone()),
            workflow: WorkflowRepository::new(client.clone()),
            client,
        })
    }

    pub async fn run_migrations(&self) -> AppResult<()> {
        self.users.mutate_db().await?;
        self.tasks.mutate_db().await?;
        self.payments.mutate_db().await?;
        self.applications.mutate_db().await?;
        self.submissions.mutate_db().await?;
        self.ratings.mutate_db().await?;
        Ok(())
    }
}
