use crate::{
    database::{
        client::Db,
        surrdb_utils::{check_transaction_custom_error, THROW_RATING_EXISTS},
    },
    entities::{
        application::TABLE_NAME as APPLICATION_TABLE_NAME,
        rating::{RaterType, Rating, RatingCreate, TABLE_NAME},
        task::TABLE_NAME as TASK_TABLE_NAME,
        user::TABLE_NAME as USER_TABLE_NAME,
    },
    interfaces::repositories::ratings::RatingRepositoryInterface,
    middleware::error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use surrealdb::{engine::any, method::Query, sql::Thing};

const APPLICATION_RATER_INDEX: &str = "application_rater_idx";

#[derive(Debug)]
pub struct RatingRepository {
    client: Arc<Db>,
}

impl RatingRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> AppResult<()> {
        let sql = format!("
        DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS application    ON {TABLE_NAME} TYPE record<{APPLICATION_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS task           ON {TABLE_NAME} TYPE record<{TASK_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS rater          ON {TABLE_NAME} TYPE record<{USER_TABLE_NAME}>;
        DEFINE FIELD IF NOT EXISTS rater_type     ON {TABLE_NAME} TYPE string ASSERT $value INSIDE ['{employer}', '{worker}'];
        DEFINE FIELD IF NOT EXISTS stars          ON {TABLE_NAME} TYPE int ASSERT $value >= 1 AND $value <= 5;
        DEFINE FIELD IF NOT EXISTS review         ON {TABLE_NAME} TYPE option<string>;
        DEFINE FIELD IF NOT EXISTS rated_worker   ON {TABLE_NAME} TYPE option<record<{USER_TABLE_NAME}>>;
        DEFINE FIELD IF NOT EXISTS rated_employer ON {TABLE_NAME} TYPE option<record<{USER_TABLE_NAME}>>;
        DEFINE FIELD IF NOT EXISTS created_at     ON {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
        DEFINE INDEX IF NOT EXISTS {APPLICATION_RATER_INDEX} ON {TABLE_NAME} FIELDS application, rater_type UNIQUE;
        DEFINE INDEX IF NOT EXISTS rated_worker_idx   ON {TABLE_NAME} FIELDS rated_worker;
        DEFINE INDEX IF NOT EXISTS rated_employer_idx ON {TABLE_NAME} FIELDS rated_employer;
    ",
            employer = RaterType::Employer,
            worker = RaterType::Worker,
        );
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

/// Statements inserting a rating into `$rating` and recomputing the rated
/// user's average. Used inside a transaction, bind with [`bind_rating_insert`].
pub(in crate::database) fn rating_insert_sql() -> String {
    format!("
        IF array::len((SELECT VALUE id FROM {TABLE_NAME} WHERE application = $rating_application AND rater_type = $rating_rater_type)) > 0 {{
            THROW \"{THROW_RATING_EXISTS}\";
        }};
        LET $rating = CREATE ONLY {TABLE_NAME} SET
            application = $rating_application,
            task = $rating_task,
            rater = $rating_rater,
            rater_type = $rating_rater_type,
            stars = $rating_stars,
            review = $rating_review,
            rated_worker = $rating_rated_worker,
            rated_employer = $rating_rated_employer;
        LET $rated_stars = SELECT VALUE stars FROM {TABLE_NAME} WHERE rated_worker = $rating_rated_user OR rated_employer = $rating_rated_user;
        UPDATE $rating_rated_user SET
            rating_average = <float> math::mean($rated_stars),
            rating_count = array::len($rated_stars);
    ")
}

pub(in crate::database) fn bind_rating_insert<'b>(
    query: Query<'b, any::Any>,
    data: RatingCreate,
) -> Query<'b, any::Any> {
    let (rated_worker, rated_employer): (Option<Thing>, Option<Thing>) = match data.rater_type {
        RaterType::Employer => (Some(data.rated_user.clone()), None),
        RaterType::Worker => (None, Some(data.rated_user.clone())),
    };
    query
        .bind(("rating_application", data.application))
        .bind(("rating_task", data.task))
        .bind(("rating_rater", data.rater))
        .bind(("rating_rater_type", data.rater_type.to_string()))
        .bind(("rating_stars", data.stars))
        .bind(("rating_review", data.review))
        .bind(("rating_rated_worker", rated_worker))
        .bind(("rating_rated_employer", rated_employer))
        .bind(("rating_rated_user", data.rated_user))
}

#[async_trait]
impl RatingRepositoryInterface for RatingRepository {
    async fn create(&self, data: RatingCreate) -> AppResult<Rating> {
        let sql = format!(
            "
            BEGIN TRANSACTION;
            {}
            SELECT * FROM ONLY $rating.id;
            COMMIT TRANSACTION;
        ",
            rating_insert_sql()
        );

        let query = self.client.query(sql);
        let mut res = bind_rating_insert(query, data).await?;

        check_transaction_custom_error(&mut res, &[(APPLICATION_RATER_INDEX, THROW_RATING_EXISTS)])?;
        let rating = res.take::<Option<Rating>>(res.num_statements() - 1)?;
        rating.ok_or(AppError::Generic {
            description: "Rating not created".to_string(),
        })
    }

    async fn list_for_user(&self, user: &Thing) -> AppResult<Vec<Rating>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE rated_worker = $user OR rated_employer = $user ORDER BY created_at DESC;"
            ))
            .bind(("user", user.clone()))
            .await?;
        let list = res.take::<Vec<Rating>>(0)?;
        Ok(list)
    }

    async fn list_for_application(&self, application: &Thing) -> AppResult<Vec<Rating>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE application = $application ORDER BY created_at ASC;"
            ))
            .bind(("application", application.clone()))
            .await?;
        let list = res.take::<Vec<Rating>>(0)?;
        Ok(list)
    }
}
