use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{
        application::{ApplicationStatus, TABLE_NAME as APPLICATION_TABLE_NAME},
        rating::{RaterType, Rating, RatingCreate, RatingSummary},
    },
    interfaces::repositories::{
        applications::ApplicationRepositoryInterface, ratings::RatingRepositoryInterface,
        tasks::TaskRepositoryInterface, users::UserRepositoryInterface,
    },
    middleware::{
        error::{AppError, AppResult},
        utils::string_utils::record_id,
    },
    services::user_service::UserService,
    utils::validate_utils::trim_option_string,
};

const NOT_COMPLETED: &str = "Application is not completed";

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RatingInput {
    #[validate(length(min = 1))]
    pub application_id: String,
    #[validate(range(min = 1, max = 5, message = "Stars must be between 1 and 5"))]
    pub stars: u8,
    #[serde(default, deserialize_with = "trim_option_string")]
    #[validate(length(max = 1000))]
    pub review: Option<String>,
}

#[derive(Debug)]
pub struct UserRatings {
    pub ratings: Vec<Rating>,
    pub summary: RatingSummary,
}

pub struct RatingService<'a, R, A, T, U>
where
    R: RatingRepositoryInterface,
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
{
    ratings_repository: &'a R,
    applications_repository: &'a A,
    tasks_repository: &'a T,
    user_service: UserService<'a, U>,
}

impl<'a, R, A, T, U> RatingService<'a, R, A, T, U>
where
    R: RatingRepositoryInterface,
    A: ApplicationRepositoryInterface,
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
{
    pub fn new(
        ratings_repository: &'a R,
        applications_repository: &'a A,
        tasks_repository: &'a T,
        users_repository: &'a U,
    ) -> Self {
        Self {
            ratings_repository,
            applications_repository,
            tasks_repository,
            user_service: UserService::new(users_repository),
        }
    }

    pub async fn submit(&self, user_id: &str, input: RatingInput) -> AppResult<Rating> {
        input.validate()?;
        let user = self.user_service.get(user_id).await?;
        let application = self
            .applications_repository
            .get(&record_id(APPLICATION_TABLE_NAME, &input.application_id)?)
            .await?;
        let task = self.tasks_repository.get(&application.task).await?;

        let (rater_type, rated_user) = if task.employer == user.id {
            (RaterType::Employer, application.worker.clone())
        } else if application.worker == user.id {
            (RaterType::Worker, task.employer.clone())
        } else {
            return Err(AppError::Forbidden);
        };

        if application.status != ApplicationStatus::Completed {
            return Err(AppError::conflict(NOT_COMPLETED));
        }

        let rating = self
            .ratings_repository
            .create(RatingCreate {
                application: application.id,
                task: task.id,
                rater: user.id,
                rater_type,
                rated_user: rated_user.clone(),
                stars: input.stars,
                review: input.review,
            })
            .await?;
        tracing::info!("{} rated {rated_user} with {} stars", rating.rater, rating.stars);

        if rater_type == RaterType::Employer {
            self.user_service.sync_badge(&rated_user).await;
        }
        Ok(rating)
    }

    /// Ratings a user received with the summary kept on the profile.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<UserRatings> {
        let user = self.user_service.get(user_id).await?;
        let ratings = self.ratings_repository.list_for_user(&user.id).await?;
        Ok(UserRatings {
            ratings,
            summary: RatingSummary {
                average: user.rating_average,
                count: user.rating_count,
            },
        })
    }

    pub async fn list_for_application(&self, application_id: &str) -> AppResult<Vec<Rating>> {
        let application = self
            .applications_repository
            .get(&record_id(APPLICATION_TABLE_NAME, application_id)?)
            .await?;
        self.ratings_repository
            .list_for_application(&application.id)
            .await
    }
}
