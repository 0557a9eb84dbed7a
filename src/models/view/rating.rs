use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::rating::{RaterType, Rating, RatingSummary},
    services::rating_service::UserRatings,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct RatingView {
    pub id: String,
    pub application: String,
    pub task: String,
    pub rater: String,
    pub rater_type: RaterType,
    pub stars: u8,
    pub review: Option<String>,
    pub rated_worker: Option<String>,
    pub rated_employer: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Rating> for RatingView {
    fn from(rating: Rating) -> Self {
        RatingView {
            id: rating.id.to_raw(),
            application: rating.application.to_raw(),
            task: rating.task.to_raw(),
            rater: rating.rater.to_raw(),
            rater_type: rating.rater_type,
            stars: rating.stars,
            review: rating.review,
            rated_worker: rating.rated_worker.map(|t| t.to_raw()),
            rated_employer: rating.rated_employer.map(|t| t.to_raw()),
            created_at: rating.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRatingsView {
    pub ratings: Vec<RatingView>,
    pub summary: RatingSummary,
}

impl From<UserRatings> for UserRatingsView {
    fn from(value: UserRatings) -> Self {
        UserRatingsView {
            ratings: value.ratings.into_iter().map(RatingView::from).collect(),
            summary: value.summary,
        }
    }
}
