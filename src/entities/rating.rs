use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

pub const TABLE_NAME: &str = "rating";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RaterType {
    Employer,
    Worker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Thing,
    pub application: Thing,
    pub task: Thing,
    pub rater: Thing,
    pub rater_type: RaterType,
    pub stars: u8,
    pub review: Option<String>,
    pub rated_worker: Option<Thing>,
    pub rated_employer: Option<Thing>,
    pub created_at: DateTime<Utc>,
}

/// New rating. The rated user is the worker when the employer rates and the
/// employer otherwise.
#[derive(Debug, Clone)]
pub struct RatingCreate {
    pub application: Thing,
    pub task: Thing,
    pub rater: Thing,
    pub rater_type: RaterType,
    pub rated_user: Thing,
    pub stars: u8,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u64,
}
