use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

pub const TABLE_NAME: &str = "local_user";
pub const AUTH_TABLE_NAME: &str = "authentication";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Worker,
    Employer,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Default for Badge {
    fn default() -> Self {
        Badge::Bronze
    }
}

impl Badge {
    /// Highest tier reached with the given stats.
    pub fn for_stats(completed_tasks: u64, rating_average: f64) -> Badge {
        match (completed_tasks, rating_average) {
            (c, r) if c >= 100 && r >= 4.8 => Badge::Platinum,
            (c, r) if c >= 50 && r >= 4.5 => Badge::Gold,
            (c, r) if c >= 10 && r >= 4.0 => Badge::Silver,
            _ => Badge::Bronze,
        }
    }

    /// Badges never go down.
    pub fn upgraded(self, completed_tasks: u64, rating_average: f64) -> Badge {
        self.max(Badge::for_stats(completed_tasks, rating_average))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: Thing,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    pub badge: Badge,
    pub completed_tasks: u64,
    pub total_earnings: u64,
    pub rating_average: f64,
    pub rating_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalUserCreate {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthType {
    Password,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Authentication {
    pub local_user: Thing,
    pub auth_type: AuthType,
    pub token: String,
}
