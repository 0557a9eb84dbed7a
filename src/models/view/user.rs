use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::user::{Badge, LocalUser, UserRole};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
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

impl From<LocalUser> for UserView {
    fn from(user: LocalUser) -> Self {
        UserView {
            id: user.id.to_raw(),
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            badge: user.badge,
            completed_tasks: user.completed_tasks,
            total_earnings: user.total_earnings,
            rating_average: user.rating_average,
            rating_count: user.rating_count,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthView {
    pub token: String,
    pub user: UserView,
}
