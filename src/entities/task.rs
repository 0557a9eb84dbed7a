use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

use super::{file_meta::FileMeta, user::Badge};

pub const TABLE_NAME: &str = "task";
pub const MAX_ATTACHMENTS: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Thing,
    pub employer: Thing,
    pub title: String,
    pub description: String,
    pub category: String,
    pub pay_amount: u64,
    pub duration_hours: u32,
    pub skill_tags: Vec<String>,
    pub difficulty: Difficulty,
    pub min_badge: Badge,
    pub status: TaskStatus,
    pub attachments: Vec<FileMeta>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
    pub employer: Thing,
    pub title: String,
    pub description: String,
    pub category: String,
    pub pay_amount: u64,
    pub duration_hours: u32,
    pub skill_tags: Vec<String>,
    pub difficulty: Difficulty,
    pub min_badge: Badge,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<TaskStatus>,
    pub start: u32,
    pub count: u16,
}
