use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

use super::file_meta::FileMeta;

pub const TABLE_NAME: &str = "task_submission";
pub const MAX_FILES: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Submitted,
    Approved,
    Rejected,
    RevisionRequested,
    Superseded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    RevisionRequested,
}

impl From<ReviewDecision> for SubmissionStatus {
    fn from(value: ReviewDecision) -> Self {
        match value {
            ReviewDecision::Approved => SubmissionStatus::Approved,
            ReviewDecision::Rejected => SubmissionStatus::Rejected,
            ReviewDecision::RevisionRequested => SubmissionStatus::RevisionRequested,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub id: Thing,
    pub application: Thing,
    pub task: Thing,
    pub worker: Thing,
    pub status: SubmissionStatus,
    pub version: u32,
    pub is_latest: bool,
    pub content: Option<String>,
    pub links: Vec<String>,
    pub files: Vec<FileMeta>,
    pub feedback: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionCreate {
    pub application: Thing,
    pub task: Thing,
    pub worker: Thing,
    pub content: Option<String>,
    pub links: Vec<String>,
    pub files: Vec<FileMeta>,
}
