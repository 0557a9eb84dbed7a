use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::application::ApplicationView;
use crate::{
    entities::{
        file_meta::FileMeta,
        submission::{SubmissionStatus, TaskSubmission},
    },
    services::submission_service::ReviewOutcome,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionView {
    pub id: String,
    pub application: String,
    pub task: String,
    pub worker: String,
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

impl From<TaskSubmission> for SubmissionView {
    fn from(submission: TaskSubmission) -> Self {
        SubmissionView {
            id: submission.id.to_raw(),
            application: submission.application.to_raw(),
            task: submission.task.to_raw(),
            worker: submission.worker.to_raw(),
            status: submission.status,
            version: submission.version,
            is_latest: submission.is_latest,
            content: submission.content,
            links: submission.links,
            files: submission.files,
            feedback: submission.feedback,
            reviewed_at: submission.reviewed_at,
            created_at: submission.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewView {
    pub submission: SubmissionView,
    pub application: ApplicationView,
}

impl From<ReviewOutcome> for ReviewView {
    fn from(outcome: ReviewOutcome) -> Self {
        ReviewView {
            submission: outcome.submission.into(),
            application: outcome.application.into(),
        }
    }
}
