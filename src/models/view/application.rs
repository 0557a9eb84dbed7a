use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::application::{ApplicationStatus, StatusTimeline, TaskApplication};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationView {
    pub id: String,
    pub task: String,
    pub worker: String,
    pub status: ApplicationStatus,
    pub message: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub timelines: Vec<StatusTimeline>,
}

impl From<TaskApplication> for ApplicationView {
    fn from(application: TaskApplication) -> Self {
        ApplicationView {
            id: application.id.to_raw(),
            task: application.task.to_raw(),
            worker: application.worker.to_raw(),
            status: application.status,
            message: application.message,
            applied_at: application.applied_at,
            timelines: application.timelines,
        }
    }
}
