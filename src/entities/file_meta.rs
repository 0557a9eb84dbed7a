use serde::{Deserialize, Serialize};

/// Stored upload as kept on tasks and submissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMeta {
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size: u64,
}
