use serde::de::DeserializeOwned;
use surrealdb::sql::Thing;
use surrealdb::Response;

use crate::database::client::Db;
use crate::middleware::error::{AppError, AppResult};

pub const THROW_INVALID_TRANSITION: &str = "Invalid status transition";
pub const THROW_TASK_ASSIGNED: &str = "Task already assigned";
pub const THROW_TASK_NOT_OPEN: &str = "Task is not open";
pub const THROW_PAYMENT_NOT_ESCROWED: &str = "Payment is not escrowed";
pub const THROW_PAYMENT_MISSING: &str = "Payment record missing";
pub const THROW_NOT_ACCEPTED: &str = "Application is not accepted";
pub const THROW_SUBMISSION_REVIEWED: &str = "Submission already reviewed";
pub const THROW_RATING_EXISTS: &str = "Rating already submitted";
pub const THROW_APPLICATION_EXISTS: &str = "Application already exists";
pub const THROW_USERNAME_EXISTS: &str = "Username already exists";
pub const THROW_ATTACHMENT_LIMIT: &str = "Attachment limit reached";

const CONFLICT_THROWS: [&str; 10] = [
    THROW_INVALID_TRANSITION,
    THROW_TASK_ASSIGNED,
    THROW_TASK_NOT_OPEN,
    THROW_PAYMENT_NOT_ESCROWED,
    THROW_PAYMENT_MISSING,
    THROW_NOT_ACCEPTED,
    THROW_SUBMISSION_REVIEWED,
    THROW_RATING_EXISTS,
    THROW_APPLICATION_EXISTS,
    THROW_USERNAME_EXISTS,
];

const UNIQUE_INDEX_VIOLATION: &str = "already contains";
const RETRYABLE_CONFLICT: &str = "can be retried";
const NOT_EXECUTED: &str = "not executed";

/// Unique index name and the conflict raised when a write violates it.
pub type IndexConflict<'a> = (&'a str, &'a str);

fn custom_error(message: &str, index_conflicts: &[IndexConflict]) -> Option<AppError> {
    if let Some(thrown) = CONFLICT_THROWS.iter().find(|t| message.contains(**t)) {
        return Some(AppError::conflict(thrown));
    }
    if message.contains(THROW_ATTACHMENT_LIMIT) {
        return Some(AppError::InvalidFile {
            description: THROW_ATTACHMENT_LIMIT.to_string(),
        });
    }
    if message.contains(RETRYABLE_CONFLICT) {
        return Some(AppError::Conflict {
            error: "Conflict".to_string(),
            message: "The record was changed by another request, please retry".to_string(),
        });
    }
    if message.contains(UNIQUE_INDEX_VIOLATION) {
        return index_conflicts
            .iter()
            .find(|(index, _)| message.contains(index))
            .map(|(_, conflict)| AppError::conflict(conflict));
    }
    None
}

/// Maps the errors of a (transaction) response. Errors thrown by our own
/// guards win over the generic "not executed" errors of the other statements.
pub fn check_transaction_custom_error(
    query_response: &mut Response,
    index_conflicts: &[IndexConflict],
) -> AppResult<()> {
    let errors = query_response.take_errors();
    if errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = errors.values().map(|e| e.to_string()).collect();
    if let Some(err) = messages
        .iter()
        .find_map(|msg| custom_error(msg, index_conflicts))
    {
        return Err(err);
    }

    let source = messages
        .iter()
        .find(|msg| !msg.contains(NOT_EXECUTED))
        .or(messages.first())
        .cloned()
        .unwrap_or_default();
    Err(AppError::SurrealDb { source })
}

pub async fn get_record<T: DeserializeOwned>(db: &Db, id: &Thing) -> AppResult<T> {
    let mut res = db
        .query("SELECT * FROM $id;")
        .bind(("id", id.clone()))
        .await?;
    res.take::<Option<T>>(0)?
        .ok_or(AppError::EntityFailIdNotFound { ident: id.to_raw() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrown_guards_become_conflicts() {
        let err = custom_error("An error occurred: Rating already submitted", &[]).unwrap();
        assert_eq!(err.code(), "Rating already submitted");

        let err = custom_error(THROW_INVALID_TRANSITION, &[]).unwrap();
        assert_eq!(err.code(), "Invalid status transition");
    }

    #[test]
    fn unique_index_violations_use_the_given_conflict() {
        let msg = "Database index `task_worker_idx` already contains [task:a, local_user:b]";
        let err = custom_error(msg, &[("task_worker_idx", THROW_APPLICATION_EXISTS)]).unwrap();
        assert_eq!(err, AppError::conflict(THROW_APPLICATION_EXISTS));
        assert!(custom_error(msg, &[("other_idx", THROW_APPLICATION_EXISTS)]).is_none());
    }

    #[test]
    fn attachment_limit_is_a_file_error() {
        assert!(matches!(
            custom_error(THROW_ATTACHMENT_LIMIT, &[]),
            Some(AppError::InvalidFile { .. })
        ));
    }
}
