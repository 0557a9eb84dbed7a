use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

pub const TABLE_NAME: &str = "task_application";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Accepted,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationEvent {
    Accept,
    Reject,
    Complete,
}

impl ApplicationStatus {
    /// The application state machine. `None` means the event is not allowed
    /// in the current status.
    pub fn next(self, event: ApplicationEvent) -> Option<ApplicationStatus> {
        use ApplicationEvent::*;
        use ApplicationStatus::*;
        match (self, event) {
            (Applied, Accept) => Some(Accepted),
            (Applied, Reject) => Some(Rejected),
            (Accepted, Reject) => Some(Rejected),
            (Accepted, Complete) => Some(Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTimeline {
    pub status: ApplicationStatus,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskApplication {
    pub id: Thing,
    pub task: Thing,
    pub worker: Thing,
    pub status: ApplicationStatus,
    pub message: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub timelines: Vec<StatusTimeline>,
}

#[cfg(test)]
mod tests {
    use super::ApplicationEvent::*;
    use super::ApplicationStatus::*;
    use super::*;

    #[test]
    fn allowed_transitions() {
        assert_eq!(Applied.next(Accept), Some(Accepted));
        assert_eq!(Applied.next(Reject), Some(Rejected));
        assert_eq!(Accepted.next(Reject), Some(Rejected));
        assert_eq!(Accepted.next(Complete), Some(Completed));
    }

    #[test]
    fn accept_is_not_repeatable() {
        assert_eq!(Accepted.next(Accept), None);
    }

    #[test]
    fn final_states_accept_no_events() {
        for status in [Rejected, Completed] {
            for event in [Accept, Reject, Complete] {
                assert_eq!(status.next(event), None, "{status} + {event}");
            }
        }
    }

    #[test]
    fn complete_requires_acceptance() {
        assert_eq!(Applied.next(Complete), None);
    }

    #[test]
    fn statuses_parse_from_wire_format() {
        assert_eq!("ACCEPTED".parse::<ApplicationStatus>().unwrap(), Accepted);
        assert_eq!(Completed.to_string(), "COMPLETED");
        assert_eq!(
            serde_json::from_str::<ApplicationEvent>("\"REJECT\"").unwrap(),
            Reject
        );
    }
}
