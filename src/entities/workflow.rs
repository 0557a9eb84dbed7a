use surrealdb::sql::Thing;
use uuid::Uuid;

use super::application::{ApplicationEvent, ApplicationStatus, TaskApplication};
use super::task::Task;
use crate::middleware::error::{AppError, AppResult};

/// Side effect applied in the same transaction as a status change.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEffect {
    /// payment PENDING -> ESCROWED for the worker, task OPEN -> IN_PROGRESS
    EscrowPayment { transaction_id: String },
    /// payment ESCROWED -> PENDING, task back to OPEN
    RevertEscrow,
    /// payment ESCROWED -> COMPLETED, task -> COMPLETED
    ReleasePayment,
    IncrementWorkerStats,
    ApproveSubmission {
        submission: Thing,
        feedback: Option<String>,
    },
    RateWorker { stars: u8, review: Option<String> },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub approved_submission: Option<(Thing, Option<String>)>,
    pub worker_rating: Option<(u8, Option<String>)>,
}

#[derive(Debug, Clone)]
pub struct ApplicationTransition {
    pub application: Thing,
    pub task: Thing,
    pub worker: Thing,
    pub employer: Thing,
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
    pub effects: Vec<TransitionEffect>,
}

impl ApplicationTransition {
    pub fn plan(
        application: &TaskApplication,
        task: &Task,
        event: ApplicationEvent,
        options: CompletionOptions,
    ) -> AppResult<Self> {
        let from = application.status;
        let to = from.next(event).ok_or(AppError::InvalidTransition {
            from: from.to_string(),
            event: event.to_string(),
        })?;

        Ok(Self {
            application: application.id.clone(),
            task: task.id.clone(),
            worker: application.worker.clone(),
            employer: task.employer.clone(),
            from,
            to,
            effects: effects_for(from, to, options),
        })
    }
}

fn effects_for(
    from: ApplicationStatus,
    to: ApplicationStatus,
    options: CompletionOptions,
) -> Vec<TransitionEffect> {
    use ApplicationStatus::*;
    match (from, to) {
        (Applied, Accepted) => vec![TransitionEffect::EscrowPayment {
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
        }],
        (Accepted, Rejected) => vec![TransitionEffect::RevertEscrow],
        (Accepted, Completed) => {
            let mut effects = vec![
                TransitionEffect::ReleasePayment,
                TransitionEffect::IncrementWorkerStats,
            ];
            if let Some((submission, feedback)) = options.approved_submission {
                effects.push(TransitionEffect::ApproveSubmission {
                    submission,
                    feedback,
                });
            }
            if let Some((stars, review)) = options.worker_rating {
                effects.push(TransitionEffect::RateWorker { stars, review });
            }
            effects
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        task::{Difficulty, TaskStatus},
        user::Badge,
    };
    use chrono::Utc;

    fn task() -> Task {
        Task {
            id: Thing::from(("task", "t1")),
            employer: Thing::from(("local_user", "emp")),
            title: "Label images".to_string(),
            description: "Label one hundred images".to_string(),
            category: "data".to_string(),
            pay_amount: 500,
            duration_hours: 4,
            skill_tags: vec![],
            difficulty: Difficulty::Easy,
            min_badge: Badge::Bronze,
            status: TaskStatus::Open,
            attachments: vec![],
            created_at: Utc::now(),
        }
    }

    fn application(status: ApplicationStatus) -> TaskApplication {
        TaskApplication {
            id: Thing::from(("task_application", "a1")),
            task: Thing::from(("task", "t1")),
            worker: Thing::from(("local_user", "wrk")),
            status,
            message: None,
            applied_at: Utc::now(),
            timelines: vec![],
        }
    }

    #[test]
    fn accept_escrows_payment() {
        let plan = ApplicationTransition::plan(
            &application(ApplicationStatus::Applied),
            &task(),
            ApplicationEvent::Accept,
            CompletionOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.to, ApplicationStatus::Accepted);
        assert_eq!(plan.effects.len(), 1);
        assert!(matches!(
            &plan.effects[0],
            TransitionEffect::EscrowPayment { transaction_id } if transaction_id.starts_with("txn_")
        ));
    }

    #[test]
    fn reject_after_accept_reverts_escrow() {
        let plan = ApplicationTransition::plan(
            &application(ApplicationStatus::Accepted),
            &task(),
            ApplicationEvent::Reject,
            CompletionOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.effects, vec![TransitionEffect::RevertEscrow]);

        let plan = ApplicationTransition::plan(
            &application(ApplicationStatus::Applied),
            &task(),
            ApplicationEvent::Reject,
            CompletionOptions::default(),
        )
        .unwrap();
        assert!(plan.effects.is_empty());
    }

    #[test]
    fn complete_releases_once_with_optional_effects() {
        let submission = Thing::from(("task_submission", "s1"));
        let plan = ApplicationTransition::plan(
            &application(ApplicationStatus::Accepted),
            &task(),
            ApplicationEvent::Complete,
            CompletionOptions {
                approved_submission: Some((submission.clone(), Some("great".to_string()))),
                worker_rating: Some((5, None)),
            },
        )
        .unwrap();
        let releases = plan
            .effects
            .iter()
            .filter(|e| **e == TransitionEffect::ReleasePayment)
            .count();
        assert_eq!(releases, 1);
        assert!(plan.effects.contains(&TransitionEffect::IncrementWorkerStats));
        assert!(plan.effects.contains(&TransitionEffect::RateWorker {
            stars: 5,
            review: None
        }));
        assert_eq!(plan.employer, Thing::from(("local_user", "emp")));
    }

    #[test]
    fn invalid_event_is_an_invalid_transition() {
        let err = ApplicationTransition::plan(
            &application(ApplicationStatus::Completed),
            &task(),
            ApplicationEvent::Complete,
            CompletionOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AppError::InvalidTransition {
                from: "COMPLETED".to_string(),
                event: "COMPLETE".to_string()
            }
        );
    }
}
