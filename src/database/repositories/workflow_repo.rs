use crate::{
    database::{
        client::Db,
        repositories::rating_repo::{bind_rating_insert, rating_insert_sql},
        surrdb_utils::{
            check_transaction_custom_error, THROW_INVALID_TRANSITION, THROW_PAYMENT_MISSING,
            THROW_PAYMENT_NOT_ESCROWED, THROW_SUBMISSION_REVIEWED, THROW_TASK_ASSIGNED,
        },
    },
    entities::{
        application::TaskApplication,
        payment::{payment_id, PaymentStatus},
        rating::{RaterType, RatingCreate},
        submission::SubmissionStatus,
        task::TaskStatus,
        workflow::{ApplicationTransition, TransitionEffect},
    },
    interfaces::repositories::workflow::WorkflowRepositoryInterface,
    middleware::error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub struct WorkflowRepository {
    client: Arc<Db>,
}

impl WorkflowRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    fn effect_sql(effect: &TransitionEffect) -> String {
        match effect {
            TransitionEffect::EscrowPayment { .. } => format!(
                "
            IF $payment.status != '{pending}' {{
                THROW \"{THROW_TASK_ASSIGNED}\";
            }};
            UPDATE $wf_payment SET
                status = '{escrowed}',
                worker = $wf_worker,
                transaction_id = $wf_transaction_id,
                escrowed_at = time::now();
            UPDATE $wf_task SET status = '{in_progress}';",
                pending = PaymentStatus::Pending,
                escrowed = PaymentStatus::Escrowed,
                in_progress = TaskStatus::InProgress,
            ),
            TransitionEffect::RevertEscrow => format!(
                "
            IF $payment.status != '{escrowed}' OR $payment.worker != $wf_worker {{
                THROW \"{THROW_PAYMENT_NOT_ESCROWED}\";
            }};
            UPDATE $wf_payment SET
                status = '{pending}',
                worker = NONE,
                transaction_id = NONE,
                escrowed_at = NONE;
            UPDATE $wf_task SET status = '{open}';",
                escrowed = PaymentStatus::Escrowed,
                pending = PaymentStatus::Pending,
                open = TaskStatus::Open,
            ),
            TransitionEffect::ReleasePayment => format!(
                "
            IF $payment.status != '{escrowed}' OR $payment.worker != $wf_worker {{
                THROW \"{THROW_PAYMENT_NOT_ESCROWED}\";
            }};
            UPDATE $wf_payment SET status = '{completed}', released_at = time::now();
            UPDATE $wf_task SET status = '{task_completed}';",
                escrowed = PaymentStatus::Escrowed,
                completed = PaymentStatus::Completed,
                task_completed = TaskStatus::Completed,
            ),
            TransitionEffect::IncrementWorkerStats => "
            UPDATE $wf_worker SET
                completed_tasks += 1,
                total_earnings += $payment.amount;"
                .to_string(),
            TransitionEffect::ApproveSubmission { .. } => format!(
                "
            LET $submission = SELECT status, is_latest, application FROM ONLY $wf_submission;
            IF $submission.status != '{submitted}' OR $submission.is_latest != true OR $submission.application != $wf_application {{
                THROW \"{THROW_SUBMISSION_REVIEWED}\";
            }};
            UPDATE $wf_submission SET
                status = '{approved}',
                feedback = $wf_feedback,
                reviewed_at = time::now();",
                submitted = SubmissionStatus::Submitted,
                approved = SubmissionStatus::Approved,
            ),
            TransitionEffect::RateWorker { .. } => rating_insert_sql(),
        }
    }
}

#[async_trait]
impl WorkflowRepositoryInterface for WorkflowRepository {
    async fn apply(&self, transition: ApplicationTransition) -> AppResult<TaskApplication> {
        let effects_sql = transition
            .effects
            .iter()
            .map(Self::effect_sql)
            .collect::<Vec<String>>()
            .join("\n");

        let sql = format!(
            "
            BEGIN TRANSACTION;
            LET $application = SELECT status FROM ONLY $wf_application;
            IF $application.status != $wf_from {{
                THROW \"{THROW_INVALID_TRANSITION}\";
            }};
            LET $payment = SELECT * FROM ONLY $wf_payment;
            IF type::is::none($payment) {{
                THROW \"{THROW_PAYMENT_MISSING}\";
            }};
            UPDATE $wf_application SET
                status = $wf_to,
                timelines += [{{ status: $wf_to, date: time::now() }}];
            {effects_sql}
            SELECT * FROM ONLY $wf_application;
            COMMIT TRANSACTION;
        "
        );

        let mut query = self
            .client
            .query(sql)
            .bind(("wf_application", transition.application.clone()))
            .bind(("wf_task", transition.task.clone()))
            .bind(("wf_worker", transition.worker.clone()))
            .bind(("wf_payment", payment_id(&transition.task)))
            .bind(("wf_from", transition.from.to_string()))
            .bind(("wf_to", transition.to.to_string()));

        for effect in transition.effects {
            query = match effect {
                TransitionEffect::EscrowPayment { transaction_id } => {
                    query.bind(("wf_transaction_id", transaction_id))
                }
                TransitionEffect::ApproveSubmission {
                    submission,
                    feedback,
                } => query
                    .bind(("wf_submission", submission))
                    .bind(("wf_feedback", feedback)),
                TransitionEffect::RateWorker { stars, review } => bind_rating_insert(
                    query,
                    RatingCreate {
                        application: transition.application.clone(),
                        task: transition.task.clone(),
                        rater: transition.employer.clone(),
                        rater_type: RaterType::Employer,
                        rated_user: transition.worker.clone(),
                        stars,
                        review,
                    },
                ),
                TransitionEffect::RevertEscrow
                | TransitionEffect::ReleasePayment
                | TransitionEffect::IncrementWorkerStats => query,
            };
        }

        let mut res = query.await?;
        check_transaction_custom_error(&mut res, &[])?;
        let application = res.take::<Option<TaskApplication>>(res.num_statements() - 1)?;
        application.ok_or(AppError::EntityFailIdNotFound {
            ident: transition.application.to_raw(),
        })
    }
}
