use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    file_meta::FileMeta,
    payment::{Payment, PaymentStatus},
    task::{Difficulty, Task, TaskStatus},
    user::Badge,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub employer: String,
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

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        TaskView {
            id: task.id.to_raw(),
            employer: task.employer.to_raw(),
            title: task.title,
            description: task.description,
            category: task.category,
            pay_amount: task.pay_amount,
            duration_hours: task.duration_hours,
            skill_tags: task.skill_tags,
            difficulty: task.difficulty,
            min_badge: task.min_badge,
            status: task.status,
            attachments: task.attachments,
            created_at: task.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentView {
    pub id: String,
    pub task: String,
    pub employer: String,
    pub worker: Option<String>,
    pub status: PaymentStatus,
    pub amount: u64,
    pub transaction_id: Option<String>,
    pub escrowed_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentView {
    fn from(payment: Payment) -> Self {
        PaymentView {
            id: payment.id.to_raw(),
            task: payment.task.to_raw(),
            employer: payment.employer.to_raw(),
            worker: payment.worker.map(|w| w.to_raw()),
            status: payment.status,
            amount: payment.amount,
            transaction_id: payment.transaction_id,
            escrowed_at: payment.escrowed_at,
            released_at: payment.released_at,
            created_at: payment.created_at,
        }
    }
}
