use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

pub const TABLE_NAME: &str = "payment";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Escrowed,
    Completed,
    Failed,
}

/// Escrow record of a task. There is exactly one per task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Thing,
    pub task: Thing,
    pub employer: Thing,
    pub worker: Option<Thing>,
    pub status: PaymentStatus,
    pub amount: u64,
    pub transaction_id: Option<String>,
    pub escrowed_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub fn payment_id(task: &Thing) -> Thing {
    Thing::from((TABLE_NAME, task.id.clone()))
}
