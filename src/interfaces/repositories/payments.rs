use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::payment::Payment;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait PaymentRepositoryInterface {
    async fn get_by_task(&self, task: &Thing) -> AppResult<Payment>;
}
