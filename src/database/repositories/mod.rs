pub mod application_repo;
pub mod payment_repo;
pub mod rating_repo;
pub mod submission_repo;
pub mod task_repo;
pub mod user_repo;
pub mod workflow_repo;
