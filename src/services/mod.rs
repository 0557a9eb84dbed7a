pub mod application_service;
pub mod auth_service;
pub mod rating_service;
pub mod submission_service;
pub mod task_service;
pub mod task_workflow;
pub mod user_service;
