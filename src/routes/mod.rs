pub mod auth_routes;
pub mod ratings;
pub mod task_submissions;
pub mod tasks;
pub mod users;
