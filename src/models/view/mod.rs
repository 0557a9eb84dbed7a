pub mod application;
pub mod rating;
pub mod submission;
pub mod task;
pub mod user;
