pub mod application;
pub mod file_meta;
pub mod payment;
pub mod rating;
pub mod submission;
pub mod task;
pub mod user;
pub mod workflow;
