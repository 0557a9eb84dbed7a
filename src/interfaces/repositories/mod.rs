pub mod applications;
pub mod payments;
pub mod ratings;
pub mod submissions;
pub mod tasks;
pub mod users;
pub mod workflow;
