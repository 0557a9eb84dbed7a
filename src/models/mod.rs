pub mod response;
pub mod view;
