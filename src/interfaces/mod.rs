pub mod file_storage;
pub mod repositories;
