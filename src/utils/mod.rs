pub mod file;
pub mod hash;
pub mod jwt;
pub mod validate_utils;
