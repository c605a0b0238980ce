pub mod file;
pub mod log;
