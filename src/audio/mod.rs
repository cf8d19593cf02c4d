pub mod file_set;
pub mod format;
