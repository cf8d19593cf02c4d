pub mod paths;
pub mod reporting;
