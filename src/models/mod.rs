//! Data structures passed between pipeline stages.

pub mod credential;
pub mod report_config;
pub mod route;
