pub mod api;
pub mod config;
pub mod error;
pub mod grouping;
pub mod model;
pub mod report;
pub mod report_api;
pub mod storage;
