pub mod report_store;
