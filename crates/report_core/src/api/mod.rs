use crate::config::ReportConfig;
use crate::error::AppError;
use serde_json::Value;

mod http;
pub use http::HttpFetcher;

/// Source of raw JSON documents for the report run.
pub trait Fetcher {
    fn fetch_json(&self, url: &str) -> Result<Value, AppError>;

    /// Fetches a JSON array, returning its elements.
    fn fetch_array(&self, url: &str) -> Result<Vec<Value>, AppError> {
        match self.fetch_json(url)? {
            Value::Array(items) => Ok(items),
            other => Err(AppError::invalid_data(format!(
                "expected a JSON array from {url}, got {}",
                json_kind(&other)
            ))),
        }
    }
}

pub fn fetcher_from_config(config: &ReportConfig) -> Result<Box<dyn Fetcher>, AppError> {
    Ok(Box::new(HttpFetcher::new(config.request_timeout())?))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
