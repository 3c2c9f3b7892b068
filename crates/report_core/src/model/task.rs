use serde_json::Value;

use super::has_keys;

pub const TASK_REQUIRED_KEYS: [&str; 3] = ["userId", "title", "completed"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

impl TaskRecord {
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if !has_keys(object, &TASK_REQUIRED_KEYS) {
            return None;
        }

        Some(Self {
            user_id: object["userId"].as_i64()?,
            title: object["title"].as_str()?.to_string(),
            completed: object["completed"].as_bool()?,
        })
    }
}
