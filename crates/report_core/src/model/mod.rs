mod task;
mod user;

pub use task::TaskRecord;
pub use user::User;

use serde_json::{Map, Value};

fn has_keys(object: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().all(|key| object.contains_key(*key))
}
