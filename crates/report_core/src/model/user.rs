use serde_json::Value;

use super::has_keys;

pub const USER_REQUIRED_KEYS: [&str; 5] = ["id", "name", "username", "email", "company"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub company: String,
}

impl User {
    /// Builds a user from a raw API object.
    ///
    /// Returns `None` when a required key is missing or holds a value that
    /// cannot be used. `company` may be either an object carrying `name` or a
    /// plain string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if !has_keys(object, &USER_REQUIRED_KEYS) {
            return None;
        }

        let company = match &object["company"] {
            Value::Object(company) => company.get("name")?.as_str()?,
            Value::String(name) => name.as_str(),
            _ => return None,
        };
        let username = object["username"].as_str()?;
        if username.trim().is_empty() || username.contains(['/', '\\']) {
            return None;
        }

        Some(Self {
            id: object["id"].as_i64()?,
            name: object["name"].as_str()?.to_string(),
            username: username.to_string(),
            email: object["email"].as_str()?.to_string(),
            company: company.to_string(),
        })
    }
}
