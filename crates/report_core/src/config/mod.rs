use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "USER_REPORTS_CONFIG_PATH";
const APP_DIR_NAME: &str = "user_reports";

pub const DEFAULT_API_BASE: &str = "https://json.medrocket.ru";
pub const DEFAULT_USERS_PATH: &str = "/users";
pub const DEFAULT_TODOS_PATH: &str = "/todos";
pub const DEFAULT_OUT_DIR: &str = "tasks";
pub const DEFAULT_MAX_TITLE_LEN: usize = 48;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportLanguage {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ru")]
    Russian,
}

impl ReportLanguage {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "ru" | "russian" => Some(Self::Russian),
            _ => None,
        }
    }
}

/// Runtime settings shared by the client, formatter and store.
///
/// Every field has a default, so a partial config file only needs the keys
/// it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub api_base: String,
    pub users_path: String,
    pub todos_path: String,
    pub out_dir: PathBuf,
    pub max_title_len: usize,
    pub language: ReportLanguage,
    pub request_timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            users_path: DEFAULT_USERS_PATH.to_string(),
            todos_path: DEFAULT_TODOS_PATH.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            language: ReportLanguage::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ReportConfig {
    pub fn users_url(&self) -> String {
        join_url(&self.api_base, &self.users_path)
    }

    pub fn todos_url(&self) -> String {
        join_url(&self.api_base, &self.todos_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_base.trim().is_empty() {
            return Err(AppError::invalid_data("api_base must not be empty"));
        }
        if self.max_title_len == 0 {
            return Err(AppError::invalid_data("max_title_len must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::invalid_data(
                "request_timeout_secs must be positive",
            ));
        }
        if self.out_dir.as_os_str().is_empty() {
            return Err(AppError::invalid_data("out_dir must not be empty"));
        }
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ReportConfig,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub users_path: Option<String>,
    pub todos_path: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub max_title_len: Option<usize>,
    pub language: Option<ReportLanguage>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Applies one `KEY=VALUE` pair.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        match key.trim() {
            "api_base" => self.api_base = Some(value.to_string()),
            "users_path" => self.users_path = Some(value.to_string()),
            "todos_path" => self.todos_path = Some(value.to_string()),
            "out_dir" => self.out_dir = Some(PathBuf::from(value)),
            "max_title_len" => {
                let parsed = value.parse().map_err(|_| {
                    AppError::invalid_input(format!("max_title_len must be a number: {value}"))
                })?;
                self.max_title_len = Some(parsed);
            }
            "language" => {
                let parsed = ReportLanguage::parse(value).ok_or_else(|| {
                    AppError::invalid_input(format!("unknown language: {value}"))
                })?;
                self.language = Some(parsed);
            }
            "request_timeout_secs" => {
                let parsed = value.parse().map_err(|_| {
                    AppError::invalid_input(format!(
                        "request_timeout_secs must be a number: {value}"
                    ))
                })?;
                self.request_timeout_secs = Some(parsed);
            }
            other => {
                return Err(AppError::invalid_input(format!(
                    "unknown config key: {other}"
                )));
            }
        }
        Ok(())
    }

    pub fn parse_pair(&mut self, pair: &str) -> Result<(), AppError> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| AppError::invalid_input(format!("expected KEY=VALUE, got {pair}")))?;
        self.set(key, value)
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: ReportConfig::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: ReportConfig::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: ReportConfig::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<ReportConfig, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn merge_overrides(base: &ReportConfig, overrides: &ConfigOverrides) -> ReportConfig {
    let mut merged = base.clone();
    if let Some(api_base) = overrides.api_base.as_ref() {
        merged.api_base = api_base.clone();
    }
    if let Some(users_path) = overrides.users_path.as_ref() {
        merged.users_path = users_path.clone();
    }
    if let Some(todos_path) = overrides.todos_path.as_ref() {
        merged.todos_path = todos_path.clone();
    }
    if let Some(out_dir) = overrides.out_dir.as_ref() {
        merged.out_dir = out_dir.clone();
    }
    if let Some(max_title_len) = overrides.max_title_len {
        merged.max_title_len = max_title_len;
    }
    if let Some(language) = overrides.language {
        merged.language = language;
    }
    if let Some(timeout) = overrides.request_timeout_secs {
        merged.request_timeout_secs = timeout;
    }
    merged
}
