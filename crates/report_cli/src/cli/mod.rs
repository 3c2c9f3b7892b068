use clap::Parser;
use report_core::config::{ConfigOverrides, ReportConfig, merge_overrides};
use report_core::error::AppError;
use std::path::PathBuf;

/// Fetch users and their to-do lists and write one task report per user.
///
/// Example: user_reports
/// Example: user_reports --out-dir reports --config-override language=ru
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory receiving the report files
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Base URL of the users/todos API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn overrides(&self) -> Result<ConfigOverrides, AppError> {
        let mut overrides = ConfigOverrides::default();
        for pair in &self.config_override {
            overrides.parse_pair(pair)?;
        }
        if let Some(out_dir) = self.out_dir.as_ref() {
            overrides.out_dir = Some(out_dir.clone());
        }
        if let Some(api_base) = self.api_base.as_ref() {
            overrides.api_base = Some(api_base.clone());
        }
        Ok(overrides)
    }

    /// Layers the command line over `base`. Dedicated flags win over
    /// `--config-override` pairs for the same key.
    pub fn resolve_config(&self, base: &ReportConfig) -> Result<ReportConfig, AppError> {
        let config = merge_overrides(base, &self.overrides()?);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use report_core::config::{ReportConfig, ReportLanguage};
    use std::path::PathBuf;

    #[test]
    fn no_arguments_keeps_base_config() {
        let cli = Cli::try_parse_from(["user_reports"]).unwrap();
        let config = cli.resolve_config(&ReportConfig::default()).unwrap();

        assert_eq!(config, ReportConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn flags_override_config_pairs() {
        let cli = Cli::try_parse_from([
            "user_reports",
            "--config-override",
            "out_dir=from-pair",
            "--config-override",
            "language=ru",
            "--out-dir",
            "from-flag",
        ])
        .unwrap();

        let config = cli.resolve_config(&ReportConfig::default()).unwrap();

        assert_eq!(config.out_dir, PathBuf::from("from-flag"));
        assert_eq!(config.language, ReportLanguage::Russian);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli =
            Cli::try_parse_from(["user_reports", "--config-override", "max_title_len=0"]).unwrap();

        let err = cli.resolve_config(&ReportConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }
}
