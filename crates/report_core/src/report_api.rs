use crate::api::{self, Fetcher};
use crate::config::ReportConfig;
use crate::error::AppError;
use crate::grouping::{TaskGroups, group_tasks};
use crate::model::User;
use crate::report::{ReportLabels, current_generation_time, render_report};
use crate::storage::report_store::{ReportStore, StoreOutcome};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub user_id: i64,
    pub username: String,
    pub path: PathBuf,
    pub outcome: StoreOutcome,
}

#[derive(Debug)]
pub struct ReportFailure {
    pub username: String,
    pub error: AppError,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub reports: Vec<StoredReport>,
    pub skipped_users: usize,
    pub failures: Vec<ReportFailure>,
    pub fetch_errors: Vec<AppError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn generate_reports(config: &ReportConfig) -> Result<RunOutcome, AppError> {
    let fetcher = api::fetcher_from_config(config)?;
    generate_reports_with(fetcher.as_ref(), config)
}

/// Runs the whole pipeline against `fetcher`.
///
/// Fetch failures degrade to an empty collection. Only a failure to create
/// the output directory aborts the run; a failed store is recorded for that
/// user and the remaining users are still processed.
pub fn generate_reports_with(
    fetcher: &dyn Fetcher,
    config: &ReportConfig,
) -> Result<RunOutcome, AppError> {
    config.validate()?;
    let mut outcome = RunOutcome::default();

    let users = fetch_records(fetcher, &config.users_url(), &mut outcome.fetch_errors);
    let tasks = fetch_records(fetcher, &config.todos_url(), &mut outcome.fetch_errors);

    let store = ReportStore::new(&config.out_dir);
    std::fs::create_dir_all(store.dir()).map_err(|err| {
        AppError::io(format!(
            "cannot create output directory {}: {}",
            store.dir().display(),
            err
        ))
    })?;

    let groups = group_tasks(&tasks);
    let labels = ReportLabels::for_language(config.language);

    for value in &users {
        let Some(user) = User::from_value(value) else {
            tracing::debug!(record = %value, "skipping user without required keys");
            outcome.skipped_users += 1;
            continue;
        };

        match store_user_report(&store, &user, &groups, &labels, config.max_title_len) {
            Ok(stored) => {
                tracing::info!(
                    username = %stored.username,
                    path = %stored.path.display(),
                    outcome = ?stored.outcome,
                    "stored report"
                );
                outcome.reports.push(stored);
            }
            Err(error) => {
                tracing::error!(username = %user.username, %error, "failed to store report");
                outcome.failures.push(ReportFailure {
                    username: user.username,
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

fn fetch_records(fetcher: &dyn Fetcher, url: &str, errors: &mut Vec<AppError>) -> Vec<Value> {
    match fetcher.fetch_array(url) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!(%url, %error, "fetch failed; continuing without data");
            errors.push(error);
            Vec::new()
        }
    }
}

fn store_user_report(
    store: &ReportStore,
    user: &User,
    groups: &TaskGroups,
    labels: &ReportLabels,
    max_title_len: usize,
) -> Result<StoredReport, AppError> {
    let report = render_report(
        user,
        groups,
        current_generation_time(),
        labels,
        max_title_len,
    )?;
    let previous = store.previous_generation_time(&user.username);
    let outcome = store.store(&user.username, &report, previous)?;

    Ok(StoredReport {
        user_id: user.id,
        username: user.username.clone(),
        path: store.report_path(&user.username),
        outcome,
    })
}
