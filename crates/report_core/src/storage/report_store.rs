use crate::error::AppError;
use crate::report::GENERATION_TIME_FORMAT;
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const REPORT_EXTENSION: &str = "txt";
const TEMP_SUFFIX: &str = ".new";
const ARCHIVE_PREFIX: &str = "old_";
const ARCHIVE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StoreOutcome {
    /// No report existed for the user.
    Created,
    /// The previous report was copied to `archive` before being replaced.
    Replaced { archive: PathBuf },
    /// A previous report existed but carried no readable generation time.
    Overwritten,
}

/// Per-user report files inside one output directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn report_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}.{REPORT_EXTENSION}"))
    }

    pub fn temp_path(&self, username: &str) -> PathBuf {
        self.dir
            .join(format!("{username}.{REPORT_EXTENSION}{TEMP_SUFFIX}"))
    }

    pub fn archive_path(
        &self,
        username: &str,
        generated_at: PrimitiveDateTime,
    ) -> Result<PathBuf, AppError> {
        let stamp = generated_at
            .format(ARCHIVE_TIME_FORMAT)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        Ok(self
            .dir
            .join(format!("{ARCHIVE_PREFIX}{username}_{stamp}.{REPORT_EXTENSION}")))
    }

    /// Generation time embedded in the user's current report, if any.
    ///
    /// A missing, unreadable or malformed report yields `None`.
    pub fn previous_generation_time(&self, username: &str) -> Option<PrimitiveDateTime> {
        let content = std::fs::read_to_string(self.report_path(username)).ok()?;
        parse_generation_time(content.lines().nth(1)?)
    }

    /// Installs `report` as the user's current report.
    ///
    /// The new text is staged in a sibling temp file and renamed over the
    /// canonical name, so the canonical file never disappears mid-update. An
    /// existing report with a known generation time is first copied to its
    /// archive name; failing that copy aborts the update and leaves the
    /// current report untouched.
    pub fn store(
        &self,
        username: &str,
        report: &str,
        previous_generation_time: Option<PrimitiveDateTime>,
    ) -> Result<StoreOutcome, AppError> {
        let target = self.report_path(username);
        let temp = self.temp_path(username);

        std::fs::write(&temp, report)
            .map_err(|err| AppError::io(format!("cannot write {}: {}", temp.display(), err)))?;

        let outcome = if !target.exists() {
            StoreOutcome::Created
        } else {
            match previous_generation_time {
                Some(generated_at) => {
                    let archive = self
                        .archive_path(username, generated_at)
                        .and_then(|archive| archive_report(&target, archive));
                    match archive {
                        Ok(archive) => StoreOutcome::Replaced { archive },
                        Err(err) => {
                            std::fs::remove_file(&temp).ok();
                            return Err(err);
                        }
                    }
                }
                None => {
                    tracing::warn!(
                        path = %target.display(),
                        "previous report has no readable generation time; replacing without archive"
                    );
                    StoreOutcome::Overwritten
                }
            }
        };

        std::fs::rename(&temp, &target).map_err(|err| {
            AppError::io(format!(
                "cannot rename {} to {}: {}",
                temp.display(),
                target.display(),
                err
            ))
        })?;

        Ok(outcome)
    }
}

fn archive_report(current: &Path, archive: PathBuf) -> Result<PathBuf, AppError> {
    std::fs::copy(current, &archive).map_err(|err| {
        AppError::io(format!(
            "cannot archive {} as {}: {}",
            current.display(),
            archive.display(),
            err
        ))
    })?;
    Ok(archive)
}

/// Reads the trailing `DD.MM.YYYY HH:MM` tokens of a report's header line.
pub fn parse_generation_time(line: &str) -> Option<PrimitiveDateTime> {
    let mut tokens = line.split_whitespace().rev();
    let time = tokens.next()?;
    let date = tokens.next()?;
    PrimitiveDateTime::parse(&format!("{date} {time}"), GENERATION_TIME_FORMAT).ok()
}
