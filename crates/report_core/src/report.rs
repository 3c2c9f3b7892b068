use crate::config::ReportLanguage;
use crate::error::AppError;
use crate::grouping::{TaskGroup, TaskGroups};
use crate::model::User;
use std::fmt::Write;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Layout of the generation timestamp on a report's second line.
pub const GENERATION_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]");

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLabels {
    pub report_for: &'static str,
    pub total_tasks: &'static str,
    pub completed_tasks: &'static str,
    pub remaining_tasks: &'static str,
}

impl ReportLabels {
    pub fn for_language(language: ReportLanguage) -> Self {
        match language {
            ReportLanguage::English => Self {
                report_for: "Report for",
                total_tasks: "Total tasks:",
                completed_tasks: "Completed tasks",
                remaining_tasks: "Remaining tasks",
            },
            ReportLanguage::Russian => Self {
                report_for: "Отчёт для",
                total_tasks: "Всего задач:",
                completed_tasks: "Завершённые задачи",
                remaining_tasks: "Оставшиеся задачи",
            },
        }
    }
}

/// Local wall-clock time at minute precision, falling back to UTC when the
/// local offset cannot be determined.
pub fn current_generation_time() -> PrimitiveDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let now = PrimitiveDateTime::new(now.date(), now.time());
    now.replace_second(0)
        .and_then(|value| value.replace_nanosecond(0))
        .unwrap_or(now)
}

pub fn format_generation_time(value: PrimitiveDateTime) -> Result<String, AppError> {
    value
        .format(GENERATION_TIME_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Cuts titles longer than `max_len` characters and marks the cut.
pub fn truncate_title(title: &str, max_len: usize) -> String {
    match title.char_indices().nth(max_len) {
        Some((byte_index, _)) => format!("{}{ELLIPSIS}", &title[..byte_index]),
        None => title.to_string(),
    }
}

pub fn render_report(
    user: &User,
    groups: &TaskGroups,
    generated_at: PrimitiveDateTime,
    labels: &ReportLabels,
    max_title_len: usize,
) -> Result<String, AppError> {
    let empty = TaskGroup::default();
    let group = groups.get(&user.id).unwrap_or(&empty);
    let completed: Vec<String> = group
        .completed
        .iter()
        .map(|title| truncate_title(title, max_title_len))
        .collect();
    let uncompleted: Vec<String> = group
        .uncompleted
        .iter()
        .map(|title| truncate_title(title, max_title_len))
        .collect();
    let generated_at = format_generation_time(generated_at)?;

    let mut report = String::new();
    let _ = writeln!(report, "{} {}.", labels.report_for, user.company);
    let _ = writeln!(report, "{} <{}> {}", user.name, user.email, generated_at);
    let _ = writeln!(
        report,
        "{} {}",
        labels.total_tasks,
        completed.len() + uncompleted.len()
    );
    report.push('\n');
    push_section(&mut report, labels.completed_tasks, &completed);
    report.push('\n');
    push_section(&mut report, labels.remaining_tasks, &uncompleted);
    Ok(report)
}

fn push_section(report: &mut String, header: &str, titles: &[String]) {
    let _ = writeln!(report, "{header} ({}):", titles.len());
    for title in titles {
        report.push_str(title);
        report.push('\n');
    }
}
