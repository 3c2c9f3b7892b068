use crate::model::TaskRecord;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub completed: Vec<String>,
    pub uncompleted: Vec<String>,
}

impl TaskGroup {
    pub fn total(&self) -> usize {
        self.completed.len() + self.uncompleted.len()
    }
}

pub type TaskGroups = HashMap<i64, TaskGroup>;

/// Partitions raw task records by owner and completion state.
///
/// Records that fail validation are skipped. Titles keep their received order
/// and are stored untruncated.
pub fn group_tasks(tasks: &[Value]) -> TaskGroups {
    let mut groups = TaskGroups::new();
    for value in tasks {
        let Some(task) = TaskRecord::from_value(value) else {
            tracing::debug!(record = %value, "skipping task without required keys");
            continue;
        };

        let group = groups.entry(task.user_id).or_default();
        if task.completed {
            group.completed.push(task.title);
        } else {
            group.uncompleted.push(task.title);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::group_tasks;
    use serde_json::json;

    #[test]
    fn groups_by_user_preserving_order() {
        let tasks = vec![
            json!({ "userId": 1, "title": "first", "completed": true }),
            json!({ "userId": 2, "title": "other", "completed": false }),
            json!({ "userId": 1, "title": "second", "completed": false }),
            json!({ "userId": 1, "title": "third", "completed": true }),
        ];

        let groups = group_tasks(&tasks);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&1].completed, vec!["first", "third"]);
        assert_eq!(groups[&1].uncompleted, vec!["second"]);
        assert!(groups[&2].completed.is_empty());
        assert_eq!(groups[&2].uncompleted, vec!["other"]);
    }

    #[test]
    fn excludes_invalid_records_from_counts() {
        let tasks = vec![
            json!({ "userId": 1, "title": "kept", "completed": true }),
            json!({ "title": "no owner", "completed": true }),
            json!({ "userId": 1, "completed": false }),
            json!({ "userId": 1, "title": "no flag" }),
            json!("not an object"),
            json!({ "userId": 1, "title": "also kept", "completed": false }),
        ];

        let groups = group_tasks(&tasks);
        let total: usize = groups.values().map(|group| group.total()).sum();

        assert_eq!(total, 2);
    }

    #[test]
    fn keeps_long_titles_verbatim() {
        let title = "x".repeat(120);
        let tasks = vec![json!({ "userId": 7, "title": title, "completed": true })];

        let groups = group_tasks(&tasks);
        assert_eq!(groups[&7].completed[0].len(), 120);
    }
}
