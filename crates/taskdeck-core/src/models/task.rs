use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    pub project_id: i64,
}

impl Task {
    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("-")
    }
}

/// Payload for creating a task under a project.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub project_id: i64,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: Option<String>, project_id: i64) -> Self {
        Self {
            title: title.into(),
            description,
            is_completed: false,
            project_id,
        }
    }
}

/// Payload for a full task update.
#[derive(Debug, Clone, Serialize)]
pub struct TaskUpdate {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_parses_without_description() {
        let json = r#"{"id": 7, "title": "Write docs", "is_completed": false, "project_id": 3}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.description, None);
        assert_eq!(task.description_display(), "-");
        assert!(!task.is_completed);
    }

    #[test]
    fn new_task_starts_pending() {
        let task = NewTask::new("Ship it", Some("final pass".to_string()), 3);
        assert!(!task.is_completed);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["project_id"], 3);
        assert_eq!(json["is_completed"], false);
    }
}
