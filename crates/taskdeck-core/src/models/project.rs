use serde::{Deserialize, Serialize};

use super::{Participant, Task, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: i64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub participants: Vec<User>,
}

impl Project {
    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("-")
    }

    /// Whether the given user owns this project
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// Payload for updating a project's details. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response shape of the add-user operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectWithParticipants {
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_parses_list_shape() {
        // GET /projects embeds tasks and participants
        let json = r#"{
            "id": 1,
            "title": "Apollo",
            "description": "moonshot",
            "owner_id": 9,
            "tasks": [
                {"id": 4, "title": "Design", "description": null, "is_completed": true, "project_id": 1}
            ],
            "participants": [
                {"id": 2, "username": "bob", "email": "bob@example.com",
                 "is_active": true, "role": "user", "is_subscribed": false}
            ]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.title, "Apollo");
        assert_eq!(project.tasks.len(), 1);
        assert!(project.tasks[0].is_completed);
        assert_eq!(project.participants[0].username, "bob");
        assert!(project.is_owned_by(9));
        assert!(!project.is_owned_by(2));
    }

    #[test]
    fn project_parses_without_collections() {
        let json = r#"{"id": 2, "title": "Bare", "owner_id": 1}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.tasks.is_empty());
        assert!(project.participants.is_empty());
        assert_eq!(project.description_display(), "-");
    }

    #[test]
    fn add_user_response_parses() {
        let json = r#"{
            "project_id": 1,
            "title": "Apollo",
            "participants": [{"id": 2, "username": "bob"}]
        }"#;
        let resp: ProjectWithParticipants = serde_json::from_str(json).unwrap();
        assert_eq!(resp.participants.len(), 1);
        assert_eq!(resp.participants[0].username, "bob");
    }
}
