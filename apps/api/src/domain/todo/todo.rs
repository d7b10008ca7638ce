use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::events::TodoEvent;
use super::value_objects::Priority;

/// Partial update applied to a todo
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Todo aggregate root
///
/// A task owned by one user. Serializes with camelCase keys, which is the
/// shape the frontend and the chat assistant both consume.
///
/// # Invariants
/// - Title is trimmed and never empty
/// - Priority stays within 0-5
/// - `updated_at` moves forward on every change
///
/// # Example
/// ```
/// use todo_assistant_api::domain::todo::{Priority, Todo};
/// use uuid::Uuid;
///
/// let (todo, events) = Todo::new(Uuid::new_v4(), None, "  Water plants ", Priority::default(), None)
///     .expect("valid todo");
///
/// assert_eq!(todo.title(), "Water plants");
/// assert!(!todo.completed());
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    id: Uuid,
    user_id: Uuid,
    conversation_id: Option<Uuid>,
    title: String,
    completed: bool,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, incomplete todo
    ///
    /// # Returns
    /// * `Ok((Todo, Vec<TodoEvent>))` - New todo and a Created event
    /// * `Err(String)` - If the title is blank
    pub fn new(
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        title: &str,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(Self, Vec<TodoEvent>), String> {
        let title = Self::validate_title(title)?;
        let now = Utc::now();

        let todo = Self {
            id: Uuid::new_v4(),
            user_id,
            conversation_id,
            title,
            completed: false,
            priority,
            due_date,
            created_at: now,
            updated_at: now,
        };

        let events = vec![TodoEvent::Created {
            todo_id: todo.id,
            user_id: todo.user_id,
            conversation_id: todo.conversation_id,
            title: todo.title.clone(),
        }];

        Ok((todo, events))
    }

    /// Applies a partial update
    ///
    /// The whole change set is validated before anything is modified, so a
    /// rejected update leaves the todo untouched.
    pub fn apply(&mut self, changes: TodoChanges) -> Result<TodoEvent, String> {
        let title = changes
            .title
            .as_deref()
            .map(Self::validate_title)
            .transpose()?;

        let mut changed = Vec::new();
        if let Some(title) = title {
            self.title = title;
            changed.push("title");
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
            changed.push("completed");
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
            changed.push("priority");
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = Some(due_date);
            changed.push("dueDate");
        }

        self.touch();

        Ok(TodoEvent::Updated {
            todo_id: self.id,
            user_id: self.user_id,
            changed,
        })
    }

    /// Flips the completion flag
    pub fn toggle(&mut self) -> TodoEvent {
        self.completed = !self.completed;
        self.touch();

        TodoEvent::Toggled {
            todo_id: self.id,
            user_id: self.user_id,
            completed: self.completed,
        }
    }

    /// Consumes the todo, producing the event recorded when it is removed
    pub fn delete(self) -> TodoEvent {
        TodoEvent::Deleted {
            todo_id: self.id,
            user_id: self.user_id,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    fn validate_title(title: &str) -> Result<String, String> {
        let title = title.trim();
        if title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        Ok(title.to_string())
    }

    fn touch(&mut self) {
        // Guard against clock skew between two quick edits
        self.updated_at = Utc::now().max(self.updated_at);
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn conversation_id(&self) -> Option<Uuid> {
        self.conversation_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Todo from stored data
    ///
    /// Skips validation; only repository implementations should call this.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        title: String,
        completed: bool,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            conversation_id,
            title,
            completed,
            priority,
            due_date,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Todo {
        Todo::new(Uuid::new_v4(), None, "Write report", Priority::default(), None)
            .unwrap()
            .0
    }

    #[test]
    fn new_todo_starts_incomplete() {
        let user_id = Uuid::new_v4();
        let conversation_id = Some(Uuid::new_v4());
        let (todo, events) = Todo::new(
            user_id,
            conversation_id,
            "Write report",
            Priority::new(2).unwrap(),
            None,
        )
        .unwrap();

        assert!(!todo.completed());
        assert_eq!(todo.user_id(), user_id);
        assert_eq!(todo.conversation_id(), conversation_id);
        assert_eq!(todo.priority().value(), 2);
        assert_eq!(
            events,
            vec![TodoEvent::Created {
                todo_id: todo.id(),
                user_id,
                conversation_id,
                title: "Write report".into(),
            }]
        );
    }

    #[test]
    fn blank_title_rejected() {
        let result = Todo::new(Uuid::new_v4(), None, "   ", Priority::default(), None);
        assert_eq!(result.unwrap_err(), "Title cannot be empty");
    }

    #[test]
    fn apply_updates_only_given_fields() {
        let mut todo = sample();
        let due = Utc::now() + Duration::days(1);

        let event = todo
            .apply(TodoChanges {
                priority: Some(Priority::new(5).unwrap()),
                due_date: Some(due),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(todo.title(), "Write report");
        assert_eq!(todo.priority().value(), 5);
        assert_eq!(todo.due_date(), Some(due));
        match event {
            TodoEvent::Updated { changed, .. } => assert_eq!(changed, vec!["priority", "dueDate"]),
            other => panic!("Expected Updated event, got {:?}", other),
        }
    }

    #[test]
    fn rejected_update_leaves_todo_untouched() {
        let mut todo = sample();
        let before = todo.clone();

        let result = todo.apply(TodoChanges {
            title: Some("  ".into()),
            completed: Some(true),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(todo, before);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut todo = sample();

        assert_eq!(
            todo.toggle(),
            TodoEvent::Toggled {
                todo_id: todo.id(),
                user_id: todo.user_id(),
                completed: true
            }
        );
        todo.toggle();

        assert!(!todo.completed());
    }

    #[test]
    fn updates_never_move_timestamp_backwards() {
        let mut todo = sample();
        let created = todo.updated_at();
        todo.toggle();
        assert!(todo.updated_at() >= created);
    }

    #[test]
    fn ownership_check() {
        let todo = sample();
        assert!(todo.is_owned_by(todo.user_id()));
        assert!(!todo.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn serializes_camel_case() {
        let todo = sample();
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["title"], "Write report");
        assert_eq!(json["priority"], 0);
        assert!(json["userId"].is_string());
        assert!(json["dueDate"].is_null());
        assert!(json.get("user_id").is_none());
    }
}
