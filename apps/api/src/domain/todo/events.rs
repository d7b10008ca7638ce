use serde::Serialize;
use uuid::Uuid;

/// Domain events raised by the Todo aggregate
///
/// The service layer writes each event to the log after the change has been
/// persisted.
///
/// # Example
/// ```
/// use todo_assistant_api::domain::todo::TodoEvent;
/// use uuid::Uuid;
///
/// let todo_id = Uuid::new_v4();
/// let event = TodoEvent::Toggled { todo_id, user_id: Uuid::new_v4(), completed: true };
/// assert_eq!(event.todo_id(), todo_id);
/// assert_eq!(event.name(), "todo_toggled");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TodoEvent {
    /// A todo was created
    Created {
        todo_id: Uuid,
        user_id: Uuid,
        /// Set when the todo was created by the chat assistant
        conversation_id: Option<Uuid>,
        title: String,
    },
    /// One or more fields changed
    Updated {
        todo_id: Uuid,
        user_id: Uuid,
        changed: Vec<&'static str>,
    },
    /// Completion flag flipped
    Toggled {
        todo_id: Uuid,
        user_id: Uuid,
        completed: bool,
    },
    Deleted { todo_id: Uuid, user_id: Uuid },
}

impl TodoEvent {
    pub fn todo_id(&self) -> Uuid {
        match self {
            TodoEvent::Created { todo_id, .. }
            | TodoEvent::Updated { todo_id, .. }
            | TodoEvent::Toggled { todo_id, .. }
            | TodoEvent::Deleted { todo_id, .. } => *todo_id,
        }
    }

    pub fn user_id(&self) -> Uuid {
        match self {
            TodoEvent::Created { user_id, .. }
            | TodoEvent::Updated { user_id, .. }
            | TodoEvent::Toggled { user_id, .. }
            | TodoEvent::Deleted { user_id, .. } => *user_id,
        }
    }

    /// Stable event name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            TodoEvent::Created { .. } => "todo_created",
            TodoEvent::Updated { .. } => "todo_updated",
            TodoEvent::Toggled { .. } => "todo_toggled",
            TodoEvent::Deleted { .. } => "todo_deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_every_variant() {
        let todo_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let events = [
            TodoEvent::Created {
                todo_id,
                user_id,
                conversation_id: None,
                title: "Buy milk".into(),
            },
            TodoEvent::Updated {
                todo_id,
                user_id,
                changed: vec!["title"],
            },
            TodoEvent::Toggled {
                todo_id,
                user_id,
                completed: false,
            },
            TodoEvent::Deleted { todo_id, user_id },
        ];

        for event in &events {
            assert_eq!(event.todo_id(), todo_id);
            assert_eq!(event.user_id(), user_id);
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = TodoEvent::Deleted {
            todo_id: Uuid::nil(),
            user_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "deleted");
    }
}
