use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::domain::repositories::{RepositoryError, TodoRepository};
use crate::domain::todo::{Priority, Todo, TodoChanges, TodoEvent};

/// Todo operations scoped to the requesting user
///
/// A todo owned by another user is reported exactly like a missing one, so
/// callers cannot probe for ids they do not own.
#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }

    pub async fn list(&self, user_id: Uuid, completed: Option<bool>) -> ServiceResult<Vec<Todo>> {
        Ok(self.todos.find_by_user(user_id, completed).await?)
    }

    pub async fn list_for_conversation(&self, conversation_id: Uuid) -> ServiceResult<Vec<Todo>> {
        Ok(self.todos.find_by_conversation(conversation_id).await?)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        title: &str,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> ServiceResult<Todo> {
        let (todo, events) = Todo::new(user_id, conversation_id, title, priority, due_date)
            .map_err(ServiceError::Validation)?;

        self.todos.create(&todo).await?;
        events.iter().for_each(record);

        Ok(todo)
    }

    pub async fn find_owned(&self, user_id: Uuid, todo_id: Uuid) -> ServiceResult<Todo> {
        self.todos
            .find_by_id(todo_id)
            .await?
            .filter(|todo| todo.is_owned_by(user_id))
            .ok_or(ServiceError::NotFound("Todo"))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        changes: TodoChanges,
    ) -> ServiceResult<Todo> {
        let mut todo = self.find_owned(user_id, todo_id).await?;
        let event = todo.apply(changes).map_err(ServiceError::Validation)?;

        self.todos.update(&todo).await.map_err(not_found_as_todo)?;
        record(&event);

        Ok(todo)
    }

    pub async fn toggle(&self, user_id: Uuid, todo_id: Uuid) -> ServiceResult<Todo> {
        let mut todo = self.find_owned(user_id, todo_id).await?;
        let event = todo.toggle();

        self.todos.update(&todo).await.map_err(not_found_as_todo)?;
        record(&event);

        Ok(todo)
    }

    pub async fn delete(&self, user_id: Uuid, todo_id: Uuid) -> ServiceResult<()> {
        let todo = self.find_owned(user_id, todo_id).await?;

        self.todos.delete(todo.id()).await.map_err(not_found_as_todo)?;
        record(&todo.delete());

        Ok(())
    }
}

// The row can vanish between the ownership check and the write
fn not_found_as_todo(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound("Todo"),
        other => ServiceError::Repository(other),
    }
}

fn record(event: &TodoEvent) {
    tracing::info!(
        event = event.name(),
        todo_id = %event.todo_id(),
        user_id = %event.user_id(),
        "Todo changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryTodoRepository;

    fn service() -> TodoService {
        TodoService::new(Arc::new(InMemoryTodoRepository::new()))
    }

    async fn seeded(service: &TodoService, user_id: Uuid, title: &str) -> Todo {
        service
            .create(user_id, None, title, Priority::default(), None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_and_list() {
        let service = service();
        let user_id = Uuid::new_v4();

        seeded(&service, user_id, "Buy milk").await;

        let todos = service.list(user_id, None).await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title(), "Buy milk");
    }

    #[tokio::test]
    async fn blank_title_is_validation_error() {
        let result = service()
            .create(Uuid::new_v4(), None, " ", Priority::default(), None)
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn other_users_todo_looks_missing() {
        let service = service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let todo = seeded(&service, owner, "Private").await;

        let find = service.find_owned(intruder, todo.id()).await;
        let toggle = service.toggle(intruder, todo.id()).await;
        let delete = service.delete(intruder, todo.id()).await;

        assert!(matches!(find, Err(ServiceError::NotFound("Todo"))));
        assert!(matches!(toggle, Err(ServiceError::NotFound("Todo"))));
        assert!(matches!(delete, Err(ServiceError::NotFound("Todo"))));

        let untouched = service.find_owned(owner, todo.id()).await.unwrap();
        assert!(!untouched.completed());
    }

    #[tokio::test]
    async fn update_persists_changes() {
        let service = service();
        let user_id = Uuid::new_v4();
        let todo = seeded(&service, user_id, "Draft").await;

        service
            .update(
                user_id,
                todo.id(),
                TodoChanges {
                    title: Some("Final".into()),
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = service.find_owned(user_id, todo.id()).await.unwrap();
        assert_eq!(stored.title(), "Final");
        assert!(stored.completed());
    }

    #[tokio::test]
    async fn toggle_twice_is_identity() {
        let service = service();
        let user_id = Uuid::new_v4();
        let todo = seeded(&service, user_id, "Flip").await;

        assert!(service.toggle(user_id, todo.id()).await.unwrap().completed());
        assert!(!service.toggle(user_id, todo.id()).await.unwrap().completed());
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let service = service();
        let user_id = Uuid::new_v4();
        let todo = seeded(&service, user_id, "Gone").await;

        assert!(service.delete(user_id, todo.id()).await.is_ok());
        assert!(matches!(
            service.delete(user_id, todo.id()).await,
            Err(ServiceError::NotFound("Todo"))
        ));
    }

    #[tokio::test]
    async fn conversation_todos_are_scoped() {
        let service = service();
        let user_id = Uuid::new_v4();
        let conversation_id = Uuid::new_v4();

        service
            .create(user_id, Some(conversation_id), "From chat", Priority::default(), None)
            .await
            .unwrap();
        seeded(&service, user_id, "From REST").await;

        let linked = service.list_for_conversation(conversation_id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].title(), "From chat");
    }
}
