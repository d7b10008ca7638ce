// Prompt templates and prompt assembly for the chat assistant

use std::collections::HashMap;

use chrono::Utc;

use super::types::ChatMessage;
use crate::domain::conversation::Message;
use crate::domain::todo::Todo;

/// A versioned system prompt with `{{name}}` placeholders
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: &'static str,
    pub template: &'static str,
}

impl PromptTemplate {
    /// Substitutes every `{{key}}` present in `variables`
    ///
    /// Placeholders without a value are left as-is.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    /// use todo_assistant_api::assistant::prompts::PromptTemplate;
    ///
    /// let template = PromptTemplate { name: "t", version: "1", template: "Hi {{who}}, {{missing}}" };
    /// let vars = HashMap::from([("who", "Ana".to_string())]);
    /// assert_eq!(template.render(&vars), "Hi Ana, {{missing}}");
    /// ```
    pub fn render(&self, variables: &HashMap<&str, String>) -> String {
        variables
            .iter()
            .fold(self.template.to_string(), |text, (key, value)| {
                text.replace(&format!("{{{{{}}}}}", key), value)
            })
    }
}

pub mod library {
    use super::PromptTemplate;

    pub fn todo_assistant() -> PromptTemplate {
        PromptTemplate {
            name: "todo_assistant",
            version: "1.1.0",
            template: "You are a friendly assistant that manages the user's todo list. \
                       Today is {{today}}.\n\
                       Use the provided tools for every change or lookup: todo_create, \
                       todo_update, todo_list and todo_delete. Never claim to have changed \
                       a todo without calling a tool. Refer to todos by the id shown in the \
                       current todo list. Priorities run from 0 (none) to 5 (urgent) and due \
                       dates use ISO 8601. If a request is ambiguous, ask a short clarifying \
                       question. Keep replies brief.",
        }
    }
}

/// Renders the user's todos as a numbered list for the model
///
/// Returns `None` when there is nothing to list.
pub fn todo_context(todos: &[Todo]) -> Option<String> {
    if todos.is_empty() {
        return None;
    }

    let mut context = String::from("Current todos:\n");
    for (index, todo) in todos.iter().enumerate() {
        let mark = if todo.completed() { 'x' } else { 'o' };
        context.push_str(&format!(
            "{}. [{}] {} (id: {}, priority: {}",
            index + 1,
            mark,
            todo.title(),
            todo.id(),
            todo.priority()
        ));
        if let Some(due) = todo.due_date() {
            context.push_str(&format!(", due: {}", due.format("%Y-%m-%d")));
        }
        context.push_str(")\n");
    }
    Some(context)
}

/// Builds the full `messages` array for one completion call
///
/// Order: system prompt, todo list (if any), prior messages, new message.
pub fn build_messages(history: &[Message], todos: &[Todo], user_message: &str) -> Vec<ChatMessage> {
    let variables = HashMap::from([("today", Utc::now().format("%Y-%m-%d").to_string())]);

    let mut messages = vec![ChatMessage::system(library::todo_assistant().render(&variables))];

    if let Some(context) = todo_context(todos) {
        messages.push(ChatMessage::system(context));
    }

    messages.extend(
        history
            .iter()
            .map(|m| ChatMessage::new(m.role.as_str(), m.content.clone())),
    );
    messages.push(ChatMessage::user(user_message));

    messages
}
