// Chat assistant
// Prompt assembly, the completion client and todo tool dispatch

pub mod chat;
pub mod client;
pub mod errors;
pub mod prompts;
pub mod tools;
pub mod types;

pub use chat::{compose_reply, ChatAssistant, ChatOutcome};
pub use client::{CompletionClient, OpenAiClient};
pub use errors::{AssistantError, AssistantResult};
pub use tools::{TodoTools, ToolOutcome, ToolResult};
