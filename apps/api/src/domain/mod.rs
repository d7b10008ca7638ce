// Domain layer module exports
// Domain is independent of infrastructure concerns

pub mod conversation;
pub mod repositories;
pub mod todo;
pub mod user;
