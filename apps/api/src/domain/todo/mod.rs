// Todo domain module
// Contains the todo aggregate, its value objects and domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod todo;
pub mod value_objects;

pub use events::TodoEvent;
pub use todo::{Todo, TodoChanges};
pub use value_objects::{parse_due_date, Priority};
