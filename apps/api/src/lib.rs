//! Todo Assistant API Library
//!
//! This library provides the core functionality for the Todo Assistant API,
//! including the todo and conversation domains, repositories, the chat
//! assistant and the HTTP layer.

pub mod api;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;
