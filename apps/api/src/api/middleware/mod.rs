// Request extractors and layers shared by the handlers

pub mod auth;

pub use auth::JwtAuth;
