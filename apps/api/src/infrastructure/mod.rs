// Infrastructure layer module
// Database adapters and the migration runner

pub mod database;
pub mod repositories;
