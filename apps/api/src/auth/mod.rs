// Credential handling: session tokens and password hashes

pub mod jwt;
pub mod password;
