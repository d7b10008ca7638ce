use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::Email;

/// A registered account
///
/// The password hash never leaves the server; response types in the API
/// layer copy the public fields only.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user, defaulting the display name to the email's local part
    /// when `name` is missing or blank.
    pub fn new(email: Email, name: Option<String>, password_hash: String) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.local_part().to_string());
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_to_local_part() {
        let user = User::new(Email::new("sam@example.com").unwrap(), None, "hash".into());
        assert_eq!(user.name, "sam");
    }

    #[test]
    fn blank_name_defaults_to_local_part() {
        let user = User::new(
            Email::new("sam@example.com").unwrap(),
            Some("   ".into()),
            "hash".into(),
        );
        assert_eq!(user.name, "sam");
    }

    #[test]
    fn explicit_name_is_trimmed() {
        let user = User::new(
            Email::new("sam@example.com").unwrap(),
            Some("  Sam Doe ".into()),
            "hash".into(),
        );
        assert_eq!(user.name, "Sam Doe");
        assert_eq!(user.created_at, user.updated_at);
    }
}
