use serde::{Deserialize, Serialize};
use std::fmt;

/// Email address of a registered user
///
/// Addresses are trimmed and lowercased on construction so that lookups by
/// email are case-insensitive.
///
/// # Invariants
/// - Contains exactly one '@'
/// - Has a non-empty local part
/// - Is at least 3 characters long
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address
    ///
    /// # Example
    /// ```
    /// use todo_assistant_api::domain::user::Email;
    ///
    /// let email = Email::new("  Ada@Example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "ada@example.com");
    /// assert_eq!(email.local_part(), "ada");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, String> {
        let normalized = email.as_ref().trim().to_lowercase();
        if Self::is_valid(&normalized) {
            Ok(Email(normalized))
        } else {
            Err(format!("Invalid email: {}", email.as_ref()))
        }
    }

    fn is_valid(email: &str) -> bool {
        if email.len() < 3 || email.matches('@').count() != 1 {
            return false;
        }
        !email.starts_with('@')
    }

    /// The part before the '@', used as the default display name
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
