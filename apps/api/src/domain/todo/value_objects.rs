use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a todo on a 0-5 scale
///
/// `0` means no particular priority and is the default.
///
/// # Example
/// ```
/// use todo_assistant_api::domain::todo::Priority;
///
/// assert_eq!(Priority::new(3).unwrap().value(), 3);
/// assert!(Priority::new(6).is_err());
/// assert_eq!(Priority::default().value(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, String> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Priority(value as u8))
        } else {
            Err(format!(
                "Priority must be between 0 and {}, got {}",
                Self::MAX,
                value
            ))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        i64::from(priority.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a due date given either as RFC 3339 or as a plain `YYYY-MM-DD`
/// date (taken as midnight UTC)
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid due date: {}", raw))
}
