use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Who performed it.
    pub user: String,
    /// What happened.
    pub message: String,
}

impl LogEntry {
    /// A log entry stamped with the current time.
    #[must_use]
    pub fn now(user: String, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            user,
            message,
        }
    }

    /// Case-insensitive substring match against user and message.
    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let search = search.to_lowercase();
        self.user.to_lowercase().contains(&search) || self.message.to_lowercase().contains(&search)
    }
}
