use serde::{Deserialize, Serialize};

/// Whether a credential check kept the existing credential or fetched a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Existing credential was still usable; no network activity
    Reused,
    /// A new credential was obtained and persisted
    Refreshed,
}

impl Outcome {
    /// Returns true if new credentials were written
    #[must_use]
    pub const fn is_refreshed(self) -> bool {
        matches!(self, Self::Refreshed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reused => write!(f, "reused"),
            Self::Refreshed => write!(f, "refreshed"),
        }
    }
}

/// Archive account login
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create a new username/password pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if either half is empty
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

// Never print the password.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("jdoe", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("jdoe"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_incomplete_credentials() {
        assert!(Credentials::new("", "pw").is_incomplete());
        assert!(Credentials::new("user", "").is_incomplete());
        assert!(!Credentials::new("user", "pw").is_incomplete());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Reused.to_string(), "reused");
        assert!(Outcome::Refreshed.is_refreshed());
        assert_eq!(
            serde_json::to_string(&Outcome::Refreshed).unwrap(),
            "\"refreshed\""
        );
    }
}
