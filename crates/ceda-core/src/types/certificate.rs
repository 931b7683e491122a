use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Validity window of an X.509 certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateValidity {
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
}

impl CertificateValidity {
    /// Check the window at `now`, requiring at least `min_lifetime` to remain.
    ///
    /// Usable iff `not_before <= now` and `now + min_lifetime < not_after`.
    pub fn check_at(
        &self,
        now: DateTime<Utc>,
        min_lifetime: Duration,
    ) -> Result<(), InvalidReason> {
        if now < self.not_before {
            return Err(InvalidReason::NotYetValid {
                not_before: self.not_before,
            });
        }
        match now.checked_add_signed(min_lifetime) {
            Some(limit) if limit < self.not_after => Ok(()),
            _ => Err(InvalidReason::Expiring {
                not_after: self.not_after,
            }),
        }
    }

    /// Time left before `not_after`, negative once expired
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        self.not_after - now
    }
}

/// Why a certificate file cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidReason {
    /// No file at the credential path
    Missing,
    /// File exists but holds no parsable certificate
    Unparsable {
        /// Parser message
        detail: String,
    },
    /// Current time is before the start of the window
    NotYetValid {
        /// Start of the window
        not_before: DateTime<Utc>,
    },
    /// Expired, or expires within the required minimum lifetime
    Expiring {
        /// End of the window
        not_after: DateTime<Utc>,
    },
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "certificate file not found"),
            Self::Unparsable { detail } => write!(f, "certificate could not be parsed: {detail}"),
            Self::NotYetValid { not_before } => write!(f, "certificate not valid before {not_before}"),
            Self::Expiring { not_after } => write!(f, "certificate expired or expires too soon ({not_after})"),
        }
    }
}

/// One CA certificate file distributed by the trust-root service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustRoot {
    /// File name inside the trust-roots directory
    pub file_name: String,
    /// Raw file content (normally PEM)
    pub content: Vec<u8>,
}

/// Result of inspecting a certificate file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CertificateStatus {
    /// Certificate is in date for the requested margin
    Valid {
        /// Parsed validity window
        validity: CertificateValidity,
    },
    /// Certificate cannot be used
    Invalid {
        /// Why it was rejected
        reason: InvalidReason,
        /// Parsed window, when the file could be parsed
        validity: Option<CertificateValidity>,
    },
}

impl CertificateStatus {
    /// Returns true for [`CertificateStatus::Valid`]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Parsed validity window, if any
    #[must_use]
    pub const fn validity(&self) -> Option<&CertificateValidity> {
        match self {
            Self::Valid { validity } => Some(validity),
            Self::Invalid { validity, .. } => validity.as_ref(),
        }
    }
}
