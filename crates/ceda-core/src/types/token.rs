use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Body returned by the token endpoint and stored in the token cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,

    /// Expiry timestamp, ISO-8601 with offset
    pub expires: DateTime<FixedOffset>,

    /// Any other fields the endpoint returns
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenResponse {
    /// Parse a token endpoint body.
    ///
    /// Rejects bodies with an empty `access_token`.
    pub fn parse(body: &str) -> Result<Self, String> {
        let response: Self = serde_json::from_str(body).map_err(|e| e.to_string())?;
        if response.access_token.is_empty() {
            return Err("empty access_token".to_string());
        }
        Ok(response)
    }
}

/// A freshly issued token together with the exact body the endpoint returned
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Response body, byte for byte
    pub raw_body: String,
    /// Parsed body
    pub response: TokenResponse,
}

/// An active download token
#[derive(Clone, PartialEq, Eq)]
pub struct DownloadToken {
    /// Bearer token
    pub access_token: String,
    /// Expiry timestamp
    pub expires: DateTime<FixedOffset>,
}

impl DownloadToken {
    /// Create a new token
    pub fn new(access_token: impl Into<String>, expires: DateTime<FixedOffset>) -> Self {
        Self {
            access_token: access_token.into(),
            expires,
        }
    }

    /// Returns true if the token expires strictly after `now + margin`.
    /// A margin reaching past the representable range is never satisfied.
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now.checked_add_signed(margin)
            .is_some_and(|limit| self.expires > limit)
    }

    /// Token shortened to its first and last five characters
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.access_token.chars().collect();
        if chars.len() <= 10 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{head}...{tail}")
    }

    /// Value for the `Authorization` header
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl From<TokenResponse> for DownloadToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            expires: response.expires,
        }
    }
}

impl std::fmt::Debug for DownloadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadToken")
            .field("access_token", &self.masked())
            .field("expires", &self.expires)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"access_token":"abc123def456ghi789","expires":"2099-01-01T00:00:00.000000+00:00","token_type":"Bearer"}"#;

    #[test]
    fn test_parse_response() {
        let response = TokenResponse::parse(BODY).unwrap();
        assert_eq!(response.access_token, "abc123def456ghi789");
        assert_eq!(
            response.expires,
            DateTime::parse_from_rfc3339("2099-01-01T00:00:00+00:00").unwrap()
        );
        assert_eq!(response.extra["token_type"], "Bearer");
    }

    #[test]
    fn test_parse_keeps_offset() {
        let body = r#"{"access_token":"t","expires":"2030-06-01T12:00:00.500000+02:00"}"#;
        let response = TokenResponse::parse(body).unwrap();
        assert_eq!(response.expires.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(TokenResponse::parse(r#"{"access_token":"abc"}"#).is_err());
        assert!(TokenResponse::parse(r#"{"expires":"2099-01-01T00:00:00+00:00"}"#).is_err());
        assert!(TokenResponse::parse(r#"{"access_token":"","expires":"2099-01-01T00:00:00+00:00"}"#).is_err());
        assert!(TokenResponse::parse("not json").is_err());
    }

    #[test]
    fn test_usable_is_strict() {
        let expires = DateTime::parse_from_rfc3339("2030-01-01T00:00:00+00:00").unwrap();
        let token = DownloadToken::new("t", expires);
        let at_expiry = expires.with_timezone(&Utc);

        assert!(!token.is_usable_at(at_expiry, Duration::zero()));
        assert!(token.is_usable_at(at_expiry - Duration::seconds(1), Duration::zero()));
        assert!(!token.is_usable_at(at_expiry - Duration::seconds(1), Duration::seconds(1)));
    }

    #[test]
    fn test_huge_margin_is_not_usable() {
        let expires = DateTime::parse_from_rfc3339("2099-01-01T00:00:00+00:00").unwrap();
        let token = DownloadToken::new("t", expires);

        assert!(!token.is_usable_at(Utc::now(), Duration::seconds(10_000_000_000_000)));
        assert!(!token.is_usable_at(Utc::now(), Duration::MAX));
    }

    #[test]
    fn test_masked() {
        let token = DownloadToken::from(TokenResponse::parse(BODY).unwrap());
        assert_eq!(token.masked(), "abc12...hi789");
        assert!(!format!("{token:?}").contains("abc123def456ghi789"));
        assert_eq!(DownloadToken::new("short", token.expires).masked(), "*****");
        assert_eq!(token.bearer_header(), "Bearer abc123def456ghi789");
    }
}
