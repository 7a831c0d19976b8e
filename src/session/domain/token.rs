//! Opaque bearer tokens with best-effort JWT expiry inspection.
//!
//! The client never verifies signatures; it only reads the `exp` claim so
//! that stale tokens are discarded without a server round trip.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SessionDomainError;

/// Bearer token issued by the API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BearerToken(String);

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

impl BearerToken {
    /// Wraps a token string.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::BlankToken`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionDomainError> {
        let raw: String = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionDomainError::BlankToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Reads the `exp` claim from the JWT payload.
    ///
    /// Returns `Ok(None)` when the payload carries no `exp` claim.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::MalformedToken`] when the token is not
    /// three dot-separated segments or its payload is not base64url JSON.
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, SessionDomainError> {
        let mut segments = self.0.split('.');
        let (Some(_), Some(payload), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(SessionDomainError::MalformedToken(
                "expected three segments".to_owned(),
            ));
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| SessionDomainError::MalformedToken(err.to_string()))?;
        let claim: ExpiryClaim = serde_json::from_slice(&bytes)
            .map_err(|err| SessionDomainError::MalformedToken(err.to_string()))?;
        claim
            .exp
            .map(|exp| {
                DateTime::from_timestamp(exp, 0).ok_or_else(|| {
                    SessionDomainError::MalformedToken(format!("exp {exp} is out of range"))
                })
            })
            .transpose()
    }

    /// Returns `true` when the token's `exp` claim is before `now`.
    ///
    /// # Errors
    ///
    /// Propagates [`BearerToken::expires_at`] failures.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> Result<bool, SessionDomainError> {
        Ok(self.expires_at()?.is_some_and(|expiry| expiry < now))
    }
}

impl TryFrom<String> for BearerToken {
    type Error = SessionDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BearerToken> for String {
    fn from(value: BearerToken) -> Self {
        value.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}
