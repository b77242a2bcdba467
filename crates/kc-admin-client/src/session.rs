//! Admin session credentials.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

/// Tokens are renewed this long before they expire.
pub const EXPIRY_SKEW: Duration = Duration::from_secs(10);

/// Stands in for "never" when a deadline does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 86_400);

/// `start + duration`, saturating at a far-future instant instead of
/// overflowing.
pub(crate) fn deadline_after(start: Instant, duration: Duration) -> Instant {
    start
        .checked_add(duration)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,

    /// Access token lifetime in seconds.
    pub expires_in: u64,

    /// Refresh token (if issued).
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_expires_in: Option<u64>,

    /// Token type (always "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Short-lived credential for admin calls.
///
/// Only [`AdminClient`](crate::AdminClient) creates or renews sessions.
#[derive(Clone)]
pub struct AdminSession {
    access_token: String,
    expires_at: Instant,
    refresh_token: Option<String>,
    /// `None` when the server did not bound the refresh token.
    refresh_expires_at: Option<Instant>,
}

impl AdminSession {
    /// Builds a session from a token response received at `issued_at`.
    #[must_use]
    pub fn from_token_response(response: TokenResponse, issued_at: Instant) -> Self {
        // Keycloak reports 0 for refresh tokens without an expiry.
        let refresh_expires_at = response
            .refresh_expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| deadline_after(issued_at, Duration::from_secs(secs)));

        Self {
            access_token: response.access_token,
            expires_at: deadline_after(issued_at, Duration::from_secs(response.expires_in)),
            refresh_token: response.refresh_token,
            refresh_expires_at,
        }
    }

    /// The bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// When the access token expires.
    #[must_use]
    pub const fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Whether the access token must be renewed before use at `now`.
    #[must_use]
    pub fn needs_renewal(&self, now: Instant) -> bool {
        now + EXPIRY_SKEW >= self.expires_at
    }

    /// Returns the refresh token if it is still usable at `now`.
    #[must_use]
    pub fn usable_refresh_token(&self, now: Instant) -> Option<&str> {
        let token = self.refresh_token.as_deref()?;
        match self.refresh_expires_at {
            Some(expires_at) if now + EXPIRY_SKEW >= expires_at => None,
            _ => Some(token),
        }
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}
