//! Who is playing.
//!
//! The user context is a plain value handed to whatever needs it. Logging
//! in or out produces a new context rather than mutating shared state.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Identity carried in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct UserClaims {
    /// Backend user id.
    #[serde(rename = "userID")]
    user_id: String,
    /// Display name.
    username: String,
    /// Whether the user may administer puzzles and users.
    #[serde(rename = "isAdmin", default)]
    is_admin: bool,
}

impl UserClaims {
    /// Creates a set of claims.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            is_admin,
        }
    }
}

/// Turns an access token into the identity it carries.
pub trait Authenticator: Send + Sync {
    /// Returns the token's claims, or `None` if it cannot be read.
    fn decode(&self, token: &str) -> Option<UserClaims>;
}

/// Reads the claims out of a JWT payload.
///
/// The signature is not checked; the backend verifies it on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtClaimsDecoder;

impl Authenticator for JwtClaimsDecoder {
    #[instrument(skip_all)]
    fn decode(&self, token: &str) -> Option<UserClaims> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            debug!("Token is not a three-part JWT");
            return None;
        };

        let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "Token payload is not base64url");
                return None;
            }
        };

        match serde_json::from_slice::<UserClaims>(&bytes) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Token payload has no user claims");
                None
            }
        }
    }
}

/// The current user, or nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    token: Option<String>,
    claims: Option<UserClaims>,
}

impl UserContext {
    /// A context with no logged-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds the context for `token`, or `None` if it cannot be decoded.
    #[instrument(skip_all)]
    pub fn login(token: impl Into<String>, authenticator: &dyn Authenticator) -> Option<Self> {
        let token = token.into();
        let Some(claims) = authenticator.decode(&token) else {
            warn!("Rejecting unreadable access token");
            return None;
        };
        info!(username = %claims.username, is_admin = claims.is_admin, "User logged in");
        Some(Self {
            token: Some(token),
            claims: Some(claims),
        })
    }

    /// Ends the session, returning the anonymous context.
    pub fn logout(self) -> Self {
        if let Some(claims) = &self.claims {
            info!(username = %claims.username, "User logged out");
        }
        Self::anonymous()
    }

    /// Raw token to send to the backend.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Claims of the logged-in user.
    pub fn claims(&self) -> Option<&UserClaims> {
        self.claims.as_ref()
    }

    /// Whether someone is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    /// Whether the logged-in user is an admin.
    pub fn is_admin(&self) -> bool {
        self.claims.as_ref().is_some_and(|c| c.is_admin)
    }

    /// Name to greet the player with.
    pub fn display_name(&self) -> &str {
        self.claims
            .as_ref()
            .map_or("guest", |c| c.username.as_str())
    }
}
