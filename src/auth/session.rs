//! Server-side sessions and the per-strategy validation state machine

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Discriminator recording which login flow created a session.
///
/// A strategy only ever accepts sessions carrying its own discriminator; any
/// other value is treated as "no match for this strategy", never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    /// Password login against the built-in admin token
    SessionPassword,
    /// Federated login through the OpenID Connect provider
    SessionOpenidConnect,
    /// Federated login through the SAML provider
    SessionSaml,
}

/// Payload attached to sessions created by a federated login flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FederatedSessionData {
    /// Username asserted by the identity provider
    pub username: Option<String>,
    /// Group claims asserted by the identity provider
    pub groups: Vec<String>,
    /// Expiry instant claimed by the identity provider
    pub session_expiry: Option<DateTime<Utc>>,
    /// ID token to re-validate against the provider (OpenID Connect only)
    pub id_token: Option<String>,
}

/// Server-side session record.
///
/// Created by login flows and read-only to the resolution engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier, stored in the session cookie
    pub id: String,
    /// Which login flow created this session
    pub authentication_type: AuthenticationType,
    /// Marker set by every login flow once the caller is authenticated
    pub is_admin_authenticated: bool,
    /// Server-side expiry of the session record
    pub expiry: DateTime<Utc>,
    /// Federated payload, present for SSO sessions
    pub provider: Option<FederatedSessionData>,
}

impl Session {
    /// Create a session expiring after the given number of minutes
    pub fn new(authentication_type: AuthenticationType, expiry_mins: i64) -> Self {
        Self {
            id: generate_session_id(),
            authentication_type,
            is_admin_authenticated: true,
            expiry: Utc::now() + Duration::minutes(expiry_mins),
            provider: None,
        }
    }

    /// Attach a federated payload to the session
    pub fn with_provider_data(mut self, data: FederatedSessionData) -> Self {
        self.provider = Some(data);
        self
    }

    /// Whether the server-side record has expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// Generate an opaque session identifier
fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| format!("{:02x}", rng.r#gen::<u8>()))
        .collect()
}

/// Outcome of checking a session against one strategy's expectations.
///
/// `NoSession` and `WrongType` both mean "try the next strategy"; only
/// `Valid` yields a match. An `Invalid` session also falls through, but the
/// reason is logged at the call site for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session accompanied the request
    NoSession,
    /// A session exists but was created by a different login flow
    WrongType,
    /// The session matches this strategy but fails validation
    Invalid,
    /// The session matches this strategy and is valid
    Valid,
}

impl SessionState {
    /// Whether this state lets the strategy match the request
    pub fn is_valid(self) -> bool {
        self == SessionState::Valid
    }
}

/// Evaluate a session against one strategy's expected discriminator.
///
/// The discriminator is compared before any validity check so that a session
/// of the wrong type short-circuits to `WrongType` and the chain moves on.
/// Validity then requires the server-side secret to be configured, an
/// unexpired record, and the authenticated marker set by the login flow.
pub fn check_session(
    secret_configured: bool,
    session: Option<&Session>,
    expected: AuthenticationType,
) -> SessionState {
    let Some(session) = session else {
        return SessionState::NoSession;
    };

    if session.authentication_type != expected {
        return SessionState::WrongType;
    }

    if !secret_configured {
        return SessionState::Invalid;
    }

    if session.is_expired(Utc::now()) {
        return SessionState::Invalid;
    }

    if !session.is_admin_authenticated {
        return SessionState::Invalid;
    }

    SessionState::Valid
}
