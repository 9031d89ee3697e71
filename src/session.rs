//! Session status and the navigation affordances derived from it.
//!
//! Authentication itself lives elsewhere; the engine only asks which
//! status applies. Session status never feeds into query derivation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_ENV_VAR: &str = "STOREFRONT_SESSION";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Authenticated,
    #[default]
    Unauthenticated,
    Loading,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Authenticated => "authenticated",
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Loading => "loading",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown session status '{0}'")]
pub struct ParseSessionStatusError(pub String);

impl FromStr for SessionStatus {
    type Err = ParseSessionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authenticated" => Ok(SessionStatus::Authenticated),
            "unauthenticated" => Ok(SessionStatus::Unauthenticated),
            "loading" => Ok(SessionStatus::Loading),
            _ => Err(ParseSessionStatusError(s.to_string())),
        }
    }
}

/// What the navigation bar offers for a given session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAffordance {
    /// Cart plus the account dropdown.
    AccountMenu,
    LogIn,
}

impl NavAffordance {
    /// A session still resolving is treated as signed out.
    pub fn for_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Authenticated => NavAffordance::AccountMenu,
            SessionStatus::Unauthenticated | SessionStatus::Loading => NavAffordance::LogIn,
        }
    }

    pub fn items(self) -> &'static [&'static str] {
        match self {
            NavAffordance::AccountMenu => &["Cart", "Profile", "Orders", "Sign out"],
            NavAffordance::LogIn => &["Log in"],
        }
    }
}

pub trait SessionProvider: Send + Sync {
    fn status(&self) -> SessionStatus;
}

/// Provider whose status can be changed at runtime, e.g. after sign-out.
#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<SessionStatus>>,
}

impl SharedSession {
    pub fn new(status: SessionStatus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(status)),
        }
    }

    pub fn set(&self, status: SessionStatus) {
        let mut guard = self.inner.write();
        if *guard != status {
            tracing::info!(old = %*guard, new = %status, "session status changed");
            *guard = status;
        }
    }
}

impl SessionProvider for SharedSession {
    fn status(&self) -> SessionStatus {
        *self.inner.read()
    }
}

/// Reads `STOREFRONT_SESSION` on every call; unset or invalid means
/// unauthenticated.
pub struct EnvSession;

impl SessionProvider for EnvSession {
    fn status(&self) -> SessionStatus {
        std::env::var(SESSION_ENV_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}
