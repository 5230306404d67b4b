//! Core types for the SUSE Manager API.
//!
//! Credentials, the session cookie, system identities and the request
//! payloads callers build themselves (new users, cleanup policy).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the cookie SUSE Manager uses to carry the API session.
pub const SESSION_COOKIE: &str = "pxt-session-cookie";

/// Login credentials for the API.
///
/// Supplied per call and never stored by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name.
    pub login: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Value of the session cookie returned by a login.
///
/// An empty cookie means the server accepted the login request but did not
/// hand out a session; callers should treat it as unauthenticated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionCookie(String);

impl SessionCookie {
    /// Wrap a cookie value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw cookie value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the login yielded no session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Cookie` request header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.0)
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "SessionCookie(<none>)")
        } else {
            write!(f, "SessionCookie(<redacted>)")
        }
    }
}

/// Numeric identifier of a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub u64);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One system matching a hostname lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMatch {
    /// System identifier.
    pub id: SystemId,
    /// Profile name of the system.
    pub name: String,
}

/// Network details of a system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemNetwork {
    /// Primary IP address literal.
    pub ip: String,
    /// Hostname reported by the system.
    pub hostname: String,
}

/// What the server should do with a system's local state when it is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleanupType {
    /// Run cleanup and abort the deletion if it fails.
    #[default]
    FailOnCleanupErr,
    /// Delete the profile only, leave the system untouched.
    NoCleanup,
    /// Try cleanup, but delete the profile even if cleanup fails.
    ForceDelete,
}

impl CleanupType {
    /// Wire name of the cleanup type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailOnCleanupErr => "FAIL_ON_CLEANUP_ERR",
            Self::NoCleanup => "NO_CLEANUP",
            Self::ForceDelete => "FORCE_DELETE",
        }
    }
}

impl fmt::Display for CleanupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account to create.
///
/// # Example
///
/// ```
/// use sumakit::NewUser;
///
/// let user = NewUser::new("jdoe", "s3cret")
///     .first_name("Jane")
///     .last_name("Doe")
///     .email("jane@example.com");
/// assert_eq!(user.login, "jdoe");
/// assert_eq!(user.first_name, "Jane");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login name.
    pub login: String,
    /// Initial password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
}

impl NewUser {
    /// Create a user whose first and last name default to the login.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            first_name: login.clone(),
            last_name: login.clone(),
            email: String::new(),
            password: password.into(),
            login,
        }
    }

    /// Set the given name.
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    /// Set the family name.
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Set the contact address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish()
    }
}
