//! Backend trait and implementations for the SUSE Manager API.
//!
//! The [`Backend`] trait is the set of single round trips the workflows in
//! [`crate::Client`] are composed from. [`http::HttpBackend`] talks to a real
//! server; [`MockBackend`] keeps everything in memory and records each call,
//! so tests can assert which requests a workflow issued.
//!
//! # Testing
//!
//! ```
//! use sumakit::backend::{Backend, Call, MockBackend};
//! use sumakit::{SessionCookie, SystemId};
//!
//! let mut mock = MockBackend::new();
//! mock.add_system("web01", SystemId(42), "192.168.1.10");
//!
//! let session = SessionCookie::new("cookie");
//! assert_eq!(mock.system_id(&session, "web01").unwrap(), SystemId(42));
//! assert_eq!(mock.calls(), vec![Call::SystemId("web01".to_string())]);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{CleanupType, Credentials, NewUser, SessionCookie, SystemId, SystemNetwork};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Backend trait for SUSE Manager API calls.
///
/// Mutating calls return the HTTP status of a successful response. A
/// non-success status is an [`Error::Http`] carrying that status.
pub trait Backend: Send + Sync {
    /// Exchange credentials for a session cookie.
    ///
    /// A successful response without a session cookie yields an empty
    /// [`SessionCookie`], not an error.
    fn login(&self, credentials: &Credentials) -> Result<SessionCookie>;

    /// Resolve a hostname to the first matching system id.
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotFound` if nothing matches.
    fn system_id(&self, session: &SessionCookie, hostname: &str) -> Result<SystemId>;

    /// Fetch the network details of a system.
    fn system_network(&self, session: &SessionCookie, id: SystemId) -> Result<SystemNetwork>;

    /// List the names of all system groups.
    fn list_groups(&self, session: &SessionCookie) -> Result<Vec<String>>;

    /// List the logins of all users.
    fn list_users(&self, session: &SessionCookie) -> Result<Vec<String>>;

    /// Add systems to, or remove them from, a system group.
    fn add_or_remove_systems(
        &self,
        session: &SessionCookie,
        group: &str,
        ids: &[SystemId],
        add: bool,
    ) -> Result<u16>;

    /// Delete a system profile.
    fn delete_system(
        &self,
        session: &SessionCookie,
        id: SystemId,
        cleanup: CleanupType,
    ) -> Result<u16>;

    /// Delete a system group.
    fn delete_group(&self, session: &SessionCookie, group: &str) -> Result<u16>;

    /// Create a user.
    fn create_user(&self, session: &SessionCookie, user: &NewUser) -> Result<u16>;

    /// Delete a user.
    fn delete_user(&self, session: &SessionCookie, login: &str) -> Result<u16>;
}

/// A call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `login` with the given login name.
    Login(String),
    /// `system_id` for a hostname.
    SystemId(String),
    /// `system_network` for an id.
    SystemNetwork(SystemId),
    /// `list_groups`.
    ListGroups,
    /// `list_users`.
    ListUsers,
    /// `add_or_remove_systems`.
    AddOrRemoveSystems {
        /// Target group.
        group: String,
        /// Systems to move.
        ids: Vec<SystemId>,
        /// Add (true) or remove (false).
        add: bool,
    },
    /// `delete_system`.
    DeleteSystem(SystemId, CleanupType),
    /// `delete_group`.
    DeleteGroup(String),
    /// `create_user` with the given login.
    CreateUser(String),
    /// `delete_user`.
    DeleteUser(String),
}

impl Call {
    /// Whether this call changes server state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::AddOrRemoveSystems { .. }
                | Self::DeleteSystem(..)
                | Self::DeleteGroup(_)
                | Self::CreateUser(_)
                | Self::DeleteUser(_)
        )
    }
}

/// Mock backend for testing without network access.
///
/// Lookups answer from in-memory tables, mutations answer with a
/// configurable status (200 by default), and every call is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    session: Arc<Mutex<Option<String>>>,
    systems: Arc<Mutex<HashMap<String, SystemId>>>,
    networks: Arc<Mutex<HashMap<SystemId, SystemNetwork>>>,
    groups: Arc<Mutex<Vec<String>>>,
    users: Arc<Mutex<Vec<String>>>,
    mutation_status: Arc<Mutex<Option<u16>>>,
    listing_fails: Arc<Mutex<bool>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie value handed out by `login`. Without one, login yields an
    /// empty session.
    pub fn set_session(&mut self, cookie: impl Into<String>) {
        *self.session.lock().unwrap() = Some(cookie.into());
    }

    /// Register a system with its IP.
    pub fn add_system(&mut self, hostname: impl Into<String>, id: SystemId, ip: impl Into<String>) {
        let hostname = hostname.into();
        self.networks.lock().unwrap().insert(
            id,
            SystemNetwork {
                ip: ip.into(),
                hostname: hostname.clone(),
            },
        );
        self.systems.lock().unwrap().insert(hostname, id);
    }

    /// Register a system without network details.
    pub fn add_system_without_network(&mut self, hostname: impl Into<String>, id: SystemId) {
        self.systems.lock().unwrap().insert(hostname.into(), id);
    }

    /// Add an existing system group.
    pub fn add_group(&mut self, name: impl Into<String>) {
        self.groups.lock().unwrap().push(name.into());
    }

    /// Add an existing user.
    pub fn add_user(&mut self, login: impl Into<String>) {
        self.users.lock().unwrap().push(login.into());
    }

    /// Status every mutating call answers with.
    pub fn set_mutation_status(&mut self, status: u16) {
        *self.mutation_status.lock().unwrap() = Some(status);
    }

    /// Make the group and user listings fail with a transport error.
    pub fn fail_listings(&mut self) {
        *self.listing_fails.lock().unwrap() = true;
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of mutating calls made so far.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_mutation())
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutate(&self, call: Call) -> Result<u16> {
        self.record(call);
        let status = self.mutation_status.lock().unwrap().unwrap_or(200);
        if (200..300).contains(&status) {
            Ok(status)
        } else {
            Err(Error::http(format!("mock returned HTTP {status}"), Some(status)))
        }
    }

    fn listing(&self) -> Result<()> {
        if *self.listing_fails.lock().unwrap() {
            return Err(Error::http("mock listing failed", Some(500)));
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    fn login(&self, credentials: &Credentials) -> Result<SessionCookie> {
        self.record(Call::Login(credentials.login.clone()));
        let session = self.session.lock().unwrap();
        Ok(session.clone().map(SessionCookie::new).unwrap_or_default())
    }

    fn system_id(&self, _session: &SessionCookie, hostname: &str) -> Result<SystemId> {
        self.record(Call::SystemId(hostname.to_string()));
        self.systems
            .lock()
            .unwrap()
            .get(hostname)
            .copied()
            .ok_or_else(|| Error::SystemNotFound(hostname.to_string()))
    }

    fn system_network(&self, _session: &SessionCookie, id: SystemId) -> Result<SystemNetwork> {
        self.record(Call::SystemNetwork(id));
        self.networks
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::NetworkNotFound(id))
    }

    fn list_groups(&self, _session: &SessionCookie) -> Result<Vec<String>> {
        self.record(Call::ListGroups);
        self.listing()?;
        Ok(self.groups.lock().unwrap().clone())
    }

    fn list_users(&self, _session: &SessionCookie) -> Result<Vec<String>> {
        self.record(Call::ListUsers);
        self.listing()?;
        Ok(self.users.lock().unwrap().clone())
    }

    fn add_or_remove_systems(
        &self,
        _session: &SessionCookie,
        group: &str,
        ids: &[SystemId],
        add: bool,
    ) -> Result<u16> {
        self.mutate(Call::AddOrRemoveSystems {
            group: group.to_string(),
            ids: ids.to_vec(),
            add,
        })
    }

    fn delete_system(
        &self,
        _session: &SessionCookie,
        id: SystemId,
        cleanup: CleanupType,
    ) -> Result<u16> {
        self.mutate(Call::DeleteSystem(id, cleanup))
    }

    fn delete_group(&self, _session: &SessionCookie, group: &str) -> Result<u16> {
        self.mutate(Call::DeleteGroup(group.to_string()))
    }

    fn create_user(&self, _session: &SessionCookie, user: &NewUser) -> Result<u16> {
        self.mutate(Call::CreateUser(user.login.clone()))
    }

    fn delete_user(&self, _session: &SessionCookie, login: &str) -> Result<u16> {
        self.mutate(Call::DeleteUser(login.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionCookie {
        SessionCookie::new("cookie")
    }

    #[test]
    fn test_mock_backend_new() {
        let mock = MockBackend::new();
        assert!(mock.list_groups(&session()).unwrap().is_empty());
        assert!(mock.list_users(&session()).unwrap().is_empty());
    }

    #[test]
    fn test_mock_backend_login() {
        let mut mock = MockBackend::new();
        let creds = Credentials::new("admin", "pw");
        assert!(mock.login(&creds).unwrap().is_empty());

        mock.set_session("abc");
        assert_eq!(mock.login(&creds).unwrap().as_str(), "abc");
    }

    #[test]
    fn test_mock_backend_lookups() {
        let mut mock = MockBackend::new();
        mock.add_system("web01", SystemId(42), "192.168.1.10");

        let id = mock.system_id(&session(), "web01").unwrap();
        assert_eq!(id, SystemId(42));
        assert_eq!(mock.system_network(&session(), id).unwrap().ip, "192.168.1.10");

        assert!(matches!(
            mock.system_id(&session(), "db01"),
            Err(Error::SystemNotFound(_))
        ));
        assert!(matches!(
            mock.system_network(&session(), SystemId(7)),
            Err(Error::NetworkNotFound(SystemId(7)))
        ));
    }

    #[test]
    fn test_mock_backend_mutation_status() {
        let mut mock = MockBackend::new();
        assert_eq!(mock.delete_group(&session(), "g").unwrap(), 200);

        mock.set_mutation_status(500);
        let err = mock.delete_user(&session(), "u").unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(mock.mutation_count(), 2);
    }

    #[test]
    fn test_mock_backend_failing_listings() {
        let mut mock = MockBackend::new();
        mock.add_group("g");
        mock.fail_listings();
        assert!(mock.list_groups(&session()).is_err());
        assert!(mock.list_users(&session()).is_err());
    }

    #[test]
    fn test_call_is_mutation() {
        assert!(!Call::ListGroups.is_mutation());
        assert!(!Call::SystemId("h".to_string()).is_mutation());
        assert!(Call::DeleteGroup("g".to_string()).is_mutation());
        assert!(
            Call::AddOrRemoveSystems {
                group: "g".to_string(),
                ids: vec![SystemId(1)],
                add: true
            }
            .is_mutation()
        );
    }
}
