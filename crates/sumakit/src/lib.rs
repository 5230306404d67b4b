//! # sumakit
//!
//! Pure Rust client for the SUSE Manager systems-management API.
//!
//! This crate provides functionality for:
//! - Logging in and extracting the session cookie
//! - Resolving a hostname to a system id and its IP address
//! - Moving systems in and out of system groups, deleting systems
//! - Creating and removing users and system groups
//!
//! Every mutating workflow runs its lookups and guards first and stops at
//! the first failing step. Nothing is retried and nothing is rolled back.
//!
//! ## Example
//!
//! ```no_run
//! use sumakit::{Client, Credentials};
//!
//! let client = Client::new("https://suma.example.com");
//! let session = client.login(&Credentials::new("admin", "secret")).unwrap();
//!
//! // Only touches the group if web01 lives in 192.168.1.0/24
//! let status = client
//!     .add_system_to_group(&session, "web01.example.com", "webservers", "192.168.1.0")
//!     .unwrap();
//! println!("group updated: HTTP {status}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod network;
pub mod session;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{
    CleanupType, Credentials, NewUser, SESSION_COOKIE, SessionCookie, SystemId, SystemMatch,
    SystemNetwork,
};

use backend::Backend;
pub use backend::MockBackend;
use backend::http::HttpBackend;
use log::{debug, info, warn};

/// Status reported when a workflow had nothing to do.
const NO_OP_STATUS: u16 = 200;

/// High-level client for SUSE Manager workflows.
///
/// The client wraps a [`Backend`] and composes its single round trips into
/// guarded workflows. It holds no session state; every call takes the
/// session cookie returned by [`Client::login`].
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client for the server at `server`.
    #[must_use]
    pub fn new(server: impl AsRef<str>) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(server)),
        }
    }

    /// Create a client that logs raw request and response bodies.
    #[must_use]
    pub fn new_verbose(server: impl AsRef<str>, verbose: bool) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(server).verbose(verbose)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    // =========================================================================
    // Session and lookups
    // =========================================================================

    /// Log in and return the session cookie.
    ///
    /// An empty cookie is returned, without error, when the server accepted
    /// the request but set no session.
    pub fn login(&self, credentials: &Credentials) -> Result<SessionCookie> {
        self.backend.login(credentials)
    }

    /// Resolve a hostname to its system id.
    pub fn system_id(&self, session: &SessionCookie, hostname: &str) -> Result<SystemId> {
        self.backend.system_id(session, hostname)
    }

    /// Resolve a system id to its IP address.
    ///
    /// # Errors
    ///
    /// Returns `Error::NetworkNotFound` if the server reports no IP.
    pub fn system_ip(&self, session: &SessionCookie, id: SystemId) -> Result<String> {
        let network = self.backend.system_network(session, id)?;
        if network.ip.trim().is_empty() {
            return Err(Error::NetworkNotFound(id));
        }
        Ok(network.ip)
    }

    // =========================================================================
    // Existence checks
    // =========================================================================

    /// Whether a system group with exactly this name exists.
    ///
    /// A failed listing counts as "does not exist"; the error is logged.
    pub fn system_group_exists(&self, session: &SessionCookie, group: &str) -> bool {
        match self.backend.list_groups(session) {
            Ok(groups) => groups.iter().any(|name| name == group),
            Err(e) => {
                warn!("could not list system groups, assuming {group} does not exist: {e}");
                false
            }
        }
    }

    /// Whether a user with exactly this login exists.
    ///
    /// A failed listing counts as "does not exist"; the error is logged.
    pub fn user_exists(&self, session: &SessionCookie, login: &str) -> bool {
        match self.backend.list_users(session) {
            Ok(users) => users.iter().any(|name| name == login),
            Err(e) => {
                warn!("could not list users, assuming {login} does not exist: {e}");
                false
            }
        }
    }

    // =========================================================================
    // System workflows
    // =========================================================================

    /// Add a system to a group, provided its IP lies in `network`.
    ///
    /// Resolves the hostname, then its IP, then checks the network. Any
    /// failing step aborts before the group is touched.
    pub fn add_system_to_group(
        &self,
        session: &SessionCookie,
        hostname: &str,
        group: &str,
        network: &str,
    ) -> Result<u16> {
        self.change_membership(session, hostname, group, network, true)
    }

    /// Remove a system from a group, provided its IP lies in `network`.
    pub fn remove_system_from_group(
        &self,
        session: &SessionCookie,
        hostname: &str,
        group: &str,
        network: &str,
    ) -> Result<u16> {
        self.change_membership(session, hostname, group, network, false)
    }

    /// Delete a system, provided its IP lies in `network`.
    ///
    /// A non-success status from the delete call is an error even if the
    /// server sent a body.
    pub fn delete_system(
        &self,
        session: &SessionCookie,
        hostname: &str,
        network: &str,
        cleanup: CleanupType,
    ) -> Result<u16> {
        let id = self.locate_in_network(session, hostname, network)?;
        let status = self.backend.delete_system(session, id, cleanup)?;
        info!("deleted system {hostname} ({id}) with cleanup {cleanup}");
        Ok(status)
    }

    // =========================================================================
    // Group and user workflows
    // =========================================================================

    /// Delete a system group if it exists.
    ///
    /// A group that is already gone counts as success and costs no delete
    /// call.
    pub fn remove_system_group(&self, session: &SessionCookie, group: &str) -> Result<u16> {
        if !self.system_group_exists(session, group) {
            debug!("system group {group} does not exist, nothing to remove");
            return Ok(NO_OP_STATUS);
        }

        let status = self.backend.delete_group(session, group)?;
        info!("removed system group {group}");
        Ok(status)
    }

    /// Create a user unless one with the same login exists.
    ///
    /// The create call's status is returned as is; a failure status is
    /// available from [`Error::status`].
    pub fn add_user(&self, session: &SessionCookie, user: &NewUser) -> Result<u16> {
        if self.user_exists(session, &user.login) {
            debug!("user {} already exists", user.login);
            return Ok(NO_OP_STATUS);
        }

        let status = self.backend.create_user(session, user)?;
        info!("created user {}", user.login);
        Ok(status)
    }

    /// Remove a user together with the system group named after it.
    ///
    /// The group goes first; if that fails the user is left alone and the
    /// group error is returned unchanged.
    pub fn remove_user(&self, session: &SessionCookie, login: &str) -> Result<()> {
        self.remove_system_group(session, login)?;

        if !self.user_exists(session, login) {
            debug!("user {login} does not exist, nothing to remove");
            return Ok(());
        }

        self.backend.delete_user(session, login)?;
        info!("removed user {login}");
        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn change_membership(
        &self,
        session: &SessionCookie,
        hostname: &str,
        group: &str,
        network: &str,
        add: bool,
    ) -> Result<u16> {
        let id = self.locate_in_network(session, hostname, network)?;
        let status = self.backend.add_or_remove_systems(session, group, &[id], add)?;
        info!(
            "{} {hostname} ({id}) {} group {group}",
            if add { "added" } else { "removed" },
            if add { "to" } else { "from" }
        );
        Ok(status)
    }

    /// Resolve hostname → id → IP and check the IP against `network`.
    fn locate_in_network(
        &self,
        session: &SessionCookie,
        hostname: &str,
        network: &str,
    ) -> Result<SystemId> {
        let id = self.system_id(session, hostname)?;
        let ip = self.system_ip(session, id)?;

        if !network::is_in_network(&ip, network) {
            return Err(Error::NotInNetwork {
                hostname: hostname.to_string(),
                ip,
                network: network.to_string(),
            });
        }

        debug!("{hostname} ({id}) has IP {ip} in network {network}");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Call;

    fn session() -> SessionCookie {
        SessionCookie::new("cookie")
    }

    fn client_with(mock: &MockBackend) -> Client {
        Client::with_backend(Box::new(mock.clone()))
    }

    #[test]
    fn test_add_system_success() {
        let mut mock = MockBackend::new();
        mock.add_system("host", SystemId(42), "192.168.1.10");
        let client = client_with(&mock);

        let status = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(
            mock.calls(),
            vec![
                Call::SystemId("host".to_string()),
                Call::SystemNetwork(SystemId(42)),
                Call::AddOrRemoveSystems {
                    group: "group".to_string(),
                    ids: vec![SystemId(42)],
                    add: true,
                },
            ]
        );
    }

    #[test]
    fn test_add_system_not_in_network_skips_mutation() {
        let mut mock = MockBackend::new();
        mock.add_system("host", SystemId(42), "10.0.0.1");
        let client = client_with(&mock);

        let err = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap_err();

        assert!(matches!(err, Error::NotInNetwork { .. }));
        assert_eq!(err.category(), ErrorCategory::Precondition);
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_add_system_unknown_host_short_circuits() {
        let mock = MockBackend::new();
        let client = client_with(&mock);

        let err = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap_err();

        assert!(matches!(err, Error::SystemNotFound(_)));
        assert_eq!(mock.calls(), vec![Call::SystemId("host".to_string())]);
    }

    #[test]
    fn test_add_system_ip_lookup_error() {
        let mut mock = MockBackend::new();
        mock.add_system_without_network("host", SystemId(42));
        let client = client_with(&mock);

        let err = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap_err();

        assert!(matches!(err, Error::NetworkNotFound(SystemId(42))));
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_empty_ip_is_not_found() {
        let mut mock = MockBackend::new();
        mock.add_system("host", SystemId(42), "");
        let client = client_with(&mock);

        let err = client.system_ip(&session(), SystemId(42)).unwrap_err();
        assert!(matches!(err, Error::NetworkNotFound(_)));
    }

    #[test]
    fn test_remove_system_from_group() {
        let mut mock = MockBackend::new();
        mock.add_system("host", SystemId(42), "192.168.1.10");
        let client = client_with(&mock);

        client
            .remove_system_from_group(&session(), "host", "group", "192.168.1.0")
            .unwrap();

        assert!(mock.calls().contains(&Call::AddOrRemoveSystems {
            group: "group".to_string(),
            ids: vec![SystemId(42)],
            add: false,
        }));
    }

    #[test]
    fn test_add_system_mutation_error() {
        let mut mock = MockBackend::new();
        mock.add_system("host", SystemId(42), "192.168.1.10");
        mock.set_mutation_status(500);
        let client = client_with(&mock);

        let err = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_delete_system() {
        let cases = [
            ("192.168.1.10", Some(200), true),
            ("10.0.0.1", None, false),
            ("192.168.1.10", Some(500), false),
        ];

        for (ip, mutation_status, ok) in cases {
            let mut mock = MockBackend::new();
            mock.add_system("host", SystemId(42), ip);
            if let Some(status) = mutation_status {
                mock.set_mutation_status(status);
            }
            let client = client_with(&mock);

            let result =
                client.delete_system(&session(), "host", "192.168.1.0", CleanupType::default());
            assert_eq!(result.is_ok(), ok, "ip={ip} status={mutation_status:?}");
            assert_eq!(mock.mutation_count(), usize::from(mutation_status.is_some()));
        }
    }

    #[test]
    fn test_delete_system_unknown_host() {
        let mock = MockBackend::new();
        let client = client_with(&mock);

        assert!(
            client
                .delete_system(&session(), "host", "192.168.1.0", CleanupType::NoCleanup)
                .is_err()
        );
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_system_group_exists() {
        let mut mock = MockBackend::new();
        mock.add_group("web");
        let client = client_with(&mock);

        assert!(client.system_group_exists(&session(), "web"));
        assert!(!client.system_group_exists(&session(), "we"));
    }

    #[test]
    fn test_existence_checks_fail_closed() {
        let mut mock = MockBackend::new();
        mock.add_group("web");
        mock.add_user("admin");
        mock.fail_listings();
        let client = client_with(&mock);

        assert!(!client.system_group_exists(&session(), "web"));
        assert!(!client.user_exists(&session(), "admin"));
    }

    #[test]
    fn test_remove_system_group_missing_is_success() {
        let mock = MockBackend::new();
        let client = client_with(&mock);

        assert_eq!(client.remove_system_group(&session(), "web").unwrap(), 200);
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_remove_system_group_existing() {
        let mut mock = MockBackend::new();
        mock.add_group("web");
        let client = client_with(&mock);

        assert_eq!(client.remove_system_group(&session(), "web").unwrap(), 200);
        assert!(mock.calls().contains(&Call::DeleteGroup("web".to_string())));
    }

    #[test]
    fn test_remove_system_group_delete_fails() {
        let mut mock = MockBackend::new();
        mock.add_group("web");
        mock.set_mutation_status(500);
        let client = client_with(&mock);

        assert!(client.remove_system_group(&session(), "web").is_err());
    }

    #[test]
    fn test_add_user_existing_skips_create() {
        let mut mock = MockBackend::new();
        mock.add_user("testuser");
        let client = client_with(&mock);

        let status = client
            .add_user(&session(), &NewUser::new("testuser", "testpass"))
            .unwrap();
        assert_eq!(status, 200);
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_add_user_creates() {
        let mock = MockBackend::new();
        let client = client_with(&mock);

        let status = client
            .add_user(&session(), &NewUser::new("testuser", "testpass"))
            .unwrap();
        assert_eq!(status, 200);
        assert!(mock.calls().contains(&Call::CreateUser("testuser".to_string())));
    }

    #[test]
    fn test_add_user_surfaces_failure_status() {
        let mut mock = MockBackend::new();
        mock.set_mutation_status(500);
        let client = client_with(&mock);

        let err = client
            .add_user(&session(), &NewUser::new("testuser", "testpass"))
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_remove_user_not_present() {
        let mock = MockBackend::new();
        let client = client_with(&mock);

        client.remove_user(&session(), "testuser").unwrap();
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_remove_user_with_group() {
        let mut mock = MockBackend::new();
        mock.add_group("testuser");
        mock.add_user("testuser");
        let client = client_with(&mock);

        client.remove_user(&session(), "testuser").unwrap();
        let mutations: Vec<Call> = mock.calls().into_iter().filter(Call::is_mutation).collect();
        assert_eq!(
            mutations,
            vec![
                Call::DeleteGroup("testuser".to_string()),
                Call::DeleteUser("testuser".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_user_group_error_stops() {
        let mut mock = MockBackend::new();
        mock.add_group("testuser");
        mock.add_user("testuser");
        mock.set_mutation_status(500);
        let client = client_with(&mock);

        let err = client.remove_user(&session(), "testuser").unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!mock.calls().contains(&Call::DeleteUser("testuser".to_string())));
    }

    #[test]
    fn test_remove_user_delete_fails() {
        let mut mock = MockBackend::new();
        mock.add_user("testuser");
        mock.set_mutation_status(500);
        let client = client_with(&mock);

        assert!(client.remove_user(&session(), "testuser").is_err());
    }

    #[test]
    fn test_http_workflow_outside_network_never_posts() {
        use mockito::{Matcher, Server};

        let mut server = Server::new();
        let get_id = server
            .mock("GET", "/rhn/manager/api/system/getId")
            .match_query(Matcher::UrlEncoded("name".into(), "host".into()))
            .with_status(200)
            .with_body(r#"{"success": true, "result": [{"id": 42, "name": "host"}]}"#)
            .create();
        let get_ip = server
            .mock("GET", "/rhn/manager/api/system/getNetworkForSystem")
            .match_query(Matcher::UrlEncoded("sid".into(), "42".into()))
            .with_status(200)
            .with_body(r#"{"success": true, "result": {"ip": "10.0.0.1", "hostname": "host"}}"#)
            .create();
        let mutate = server
            .mock("POST", "/rhn/manager/api/systemgroup/addOrRemoveSystems")
            .expect(0)
            .create();

        let client = Client::new(server.url());
        let err = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap_err();

        assert!(matches!(err, Error::NotInNetwork { .. }));
        get_id.assert();
        get_ip.assert();
        mutate.assert();
    }

    #[test]
    fn test_http_workflow_null_hostname_still_guards() {
        use mockito::{Matcher, Server};

        let mut server = Server::new();
        server
            .mock("GET", "/rhn/manager/api/system/getId")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": true, "result": [{"id": 42, "name": null}]}"#)
            .create();
        server
            .mock("GET", "/rhn/manager/api/system/getNetworkForSystem")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": true, "result": {"ip": "192.168.1.10", "hostname": null}}"#)
            .create();
        let mutate = server
            .mock("POST", "/rhn/manager/api/systemgroup/addOrRemoveSystems")
            .with_status(200)
            .create();

        let client = Client::new(server.url());
        let status = client
            .add_system_to_group(&session(), "host", "group", "192.168.1.0")
            .unwrap();

        assert_eq!(status, 200);
        mutate.assert();
    }

    #[test]
    fn test_http_null_ip_is_network_not_found() {
        use mockito::{Matcher, Server};

        let mut server = Server::new();
        server
            .mock("GET", "/rhn/manager/api/system/getNetworkForSystem")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": true, "result": {"ip": null, "hostname": "host"}}"#)
            .create();

        let client = Client::new(server.url());
        let err = client.system_ip(&session(), SystemId(42)).unwrap_err();
        assert!(matches!(err, Error::NetworkNotFound(SystemId(42))));
    }

    #[test]
    fn test_login_passthrough() {
        let mut mock = MockBackend::new();
        mock.set_session("abc");
        let client = client_with(&mock);

        let cookie = client.login(&Credentials::new("admin", "pw")).unwrap();
        assert_eq!(cookie.as_str(), "abc");
    }
}
