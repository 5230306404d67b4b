//! HTTP backend for a live SUSE Manager server.
//!
//! Requests go to `<server>/rhn/manager/api` and carry the session cookie.
//! Responses are read in full before being decoded so that verbose mode can
//! log the raw exchange.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::session::find_session_cookie;
use crate::types::{
    CleanupType, Credentials, NewUser, SessionCookie, SystemId, SystemMatch, SystemNetwork,
};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ureq::http::header::SET_COOKIE;
use ureq::http::Response;

/// Path of the JSON API below the server root.
pub const API_PATH: &str = "/rhn/manager/api";

/// Backend that talks to a SUSE Manager server over HTTP.
///
/// # Example
///
/// ```no_run
/// use sumakit::backend::http::HttpBackend;
/// use sumakit::backend::Backend;
/// use sumakit::Credentials;
///
/// let backend = HttpBackend::new("https://suma.example.com");
/// let session = backend.login(&Credentials::new("admin", "secret")).unwrap();
/// let id = backend.system_id(&session, "web01.example.com").unwrap();
/// println!("web01 has id {id}");
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, including [`API_PATH`].
    api_base: String,
    /// Log raw request and response bodies.
    verbose: bool,
}

impl HttpBackend {
    /// Create a backend for the server at `server` (scheme and host, e.g.
    /// `https://suma.example.com`).
    #[must_use]
    pub fn new(server: impl AsRef<str>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            api_base: format!("{}{}", server.as_ref().trim_end_matches('/'), API_PATH),
            verbose: false,
        }
    }

    /// Log raw request and response bodies at `info` level.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the URL for an API method.
    fn url(&self, method: &str) -> String {
        format!("{}{}", self.api_base, method)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        session: &SessionCookie,
        method: &str,
        query: Option<(&str, &str)>,
    ) -> Result<T> {
        let url = self.url(method);
        debug!("GET {url}");

        let mut request = self
            .agent
            .get(&url)
            .header("Cookie", session.header_value())
            .header("Accept", "application/json");
        if let Some((key, value)) = query {
            request = request.query(key, value);
        }

        let response = request.call()?;
        let body = self.read_success("GET", &url, response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_json<B: Serialize>(&self, session: &SessionCookie, method: &str, body: &B) -> Result<u16> {
        let url = self.url(method);
        debug!("POST {url}");
        if self.verbose {
            info!("POST {url} request: {}", serde_json::to_string(body)?);
        }

        let response = self
            .agent
            .post(&url)
            .header("Cookie", session.header_value())
            .header("Accept", "application/json")
            .send_json(body)?;

        let status = response.status().as_u16();
        self.read_success("POST", &url, response)?;
        Ok(status)
    }

    /// Read the body and fail on a non-success status.
    fn read_success(&self, verb: &str, url: &str, mut response: Response<ureq::Body>) -> Result<String> {
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if self.verbose {
            info!("{verb} {url} -> {status}: {body}");
        }

        if !(200..300).contains(&status) {
            return Err(Error::http(
                format!("{verb} {url} returned HTTP {status}"),
                Some(status),
            ));
        }

        Ok(body)
    }
}

impl Backend for HttpBackend {
    fn login(&self, credentials: &Credentials) -> Result<SessionCookie> {
        let url = self.url("/auth/login");
        debug!("POST {url} as {}", credentials.login);

        let response = self
            .agent
            .post(&url)
            .header("Accept", "application/json")
            .send_json(&AuthRequest {
                login: &credentials.login,
                password: &credentials.password,
            })?;

        let cookie = find_session_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        self.read_success("POST", &url, response)?;

        match cookie {
            Some(cookie) => Ok(cookie),
            None => {
                warn!("login succeeded but the server did not set a session cookie");
                Ok(SessionCookie::default())
            }
        }
    }

    fn system_id(&self, session: &SessionCookie, hostname: &str) -> Result<SystemId> {
        let response: SystemIdResponse =
            self.get_json(session, "/system/getId", Some(("name", hostname)))?;
        debug!(
            "system/getId for {hostname}: success={}, {} match(es)",
            response.success,
            response.result.len()
        );

        let found = response
            .result
            .into_iter()
            .next()
            .map(SystemMatch::from)
            .ok_or_else(|| Error::SystemNotFound(hostname.to_string()))?;
        debug!("{hostname} resolved to {} ({})", found.id, found.name);
        Ok(found.id)
    }

    fn system_network(&self, session: &SessionCookie, id: SystemId) -> Result<SystemNetwork> {
        let sid = id.to_string();
        let response: SystemNetworkResponse =
            self.get_json(session, "/system/getNetworkForSystem", Some(("sid", &sid)))?;
        debug!("system/getNetworkForSystem for {id}: success={}", response.success);

        // Missing or null fields read as empty; an empty IP is caught by the workflows.
        let entry = response.result.unwrap_or_default();
        Ok(SystemNetwork {
            ip: entry.ip.unwrap_or_default(),
            hostname: entry.hostname.unwrap_or_default(),
        })
    }

    fn list_groups(&self, session: &SessionCookie) -> Result<Vec<String>> {
        let response: GroupListResponse = self.get_json(session, "/systemgroup/listAllGroups", None)?;
        Ok(response.result.into_iter().filter_map(|g| g.name).collect())
    }

    fn list_users(&self, session: &SessionCookie) -> Result<Vec<String>> {
        let response: UserListResponse = self.get_json(session, "/user/listUsers", None)?;
        debug!("user/listUsers: success={}", response.success);
        Ok(response.result.into_iter().filter_map(|u| u.login).collect())
    }

    fn add_or_remove_systems(
        &self,
        session: &SessionCookie,
        group: &str,
        ids: &[SystemId],
        add: bool,
    ) -> Result<u16> {
        self.post_json(
            session,
            "/systemgroup/addOrRemoveSystems",
            &AddOrRemoveSystemsRequest {
                system_group_name: group,
                server_ids: ids,
                add,
            },
        )
    }

    fn delete_system(
        &self,
        session: &SessionCookie,
        id: SystemId,
        cleanup: CleanupType,
    ) -> Result<u16> {
        self.post_json(
            session,
            "/system/deleteSystem",
            &DeleteSystemRequest {
                sid: id,
                cleanup_type: cleanup,
            },
        )
    }

    fn delete_group(&self, session: &SessionCookie, group: &str) -> Result<u16> {
        self.post_json(
            session,
            "/systemgroup/delete",
            &SystemGroupRequest {
                system_group_name: group,
            },
        )
    }

    fn create_user(&self, session: &SessionCookie, user: &NewUser) -> Result<u16> {
        // Keep the password out of verbose logs.
        if self.verbose {
            info!("creating user {user:?}");
        }
        let url = self.url("/user/create");
        debug!("POST {url}");

        let response = self
            .agent
            .post(&url)
            .header("Cookie", session.header_value())
            .header("Accept", "application/json")
            .send_json(user)?;

        let status = response.status().as_u16();
        self.read_success("POST", &url, response)?;
        Ok(status)
    }

    fn delete_user(&self, session: &SessionCookie, login: &str) -> Result<u16> {
        self.post_json(session, "/user/delete", &UserRequest { login })
    }
}

// =============================================================================
// SUSE Manager API wire types
// =============================================================================

#[derive(Serialize)]
struct AuthRequest<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SystemIdResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<SystemMatchEntry>,
}

#[derive(Debug, Deserialize)]
struct SystemMatchEntry {
    id: SystemId,
    name: Option<String>,
}

impl From<SystemMatchEntry> for SystemMatch {
    fn from(entry: SystemMatchEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SystemNetworkResponse {
    #[serde(default)]
    success: bool,
    result: Option<NetworkEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct NetworkEntry {
    ip: Option<String>,
    hostname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroupListResponse {
    #[serde(default)]
    result: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserListResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<UserEntry>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    login: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddOrRemoveSystemsRequest<'a> {
    system_group_name: &'a str,
    server_ids: &'a [SystemId],
    add: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteSystemRequest {
    sid: SystemId,
    cleanup_type: CleanupType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SystemGroupRequest<'a> {
    system_group_name: &'a str,
}

#[derive(Serialize)]
struct UserRequest<'a> {
    login: &'a str,
}
