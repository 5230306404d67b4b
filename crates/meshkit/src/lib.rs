//! # meshkit
//!
//! Pure Rust client for meshStack building blocks.
//!
//! Log in with an API key, then list, inspect, create and delete the
//! building blocks of a project. Every call is a single blocking round
//! trip; nothing is cached or retried.
//!
//! ## Example
//!
//! ```no_run
//! use meshkit::{ApiKey, Client};
//!
//! let client = Client::new("https://federation.example.com");
//! let token = client.login(&ApiKey::new("client-id", "client-secret")).unwrap();
//!
//! for block in client.list_building_blocks(&token, "my-project").unwrap() {
//!     let status = client.building_block_status(&token, &block.uuid).unwrap();
//!     println!("{} ({}): {}", block.name, block.uuid, status);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AccessToken, ApiKey, BUILDING_BLOCK_MEDIA_TYPE, BuildingBlock, BuildingBlockStatus};

use log::{debug, info};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use ureq::http::Response;

const BUILDING_BLOCKS_PATH: &str = "/api/meshobjects/meshbuildingblocks";

/// Client for the meshStack API.
pub struct Client {
    agent: ureq::Agent,
    api_base: String,
    verbose: bool,
}

impl Client {
    /// Create a client for the meshStack instance at `api_base`.
    pub fn new(api_base: impl AsRef<str>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            api_base: api_base.as_ref().trim_end_matches('/').to_string(),
            verbose: false,
        }
    }

    /// Log raw response bodies at `info` level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Exchange an API key for a bearer token.
    pub fn login(&self, key: &ApiKey) -> Result<AccessToken> {
        let url = format!("{}/api/login", self.api_base);
        debug!("POST {url} as {}", key.client_id);

        let response = self.agent.post(&url).send_form([
            ("grant_type", "client_credentials"),
            ("client_id", key.client_id.as_str()),
            ("client_secret", key.client_secret.as_str()),
        ])?;

        let body = self.read_success("POST", &url, response)?;
        let login: LoginResponse = serde_json::from_str(&body)?;
        Ok(AccessToken::new(login.access_token))
    }

    /// List the building blocks of a project.
    pub fn list_building_blocks(&self, token: &AccessToken, project: &str) -> Result<Vec<BuildingBlock>> {
        let url = self.building_blocks_url();
        debug!("GET {url} for project {project}");

        let response = self
            .agent
            .get(&url)
            .query("projectIdentifier", project)
            .header("Authorization", token.bearer())
            .header("Accept", BUILDING_BLOCK_MEDIA_TYPE)
            .call()?;

        let list: BuildingBlockList = self.decode("GET", &url, response)?;
        Ok(list
            .embedded
            .building_blocks
            .into_iter()
            .map(|b| BuildingBlock {
                uuid: b.metadata.uuid,
                name: b.spec.display_name,
            })
            .collect())
    }

    /// Find a project's building block by display name.
    ///
    /// # Errors
    ///
    /// Returns `Error::BuildingBlockNotFound` if no block has that name.
    pub fn find_building_block(
        &self,
        token: &AccessToken,
        project: &str,
        display_name: &str,
    ) -> Result<BuildingBlock> {
        self.list_building_blocks(token, project)?
            .into_iter()
            .find(|b| b.name == display_name)
            .ok_or_else(|| Error::BuildingBlockNotFound(display_name.to_string()))
    }

    /// Fetch the current status of a building block.
    pub fn building_block_status(&self, token: &AccessToken, uuid: &str) -> Result<BuildingBlockStatus> {
        let url = self.building_block_url(uuid);
        debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", token.bearer())
            .header("Accept", BUILDING_BLOCK_MEDIA_TYPE)
            .call()?;

        let status: StatusResponse = self.decode("GET", &url, response)?;
        Ok(status.status)
    }

    /// Create a building block from a raw JSON payload and return its UUID.
    pub fn create_building_block(&self, token: &AccessToken, payload: &[u8]) -> Result<String> {
        let url = self.building_blocks_url();
        debug!("POST {url} ({} bytes)", payload.len());

        let response = self
            .agent
            .post(&url)
            .header("Authorization", token.bearer())
            .header("Content-Type", BUILDING_BLOCK_MEDIA_TYPE)
            .header("Accept", BUILDING_BLOCK_MEDIA_TYPE)
            .send(payload)?;

        let created: CreatedResponse = self.decode("POST", &url, response)?;
        info!("created building block {}", created.metadata.uuid);
        Ok(created.metadata.uuid)
    }

    /// Delete a building block.
    ///
    /// Only `200 OK` counts as success; meshStack answers `204` when the
    /// request was not accepted for deletion.
    pub fn delete_building_block(&self, token: &AccessToken, uuid: &str) -> Result<()> {
        let url = self.building_block_url(uuid);
        debug!("DELETE {url}");

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", token.bearer())
            .header("Accept", BUILDING_BLOCK_MEDIA_TYPE)
            .call()?;

        let status = response.status().as_u16();
        self.read_success("DELETE", &url, response)?;
        if status != 200 {
            return Err(Error::http(
                format!("DELETE {url} returned HTTP {status}, expected 200"),
                Some(status),
            ));
        }

        info!("deleted building block {uuid}");
        Ok(())
    }

    fn building_blocks_url(&self) -> String {
        format!("{}{}", self.api_base, BUILDING_BLOCKS_PATH)
    }

    fn building_block_url(&self, uuid: &str) -> String {
        format!("{}{}/{}", self.api_base, BUILDING_BLOCKS_PATH, uuid)
    }

    fn decode<T: DeserializeOwned>(&self, verb: &str, url: &str, response: Response<ureq::Body>) -> Result<T> {
        let body = self.read_success(verb, url, response)?;
        Ok(serde_json::from_str(&body)?)
    }

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

// meshStack wire types

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

// meshStack leaves out `_embedded` entirely when a project has no blocks.
#[derive(Deserialize)]
struct BuildingBlockList {
    #[serde(rename = "_embedded", default)]
    embedded: Embedded,
}

#[derive(Deserialize, Default)]
struct Embedded {
    #[serde(rename = "meshBuildingBlocks", default)]
    building_blocks: Vec<MeshBuildingBlock>,
}

#[derive(Deserialize)]
struct MeshBuildingBlock {
    metadata: Metadata,
    spec: Spec,
}

#[derive(Deserialize)]
struct Metadata {
    uuid: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Spec {
    display_name: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: BuildingBlockStatus,
}

#[derive(Deserialize)]
struct CreatedResponse {
    metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const PATH: &str = "/api/meshobjects/meshbuildingblocks";

    fn token() -> AccessToken {
        AccessToken::new("test-api-key")
    }

    #[test]
    fn test_login() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/login")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "dummy-client".into()),
                Matcher::UrlEncoded("client_secret".into(), "dummy-secret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "test-access-token"}"#)
            .create();

        let client = Client::new(server.url());
        let token = client
            .login(&ApiKey::new("dummy-client", "dummy-secret"))
            .unwrap();

        mock.assert();
        assert_eq!(token.as_str(), "test-access-token");
    }

    #[test]
    fn test_login_malformed_body() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/login")
            .with_status(200)
            .with_body("<html>")
            .create();

        let client = Client::new(server.url());
        let err = client.login(&ApiKey::new("id", "secret")).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_login_rejected() {
        let mut server = Server::new();
        server.mock("POST", "/api/login").with_status(401).create();

        let client = Client::new(server.url());
        let err = client.login(&ApiKey::new("id", "secret")).unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_list_building_blocks() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::UrlEncoded(
                "projectIdentifier".into(),
                "test-project".into(),
            ))
            .match_header("authorization", "Bearer test-api-key")
            .with_status(200)
            .with_body(
                r#"{
                    "_embedded": {
                        "meshBuildingBlocks": [
                            {"metadata": {"uuid": "uuid-123"}, "spec": {"displayName": "Block One"}},
                            {"metadata": {"uuid": "uuid-456"}, "spec": {"displayName": "Block Two"}}
                        ]
                    }
                }"#,
            )
            .create();

        let client = Client::new(server.url());
        let blocks = client.list_building_blocks(&token(), "test-project").unwrap();

        mock.assert();
        assert_eq!(
            blocks,
            vec![
                BuildingBlock {
                    uuid: "uuid-123".to_string(),
                    name: "Block One".to_string()
                },
                BuildingBlock {
                    uuid: "uuid-456".to_string(),
                    name: "Block Two".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_list_without_embedded_is_empty() {
        let mut server = Server::new();
        server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"page": {"totalElements": 0}}"#)
            .create();

        let client = Client::new(server.url());
        assert!(client.list_building_blocks(&token(), "p").unwrap().is_empty());
    }

    #[test]
    fn test_find_building_block() {
        let mut server = Server::new();
        server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"_embedded": {"meshBuildingBlocks": [
                    {"metadata": {"uuid": "uuid-123"}, "spec": {"displayName": "Block One"}}
                ]}}"#,
            )
            .expect(2)
            .create();

        let client = Client::new(server.url());
        let block = client.find_building_block(&token(), "p", "Block One").unwrap();
        assert_eq!(block.uuid, "uuid-123");

        let err = client.find_building_block(&token(), "p", "Block Two").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_building_block_status() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/meshobjects/meshbuildingblocks/block-uuid-123")
            .match_header("authorization", "Bearer test-api-key")
            .with_status(200)
            .with_body(r#"{"status": "IN_PROGRESS"}"#)
            .create();

        let client = Client::new(server.url());
        let status = client.building_block_status(&token(), "block-uuid-123").unwrap();

        mock.assert();
        assert_eq!(status, BuildingBlockStatus::InProgress);
    }

    #[test]
    fn test_building_block_status_not_found() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/meshobjects/meshbuildingblocks/missing")
            .with_status(404)
            .with_body("not found")
            .create();

        let client = Client::new(server.url());
        let err = client.building_block_status(&token(), "missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_building_block() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer test-api-key")
            .match_header(
                "content-type",
                Matcher::Regex(
                    r"^application/vnd\.meshcloud\.api\.meshbuildingblock\.v1\.hal\+json".into(),
                ),
            )
            .match_body(r#"{"dummy":"data"}"#)
            .with_status(200)
            .with_body(r#"{"metadata": {"uuid": "test-uuid-123"}}"#)
            .create();

        let client = Client::new(server.url()).verbose(true);
        let uuid = client
            .create_building_block(&token(), br#"{"dummy":"data"}"#)
            .unwrap();

        mock.assert();
        assert_eq!(uuid, "test-uuid-123");
    }

    #[test]
    fn test_create_building_block_bad_request() {
        let mut server = Server::new();
        server
            .mock("POST", PATH)
            .with_status(400)
            .with_body("bad request")
            .create();

        let client = Client::new(server.url());
        let err = client.create_building_block(&token(), b"{}").unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_delete_building_block() {
        let mut server = Server::new();
        let mock = server
            .mock("DELETE", "/api/meshobjects/meshbuildingblocks/test-uuid-123")
            .match_header("authorization", "Bearer test-api-key")
            .with_status(200)
            .create();

        let client = Client::new(server.url());
        client.delete_building_block(&token(), "test-uuid-123").unwrap();
        mock.assert();
    }

    #[test]
    fn test_delete_building_block_no_content_is_error() {
        let mut server = Server::new();
        server
            .mock("DELETE", "/api/meshobjects/meshbuildingblocks/test-uuid-123")
            .with_status(204)
            .create();

        let client = Client::new(server.url());
        let err = client.delete_building_block(&token(), "test-uuid-123").unwrap_err();
        assert_eq!(err.status(), Some(204));
    }

    #[test]
    fn test_delete_building_block_not_found() {
        let mut server = Server::new();
        server
            .mock("DELETE", "/api/meshobjects/meshbuildingblocks/test-uuid-123")
            .with_status(404)
            .create();

        let client = Client::new(server.url());
        let err = client.delete_building_block(&token(), "test-uuid-123").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = Client::new("https://mesh.example.com/");
        assert_eq!(client.api_base(), "https://mesh.example.com");
        assert_eq!(
            client.building_block_url("abc"),
            "https://mesh.example.com/api/meshobjects/meshbuildingblocks/abc"
        );
    }
}
