//! Game panel HTTP client.
//!
//! Plain request/response access to the panel's client API: console credentials, the
//! non-streaming command endpoint, resource usage and file contents. Every call is bounded
//! by the client-wide timeout configured in `startup::setup_reqwest_client`, and non-success
//! statuses are classified into `PanelError` rather than surfaced as transport errors.

use async_trait::async_trait;
use dioxus_logger::tracing;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    error::panel::PanelError,
    model::panel::{
        ConsoleCredentials, ResourceSnapshot, ResourcesResponse, ServerDetailsResponse,
        WebsocketResponse,
    },
};

/// Panel operations the rest of the bot depends on.
#[async_trait]
pub trait PanelApi: Send + Sync {
    /// Issues a fresh console token and the websocket URI to use it with.
    async fn websocket_credentials(&self) -> Result<ConsoleCredentials, PanelError>;

    /// Sends a console command without waiting for any output. Succeeds on 204.
    async fn send_command(&self, command: &str) -> Result<(), PanelError>;

    /// Current power state and resource usage, including the memory limit.
    async fn resources(&self) -> Result<ResourceSnapshot, PanelError>;

    /// Reads a text file from the server's file system.
    async fn read_file(&self, path: &str) -> Result<String, PanelError>;
}

#[derive(Serialize)]
struct CommandBody<'a> {
    command: &'a str,
}

/// reqwest-backed `PanelApi` for a single server.
pub struct PanelClient {
    http: reqwest::Client,
    server_url: String,
}

impl PanelClient {
    /// Creates a client for one server.
    ///
    /// # Arguments
    /// - `http` - Client carrying the bearer token and timeout
    /// - `panel_url` - Base URL of the panel, without trailing slash
    /// - `server_id` - Panel server identifier
    pub fn new(http: reqwest::Client, panel_url: &str, server_id: &str) -> Self {
        Self {
            http,
            server_url: format!("{}/api/client/servers/{}", panel_url, server_id),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, PanelError> {
        let response = self.http.get(self.url(path)).send().await.map_err(classify)?;
        let response = ensure_success(response)?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PanelApi for PanelClient {
    async fn websocket_credentials(&self) -> Result<ConsoleCredentials, PanelError> {
        let body: WebsocketResponse = self.get_json("/websocket").await?;
        Ok(body.data)
    }

    async fn send_command(&self, command: &str) -> Result<(), PanelError> {
        let response = self
            .http
            .post(self.url("/command"))
            .json(&CommandBody { command })
            .send()
            .await
            .map_err(classify)?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                tracing::debug!("Sent console command over HTTP: {}", command);
                Ok(())
            }
            status => Err(PanelError::from_status(status)),
        }
    }

    async fn resources(&self) -> Result<ResourceSnapshot, PanelError> {
        let resources: ResourcesResponse = self.get_json("/resources").await?;
        let details: ServerDetailsResponse = self.get_json("").await?;

        Ok(ResourceSnapshot::from_parts(
            resources.attributes,
            details.attributes.limits,
        ))
    }

    async fn read_file(&self, path: &str) -> Result<String, PanelError> {
        let response = self
            .http
            .get(self.url("/files/contents"))
            .query(&[("file", path)])
            .send()
            .await
            .map_err(classify)?;
        let response = ensure_success(response)?;

        Ok(response.text().await?)
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PanelError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PanelError::from_status(status))
    }
}

fn classify(err: reqwest::Error) -> PanelError {
    if err.is_timeout() {
        PanelError::Timeout
    } else {
        PanelError::Request(err)
    }
}
