//! Game panel HTTP API payloads.

use serde::Deserialize;

/// Power state of the game server as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    Running,
    Starting,
    Stopping,
    #[serde(other)]
    Offline,
}

/// Short-lived credentials for the console websocket.
///
/// Valid for roughly ten minutes; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleCredentials {
    pub token: String,
    /// `wss://` URI of the console endpoint
    pub socket: String,
}

#[derive(Debug, Deserialize)]
pub struct WebsocketResponse {
    pub data: ConsoleCredentials,
}

#[derive(Debug, Deserialize)]
pub struct ResourcesResponse {
    pub attributes: ResourcesAttributes,
}

#[derive(Debug, Deserialize)]
pub struct ResourcesAttributes {
    pub current_state: ServerState,
    pub resources: ResourceUsage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceUsage {
    pub memory_bytes: u64,
    pub cpu_absolute: f64,
    pub disk_bytes: u64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    /// Milliseconds since the server process started
    pub uptime: u64,
}

#[derive(Debug, Deserialize)]
pub struct ServerDetailsResponse {
    pub attributes: ServerDetails,
}

#[derive(Debug, Deserialize)]
pub struct ServerDetails {
    pub limits: ServerLimits,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerLimits {
    /// Memory limit in MiB, 0 when unlimited
    pub memory: u64,
}

/// An entry of the game server's `whitelist.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistFileEntry {
    pub name: String,
}

/// Resource usage and power state at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot {
    pub state: ServerState,
    pub memory_bytes: u64,
    /// 0 when the server has no memory limit
    pub memory_limit_bytes: u64,
    pub cpu_absolute: f64,
    pub disk_bytes: u64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    pub uptime_ms: u64,
}

impl ResourceSnapshot {
    /// Merges the resources endpoint with the memory limit from the server details.
    pub fn from_parts(resources: ResourcesAttributes, limits: ServerLimits) -> Self {
        let usage = resources.resources;
        Self {
            state: resources.current_state,
            memory_bytes: usage.memory_bytes,
            memory_limit_bytes: limits.memory * 1024 * 1024,
            cpu_absolute: usage.cpu_absolute,
            disk_bytes: usage.disk_bytes,
            network_rx_bytes: usage.network_rx_bytes,
            network_tx_bytes: usage.network_tx_bytes,
            uptime_ms: usage.uptime,
        }
    }
}
