//! Status snapshot rendered by the poller.

use crate::model::panel::ResourceSnapshot;

/// Players currently online.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerRoster {
    pub online: u32,
    pub max: u32,
    pub players: Vec<String>,
}

/// Everything one status rendering needs. Rebuilt from scratch on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub resources: ResourceSnapshot,
    /// `None` when the server is not running or no roster source answered
    pub roster: Option<PlayerRoster>,
}
