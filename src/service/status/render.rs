//! Formatting of status snapshots into a message layout.

use crate::model::{
    panel::ServerState,
    status::{PlayerRoster, StatusSnapshot},
};

/// Most player names listed before the rest are summarised.
const MAX_LISTED_PLAYERS: usize = 15;
const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral layout of the status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRender {
    pub title: String,
    pub color: u32,
    pub fields: Vec<StatusField>,
}

impl StatusRender {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

/// Builds the message layout for one snapshot.
pub fn render(snapshot: &StatusSnapshot) -> StatusRender {
    let resources = &snapshot.resources;
    let (emoji, label, color) = state_style(resources.state);

    let players = snapshot
        .roster
        .as_ref()
        .map(format_players)
        .unwrap_or_else(|| "N/A".to_string());

    let field = |name: &str, value: String, inline: bool| StatusField {
        name: name.to_string(),
        value,
        inline,
    };

    StatusRender {
        title: format!("{} Server {}", emoji, label),
        color,
        fields: vec![
            field(
                "Memory",
                format_memory(resources.memory_bytes, resources.memory_limit_bytes),
                true,
            ),
            field("CPU", format_cpu(resources.cpu_absolute), true),
            field("Uptime", format_uptime(resources.uptime_ms), true),
            field("Disk", format!("{} MB", resources.disk_bytes / MIB), true),
            field(
                "Network",
                format!(
                    "↓ {} MB ↑ {} MB",
                    resources.network_rx_bytes / MIB,
                    resources.network_tx_bytes / MIB
                ),
                true,
            ),
            field("Players", players, false),
        ],
    }
}

/// Emoji, label and embed color per power state.
fn state_style(state: ServerState) -> (&'static str, &'static str, u32) {
    match state {
        ServerState::Running => ("🟢", "Online", 0x2ECC71),
        ServerState::Starting => ("🟡", "Starting", 0xF1C40F),
        ServerState::Stopping => ("🟠", "Stopping", 0xE67E22),
        ServerState::Offline => ("🔴", "Offline", 0xE74C3C),
    }
}

/// `used MB / limit MB (pct%)`, or `used MB / Unlimited` without a limit.
pub fn format_memory(used_bytes: u64, limit_bytes: u64) -> String {
    let used = used_bytes / MIB;
    if limit_bytes == 0 {
        return format!("{} MB / Unlimited", used);
    }

    let percent = used_bytes as f64 / limit_bytes as f64 * 100.0;
    format!("{} MB / {} MB ({:.1}%)", used, limit_bytes / MIB, percent)
}

pub fn format_cpu(cpu_absolute: f64) -> String {
    format!("{:.1}%", cpu_absolute)
}

/// Formats uptime as its largest nonzero unit and the unit below it.
///
/// `3_723_000` ms is `1h 2m`; anything under a second is `0s`.
pub fn format_uptime(uptime_ms: u64) -> String {
    let total = uptime_ms / 1000;
    let units = [
        (total / 86_400, "d"),
        (total % 86_400 / 3_600, "h"),
        (total % 3_600 / 60, "m"),
        (total % 60, "s"),
    ];

    match units.iter().position(|(value, _)| *value > 0) {
        Some(first) => units[first..]
            .iter()
            .take(2)
            .map(|(value, unit)| format!("{}{}", value, unit))
            .collect::<Vec<_>>()
            .join(" "),
        None => "0s".to_string(),
    }
}

/// `online/max` followed by up to fifteen names.
pub fn format_players(roster: &PlayerRoster) -> String {
    let count = format!("{}/{}", roster.online, roster.max);
    if roster.players.is_empty() {
        return count;
    }

    let mut names = roster
        .players
        .iter()
        .take(MAX_LISTED_PLAYERS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let hidden = roster.players.len().saturating_sub(MAX_LISTED_PLAYERS);
    if hidden > 0 {
        names.push_str(&format!(" +{} more", hidden));
    }

    format!("{}\n{}", count, names)
}
