//! Reply text for chat commands.

use crate::model::{
    status::PlayerRoster,
    whitelist_entry::{WhitelistEntry, WhitelistReply},
};

pub fn whitelist_reply(player: &str, reply: &WhitelistReply) -> String {
    match reply {
        WhitelistReply::Added { confirmed: true } => {
            format!("✅ **{}** is now whitelisted.", player)
        }
        WhitelistReply::Added { confirmed: false } => format!(
            "✅ Sent the whitelist command for **{}**; the server did not confirm it yet.",
            player
        ),
        WhitelistReply::Removed => format!("✅ **{}** was removed from the whitelist.", player),
        WhitelistReply::AlreadyRecorded { by } => {
            format!("**{}** was already whitelisted by {}.", player, by)
        }
        WhitelistReply::NotOwner { by } => format!(
            "❌ **{}** was whitelisted by {}; only they can remove it.",
            player, by
        ),
        WhitelistReply::NotRecorded => {
            format!("❌ **{}** was not whitelisted through this bot.", player)
        }
        WhitelistReply::Failed(failure) => format!("❌ {}.", failure),
    }
}

/// Lists the member's names, flagging those missing from the server's whitelist file
/// when it could be read.
pub fn entries_reply(entries: &[WhitelistEntry], server: Option<&[String]>) -> String {
    if entries.is_empty() {
        return "You have not whitelisted anyone yet.".to_string();
    }

    let names: Vec<String> = entries
        .iter()
        .map(|entry| {
            let on_server = server.map_or(true, |names| {
                names
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&entry.player_name))
            });
            if on_server {
                entry.player_name.clone()
            } else {
                format!("{} (not on the server whitelist)", entry.player_name)
            }
        })
        .collect();

    format!("You whitelisted: {}", names.join(", "))
}

pub fn players_reply(roster: &PlayerRoster) -> String {
    if roster.players.is_empty() {
        return format!("Nobody is online ({}/{}).", roster.online, roster.max);
    }

    format!(
        "{}/{} online: {}",
        roster.online,
        roster.max,
        roster.players.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::outcome::ActionFailure;

    #[test]
    fn describes_whitelist_replies() {
        assert_eq!(
            whitelist_reply("Steve", &WhitelistReply::Added { confirmed: true }),
            "✅ **Steve** is now whitelisted."
        );
        assert_eq!(
            whitelist_reply(
                "Steve",
                &WhitelistReply::NotOwner {
                    by: "alex".to_string()
                }
            ),
            "❌ **Steve** was whitelisted by alex; only they can remove it."
        );
        assert_eq!(
            whitelist_reply("Steve", &WhitelistReply::Failed(ActionFailure::ServerOffline)),
            "❌ The server is offline."
        );
    }

    #[test]
    fn lists_entries() {
        assert_eq!(entries_reply(&[], None), "You have not whitelisted anyone yet.");

        let entry = |name: &str| WhitelistEntry {
            id: 1,
            player_name: name.to_string(),
            discord_id: 1,
            discord_name: "member".to_string(),
            created_at: Utc::now(),
        };
        let entries = [entry("Alice"), entry("Bob")];
        assert_eq!(entries_reply(&entries, None), "You whitelisted: Alice, Bob");

        let server = vec!["alice".to_string()];
        assert_eq!(
            entries_reply(&entries, Some(server.as_slice())),
            "You whitelisted: Alice, Bob (not on the server whitelist)"
        );
    }

    #[test]
    fn lists_players() {
        assert_eq!(
            players_reply(&PlayerRoster {
                online: 0,
                max: 20,
                players: vec![]
            }),
            "Nobody is online (0/20)."
        );
        assert_eq!(
            players_reply(&PlayerRoster {
                online: 2,
                max: 20,
                players: vec!["Alice".to_string(), "Bob".to_string()]
            }),
            "2/20 online: Alice, Bob"
        );
    }
}
