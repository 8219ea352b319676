//! Console command orchestration.
//!
//! Each action registers a waiter for the console lines that can answer it, sends the
//! command over the console stream and classifies whichever line arrives first. Adding a
//! player falls back to the panel's HTTP command endpoint when the stream cannot confirm;
//! removing a player and listing players never do.

use std::{sync::Arc, time::Duration};

use dioxus_logger::tracing;
use regex::{Regex, RegexBuilder};

use crate::{
    error::{console::ConsoleError, panel::PanelError},
    model::{
        outcome::{ActionFailure, ActionOutcome},
        status::PlayerRoster,
    },
    service::{console::Console, panel::PanelApi},
};

/// How long each step may wait for the console.
#[derive(Debug, Clone, Copy)]
pub struct CommandTimeouts {
    pub whitelist: Duration,
    pub list: Duration,
    pub connect: Duration,
}

impl Default for CommandTimeouts {
    fn default() -> Self {
        Self {
            whitelist: Duration::from_secs(10),
            list: Duration::from_secs(5),
            connect: Duration::from_secs(5),
        }
    }
}

const PLAYER_NOT_FOUND: &str = r"(that player|player) does not exist";
const PLAYER_LIST: &str =
    r"There are (\d+) (?:of a max(?: of)?|out of maximum) (\d+) players online\.?:?\s*(.*)";

/// A console line pattern and what it means for the action.
struct Response {
    pattern: Regex,
    failure: Option<ActionFailure>,
}

impl Response {
    fn new(source: &str, failure: Option<ActionFailure>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: RegexBuilder::new(source).case_insensitive(true).build()?,
            failure,
        })
    }
}

/// The set of lines that can answer one action, in priority order.
struct Responses(Vec<Response>);

impl Responses {
    fn whitelist_add(player: &str) -> Result<Self, regex::Error> {
        let player = regex::escape(player);
        Ok(Self(vec![
            Response::new(&format!(r"added {} to the whitelist", player), None)?,
            Response::new(
                r"already whitelisted",
                Some(ActionFailure::AlreadyWhitelisted),
            )?,
            Response::new(PLAYER_NOT_FOUND, Some(ActionFailure::PlayerNotFound))?,
        ]))
    }

    fn whitelist_remove(player: &str) -> Result<Self, regex::Error> {
        let player = regex::escape(player);
        Ok(Self(vec![
            Response::new(&format!(r"removed {} from the whitelist", player), None)?,
            Response::new(r"not whitelisted", Some(ActionFailure::NotWhitelisted))?,
            Response::new(PLAYER_NOT_FOUND, Some(ActionFailure::PlayerNotFound))?,
        ]))
    }

    /// One pattern matching any of the responses, for the waiter.
    fn combined(&self) -> Result<Regex, regex::Error> {
        let alternatives: Vec<String> = self
            .0
            .iter()
            .map(|response| format!("(?:{})", response.pattern.as_str()))
            .collect();

        RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
    }

    fn classify(&self, line: String) -> ActionOutcome {
        match self.0.iter().find(|response| response.pattern.is_match(&line)) {
            Some(Response { failure: None, .. }) => ActionOutcome::confirmed(line),
            Some(Response {
                failure: Some(failure),
                ..
            }) => ActionOutcome::rejected(failure.clone(), Some(line)),
            None => ActionOutcome::rejected(ActionFailure::Unexpected(line.clone()), Some(line)),
        }
    }
}

/// Runs console commands and turns their output into structured results.
pub struct CommandService {
    console: Arc<dyn Console>,
    panel: Arc<dyn PanelApi>,
    timeouts: CommandTimeouts,
}

impl CommandService {
    pub fn new(console: Arc<dyn Console>, panel: Arc<dyn PanelApi>) -> Self {
        Self {
            console,
            panel,
            timeouts: CommandTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: CommandTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Adds a player to the game server's whitelist.
    ///
    /// Falls back to a single unconfirmed HTTP command when the console stream is
    /// unavailable or stays silent.
    pub async fn whitelist_add(&self, player: &str) -> ActionOutcome {
        let command = format!("whitelist add {}", player);
        let responses = match Responses::whitelist_add(player) {
            Ok(responses) => responses,
            Err(err) => return unexpected(err),
        };

        match self.run(&command, &responses, self.timeouts.whitelist).await {
            Ok(line) => responses.classify(line),
            Err(err) => {
                tracing::warn!(
                    "Console did not confirm `{}` ({}), sending it over HTTP",
                    command,
                    err
                );
                self.fallback(&command).await
            }
        }
    }

    /// Removes a player from the game server's whitelist.
    pub async fn whitelist_remove(&self, player: &str) -> ActionOutcome {
        let command = format!("whitelist remove {}", player);
        let responses = match Responses::whitelist_remove(player) {
            Ok(responses) => responses,
            Err(err) => return unexpected(err),
        };

        match self.run(&command, &responses, self.timeouts.whitelist).await {
            Ok(line) => responses.classify(line),
            Err(err) => {
                tracing::warn!("Console did not confirm `{}`: {}", command, err);
                ActionOutcome::rejected(console_failure(err), None)
            }
        }
    }

    /// Asks the server who is online.
    ///
    /// # Returns
    /// - `Ok(PlayerRoster)`: Parsed from the `list` response line
    /// - `Err(ConsoleError)`: Stream unavailable or no response in time
    pub async fn list_players(&self) -> Result<PlayerRoster, ConsoleError> {
        let pattern = Regex::new(PLAYER_LIST).map_err(|err| {
            tracing::error!("Invalid player list pattern: {}", err);
            ConsoleError::Closed
        })?;

        self.ensure_connected().await?;
        let waiter = self.console.wait_for_message(pattern, self.timeouts.list);
        self.console.send_command("list");
        let line = waiter.wait().await?;

        parse_player_list(&line).ok_or(ConsoleError::UnexpectedOutput(line))
    }

    /// Connects if needed, registers the waiter, then sends the command.
    async fn run(
        &self,
        command: &str,
        responses: &Responses,
        timeout: Duration,
    ) -> Result<String, ConsoleError> {
        let pattern = responses.combined().map_err(|err| {
            tracing::error!("Invalid response pattern for `{}`: {}", command, err);
            ConsoleError::Closed
        })?;

        self.ensure_connected().await?;
        let waiter = self.console.wait_for_message(pattern, timeout);
        self.console.send_command(command);

        waiter.wait().await
    }

    async fn ensure_connected(&self) -> Result<(), ConsoleError> {
        if self.console.is_connected() {
            return Ok(());
        }

        self.console.connect().await;
        if self.console.wait_until_connected(self.timeouts.connect).await {
            Ok(())
        } else {
            Err(ConsoleError::NotConnected)
        }
    }

    async fn fallback(&self, command: &str) -> ActionOutcome {
        let result = self.panel.send_command(command).await.map_err(|err| {
            tracing::warn!("HTTP command `{}` failed: {}", command, err);
            match err {
                PanelError::AccessDenied => ActionFailure::AccessDenied,
                PanelError::ServerOffline => ActionFailure::ServerOffline,
                other => ActionFailure::Network(other.to_string()),
            }
        });

        ActionOutcome::via_fallback(result)
    }
}

fn console_failure(err: ConsoleError) -> ActionFailure {
    match err {
        ConsoleError::Timeout { .. } => ActionFailure::Timeout,
        other => ActionFailure::Network(other.to_string()),
    }
}

fn unexpected(err: regex::Error) -> ActionOutcome {
    tracing::error!("Invalid response pattern: {}", err);
    ActionOutcome::rejected(ActionFailure::Unexpected(err.to_string()), None)
}

/// Parses the response to `list`.
///
/// Accepts both `There are 2 of a max of 20 players online: Alice, Bob` and
/// `There are 0 out of maximum 20 players online.`
pub fn parse_player_list(line: &str) -> Option<PlayerRoster> {
    let pattern = Regex::new(PLAYER_LIST).ok()?;
    let captures = pattern.captures(line)?;

    let online = captures.get(1)?.as_str().parse().ok()?;
    let max = captures.get(2)?.as_str().parse().ok()?;
    let players = captures
        .get(3)
        .map(|names| {
            names
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(PlayerRoster {
        online,
        max,
        players,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use reqwest::StatusCode;

    use super::*;
    use crate::{
        model::outcome::Delivery,
        service::fake::{FakeConsole, FakePanel},
    };

    fn service(console: &Arc<FakeConsole>, panel: &Arc<FakePanel>) -> CommandService {
        CommandService::new(console.clone(), panel.clone())
    }

    /// Tests a whitelist add confirmed by the console.
    ///
    /// Expected: success carrying the matched line, no HTTP command
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_confirmed() {
        let line = "[12:00:00 INFO]: Added Steve to the whitelist";
        let console = Arc::new(FakeConsole::connected().reply("whitelist add Steve", line));
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("Steve").await;

        assert_eq!(outcome, ActionOutcome::confirmed(line.to_string()));
        assert_eq!(*console.sent.lock(), vec!["whitelist add Steve"]);
        assert!(panel.commands.lock().is_empty());
        assert!(console.waiters.is_empty());
    }

    /// Tests that the player name is matched case-insensitively.
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_ignores_name_case() {
        let console = Arc::new(
            FakeConsole::connected().reply("whitelist add steve", "Added Steve to the whitelist"),
        );
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("steve").await;

        assert!(outcome.success);
    }

    /// Tests a whitelist add rejected because the player is already listed.
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_already_whitelisted() {
        let console = Arc::new(
            FakeConsole::connected()
                .reply("whitelist add Steve", "That player is already whitelisted"),
        );
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("Steve").await;

        assert!(!outcome.success);
        assert_eq!(outcome.failure, Some(ActionFailure::AlreadyWhitelisted));
        assert_eq!(
            outcome.matched.as_deref(),
            Some("That player is already whitelisted")
        );
        assert!(panel.commands.lock().is_empty());
    }

    /// Tests a whitelist add for an unknown account.
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_unknown_player() {
        let console = Arc::new(
            FakeConsole::connected().reply("whitelist add Nobody", "That player does not exist"),
        );
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("Nobody").await;

        assert_eq!(outcome.failure, Some(ActionFailure::PlayerNotFound));
    }

    /// Tests that a silent console triggers exactly one HTTP fallback.
    ///
    /// Expected: success via fallback, one HTTP command, registry empty
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_times_out_then_falls_back() {
        let console = Arc::new(FakeConsole::connected());
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("Steve").await;

        assert!(outcome.success);
        assert_eq!(outcome.delivery, Delivery::Fallback);
        assert_eq!(*panel.commands.lock(), vec!["whitelist add Steve"]);
        assert!(console.waiters.is_empty());
    }

    /// Tests the fallback when the console cannot be reached at all.
    ///
    /// Expected: a connect attempt, nothing sent on the stream, one HTTP command
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_falls_back_when_unreachable() {
        let console = Arc::new(FakeConsole::unreachable());
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("Steve").await;

        assert_eq!(console.connect_calls.load(Ordering::SeqCst), 1);
        assert!(console.sent.lock().is_empty());
        assert_eq!(outcome.delivery, Delivery::Fallback);
        assert_eq!(panel.commands.lock().len(), 1);
    }

    /// Tests that fallback statuses map to their failures.
    #[tokio::test(start_paused = true)]
    async fn whitelist_add_fallback_failures() {
        let cases = [
            (StatusCode::FORBIDDEN, ActionFailure::AccessDenied),
            (StatusCode::BAD_GATEWAY, ActionFailure::ServerOffline),
        ];

        for (status, expected) in cases {
            let console = Arc::new(FakeConsole::unreachable());
            let panel = Arc::new(FakePanel::new().command_status(status));

            let outcome = service(&console, &panel).whitelist_add("Steve").await;

            assert!(!outcome.success);
            assert_eq!(outcome.failure, Some(expected));
            assert_eq!(panel.commands.lock().len(), 1);
        }

        let console = Arc::new(FakeConsole::unreachable());
        let panel = Arc::new(FakePanel::new().command_status(StatusCode::INTERNAL_SERVER_ERROR));
        let outcome = service(&console, &panel).whitelist_add("Steve").await;
        assert!(matches!(outcome.failure, Some(ActionFailure::Network(_))));
    }

    /// Tests connecting a disconnected console before sending.
    #[tokio::test(start_paused = true)]
    async fn connects_before_sending() {
        let console = Arc::new(
            FakeConsole::disconnected()
                .reply("whitelist add Steve", "Added Steve to the whitelist"),
        );
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_add("Steve").await;

        assert!(outcome.success);
        assert_eq!(console.connect_calls.load(Ordering::SeqCst), 1);
    }

    /// Tests a confirmed whitelist removal.
    #[tokio::test(start_paused = true)]
    async fn whitelist_remove_confirmed() {
        let console = Arc::new(
            FakeConsole::connected()
                .reply("whitelist remove Steve", "Removed Steve from the whitelist"),
        );
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_remove("Steve").await;

        assert!(outcome.success);
        assert_eq!(outcome.delivery, Delivery::Console);
    }

    /// Tests removing a player that is not on the whitelist.
    #[tokio::test(start_paused = true)]
    async fn whitelist_remove_not_whitelisted() {
        let console = Arc::new(
            FakeConsole::connected().reply("whitelist remove Steve", "Player is not whitelisted"),
        );
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_remove("Steve").await;

        assert_eq!(outcome.failure, Some(ActionFailure::NotWhitelisted));
    }

    /// Tests that a silent console fails a removal without any fallback.
    ///
    /// Expected: Timeout failure, zero HTTP commands
    #[tokio::test(start_paused = true)]
    async fn whitelist_remove_timeout_has_no_fallback() {
        let console = Arc::new(FakeConsole::connected());
        let panel = Arc::new(FakePanel::new());

        let outcome = service(&console, &panel).whitelist_remove("Steve").await;

        assert!(!outcome.success);
        assert_eq!(outcome.failure, Some(ActionFailure::Timeout));
        assert!(panel.commands.lock().is_empty());
    }

    /// Tests listing players through the console.
    #[tokio::test(start_paused = true)]
    async fn list_players_parses_response() {
        let console = Arc::new(FakeConsole::connected().reply(
            "list",
            "[12:00:00 INFO]: There are 2 of a max of 20 players online: Alice, Bob",
        ));
        let panel = Arc::new(FakePanel::new());

        let roster = service(&console, &panel).list_players().await.unwrap();

        assert_eq!(
            roster,
            PlayerRoster {
                online: 2,
                max: 20,
                players: vec!["Alice".to_string(), "Bob".to_string()],
            }
        );
    }

    /// Tests that a silent console is reported as an error, not an empty roster.
    #[tokio::test(start_paused = true)]
    async fn list_players_timeout_is_error() {
        let console = Arc::new(FakeConsole::connected());
        let panel = Arc::new(FakePanel::new());

        let result = service(&console, &panel).list_players().await;

        assert_eq!(
            result,
            Err(ConsoleError::Timeout {
                timeout: Duration::from_secs(5)
            })
        );
    }

    #[test]
    fn parses_empty_player_list() {
        let roster = parse_player_list("There are 0 of a max of 20 players online:").unwrap();

        assert_eq!(roster.online, 0);
        assert_eq!(roster.max, 20);
        assert!(roster.players.is_empty());
    }

    #[test]
    fn parses_alternate_list_formats() {
        let roster = parse_player_list("There are 1 of a max 10 players online: Steve").unwrap();
        assert_eq!(roster.players, vec!["Steve"]);

        let roster = parse_player_list("There are 0 out of maximum 20 players online.").unwrap();
        assert_eq!((roster.online, roster.max), (0, 20));
        assert!(roster.players.is_empty());

        assert!(parse_player_list("Unknown command").is_none());
    }
}
