//! In-memory stand-ins for the panel, the console stream and the status channel.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;
use reqwest::StatusCode;

use crate::{
    error::{panel::PanelError, AppError},
    model::panel::{ConsoleCredentials, ResourceSnapshot, ServerState},
    service::{
        console::{
            waiter::{Waiter, WaiterRegistry},
            Console,
        },
        panel::PanelApi,
        status::{render::StatusRender, StatusSink},
    },
};

/// Console whose server answers commands from a reply table.
pub struct FakeConsole {
    pub waiters: WaiterRegistry,
    connected: AtomicBool,
    connects_succeed: bool,
    pub connect_calls: AtomicUsize,
    replies: Mutex<HashMap<String, String>>,
    pub sent: Mutex<Vec<String>>,
}

impl FakeConsole {
    /// A console that is already authenticated.
    pub fn connected() -> Self {
        Self::new(true, true)
    }

    /// A console that never manages to authenticate.
    pub fn unreachable() -> Self {
        Self::new(false, false)
    }

    /// A console that authenticates on the first `connect()`.
    pub fn disconnected() -> Self {
        Self::new(false, true)
    }

    fn new(connected: bool, connects_succeed: bool) -> Self {
        Self {
            waiters: WaiterRegistry::new(),
            connected: AtomicBool::new(connected),
            connects_succeed,
            connect_calls: AtomicUsize::new(0),
            replies: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Prints `line` to the console whenever `command` is sent.
    pub fn reply(self, command: &str, line: &str) -> Self {
        self.replies
            .lock()
            .insert(command.to_string(), line.to_string());
        self
    }
}

#[async_trait]
impl Console for FakeConsole {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.connects_succeed {
            self.connected.store(true, Ordering::SeqCst);
        }
    }

    async fn wait_until_connected(&self, timeout: Duration) -> bool {
        if !self.is_connected() {
            tokio::time::sleep(timeout).await;
        }
        self.is_connected()
    }

    fn send_command(&self, command: &str) {
        if !self.is_connected() {
            return;
        }

        self.sent.lock().push(command.to_string());
        let reply = self.replies.lock().get(command).cloned();
        if let Some(line) = reply {
            self.waiters.dispatch(&line);
        }
    }

    fn wait_for_message(&self, pattern: Regex, timeout: Duration) -> Waiter {
        self.waiters.register(pattern, timeout)
    }
}

/// Panel with canned resources and a scripted command endpoint.
pub struct FakePanel {
    pub resources: Mutex<Result<ResourceSnapshot, StatusCode>>,
    pub command_status: StatusCode,
    pub commands: Mutex<Vec<String>>,
    pub files: Mutex<HashMap<String, String>>,
}

impl FakePanel {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(Ok(snapshot(ServerState::Running))),
            command_status: StatusCode::NO_CONTENT,
            commands: Mutex::new(Vec::new()),
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn command_status(mut self, status: StatusCode) -> Self {
        self.command_status = status;
        self
    }

    pub fn with_state(self, state: ServerState) -> Self {
        *self.resources.lock() = Ok(snapshot(state));
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files
            .lock()
            .insert(path.to_string(), contents.to_string());
        self
    }
}

#[async_trait]
impl PanelApi for FakePanel {
    async fn websocket_credentials(&self) -> Result<ConsoleCredentials, PanelError> {
        Err(PanelError::NotFound)
    }

    async fn send_command(&self, command: &str) -> Result<(), PanelError> {
        self.commands.lock().push(command.to_string());
        if self.command_status == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(PanelError::from_status(self.command_status))
        }
    }

    async fn resources(&self) -> Result<ResourceSnapshot, PanelError> {
        self.resources
            .lock()
            .clone()
            .map_err(PanelError::from_status)
    }

    async fn read_file(&self, path: &str) -> Result<String, PanelError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or(PanelError::NotFound)
    }
}

pub fn snapshot(state: ServerState) -> ResourceSnapshot {
    ResourceSnapshot {
        state,
        memory_bytes: 512 * 1024 * 1024,
        memory_limit_bytes: 2048 * 1024 * 1024,
        cpu_absolute: 37.5,
        disk_bytes: 1024,
        network_rx_bytes: 10,
        network_tx_bytes: 20,
        uptime_ms: 3_723_000,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Create(u64),
    Edit(u64),
}

/// Status channel that records every create and edit.
pub struct FakeSink {
    next_id: AtomicUsize,
    pub calls: Mutex<Vec<SinkCall>>,
    pub rendered: Mutex<Vec<StatusRender>>,
    /// Message ids whose edits fail, as if the message had been deleted.
    pub deleted: Mutex<Vec<u64>>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(100),
            calls: Mutex::new(Vec::new()),
            rendered: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StatusSink for FakeSink {
    async fn create(&self, render: &StatusRender) -> Result<u64, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64;
        self.calls.lock().push(SinkCall::Create(id));
        self.rendered.lock().push(render.clone());
        Ok(id)
    }

    async fn edit(&self, message_id: u64, render: &StatusRender) -> Result<(), AppError> {
        self.calls.lock().push(SinkCall::Edit(message_id));
        if self.deleted.lock().contains(&message_id) {
            return Err(AppError::InternalError("Unknown Message".to_string()));
        }
        self.rendered.lock().push(render.clone());
        Ok(())
    }
}
