//! Authenticated console websocket session.
//!
//! `ConsoleSession` owns the single live connection to the panel's console endpoint. A
//! connection cycle is: fetch credentials over HTTP, open the websocket, send an `auth`
//! frame, and wait for `auth success`. From then on the session re-authenticates on a timer
//! ahead of token expiry (or immediately on `token expiring`) without dropping the socket,
//! and forwards every `console output` line to the waiter registry.
//!
//! Any failure (credential fetch, socket open, socket error or close, `token expired`,
//! failed refresh) tears the connection down and schedules a fresh cycle after a fixed
//! delay. Retries are unbounded; only `disconnect()` stops them.
//!
//! `connect()` joins a cycle that is already live instead of replacing it, so concurrent
//! callers share one socket. Only a cycle stuck before authentication for longer than its
//! request bounds allow is replaced.
//!
//! Each connection cycle carries a generation number. Tasks belonging to an older
//! generation (a socket task still draining, a refresh that lost a race) check it before
//! touching shared state, so a replaced connection can never schedule work for the new one.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use dioxus_logger::tracing;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use regex::Regex;
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tokio_tungstenite::{
    tungstenite::{
        self,
        client::IntoClientRequest,
        handshake::client::Request,
        http::{header::ORIGIN, HeaderValue},
        Message,
    },
    MaybeTlsStream, WebSocketStream,
};

use crate::{
    model::console::{ConsoleEvent, ConsoleFrame},
    service::{
        console::{
            waiter::{Waiter, WaiterRegistry},
            Console,
        },
        panel::PanelApi,
    },
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Delay before a new connection cycle after any failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);
/// Tokens are valid for about ten minutes; refresh with two minutes to spare.
const TOKEN_REFRESH_AFTER: Duration = Duration::from_secs(8 * 60);
/// Bound on the credential request and on the websocket handshake.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timing and handshake settings for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sent as the `Origin` header; the panel daemon rejects sockets from other origins.
    pub origin: String,
    pub reconnect_delay: Duration,
    pub refresh_after: Duration,
    pub request_timeout: Duration,
}

impl SessionConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            reconnect_delay: RECONNECT_DELAY,
            refresh_after: TOKEN_REFRESH_AFTER,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Slot for one kind of scheduled task.
///
/// Arming aborts whatever was armed before, so there is never more than one live task per
/// slot. A task that fires calls `release` with the sequence number it was armed with; a
/// stale task (one that was replaced while waking up) gets `false` and must do nothing.
#[derive(Default)]
struct TimerSlot {
    seq: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    fn arm(&mut self, spawn: impl FnOnce(u64) -> JoinHandle<()>) {
        self.cancel();
        self.seq += 1;
        self.handle = Some(spawn(self.seq));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn release(&mut self, seq: u64) -> bool {
        if self.seq == seq && self.handle.is_some() {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

#[derive(Default)]
struct SessionState {
    /// Incremented every time the current connection is torn down.
    generation: u64,
    /// Writer half of the live socket; `None` when there is no socket.
    outbound: Option<mpsc::UnboundedSender<Message>>,
    reconnect: TimerSlot,
    refresh: TimerSlot,
    /// Set by `disconnect()`, cleared by `connect()`.
    closed: bool,
    /// True from the start of a connection cycle until its teardown.
    cycle_active: bool,
    /// When the live cycle started, while it has not authenticated yet.
    pending_since: Option<Instant>,
}

struct SessionInner {
    panel: Arc<dyn PanelApi>,
    config: SessionConfig,
    waiters: WaiterRegistry,
    state: Mutex<SessionState>,
    /// True only between `auth success` and the next teardown.
    authenticated: watch::Sender<bool>,
}

/// Handle to the console session. Clones share the same connection.
#[derive(Clone)]
pub struct ConsoleSession {
    inner: Arc<SessionInner>,
}

impl ConsoleSession {
    pub fn new(panel: Arc<dyn PanelApi>, config: SessionConfig) -> Self {
        let (authenticated, _) = watch::channel(false);

        Self {
            inner: Arc::new(SessionInner {
                panel,
                config,
                waiters: WaiterRegistry::new(),
                state: Mutex::new(SessionState::default()),
                authenticated,
            }),
        }
    }

    /// Starts a connection cycle.
    ///
    /// Fetches fresh credentials, opens the socket and sends the auth frame. Returns once
    /// the auth frame is queued; authentication completes when the server answers. Failures
    /// are logged and a retry is scheduled, nothing is returned to the caller.
    ///
    /// Returns immediately when a cycle is already authenticated or still on its way there;
    /// callers wait with `wait_until_connected`.
    pub async fn connect(&self) {
        let generation = {
            let mut state = self.inner.state.lock();
            if self.cycle_in_progress(&state) {
                tracing::debug!("Console connection already in progress");
                return;
            }

            state.closed = false;
            state.reconnect.cancel();
            self.teardown(&mut state);
            state.cycle_active = true;
            state.pending_since = Some(Instant::now());
            state.generation
        };

        let credentials = match tokio::time::timeout(
            self.inner.config.request_timeout,
            self.inner.panel.websocket_credentials(),
        )
        .await
        {
            Ok(Ok(credentials)) => credentials,
            Ok(Err(e)) => {
                tracing::warn!("Failed to fetch console credentials: {}", e);
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
            Err(_) => {
                tracing::warn!("Timed out fetching console credentials");
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
        };

        let request = match self.build_request(&credentials.socket) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Invalid console socket target {}: {}", credentials.socket, e);
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
        };

        let stream = match tokio::time::timeout(
            self.inner.config.request_timeout,
            tokio_tungstenite::connect_async(request),
        )
        .await
        {
            Ok(Ok((stream, _))) => stream,
            Ok(Err(e)) => {
                tracing::warn!("Failed to open console socket: {}", e);
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
            Err(_) => {
                tracing::warn!("Timed out opening console socket");
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
        };

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        {
            let mut state = self.inner.state.lock();
            if state.closed || state.generation != generation {
                // disconnect() or another connect() won the race; dropping the stream closes it
                tracing::debug!("Discarding superseded console socket");
                return;
            }
            state.outbound = Some(outbound.clone());
        }

        tokio::spawn(self.clone().run_socket(generation, stream, outbound_rx));

        tracing::info!("Console socket open, authenticating");
        send_frame(&outbound, &ConsoleFrame::auth(credentials.token));
    }

    /// Closes the connection and stops all retries. Safe to call repeatedly.
    ///
    /// Pending waiters are dropped and resolve with `ConsoleError::Closed`.
    pub fn disconnect(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.closed {
                tracing::info!("Disconnecting console session");
            }
            state.closed = true;
            state.reconnect.cancel();
            self.teardown(&mut state);
        }

        self.inner.waiters.clear();
    }

    /// True iff the stream is authenticated and its socket is open.
    pub fn is_connected(&self) -> bool {
        if !*self.inner.authenticated.borrow() {
            return false;
        }

        self.inner
            .state
            .lock()
            .outbound
            .as_ref()
            .is_some_and(|outbound| !outbound.is_closed())
    }

    /// Waits up to `timeout` for the stream to become authenticated.
    pub async fn wait_until_connected(&self, timeout: Duration) -> bool {
        let mut authenticated = self.inner.authenticated.subscribe();
        let reached = tokio::time::timeout(timeout, authenticated.wait_for(|value| *value))
            .await
            .is_ok_and(|result| result.is_ok());

        reached && self.is_connected()
    }

    /// Types `command` into the server console. Logged no-op when not authenticated.
    pub fn send_command(&self, command: &str) {
        if !self.is_connected() {
            tracing::warn!(
                "Dropping console command '{}': stream is not authenticated",
                command
            );
            return;
        }

        let outbound = self.inner.state.lock().outbound.clone();
        if let Some(outbound) = outbound {
            tracing::debug!("Sending console command: {}", command);
            send_frame(&outbound, &ConsoleFrame::command(command));
        }
    }

    /// Registers a waiter for the next console line matching `pattern`.
    pub fn wait_for_message(&self, pattern: Regex, timeout: Duration) -> Waiter {
        self.inner.waiters.register(pattern, timeout)
    }

    /// Number of waiters currently registered.
    pub fn pending_waiters(&self) -> usize {
        self.inner.waiters.len()
    }

    /// True while the current cycle is authenticated, or pending and not yet stalled.
    ///
    /// Credential fetch and socket open are each bounded by the request timeout, and the
    /// auth reply gets one more.
    fn cycle_in_progress(&self, state: &SessionState) -> bool {
        if !state.cycle_active {
            return false;
        }

        match state.pending_since {
            None => true,
            Some(started) => started.elapsed() < self.inner.config.request_timeout * 3,
        }
    }

    fn build_request(&self, socket: &str) -> Result<Request, tungstenite::Error> {
        let mut request = socket.into_client_request()?;
        let origin = HeaderValue::from_str(&self.inner.config.origin)
            .map_err(|e| tungstenite::Error::HttpFormat(e.into()))?;
        request.headers_mut().insert(ORIGIN, origin);

        Ok(request)
    }

    /// Drops the current socket and refresh timer and starts a new generation.
    ///
    /// The socket task notices its writer channel closing, sends a close frame and exits.
    fn teardown(&self, state: &mut SessionState) {
        state.generation += 1;
        state.cycle_active = false;
        state.pending_since = None;
        state.outbound = None;
        state.refresh.cancel();
        self.inner.authenticated.send_replace(false);
    }

    /// Tears down `generation` and arms a new connection cycle after `delay`.
    ///
    /// Ignored when `generation` is no longer current or the session was disconnected.
    fn schedule_reconnect(&self, generation: u64, delay: Duration) {
        let mut state = self.inner.state.lock();
        if state.closed || state.generation != generation {
            return;
        }

        self.teardown(&mut state);
        tracing::info!("Reconnecting console in {:?}", delay);

        let session = self.clone();
        state.reconnect.arm(|seq| {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if !session.inner.state.lock().reconnect.release(seq) {
                    return;
                }
                session.connect().await;
            })
        });
    }

    /// Arms the credential refresh for `generation` after `delay`.
    fn schedule_refresh(&self, generation: u64, delay: Duration) {
        let mut state = self.inner.state.lock();
        if state.generation != generation {
            return;
        }

        let session = self.clone();
        state.refresh.arm(|seq| {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if !session.inner.state.lock().refresh.release(seq) {
                    return;
                }
                session.refresh_token(generation).await;
            })
        });
    }

    /// Re-authenticates the open socket with a freshly issued token.
    ///
    /// Any failure falls back to a full reconnect.
    async fn refresh_token(&self, generation: u64) {
        let credentials = match tokio::time::timeout(
            self.inner.config.request_timeout,
            self.inner.panel.websocket_credentials(),
        )
        .await
        {
            Ok(Ok(credentials)) => credentials,
            Ok(Err(e)) => {
                tracing::warn!("Failed to refresh console token: {}", e);
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
            Err(_) => {
                tracing::warn!("Timed out refreshing console token");
                self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
                return;
            }
        };

        let outbound = {
            let state = self.inner.state.lock();
            if state.generation != generation {
                return;
            }
            state.outbound.clone()
        };

        match outbound {
            Some(outbound) => {
                tracing::debug!("Re-authenticating console stream");
                send_frame(&outbound, &ConsoleFrame::auth(credentials.token));
            }
            None => self.schedule_reconnect(generation, self.inner.config.reconnect_delay),
        }
    }

    /// Pumps one socket: inbound frames in arrival order, outbound frames from the writer
    /// channel. Exits when either side closes.
    async fn run_socket(
        self,
        generation: u64,
        stream: WsStream,
        mut outbound: mpsc::UnboundedReceiver<Message>,
    ) {
        let (mut sink, mut source) = stream.split();

        loop {
            tokio::select! {
                inbound = source.next() => match inbound {
                    Some(Ok(Message::Text(text))) => self.handle_frame(generation, &text),
                    Some(Ok(Message::Close(frame))) => {
                        tracing::warn!("Console socket closed by server: {:?}", frame);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("Console socket error: {}", e);
                        break;
                    }
                    None => {
                        tracing::warn!("Console socket ended");
                        break;
                    }
                },
                message = outbound.recv() => match message {
                    Some(message) => {
                        if let Err(e) = sink.send(message).await {
                            tracing::warn!("Failed to write to console socket: {}", e);
                            break;
                        }
                    }
                    None => {
                        // The session let go of this socket
                        let _ = sink.close().await;
                        return;
                    }
                },
            }
        }

        self.schedule_reconnect(generation, self.inner.config.reconnect_delay);
    }

    fn handle_frame(&self, generation: u64, text: &str) {
        let frame: ConsoleFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Ignoring undecodable console frame: {}", e);
                return;
            }
        };

        match frame.kind() {
            ConsoleEvent::AuthSuccess => self.on_authenticated(generation),
            ConsoleEvent::TokenExpiring => {
                tracing::info!("Console token expiring, refreshing");
                self.schedule_refresh(generation, Duration::ZERO);
            }
            ConsoleEvent::TokenExpired => {
                tracing::warn!("Console token expired, reconnecting");
                self.schedule_reconnect(generation, Duration::ZERO);
            }
            ConsoleEvent::ConsoleOutput(lines) => {
                for line in lines {
                    self.inner.waiters.dispatch(line);
                }
            }
            ConsoleEvent::Status(state) => {
                tracing::debug!("Server power state: {}", state.unwrap_or("unknown"));
            }
            ConsoleEvent::Stats => {}
            ConsoleEvent::Other(event) => {
                tracing::trace!("Ignoring console event '{}'", event);
            }
        }
    }

    fn on_authenticated(&self, generation: u64) {
        {
            let mut state = self.inner.state.lock();
            if state.generation != generation {
                return;
            }
            state.pending_since = None;
        }

        let was_authenticated = self.inner.authenticated.send_replace(true);
        if was_authenticated {
            tracing::debug!("Console stream re-authenticated");
        } else {
            tracing::info!("Console stream authenticated");
        }

        self.schedule_refresh(generation, self.inner.config.refresh_after);
    }
}

fn send_frame(outbound: &mpsc::UnboundedSender<Message>, frame: &ConsoleFrame) {
    match serde_json::to_string(frame) {
        Ok(text) => {
            if outbound.send(Message::Text(text)).is_err() {
                tracing::debug!("Console socket closed before '{}' could be sent", frame.event);
            }
        }
        Err(e) => tracing::error!("Failed to encode console frame: {}", e),
    }
}

#[async_trait]
impl Console for ConsoleSession {
    fn is_connected(&self) -> bool {
        ConsoleSession::is_connected(self)
    }

    async fn connect(&self) {
        ConsoleSession::connect(self).await
    }

    async fn wait_until_connected(&self, timeout: Duration) -> bool {
        ConsoleSession::wait_until_connected(self, timeout).await
    }

    fn send_command(&self, command: &str) {
        ConsoleSession::send_command(self, command)
    }

    fn wait_for_message(&self, pattern: Regex, timeout: Duration) -> Waiter {
        ConsoleSession::wait_for_message(self, pattern, timeout)
    }
}
