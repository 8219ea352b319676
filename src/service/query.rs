//! UDP game query client.
//!
//! Secondary roster source used by the status poller when the console cannot answer
//! `list`. Speaks the full-stat query protocol: a handshake that yields a challenge token,
//! then a full-stat request whose response carries key/value server info followed by the
//! names of online players.

use std::time::Duration;

use async_trait::async_trait;
use dioxus_logger::tracing;
use tokio::net::UdpSocket;

use crate::{error::query::QueryError, model::status::PlayerRoster};

const MAGIC: [u8; 2] = [0xFE, 0xFD];
const TYPE_HANDSHAKE: u8 = 0x09;
const TYPE_STAT: u8 = 0x00;
const SESSION_MASK: i32 = 0x0F0F_0F0F;
const PLAYER_SECTION: &[u8] = b"\x01player_\x00\x00";
const BUFFER_SIZE: usize = 4096;
const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Roster source independent of the console stream.
#[async_trait]
pub trait PlayerQuery: Send + Sync {
    async fn players(&self) -> Result<PlayerRoster, QueryError>;
}

/// Full-stat query client for one `host:port`.
pub struct QueryClient {
    address: String,
    timeout: Duration,
}

impl QueryClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn exchange(&self, socket: &UdpSocket, request: &[u8]) -> Result<Vec<u8>, QueryError> {
        socket.send(request).await?;

        let mut buffer = vec![0u8; BUFFER_SIZE];
        let len = tokio::time::timeout(self.timeout, socket.recv(&mut buffer))
            .await
            .map_err(|_| QueryError::Timeout)??;
        buffer.truncate(len);

        Ok(buffer)
    }
}

#[async_trait]
impl PlayerQuery for QueryClient {
    async fn players(&self) -> Result<PlayerRoster, QueryError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(&self.address).await?;

        let session = rand::random::<i32>() & SESSION_MASK;

        let handshake = self.exchange(&socket, &handshake_request(session)).await?;
        let token = parse_challenge(&handshake, session)?;

        let stat = self.exchange(&socket, &stat_request(session, token)).await?;
        let roster = parse_full_stat(&stat, session)?;

        tracing::debug!(
            "Query {} reported {}/{} players",
            self.address,
            roster.online,
            roster.max
        );

        Ok(roster)
    }
}

fn handshake_request(session: i32) -> Vec<u8> {
    let mut packet = Vec::with_capacity(7);
    packet.extend_from_slice(&MAGIC);
    packet.push(TYPE_HANDSHAKE);
    packet.extend_from_slice(&session.to_be_bytes());
    packet
}

fn stat_request(session: i32, token: i32) -> Vec<u8> {
    let mut packet = Vec::with_capacity(15);
    packet.extend_from_slice(&MAGIC);
    packet.push(TYPE_STAT);
    packet.extend_from_slice(&session.to_be_bytes());
    packet.extend_from_slice(&token.to_be_bytes());
    // Padding selects the full stat instead of the basic one
    packet.extend_from_slice(&[0, 0, 0, 0]);
    packet
}

/// Checks the type byte and echoed session id; returns the payload after them.
fn strip_header(packet: &[u8], kind: u8, session: i32) -> Result<&[u8], QueryError> {
    if packet.len() < 5 {
        return Err(QueryError::Malformed("packet too short"));
    }
    if packet[0] != kind {
        return Err(QueryError::Malformed("unexpected packet type"));
    }
    if packet[1..5] != session.to_be_bytes() {
        return Err(QueryError::Malformed("session id mismatch"));
    }

    Ok(&packet[5..])
}

/// The challenge token is sent back as a NUL-terminated decimal string.
fn parse_challenge(packet: &[u8], session: i32) -> Result<i32, QueryError> {
    let payload = strip_header(packet, TYPE_HANDSHAKE, session)?;
    let digits = payload.split(|byte| *byte == 0).next().unwrap_or_default();

    std::str::from_utf8(digits)
        .ok()
        .and_then(|text| text.trim().parse::<i64>().ok())
        .map(|token| token as i32)
        .ok_or(QueryError::Malformed("challenge token is not a number"))
}

fn parse_full_stat(packet: &[u8], session: i32) -> Result<PlayerRoster, QueryError> {
    let payload = strip_header(packet, TYPE_STAT, session)?;

    // Fixed `splitnum\0\x80\0` padding before the key/value section
    let payload = payload
        .get(11..)
        .ok_or(QueryError::Malformed("missing key/value section"))?;

    let split = find(payload, PLAYER_SECTION)
        .ok_or(QueryError::Malformed("missing player section"))?;
    let (info, players) = (&payload[..split], &payload[split + PLAYER_SECTION.len()..]);

    let mut online = None;
    let mut max = None;
    let mut fields = info.split(|byte| *byte == 0);
    while let Some(key) = fields.next() {
        if key.is_empty() {
            break;
        }
        let value = fields.next().unwrap_or_default();
        match key {
            b"numplayers" => online = parse_number(value),
            b"maxplayers" => max = parse_number(value),
            _ => {}
        }
    }

    let players = players
        .split(|byte| *byte == 0)
        .take_while(|name| !name.is_empty())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();

    Ok(PlayerRoster {
        online: online.ok_or(QueryError::Malformed("missing numplayers"))?,
        max: max.ok_or(QueryError::Malformed("missing maxplayers"))?,
        players,
    })
}

fn parse_number(value: &[u8]) -> Option<u32> {
    std::str::from_utf8(value).ok()?.parse().ok()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
