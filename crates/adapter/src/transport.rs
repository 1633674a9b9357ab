// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Abstraction over the game server's request/response channel so tests
//! substitute an in-memory transport instead of a real socket.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A single connected request/response session with the game server.
/// One command in flight at a time; `send` both writes the command and
/// reads back its single response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, command: &str) -> Result<String, String>;

    /// Tear the session down. Best-effort; errors are not surfaced.
    async fn close(&mut self);
}

/// Connects a fresh [`Transport`] session, parameterized so the adapter
/// never depends on the concrete backend (RCON socket vs. in-memory fake).
#[async_trait]
pub trait TransportConnector: Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn Transport>, String>;
}

const RCON_TYPE_RESPONSE: i32 = 0;
const RCON_TYPE_AUTH_RESPONSE: i32 = 2;
const RCON_TYPE_EXEC_COMMAND: i32 = 2;
const RCON_TYPE_AUTH: i32 = 3;
const RCON_MAX_BODY: usize = 4096;

async fn write_packet(stream: &mut TcpStream, id: i32, kind: i32, body: &str) -> Result<(), String> {
    let mut payload = Vec::with_capacity(body.len() + 10);
    payload.extend_from_slice(&id.to_le_bytes());
    payload.extend_from_slice(&kind.to_le_bytes());
    payload.extend_from_slice(body.as_bytes());
    payload.push(0);
    payload.push(0);
    let len = i32::try_from(payload.len()).map_err(|_| "command too long".to_string())?;
    stream.write_all(&len.to_le_bytes()).await.map_err(|e| e.to_string())?;
    stream.write_all(&payload).await.map_err(|e| e.to_string())?;
    Ok(())
}

async fn read_packet(stream: &mut TcpStream) -> Result<(i32, i32, String), String> {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).await.map_err(|e| e.to_string())?;
    let len = i32::from_le_bytes(len_buf);
    if len < 10 || len as usize > RCON_MAX_BODY + 10 {
        return Err(format!("implausible rcon packet length {len}"));
    }
    let mut rest = vec![0u8; len as usize];
    stream.read_exact(&mut rest).await.map_err(|e| e.to_string())?;
    let id = i32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
    let kind = i32::from_le_bytes([rest[4], rest[5], rest[6], rest[7]]);
    let body_bytes = &rest[8..rest.len().saturating_sub(2)];
    let body = String::from_utf8_lossy(body_bytes).into_owned();
    Ok((id, kind, body))
}

/// Connects to a game server over the "remote console" RCON wire protocol:
/// length-prefixed packets carrying an id, a type, and a null-terminated
/// command or response body. One authenticated session per connection.
pub struct RconConnector {
    addr: String,
    password: String,
}

impl RconConnector {
    pub fn new(addr: impl Into<String>, password: impl Into<String>) -> Self {
        Self { addr: addr.into(), password: password.into() }
    }
}

#[async_trait]
impl TransportConnector for RconConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, String> {
        let mut stream = TcpStream::connect(&self.addr).await.map_err(|e| e.to_string())?;
        write_packet(&mut stream, 1, RCON_TYPE_AUTH, &self.password).await?;
        let (reply_id, _kind, _body) = read_packet(&mut stream).await?;
        if reply_id == -1 {
            return Err("rcon authentication rejected".to_string());
        }
        Ok(Box::new(RconTransport { stream, next_id: 2 }))
    }
}

struct RconTransport {
    stream: TcpStream,
    next_id: i32,
}

#[async_trait]
impl Transport for RconTransport {
    async fn send(&mut self, command: &str) -> Result<String, String> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        write_packet(&mut self.stream, id, RCON_TYPE_EXEC_COMMAND, command).await?;
        let (reply_id, kind, body) = read_packet(&mut self.stream).await?;
        if reply_id != id && kind != RCON_TYPE_AUTH_RESPONSE {
            return Err(format!("rcon response id mismatch: expected {id}, got {reply_id}"));
        }
        if kind != RCON_TYPE_RESPONSE {
            return Err(format!("unexpected rcon packet type {kind}"));
        }
        Ok(body)
    }

    async fn close(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    use parking_lot::Mutex;

    /// Scripted transport for tests: each `send` returns the next queued
    /// response, or an error if `fail_connect`/`disconnect_after` is hit.
    #[derive(Clone, Default)]
    pub struct FakeTransport {
        inner: Arc<Mutex<FakeState>>,
    }

    #[derive(Default)]
    struct FakeState {
        responses: VecDeque<Result<String, String>>,
        sent: Vec<String>,
        closed: bool,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_response(&self, response: impl Into<String>) {
            self.inner.lock().responses.push_back(Ok(response.into()));
        }

        pub fn push_failure(&self, reason: impl Into<String>) {
            self.inner.lock().responses.push_back(Err(reason.into()));
        }

        pub fn sent_commands(&self) -> Vec<String> {
            self.inner.lock().sent.clone()
        }

        pub fn was_closed(&self) -> bool {
            self.inner.lock().closed
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&mut self, command: &str) -> Result<String, String> {
            let mut state = self.inner.lock();
            state.sent.push(command.to_string());
            state
                .responses
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }

        async fn close(&mut self) {
            self.inner.lock().closed = true;
        }
    }

    /// A connector that hands out clones of one pre-scripted [`FakeTransport`],
    /// or fails connect after `fail_connects_remaining` attempts.
    #[derive(Clone)]
    pub struct FakeConnector {
        transport: FakeTransport,
        fail_connects_remaining: Arc<Mutex<u32>>,
    }

    impl FakeConnector {
        pub fn new(transport: FakeTransport) -> Self {
            Self {
                transport,
                fail_connects_remaining: Arc::new(Mutex::new(0)),
            }
        }

        pub fn fail_next_connects(&self, n: u32) {
            *self.fail_connects_remaining.lock() = n;
        }
    }

    #[async_trait]
    impl TransportConnector for FakeConnector {
        async fn connect(&self) -> Result<Box<dyn Transport>, String> {
            let mut remaining = self.fail_connects_remaining.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err("connect refused".to_string());
            }
            Ok(Box::new(self.transport.clone()))
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
