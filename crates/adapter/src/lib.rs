// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The game-server adapter: connection lifecycle, rate-limited command
//! queue, feedback parsing, and per-entity combat state, exposed through
//! [`GameServerAdapter`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod adapter;
mod combat_state;
mod command_queue;
mod config;
mod connection;
mod error;
mod feedback;
mod transport;

pub use adapter::{AdapterMetrics, AdapterRunHandle, GameServerAdapter};
pub use combat_state::{AcceptOutcome, CombatTracker};
pub use config::AdapterConfig;
pub use connection::ConnectionState;
pub use error::AdapterError;
pub use feedback::{parse_line, ParsedFeedback};
pub use transport::{RconConnector, Transport, TransportConnector};

#[cfg(any(test, feature = "test-support"))]
pub use transport::fake::{FakeConnector, FakeTransport};
