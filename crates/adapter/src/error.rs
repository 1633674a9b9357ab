// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("not connected to the game server")]
    Disconnected,

    #[error("connect refused: {0}")]
    ConnectRefused(String),

    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("unknown command template {0}")]
    UnknownTemplate(String),

    #[error("adapter is shutting down")]
    ShuttingDown,

    #[error(transparent)]
    Persistence(#[from] fleet_persistence::PersistenceError),
}
