// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use fleet_adapter::AdapterError;
use fleet_core::BotId;
use fleet_learning::LearningError;
use fleet_persistence::PersistenceError;
use fleet_registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Learning(#[from] LearningError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("adapter error: {0}")]
    Adapter(String),

    #[error("unknown bot id {0}")]
    NotFound(BotId),

    #[error("unknown team preset {0:?}")]
    UnknownPreset(String),

    #[error("{0}")]
    Validation(String),
}

impl From<AdapterError> for SupervisorError {
    fn from(err: AdapterError) -> Self {
        Self::Adapter(err.to_string())
    }
}
