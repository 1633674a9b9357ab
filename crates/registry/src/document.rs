// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use fleet_core::BotIdentity;
use serde::{Deserialize, Serialize};

/// The persisted registry file: `{version, updatedAt, npcs: [entry...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub version: u32,
    pub updated_at: u64,
    pub npcs: Vec<BotIdentity>,
}
