// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use fleet_core::OutcomeRecord;
use serde::{Deserialize, Serialize};

/// The persisted outcomes/knowledge store file.
///
/// Aggregates (`totalYield`, `averageSuccessRate`, `tasksCompleted` and
/// similar) are deliberately not stored here: they are exactly
/// re-derivable from `outcomes`, and storing them separately would let
/// the two drift. [`crate::LearningStore`] recomputes every aggregate
/// query directly from this list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub version: u32,
    pub outcomes: Vec<OutcomeRecord>,
    pub last_updated: u64,
}
