// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-bot learning profile: skill levels, per-skill performance counters,
//! and the aggregates derived from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Rolling performance counters for a single skill.
///
/// Invariant: `attempts == successes + failures`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillPerformance {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub avg_duration_ms: f64,
    pub avg_efficiency: f64,
    pub success_streak: u32,
    pub best_streak: u32,
    pub last_outcome: Option<bool>,
    pub last_reward: Option<f64>,
}

impl Default for SkillPerformance {
    fn default() -> Self {
        Self {
            attempts: 0,
            successes: 0,
            failures: 0,
            avg_duration_ms: 0.0,
            avg_efficiency: 0.0,
            success_streak: 0,
            best_streak: 0,
            last_outcome: None,
            last_reward: None,
        }
    }
}

impl SkillPerformance {
    /// `successes / attempts`, or `0.0` when there have been no attempts.
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    /// Fold in one more outcome, updating running means and streaks.
    pub fn record(&mut self, success: bool, duration_ms: f64, efficiency: f64, reward: f64) {
        self.attempts += 1;
        if success {
            self.successes += 1;
            self.success_streak += 1;
            self.best_streak = self.best_streak.max(self.success_streak);
        } else {
            self.failures += 1;
            self.success_streak = 0;
        }

        let n = self.attempts as f64;
        self.avg_duration_ms += (duration_ms - self.avg_duration_ms) / n;
        self.avg_efficiency += (efficiency - self.avg_efficiency) / n;
        self.last_outcome = Some(success);
        self.last_reward = Some(reward);
    }
}

/// Per-bot (keyed by bot name) learning state: skill levels, per-skill
/// performance, and cross-skill aggregates.
///
/// Invariant: `tasks_completed + tasks_failed == sum(performance[*].attempts)`;
/// `motivation` stays within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningProfile {
    pub bot_name: String,
    /// Skill level per skill name, each `>= 1.0`.
    pub skills: HashMap<String, f64>,
    pub performance: HashMap<String, SkillPerformance>,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub xp: u64,
    pub motivation: f64,
    pub last_task: Option<String>,
    pub updated_at: u64,
}

impl LearningProfile {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            skills: HashMap::new(),
            performance: HashMap::new(),
            tasks_completed: 0,
            tasks_failed: 0,
            xp: 0,
            motivation: 0.5,
            last_task: None,
            updated_at: 0,
        }
    }

    /// Clamp every skill level to `[0, 100]`, merging new values into the profile.
    pub fn update_skills(&mut self, updates: impl IntoIterator<Item = (String, f64)>) {
        for (name, value) in updates {
            self.skills.insert(name, value.clamp(0.0, 100.0));
        }
    }

    /// Recompute `tasks_completed`/`tasks_failed` from `performance`, enforcing
    /// the re-derivability invariant after a load.
    pub fn recompute_aggregates(&mut self) {
        self.tasks_completed = self.performance.values().map(|p| p.successes).sum();
        self.tasks_failed = self.performance.values().map(|p| p.failures).sum();
    }

    /// Award xp and drift motivation for one task outcome.
    ///
    /// xp grows by a flat base on every attempt plus an efficiency bonus on
    /// success; motivation nudges toward 1.0 on success and 0.0 on failure,
    /// scaled by `efficiency` and clamped to `[0, 1]`.
    pub fn apply_outcome(&mut self, success: bool, efficiency: f64) {
        let efficiency = efficiency.clamp(0.0, 1.0);
        let xp_gain = if success {
            XP_BASE_GAIN + (XP_EFFICIENCY_BONUS * efficiency).round() as u64
        } else {
            XP_FAILURE_GAIN
        };
        self.xp += xp_gain;

        let drift = if success {
            MOTIVATION_DRIFT * (0.5 + 0.5 * efficiency)
        } else {
            -MOTIVATION_DRIFT
        };
        self.motivation = (self.motivation + drift).clamp(0.0, 1.0);
    }
}

/// Flat xp awarded for any completed attempt, success or failure's smaller share.
const XP_BASE_GAIN: u64 = 10;
/// Extra xp on top of [`XP_BASE_GAIN`], scaled by outcome efficiency.
const XP_EFFICIENCY_BONUS: f64 = 10.0;
/// xp awarded on failure — enough to register progress, not enough to reward failing.
const XP_FAILURE_GAIN: u64 = 2;
/// Maximum per-outcome motivation swing.
const MOTIVATION_DRIFT: f64 = 0.05;

#[cfg(test)]
#[path = "learning_tests.rs"]
mod tests;
