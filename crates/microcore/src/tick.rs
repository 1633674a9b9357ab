// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure, deterministic per-tick advancement. Kept free of I/O so it can be
//! exercised directly in tests without a running scheduler; [`crate::manager`]
//! is the thin async wrapper that drives this on a real or fake clock.

use std::collections::VecDeque;

use fleet_core::{BotStatus, InboxEvent, InboxEventKind, MicrocoreState, Phase, Position, StatusSnapshot};

/// Minimum tick rate; anything lower is clamped up to this.
pub const MIN_TICK_RATE_MS: u64 = 50;

#[derive(Debug, Clone, Copy)]
pub struct MicrocoreConfig {
    pub tick_rate_ms: u64,
    pub step_distance: f64,
    /// `0` disables scanning entirely.
    pub scan_interval_ms: u64,
    pub scan_radius: f64,
}

impl Default for MicrocoreConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 200,
            step_distance: 0.6,
            scan_interval_ms: 0,
            scan_radius: 8.0,
        }
    }
}

impl MicrocoreConfig {
    pub fn clamped_tick_rate_ms(&self) -> u64 {
        self.tick_rate_ms.max(MIN_TICK_RATE_MS)
    }
}

/// What the async wrapper must do in response to one `advance()` call.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub snapshot: StatusSnapshot,
    /// Non-`None` when movement should be relayed to the adapter this tick.
    pub move_delta: Option<Position>,
    pub should_scan: bool,
    pub task_just_completed: Option<String>,
}

/// Run one tick: drain the inbox, advance movement, decide whether to
/// scan, and produce the status snapshot. Does not itself call the
/// adapter; the caller acts on `TickOutcome`.
pub fn advance(
    state: &mut MicrocoreState,
    inbox: &mut VecDeque<InboxEvent>,
    elapsed_ms: u64,
    config: &MicrocoreConfig,
    now_ms: u64,
    status: BotStatus,
) -> TickOutcome {
    while let Some(event) = inbox.pop_front() {
        if let Some(memory) = &event.memory {
            state.memory.push(memory.clone());
        }
        match event.kind {
            InboxEventKind::MoveTo { target } => state.target = Some(target),
            InboxEventKind::Task { name } => state.current_task = Some(name),
            InboxEventKind::Scan => state.last_scan_at = None,
            InboxEventKind::PhaseUpdate { phase } => {
                state.phase = Phase::new(phase);
                state.memory.push(format!("phase->{phase}"));
            }
        }
    }

    let mut move_delta = None;
    let mut task_just_completed = None;

    if let Some(target) = state.target {
        let distance = state.position.distance_to(&target);
        if distance > 0.001 {
            let tick_rate = config.clamped_tick_rate_ms() as f64;
            let rate = config.step_distance * (elapsed_ms as f64 / tick_rate);
            let step = distance.min(rate.max(0.01));
            let scale = step / distance;
            let delta = Position::new(
                (target.x - state.position.x) * scale,
                (target.y - state.position.y) * scale,
                (target.z - state.position.z) * scale,
            );
            state.position.x += delta.x;
            state.position.y += delta.y;
            state.position.z += delta.z;
            state.velocity = delta;
            move_delta = Some(delta);
        } else {
            state.position = target;
            state.velocity = Position::default();
            state.target = None;
            if let Some(task) = state.current_task.take() {
                task_just_completed = Some(task);
            }
        }
    }

    let should_scan = config.scan_interval_ms > 0
        && match state.last_scan_at {
            Some(last) => now_ms.saturating_sub(last) >= config.scan_interval_ms,
            None => true,
        };

    state.tick_count += 1;

    let reason = if task_just_completed.is_some() {
        "task_complete"
    } else if move_delta.is_some() {
        "move"
    } else if should_scan {
        "scan"
    } else {
        "tick"
    };

    let snapshot = StatusSnapshot {
        bot_id: state.bot_id,
        reason: reason.to_string(),
        tick_count: state.tick_count,
        position: state.position,
        velocity: state.velocity,
        current_task: state.current_task.clone(),
        status,
        memory: state.memory.snapshot(),
        last_scan: state.last_scan_result.clone(),
        last_tick_at: now_ms,
    };

    TickOutcome {
        snapshot,
        move_delta,
        should_scan,
        task_just_completed,
    }
}

/// Apply a successful scan result: record it, and if autonomy is enabled
/// with no current task, append a phase-aware memory hint. Never moves
/// the bot.
pub fn apply_scan_result(state: &mut MicrocoreState, result: String, now_ms: u64) {
    state.last_scan_at = Some(now_ms);
    if state.autonomy_enabled && state.current_task.is_none() {
        state
            .memory
            .push(format!("autonomy:phase{}:{}", state.phase.get(), result));
    }
    state.last_scan_result = Some(result);
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
