// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses game-server feedback lines into [`CombatEvent`]s. A fixed,
//! ordered pattern list is tried per line; the first match wins and the
//! remaining patterns are skipped for that line.

use fleet_core::combat::{CombatEvent, CombatEventKind};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// A matched event plus any explicit health value the line carried, for
/// the combat-state maintenance path to prefer over the derived delta.
pub struct ParsedFeedback {
    pub event: CombatEvent,
    pub explicit_health: Option<f64>,
}

type Built = (CombatEventKind, Option<String>, Option<String>, Option<f64>, bool, Option<f64>);

#[allow(clippy::expect_used)]
fn critical_hit() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<source>\S+) critically hit (?P<target>\S+) for (?P<amount>[0-9.]+) damage$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn attack_with_health() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<source>\S+) hit (?P<target>\S+) for (?P<amount>[0-9.]+) damage \(\S+ has (?P<health>[0-9.]+) health left\)$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn dodge() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) dodged (?P<source>\S+)'s attack$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn block() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) blocked (?P<source>\S+)'s attack$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn parry() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) parried (?P<source>\S+)'s attack$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn damage_taken() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) took (?P<amount>[0-9.]+) damage$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn health_status() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) has (?P<health>[0-9.]+) health$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn defeated_by() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) was slain by (?P<source>\S+)$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn was_defeated() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) died$").expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn heal() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<target>\S+) (?:was healed|healed for) (?P<amount>[0-9.]+)(?: health)?$")
            .expect("static feedback pattern is valid regex")
    })
}

#[allow(clippy::expect_used)]
fn durability() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"(?i)^(?P<source>\S+)'s (?P<target>\S+) durability: (?P<amount>[0-9.]+)$")
            .expect("static feedback pattern is valid regex")
    })
}

fn ordered_patterns() -> Vec<(&'static Regex, fn(&Captures) -> Built)> {
    vec![
        (critical_hit(), (|c: &Captures| {
            (
                CombatEventKind::Attack,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                c["amount"].parse().ok(),
                true,
                None,
            )
        }) as fn(&Captures) -> Built),
        (attack_with_health(), |c| {
            (
                CombatEventKind::Attack,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                c["amount"].parse().ok(),
                false,
                c["health"].parse().ok(),
            )
        }),
        (dodge(), |c| {
            (
                CombatEventKind::Dodge,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                None,
                false,
                None,
            )
        }),
        (block(), |c| {
            (
                CombatEventKind::Block,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                None,
                false,
                None,
            )
        }),
        (parry(), |c| {
            (
                CombatEventKind::Parry,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                None,
                false,
                None,
            )
        }),
        (damage_taken(), |c| {
            (
                CombatEventKind::Damage,
                None,
                Some(c["target"].to_string()),
                c["amount"].parse().ok(),
                false,
                None,
            )
        }),
        (health_status(), |c| {
            let health: Option<f64> = c["health"].parse().ok();
            (CombatEventKind::Health, None, Some(c["target"].to_string()), health, false, health)
        }),
        (defeated_by(), |c| {
            (
                CombatEventKind::Defeated,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                None,
                false,
                None,
            )
        }),
        (was_defeated(), |c| {
            (CombatEventKind::Defeated, None, Some(c["target"].to_string()), None, false, None)
        }),
        (heal(), |c| {
            (
                CombatEventKind::Heal,
                None,
                Some(c["target"].to_string()),
                c["amount"].parse().ok(),
                false,
                None,
            )
        }),
        (durability(), |c| {
            (
                CombatEventKind::Durability,
                Some(c["source"].to_string()),
                Some(c["target"].to_string()),
                c["amount"].parse().ok(),
                false,
                None,
            )
        }),
    ]
}

/// Try the fixed ordered pattern list against `line`; the first match
/// wins. Returns `None` if nothing recognized the line.
pub fn parse_line(line: &str, now_ms: u64) -> Option<ParsedFeedback> {
    let trimmed = line.trim();
    for (regex, build) in ordered_patterns() {
        if let Some(captures) = regex.captures(trimmed) {
            let (kind, source, target, amount, critical, explicit_health) = build(&captures);
            let event = CombatEvent {
                kind,
                source,
                target,
                amount,
                critical,
                raw_line: trimmed.to_string(),
                timestamp: now_ms,
            };
            return Some(ParsedFeedback { event, explicit_health });
        }
    }
    None
}

#[cfg(test)]
#[path = "feedback_tests.rs"]
mod tests;
