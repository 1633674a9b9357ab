// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Personality vectors and the archetype/dominant-trait bundle derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of named personality components.
pub const TRAIT_COUNT: usize = 7;

const VERY_HIGH: f64 = 0.8;
const HIGH: f64 = 0.6;
const LOW: f64 = 0.4;
const VERY_LOW: f64 = 0.2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersonalityError {
    #[error("personality component {name} is not finite")]
    NotFinite { name: &'static str },
    #[error("personality component {name} = {value} is out of range [0,1]")]
    OutOfRange { name: &'static str, value: String },
}

/// Seven real-valued personality components, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityVector {
    pub curiosity: f64,
    pub patience: f64,
    pub motivation: f64,
    pub empathy: f64,
    pub aggression: f64,
    pub creativity: f64,
    pub loyalty: f64,
}

impl PersonalityVector {
    /// A neutral vector with every component at 0.5.
    pub fn balanced() -> Self {
        Self {
            curiosity: 0.5,
            patience: 0.5,
            motivation: 0.5,
            empathy: 0.5,
            aggression: 0.5,
            creativity: 0.5,
            loyalty: 0.5,
        }
    }

    /// Validate every component is finite and within `[0, 1]`.
    pub fn validate(&self) -> Result<(), PersonalityError> {
        for (name, value) in self.named_components() {
            if !value.is_finite() {
                return Err(PersonalityError::NotFinite { name });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(PersonalityError::OutOfRange {
                    name,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Clamp every component into `[0, 1]`, replacing non-finite values with 0.5.
    pub fn clamped(&self) -> Self {
        let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        Self {
            curiosity: clamp(self.curiosity),
            patience: clamp(self.patience),
            motivation: clamp(self.motivation),
            empathy: clamp(self.empathy),
            aggression: clamp(self.aggression),
            creativity: clamp(self.creativity),
            loyalty: clamp(self.loyalty),
        }
    }

    fn named_components(&self) -> [(&'static str, f64); TRAIT_COUNT] {
        [
            ("curiosity", self.curiosity),
            ("patience", self.patience),
            ("motivation", self.motivation),
            ("empathy", self.empathy),
            ("aggression", self.aggression),
            ("creativity", self.creativity),
            ("loyalty", self.loyalty),
        ]
    }

    /// Compute the archetype/dominant-trait bundle for this vector.
    pub fn bundle(&self) -> PersonalityBundle {
        PersonalityBundle::compute(self)
    }
}

/// Dominant-trait classification relative to the fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitLevel {
    VeryHigh,
    High,
    Low,
    VeryLow,
}

crate::simple_display! {
    TraitLevel {
        VeryHigh => "very-high",
        High => "high",
        Low => "low",
        VeryLow => "very-low",
    }
}

fn classify(value: f64) -> Option<TraitLevel> {
    if value >= VERY_HIGH {
        Some(TraitLevel::VeryHigh)
    } else if value >= HIGH {
        Some(TraitLevel::High)
    } else if value <= VERY_LOW {
        Some(TraitLevel::VeryLow)
    } else if value <= LOW {
        Some(TraitLevel::Low)
    } else {
        None
    }
}

/// Short textual archetype derived from a personality vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Cautious,
    Adventurous,
    Aggressive,
    Supportive,
    Balanced,
}

crate::simple_display! {
    Archetype {
        Cautious => "cautious",
        Adventurous => "adventurous",
        Aggressive => "aggressive",
        Supportive => "supportive",
        Balanced => "balanced",
    }
}

/// Archetype plus the dominant-trait strings, recomputed on every upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityBundle {
    pub archetype: Archetype,
    /// `"{trait}:{level}"` strings for every component whose level is not the neutral band.
    pub dominant_traits: Vec<String>,
}

impl PersonalityBundle {
    fn compute(v: &PersonalityVector) -> Self {
        let dominant_traits = v
            .named_components()
            .into_iter()
            .filter_map(|(name, value)| classify(value).map(|level| format!("{name}:{level}")))
            .collect();

        let archetype = if v.aggression >= HIGH && v.aggression >= v.empathy {
            Archetype::Aggressive
        } else if v.curiosity >= HIGH && v.patience <= LOW {
            Archetype::Adventurous
        } else if v.empathy >= HIGH && v.loyalty >= HIGH {
            Archetype::Supportive
        } else if v.patience >= HIGH && v.aggression <= LOW {
            Archetype::Cautious
        } else {
            Archetype::Balanced
        };

        Self {
            archetype,
            dominant_traits,
        }
    }
}

#[cfg(test)]
#[path = "personality_tests.rs"]
mod tests;
