//! Exaltation/detriment annotations from the static line-dignity table.
//!
//! The table maps `gate -> line -> planets`; evaluation follows a fixed
//! priority:
//!
//! 1. missing entry or a `no_polarity` line is neutral
//! 2. a star glyph (juxtaposition planet) on the active or harmonic planet
//! 3. double fixing: one planet exalts while the other detriments
//! 4. a single polarity, the active planet's own taking precedence
//! 5. otherwise neutral

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::gates::is_gate;

#[derive(Debug, Error)]
pub enum DignityTableError {
    #[error("Failed to read dignity table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse dignity table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid dignity table key {gate}.{line}")]
    InvalidKey { gate: String, line: String },
}

/// Planets listed for one gate line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDignity {
    #[serde(default)]
    pub exaltation_planets: Vec<String>,
    #[serde(default)]
    pub detriment_planets: Vec<String>,
    #[serde(default)]
    pub juxtaposition_planets: Vec<String>,
    #[serde(default)]
    pub no_polarity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DignityState {
    Exalted,
    Detriment,
    Juxtaposed,
    Neutral,
}

impl DignityState {
    /// Panel marker glyph, if the state has one.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            DignityState::Exalted => Some("▲"),
            DignityState::Detriment => Some("▽"),
            DignityState::Juxtaposed => Some("✦"),
            DignityState::Neutral => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DignityResult {
    pub state: DignityState,
    pub active_trigger: Option<String>,
    pub harmonic_trigger: Option<String>,
    pub details: String,
}

impl DignityResult {
    fn neutral(details: &str) -> Self {
        Self {
            state: DignityState::Neutral,
            active_trigger: None,
            harmonic_trigger: None,
            details: details.to_string(),
        }
    }

    fn new(
        state: DignityState,
        active: Option<&str>,
        harmonic: Option<&str>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            state,
            active_trigger: active.map(str::to_string),
            harmonic_trigger: harmonic.map(str::to_string),
            details: details.into(),
        }
    }
}

/// Planet names match with underscores read as spaces (`North_Node`).
pub fn normalize_planet_name(planet: &str) -> String {
    planet.replace('_', " ")
}

fn listed(list: &[String], planet: &str) -> bool {
    list.iter().any(|p| p == planet)
}

/// Read-only `(gate, line) -> LineDignity` lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DignityTable {
    lines: HashMap<(u8, u8), LineDignity>,
}

impl DignityTable {
    /// Parse the JSON layout `{"gate": {"line": {...}}}`.
    pub fn from_json(json: &str) -> Result<Self, DignityTableError> {
        let raw: BTreeMap<String, BTreeMap<String, LineDignity>> = serde_json::from_str(json)?;
        let mut lines = HashMap::new();
        for (gate_key, gate_lines) in raw {
            for (line_key, mut entry) in gate_lines {
                let gate: u8 = gate_key.trim().parse().unwrap_or(0);
                let line: u8 = line_key.trim().parse().unwrap_or(0);
                if !is_gate(gate) || !(1..=6).contains(&line) {
                    return Err(DignityTableError::InvalidKey {
                        gate: gate_key,
                        line: line_key,
                    });
                }
                for list in [
                    &mut entry.exaltation_planets,
                    &mut entry.detriment_planets,
                    &mut entry.juxtaposition_planets,
                ] {
                    for planet in list.iter_mut() {
                        *planet = normalize_planet_name(planet);
                    }
                }
                lines.insert((gate, line), entry);
            }
        }
        Ok(Self { lines })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DignityTableError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| DignityTableError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        let table = Self::from_json(&content)?;
        info!(
            "Loaded {} dignity lines from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, gate: u8, line: u8) -> Option<&LineDignity> {
        self.lines.get(&(gate, line))
    }

    /// `(gate, line)` keys without an entry, in gate order.
    pub fn missing_lines(&self) -> Vec<(u8, u8)> {
        (1..=64u8)
            .flat_map(|gate| (1..=6u8).map(move |line| (gate, line)))
            .filter(|key| !self.lines.contains_key(key))
            .collect()
    }

    /// Evaluate the dignity of `active_planet` at `gate.line`, optionally
    /// fixed by the planet activating the harmonic (channel partner) gate.
    pub fn evaluate(
        &self,
        gate: u8,
        line: u8,
        active_planet: &str,
        harmonic_planet: Option<&str>,
    ) -> DignityResult {
        if !is_gate(gate) || !(1..=6).contains(&line) {
            return DignityResult::neutral("Invalid gate or line");
        }
        let Some(entry) = self.get(gate, line) else {
            return DignityResult::neutral("No dignity data for this gate.line");
        };
        if entry.no_polarity {
            return DignityResult::neutral("No polarity line");
        }

        let active = normalize_planet_name(active_planet);
        let harmonic = harmonic_planet.map(normalize_planet_name);
        let active = active.as_str();
        let harmonic = harmonic.as_deref();

        let harmonic_in = |list: &[String]| harmonic.is_some_and(|h| listed(list, h));

        if listed(&entry.juxtaposition_planets, active) {
            return DignityResult::new(
                DignityState::Juxtaposed,
                Some(active),
                None,
                "Star glyph (explicit juxtaposition)",
            );
        }
        if harmonic_in(&entry.juxtaposition_planets) {
            return DignityResult::new(
                DignityState::Juxtaposed,
                None,
                harmonic,
                "Star glyph via harmonic planet",
            );
        }

        let active_exalted = listed(&entry.exaltation_planets, active);
        let active_detriment = listed(&entry.detriment_planets, active);
        let harmonic_exalted = harmonic_in(&entry.exaltation_planets);
        let harmonic_detriment = harmonic_in(&entry.detriment_planets);

        if (active_exalted && harmonic_detriment) || (active_detriment && harmonic_exalted) {
            return DignityResult::new(
                DignityState::Juxtaposed,
                Some(active),
                harmonic,
                "Double fixing (opposite polarities)",
            );
        }

        let has_exaltation = active_exalted || harmonic_exalted;
        let has_detriment = active_detriment || harmonic_detriment;

        match (has_exaltation, has_detriment) {
            (true, true) if active_exalted => DignityResult::new(
                DignityState::Exalted,
                Some(active),
                harmonic.filter(|_| harmonic_exalted),
                "Multiple planets same polarity (exalted)",
            ),
            (true, true) => DignityResult::new(
                DignityState::Detriment,
                Some(active),
                harmonic.filter(|_| harmonic_detriment),
                "Multiple planets same polarity (detriment)",
            ),
            (true, false) => {
                let (trigger, source) = if active_exalted {
                    (Some(active), "active")
                } else {
                    (harmonic, "harmonic")
                };
                DignityResult::new(
                    DignityState::Exalted,
                    trigger,
                    None,
                    format!("Exalted via {} planet", source),
                )
            }
            (false, true) => {
                let (trigger, source) = if active_detriment {
                    (Some(active), "active")
                } else {
                    (harmonic, "harmonic")
                };
                DignityResult::new(
                    DignityState::Detriment,
                    trigger,
                    None,
                    format!("Detriment via {} planet", source),
                )
            }
            (false, false) => DignityResult::neutral("No dignity triggers"),
        }
    }
}
