//! The 64-gate zodiacal partition and its line/color/tone/base subdivisions.

use serde::{Deserialize, Serialize};

use crate::models::normalize_degrees;

/// Ecliptic longitude where the wheel starts (first degree of gate 41).
pub const WHEEL_START: f64 = 302.0;
pub const GATE_WIDTH: f64 = 5.625;
pub const LINE_WIDTH: f64 = GATE_WIDTH / 6.0;
pub const COLOR_WIDTH: f64 = LINE_WIDTH / 6.0;
pub const TONE_WIDTH: f64 = COLOR_WIDTH / 6.0;
pub const BASE_WIDTH: f64 = TONE_WIDTH / 5.0;

/// Bases per degree of longitude (69 120 bases around the wheel).
const BASES_PER_DEGREE: f64 = 192.0;

/// Bases per gate: 6 lines x 6 colors x 6 tones x 5 bases.
const BASES_PER_GATE: u32 = 1080;
const BASES_PER_LINE: u32 = 180;
const BASES_PER_COLOR: u32 = 30;
const BASES_PER_TONE: u32 = 5;

/// Gates in wheel order, starting at [`WHEEL_START`].
pub const GATE_WHEEL: [u8; 64] = [
    41, 19, 13, 49, 30, 55, 37, 63, 22, 36, 25, 17, 21, 51, 42, 3, 27, 24, 2, 23, 8, 20, 16, 35,
    45, 12, 15, 52, 39, 53, 62, 56, 31, 33, 7, 4, 29, 59, 40, 64, 47, 6, 46, 18, 48, 57, 32, 50,
    28, 44, 1, 43, 14, 34, 9, 5, 26, 11, 10, 58, 38, 54, 61, 60,
];

/// Position of a longitude on the gate wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GatePosition {
    pub gate: u8,
    pub line: u8,
    pub color: u8,
    pub tone: u8,
    pub base: u8,
}

impl GatePosition {
    /// Map an ecliptic longitude onto the wheel.
    ///
    /// Any finite longitude maps to exactly one position; the decomposition
    /// is done in whole bases so gate, line, color, tone and base always agree.
    /// Subdivisions are half-open: an exact boundary belongs to the later one.
    pub fn from_longitude(longitude: f64) -> Self {
        let offset = normalize_degrees(longitude - WHEEL_START);
        let total = GATE_WHEEL.len() as u32 * BASES_PER_GATE;
        // A base is exactly 1/192°, so gate, line and color boundaries stay exact
        let n = ((offset * BASES_PER_DEGREE).floor() as u32).min(total - 1);

        let index = (n / BASES_PER_GATE) as usize;
        let rem = n % BASES_PER_GATE;
        Self {
            gate: GATE_WHEEL[index],
            line: (rem / BASES_PER_LINE + 1) as u8,
            color: (rem % BASES_PER_LINE / BASES_PER_COLOR + 1) as u8,
            tone: (rem % BASES_PER_COLOR / BASES_PER_TONE + 1) as u8,
            base: (rem % BASES_PER_TONE + 1) as u8,
        }
    }

    /// `gate.line` label.
    pub fn label(&self) -> String {
        format!("{}.{}", self.gate, self.line)
    }
}

/// Wheel index (0-63) of a gate.
pub fn wheel_index(gate: u8) -> Option<usize> {
    GATE_WHEEL.iter().position(|g| *g == gate)
}

/// Longitude where a gate begins.
pub fn gate_start(gate: u8) -> Option<f64> {
    wheel_index(gate).map(|i| normalize_degrees(WHEEL_START + i as f64 * GATE_WIDTH))
}

/// Whether `gate` is one of the 64 gates.
pub fn is_gate(gate: u8) -> bool {
    (1..=64).contains(&gate)
}
