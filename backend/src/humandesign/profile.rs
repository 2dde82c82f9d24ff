//! Profile, incarnation cross and variables: the parts of a chart read off
//! the Sun and Node activations.

use serde::{Deserialize, Serialize};

use super::gates::wheel_index;

fn line_name(line: u8) -> &'static str {
    match line {
        1 => "Investigator",
        2 => "Hermit",
        3 => "Martyr",
        4 => "Opportunist",
        5 => "Heretic",
        6 => "Role Model",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub personality_line: u8,
    pub design_line: u8,
    /// `p/d`, e.g. `2/4`
    pub label: String,
    /// e.g. `Hermit Opportunist`
    pub name: String,
}

impl Profile {
    pub fn new(personality_line: u8, design_line: u8) -> Self {
        Self {
            personality_line,
            design_line,
            label: format!("{}/{}", personality_line, design_line),
            name: format!("{} {}", line_name(personality_line), line_name(design_line)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossAngle {
    #[serde(rename = "Right Angle")]
    RightAngle,
    Juxtaposition,
    #[serde(rename = "Left Angle")]
    LeftAngle,
}

impl CrossAngle {
    /// Angle implied by the profile: 4/1 is the only juxtaposition, lines 5
    /// and 6 are left angle.
    pub fn from_profile(profile: &Profile) -> Self {
        match (profile.personality_line, profile.design_line) {
            (4, 1) => CrossAngle::Juxtaposition,
            (5, _) | (6, _) => CrossAngle::LeftAngle,
            _ => CrossAngle::RightAngle,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CrossAngle::RightAngle => "Right Angle",
            CrossAngle::Juxtaposition => "Juxtaposition",
            CrossAngle::LeftAngle => "Left Angle",
        }
    }
}

/// Quarter of the wheel holding the Personality Sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Initiation,
    Civilization,
    Duality,
    Mutation,
}

impl Quarter {
    /// Quarters are sixteen gates each, starting with gate 13.
    pub fn of_gate(gate: u8) -> Option<Self> {
        let index = wheel_index(gate)?;
        let quarter = (index + 64 - 2) % 64 / 16;
        Some(match quarter {
            0 => Quarter::Initiation,
            1 => Quarter::Civilization,
            2 => Quarter::Duality,
            _ => Quarter::Mutation,
        })
    }

    pub fn theme(self) -> &'static str {
        match self {
            Quarter::Initiation => "Purpose fulfilled through Mind",
            Quarter::Civilization => "Purpose fulfilled through Form",
            Quarter::Duality => "Purpose fulfilled through Bonding",
            Quarter::Mutation => "Purpose fulfilled through Transformation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncarnationCross {
    pub angle: CrossAngle,
    pub quarter: Quarter,
    /// Personality Sun, Personality Earth, Design Sun, Design Earth
    pub gates: [u8; 4],
    pub label: String,
}

impl IncarnationCross {
    pub fn new(profile: &Profile, gates: [u8; 4]) -> Self {
        let angle = CrossAngle::from_profile(profile);
        let quarter = Quarter::of_gate(gates[0]).unwrap_or(Quarter::Initiation);
        Self {
            angle,
            quarter,
            gates,
            label: format!(
                "{} Cross ({}/{} | {}/{})",
                angle.name(),
                gates[0],
                gates[1],
                gates[2],
                gates[3]
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    Left,
    Right,
}

impl Arrow {
    /// Tones 1-3 point left, 4-6 point right.
    pub fn from_tone(tone: u8) -> Self {
        if tone <= 3 {
            Arrow::Left
        } else {
            Arrow::Right
        }
    }

    pub fn letter(self) -> char {
        match self {
            Arrow::Left => 'L',
            Arrow::Right => 'R',
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Arrow::Left => "←",
            Arrow::Right => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub arrow: Arrow,
    pub tone: u8,
}

impl Variable {
    fn new(name: &str, tone: u8) -> Self {
        Self {
            name: name.to_string(),
            arrow: Arrow::from_tone(tone),
            tone,
        }
    }
}

/// The four arrows: Design on the left, Personality on the right; Sun on
/// top, Node below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    pub top_left: Variable,
    pub top_right: Variable,
    pub bottom_left: Variable,
    pub bottom_right: Variable,
    /// `P{Motivation}{Perspective}D{Digestion}{Environment}`, e.g. `PLRDLL`
    pub code: String,
}

impl Variables {
    pub fn new(
        design_sun_tone: u8,
        personality_sun_tone: u8,
        design_node_tone: u8,
        personality_node_tone: u8,
    ) -> Self {
        let top_left = Variable::new("Digestion", design_sun_tone);
        let top_right = Variable::new("Motivation", personality_sun_tone);
        let bottom_left = Variable::new("Environment", design_node_tone);
        let bottom_right = Variable::new("Perspective", personality_node_tone);
        let code = format!(
            "P{}{}D{}{}",
            top_right.arrow.letter(),
            bottom_right.arrow.letter(),
            top_left.arrow.letter(),
            bottom_left.arrow.letter()
        );
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            code,
        }
    }
}
