//! Light and dark colour palettes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::humandesign::Center;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    /// Colours for a defined center.
    pub fn center(self, center: Center) -> CenterPalette {
        let table = match self {
            Theme::Light => &LIGHT_CENTERS,
            Theme::Dark => &DARK_CENTERS,
        };
        let index = Center::ALL
            .iter()
            .position(|c| *c == center)
            .unwrap_or_default();
        table[index]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}', expected light or dark", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterPalette {
    pub defined: &'static str,
    pub glow: &'static str,
    pub stroke: &'static str,
}

const fn center(defined: &'static str, glow: &'static str, stroke: &'static str) -> CenterPalette {
    CenterPalette {
        defined,
        glow,
        stroke,
    }
}

// Indexed like `Center::ALL`.
static LIGHT_CENTERS: [CenterPalette; 9] = [
    center("#B57EDC", "#E8D5F2", "#8B5DC2"),
    center("#7B8FB8", "#C5D0E8", "#5D6D8E"),
    center("#5DADE2", "#D4EDFC", "#3498DB"),
    center("#F7DC6F", "#FDF5D6", "#D4AC0D"),
    center("#82E0AA", "#D5F5E3", "#28B463"),
    center("#F8C471", "#FDEBD0", "#E67E22"),
    center("#73C6B6", "#D0ECE7", "#1ABC9C"),
    center("#F1948A", "#FADBD8", "#E74C3C"),
    center("#A67B5B", "#D7C4B7", "#8B5A2B"),
];

static DARK_CENTERS: [CenterPalette; 9] = [
    center("#AA77DD", "#BB88DD", "#9966CC"),
    center("#8899CC", "#99AADD", "#7788BB"),
    center("#6699DD", "#77AAEE", "#5588CC"),
    center("#EEBB66", "#FFCC77", "#DDAA55"),
    center("#77CC99", "#88DDAA", "#66BB88"),
    center("#EEBB77", "#FFCC88", "#DDAA66"),
    center("#66BBAA", "#77CCBB", "#55AA99"),
    center("#EE9988", "#FFAA99", "#DD8877"),
    center("#BB8866", "#CC9977", "#AA7755"),
];

/// Colours for one planetary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPalette {
    pub fill: &'static str,
    pub border: &'static str,
    pub divider: &'static str,
    pub zebra: &'static str,
    pub header: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub gradient_start: &'static str,
    pub gradient_end: &'static str,
    pub body_fill: &'static str,
    pub body_stroke: &'static str,
    pub body_glow: &'static str,
    pub body_inner_glow: &'static str,
    pub channel_inactive: &'static str,
    pub channel_glow: &'static str,
    pub undefined_fill: &'static str,
    pub undefined_stroke: &'static str,
    pub design: &'static str,
    pub personality: &'static str,
    pub gate_active_text: &'static str,
    pub gate_inactive_text: &'static str,
    /// Halo for an active gate sitting in an undefined center
    pub open_gate_halo: &'static str,
    pub open_gate_stroke: &'static str,
    pub design_panel: PanelPalette,
    pub personality_panel: PanelPalette,
    pub summary_fill: &'static str,
    pub summary_border: &'static str,
    pub label: &'static str,
    pub value: &'static str,
    pub badge_fill: &'static str,
    pub badge_border: &'static str,
    pub badge_text: &'static str,
    /// Natal wheel ink
    pub ink: &'static str,
    pub ink_muted: &'static str,
    pub angle_cusp: &'static str,
}

static LIGHT: Palette = Palette {
    background: "#FFFFFF",
    gradient_start: "#FDFEFE",
    gradient_end: "#F4F6F7",
    body_fill: "#E8E8E8",
    body_stroke: "#BDC3C7",
    body_glow: "#B8C5D6",
    body_inner_glow: "#D4DCE8",
    channel_inactive: "#C8CDD2",
    channel_glow: "#D6DBDF",
    undefined_fill: "#FDFEFE",
    undefined_stroke: "#D5D8DC",
    design: "#C0392B",
    personality: "#2C3E50",
    gate_active_text: "#1A1A1A",
    gate_inactive_text: "#7F8C8D",
    open_gate_halo: "#E8D5F2",
    open_gate_stroke: "#9B59B6",
    design_panel: PanelPalette {
        fill: "#FFF5F5",
        border: "#C45555",
        divider: "#E8B8B8",
        zebra: "#FFF0F0",
        header: "#C0392B",
        text: "#C0392B",
    },
    personality_panel: PanelPalette {
        fill: "#F8F8F8",
        border: "#606060",
        divider: "#D0D0D0",
        zebra: "#F0F0F0",
        header: "#2C3E50",
        text: "#2C3E50",
    },
    summary_fill: "#FAFBFC",
    summary_border: "#E8EBED",
    label: "#7F8C8D",
    value: "#2C3E50",
    badge_fill: "#EBF5FB",
    badge_border: "#85C1E9",
    badge_text: "#2980B9",
    ink: "#000000",
    ink_muted: "#CCCCCC",
    angle_cusp: "#FF0000",
};

static DARK: Palette = Palette {
    background: "#1E1E1E",
    gradient_start: "#1A1A1A",
    gradient_end: "#242424",
    body_fill: "#404040",
    body_stroke: "#808080",
    body_glow: "#555555",
    body_inner_glow: "#4A4A4A",
    channel_inactive: "#888888",
    channel_glow: "#666666",
    undefined_fill: "#2A2A2A",
    undefined_stroke: "#606060",
    design: "#FF40BF",
    personality: "#4488FF",
    gate_active_text: "#1A1A1A",
    gate_inactive_text: "#CCCCCC",
    open_gate_halo: "#E8D5F2",
    open_gate_stroke: "#9B59B6",
    design_panel: PanelPalette {
        fill: "#2A182A",
        border: "#DD44BB",
        divider: "#442244",
        zebra: "#321E32",
        header: "#FF66CC",
        text: "#FF40BF",
    },
    personality_panel: PanelPalette {
        fill: "#1A2035",
        border: "#5588DD",
        divider: "#2A3550",
        zebra: "#1F2840",
        header: "#66AAFF",
        text: "#4488FF",
    },
    summary_fill: "#262626",
    summary_border: "#3A3A3A",
    label: "#9A9A9A",
    value: "#E6E6E6",
    badge_fill: "#1A2035",
    badge_border: "#5588DD",
    badge_text: "#66AAFF",
    ink: "#E6E6E6",
    ink_muted: "#555555",
    angle_cusp: "#FF5555",
};
