//! Bodygraph geometry: center shapes, gate anchors, channel paths and the
//! body silhouette, in a 240×320 coordinate space.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use super::RenderError;
use super::svg::num;
use crate::humandesign::{Center, CHANNELS};

pub const BODYGRAPH_WIDTH: f64 = 240.0;
pub const BODYGRAPH_HEIGHT: f64 = 320.0;

const BODY_OUTLINE: &str = "M120 2 C 150 2 158 30 152 56 C 150 70 140 84 150 96 \
C 190 104 232 120 236 170 L 236 318 L 4 318 L 4 170 \
C 8 120 50 104 90 96 C 100 84 90 70 88 56 C 82 30 90 2 120 2 Z";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CenterShape {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Path { d: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodygraphLayout {
    pub width: f64,
    pub height: f64,
    pub body_outline: String,
    pub centers: BTreeMap<Center, CenterShape>,
    /// Gate number -> disc center
    pub gates: BTreeMap<u8, Point>,
    /// Half-channel path overrides keyed by gate. By default a gate draws a
    /// straight line to the midpoint of each channel it belongs to.
    #[serde(default)]
    pub channels: BTreeMap<u8, String>,
}

impl Default for BodygraphLayout {
    fn default() -> Self {
        Self::standard()
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> CenterShape {
    CenterShape::Rect { x, y, w, h }
}

fn path(d: &str) -> CenterShape {
    CenterShape::Path { d: d.to_string() }
}

const GATE_ANCHORS: [(u8, f64, f64); 64] = [
    // Head
    (64, 108.0, 44.0),
    (61, 120.0, 44.0),
    (63, 132.0, 44.0),
    // Ajna
    (47, 108.0, 66.0),
    (24, 120.0, 66.0),
    (4, 132.0, 66.0),
    (17, 110.0, 78.0),
    (43, 120.0, 90.0),
    (11, 130.0, 78.0),
    // Throat
    (62, 108.0, 116.0),
    (23, 120.0, 116.0),
    (56, 132.0, 116.0),
    (16, 104.0, 128.0),
    (20, 104.0, 140.0),
    (35, 136.0, 124.0),
    (12, 136.0, 134.0),
    (45, 136.0, 143.0),
    (31, 110.0, 148.0),
    (8, 119.0, 148.0),
    (33, 128.0, 148.0),
    // G
    (7, 112.0, 176.0),
    (1, 120.0, 170.0),
    (13, 128.0, 176.0),
    (10, 102.0, 190.0),
    (25, 138.0, 190.0),
    (15, 112.0, 204.0),
    (2, 120.0, 210.0),
    (46, 128.0, 204.0),
    // Heart
    (21, 176.0, 200.0),
    (51, 158.0, 216.0),
    (26, 168.0, 216.0),
    (40, 182.0, 216.0),
    // Spleen
    (48, 24.0, 226.0),
    (57, 34.0, 232.0),
    (44, 44.0, 238.0),
    (50, 54.0, 245.0),
    (32, 40.0, 254.0),
    (28, 30.0, 260.0),
    (18, 22.0, 266.0),
    // Solar Plexus
    (36, 216.0, 226.0),
    (22, 206.0, 232.0),
    (37, 196.0, 238.0),
    (6, 186.0, 245.0),
    (49, 200.0, 254.0),
    (55, 210.0, 260.0),
    (30, 218.0, 266.0),
    // Sacral
    (5, 108.0, 236.0),
    (14, 120.0, 236.0),
    (29, 132.0, 236.0),
    (34, 104.0, 248.0),
    (27, 104.0, 260.0),
    (59, 136.0, 256.0),
    (42, 110.0, 268.0),
    (3, 120.0, 268.0),
    (9, 130.0, 268.0),
    // Root
    (53, 110.0, 284.0),
    (60, 120.0, 284.0),
    (52, 130.0, 284.0),
    (54, 104.0, 292.0),
    (38, 104.0, 301.0),
    (58, 104.0, 310.0),
    (19, 136.0, 292.0),
    (39, 136.0, 301.0),
    (41, 136.0, 310.0),
];

impl BodygraphLayout {
    /// The built-in layout.
    pub fn standard() -> Self {
        let mut centers = BTreeMap::new();
        centers.insert(Center::Head, path("M120 8 L140 48 L100 48 Z"));
        centers.insert(Center::Ajna, path("M100 62 L140 62 L120 100 Z"));
        centers.insert(Center::Throat, rect(100.0, 112.0, 40.0, 40.0));
        centers.insert(Center::G, path("M120 166 L144 190 L120 214 L96 190 Z"));
        centers.insert(Center::Heart, path("M178 192 L190 222 L150 222 Z"));
        centers.insert(Center::Spleen, path("M18 218 L18 272 L64 245 Z"));
        centers.insert(Center::SolarPlexus, path("M222 218 L222 272 L176 245 Z"));
        centers.insert(Center::Sacral, rect(100.0, 230.0, 40.0, 44.0));
        centers.insert(Center::Root, rect(100.0, 279.0, 40.0, 37.0));

        let gates = GATE_ANCHORS
            .iter()
            .map(|(gate, x, y)| (*gate, Point { x: *x, y: *y }))
            .collect();

        Self {
            width: BODYGRAPH_WIDTH,
            height: BODYGRAPH_HEIGHT,
            body_outline: BODY_OUTLINE.to_string(),
            centers,
            gates,
            channels: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let layout: Self =
            serde_json::from_str(json).map_err(|e| RenderError::Layout(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RenderError::Layout(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let layout = Self::from_json(&content)?;
        info!("Loaded bodygraph layout from {}", path.display());
        Ok(layout)
    }

    /// Every center and all 64 gates must be placed.
    pub fn validate(&self) -> Result<(), RenderError> {
        if let Some(missing) = Center::ALL.iter().find(|c| !self.centers.contains_key(c)) {
            return Err(RenderError::Layout(format!(
                "Layout has no shape for the {} center",
                missing
            )));
        }
        if let Some(missing) = (1..=64u8).find(|g| !self.gates.contains_key(g)) {
            return Err(RenderError::Layout(format!(
                "Layout has no anchor for gate {}",
                missing
            )));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(RenderError::Layout("Layout size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn gate(&self, gate: u8) -> Option<Point> {
        self.gates.get(&gate).copied()
    }

    /// SVG path data for the half channels leaving `gate`.
    pub fn half_channel_path(&self, gate: u8) -> Option<String> {
        if let Some(d) = self.channels.get(&gate) {
            return Some(d.clone());
        }
        let from = self.gate(gate)?;
        let segments: Vec<String> = CHANNELS
            .iter()
            .filter_map(|c| c.partner(gate))
            .filter_map(|partner| self.gate(partner))
            .map(|to| {
                format!(
                    "M{} {} L{} {}",
                    num(from.x),
                    num(from.y),
                    num((from.x + to.x) / 2.0),
                    num((from.y + to.y) / 2.0)
                )
            })
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(segments.join(" "))
        }
    }

    /// Half-channel paths for every placed gate, in gate order.
    pub fn half_channel_paths(&self) -> Vec<(u8, String)> {
        self.gates
            .keys()
            .filter_map(|gate| self.half_channel_path(*gate).map(|d| (*gate, d)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_is_complete() {
        let layout = BodygraphLayout::standard();
        layout.validate().unwrap();
        assert_eq!(layout.gates.len(), 64);
        assert_eq!(layout.half_channel_paths().len(), 64);
    }

    #[test]
    fn test_gate_anchors_are_inside_canvas() {
        let layout = BodygraphLayout::standard();
        for (gate, p) in &layout.gates {
            assert!(
                p.x > 0.0 && p.x < BODYGRAPH_WIDTH && p.y > 0.0 && p.y < BODYGRAPH_HEIGHT,
                "gate {} outside canvas",
                gate
            );
        }
    }

    #[test]
    fn test_gate_anchors_do_not_overlap() {
        let layout = BodygraphLayout::standard();
        let points: Vec<_> = layout.gates.iter().collect();
        for (i, (ga, a)) in points.iter().enumerate() {
            for (gb, b) in &points[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(d >= 8.0, "gates {} and {} are {:.1} apart", ga, gb, d);
            }
        }
    }

    #[test]
    fn test_json_roundtrip_and_override() {
        let mut layout = BodygraphLayout::standard();
        layout.channels.insert(8, "M0 0 L1 1".to_string());
        let json = serde_json::to_string(&layout).unwrap();
        let parsed = BodygraphLayout::from_json(&json).unwrap();
        assert_eq!(parsed.half_channel_path(8).unwrap(), "M0 0 L1 1");
        assert_eq!(parsed, layout);
    }

    #[test]
    fn test_multi_channel_gate_has_one_segment_per_channel() {
        let layout = BodygraphLayout::standard();
        // 20 joins 57, 34 and 10
        let d = layout.half_channel_path(20).unwrap();
        assert_eq!(d.matches('M').count(), 3);
        assert_eq!(layout.half_channel_path(1).unwrap().matches('M').count(), 1);
    }

    #[test]
    fn test_incomplete_layout_rejected() {
        let mut layout = BodygraphLayout::standard();
        layout.gates.remove(&33);
        let json = serde_json::to_string(&layout).unwrap();
        let err = BodygraphLayout::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("gate 33"));
    }
}
