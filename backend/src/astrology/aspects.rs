//! Major aspects between chart points.

use serde::{Deserialize, Serialize};

use crate::ephemeris::{Body, PlanetaryPosition};
use crate::models::angular_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    /// Checked in this order; a pair takes the first aspect within orb.
    pub const ALL: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    pub fn angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
        }
    }

    pub fn orb(self) -> f64 {
        match self {
            AspectKind::Sextile => 6.0,
            _ => 8.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub planet1: Body,
    pub planet2: Body,
    pub aspect: AspectKind,
    /// Actual separation in degrees (0-180)
    pub angle: f64,
    /// Distance from exact
    pub orb: f64,
    pub applying: bool,
}

/// Days to project forward when deciding applying vs separating.
const PROJECTION_STEP: f64 = 0.1;

/// Aspect between two positions, if any is within orb.
pub fn find_aspect(a: &PlanetaryPosition, b: &PlanetaryPosition) -> Option<(AspectKind, f64, f64, bool)> {
    let separation = angular_distance(a.longitude, b.longitude);
    AspectKind::ALL.into_iter().find_map(|kind| {
        let orb = (separation - kind.angle()).abs();
        if orb > kind.orb() {
            return None;
        }
        let future = angular_distance(
            a.longitude + a.speed * PROJECTION_STEP,
            b.longitude + b.speed * PROJECTION_STEP,
        );
        let applying = (future - kind.angle()).abs() < orb;
        Some((kind, separation, orb, applying))
    })
}

/// Aspects between every pair of bodies, in input order.
pub fn calculate_aspects(positions: &[(Body, PlanetaryPosition)]) -> Vec<Aspect> {
    let mut aspects = Vec::new();
    for (i, (body1, pos1)) in positions.iter().enumerate() {
        for (body2, pos2) in &positions[i + 1..] {
            if let Some((aspect, angle, orb, applying)) = find_aspect(pos1, pos2) {
                aspects.push(Aspect {
                    planet1: *body1,
                    planet2: *body2,
                    aspect,
                    angle,
                    orb,
                    applying,
                });
            }
        }
    }
    aspects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(longitude: f64, speed: f64) -> PlanetaryPosition {
        PlanetaryPosition::new(longitude, 0.0, speed)
    }

    #[test]
    fn test_conjunction_across_aries() {
        let (kind, angle, orb, _) = find_aspect(&pos(358.0, 1.0), &pos(3.0, 0.1)).unwrap();
        assert_eq!(kind, AspectKind::Conjunction);
        assert!((angle - 5.0).abs() < 1e-9);
        assert!((orb - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sextile_orb_is_tighter() {
        assert!(find_aspect(&pos(0.0, 0.0), &pos(66.5, 0.0)).is_none());
        assert_eq!(
            find_aspect(&pos(0.0, 0.0), &pos(65.5, 0.0)).map(|a| a.0),
            Some(AspectKind::Sextile)
        );
    }

    #[test]
    fn test_applying_and_separating() {
        // Faster body behind the slower one closes the gap
        let (_, _, _, applying) = find_aspect(&pos(85.0, 1.0), &pos(0.0, 0.0)).unwrap();
        assert!(applying);
        let (_, _, _, applying) = find_aspect(&pos(95.0, 1.0), &pos(0.0, 0.0)).unwrap();
        assert!(!applying);
    }

    #[test]
    fn test_pairs_listed_once() {
        let positions = vec![
            (Body::Sun, pos(0.0, 1.0)),
            (Body::Moon, pos(120.0, 13.0)),
            (Body::Mars, pos(240.0, 0.5)),
        ];
        let aspects = calculate_aspects(&positions);
        assert_eq!(aspects.len(), 3);
        assert!(aspects.iter().all(|a| a.aspect == AspectKind::Trine));
        assert_eq!(aspects[0].planet1, Body::Sun);
        assert_eq!(aspects[0].planet2, Body::Moon);
    }
}
