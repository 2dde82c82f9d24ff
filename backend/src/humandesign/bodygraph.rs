//! Channel and center definition, and the type/authority/definition rules
//! derived from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::centers::{Center, Channel, CHANNELS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdType {
    Generator,
    #[serde(rename = "Manifesting Generator")]
    ManifestingGenerator,
    Projector,
    Manifestor,
    Reflector,
}

impl HdType {
    pub fn name(self) -> &'static str {
        match self {
            HdType::Generator => "Generator",
            HdType::ManifestingGenerator => "Manifesting Generator",
            HdType::Projector => "Projector",
            HdType::Manifestor => "Manifestor",
            HdType::Reflector => "Reflector",
        }
    }

    pub fn strategy(self) -> &'static str {
        match self {
            HdType::Generator | HdType::ManifestingGenerator => "Wait to Respond",
            HdType::Projector => "Wait for the Invitation",
            HdType::Manifestor => "Inform",
            HdType::Reflector => "Wait a Lunar Cycle",
        }
    }

    pub fn signature(self) -> &'static str {
        match self {
            HdType::Generator | HdType::ManifestingGenerator => "Satisfaction",
            HdType::Projector => "Success",
            HdType::Manifestor => "Peace",
            HdType::Reflector => "Surprise",
        }
    }

    pub fn not_self_theme(self) -> &'static str {
        match self {
            HdType::Generator | HdType::ManifestingGenerator => "Frustration",
            HdType::Projector => "Bitterness",
            HdType::Manifestor => "Anger",
            HdType::Reflector => "Disappointment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    Emotional,
    Sacral,
    Splenic,
    #[serde(rename = "Ego Manifested")]
    EgoManifested,
    #[serde(rename = "Ego Projected")]
    EgoProjected,
    #[serde(rename = "Self-Projected")]
    SelfProjected,
    Mental,
    Lunar,
}

impl Authority {
    pub fn name(self) -> &'static str {
        match self {
            Authority::Emotional => "Emotional",
            Authority::Sacral => "Sacral",
            Authority::Splenic => "Splenic",
            Authority::EgoManifested => "Ego Manifested",
            Authority::EgoProjected => "Ego Projected",
            Authority::SelfProjected => "Self-Projected",
            Authority::Mental => "Mental",
            Authority::Lunar => "Lunar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Definition {
    #[serde(rename = "No Definition")]
    None,
    #[serde(rename = "Single Definition")]
    Single,
    #[serde(rename = "Split Definition")]
    Split,
    #[serde(rename = "Triple Split Definition")]
    TripleSplit,
    #[serde(rename = "Quadruple Split Definition")]
    QuadrupleSplit,
}

impl Definition {
    pub fn from_components(count: usize) -> Self {
        match count {
            0 => Definition::None,
            1 => Definition::Single,
            2 => Definition::Split,
            3 => Definition::TripleSplit,
            _ => Definition::QuadrupleSplit,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Definition::None => "No Definition",
            Definition::Single => "Single Definition",
            Definition::Split => "Split Definition",
            Definition::TripleSplit => "Triple Split Definition",
            Definition::QuadrupleSplit => "Quadruple Split Definition",
        }
    }
}

/// Definition state of a bodygraph, derived purely from its active gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bodygraph {
    active_gates: BTreeSet<u8>,
    channels: Vec<Channel>,
    defined: BTreeSet<Center>,
}

impl Bodygraph {
    pub fn from_gates<I: IntoIterator<Item = u8>>(gates: I) -> Self {
        let active_gates: BTreeSet<u8> = gates.into_iter().collect();
        let channels: Vec<Channel> = CHANNELS
            .iter()
            .filter(|c| active_gates.contains(&c.gates.0) && active_gates.contains(&c.gates.1))
            .copied()
            .collect();
        let defined = channels
            .iter()
            .flat_map(|c| {
                let (a, b) = c.centers();
                [a, b]
            })
            .collect();
        Self {
            active_gates,
            channels,
            defined,
        }
    }

    pub fn active_gates(&self) -> &BTreeSet<u8> {
        &self.active_gates
    }

    /// Defined channels in channel-table order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn defined_centers(&self) -> &BTreeSet<Center> {
        &self.defined
    }

    pub fn undefined_centers(&self) -> Vec<Center> {
        Center::ALL
            .into_iter()
            .filter(|c| !self.defined.contains(c))
            .collect()
    }

    pub fn is_defined(&self, center: Center) -> bool {
        self.defined.contains(&center)
    }

    fn neighbours(&self, center: Center) -> impl Iterator<Item = Center> + '_ {
        self.channels.iter().filter_map(move |c| {
            let (a, b) = c.centers();
            if a == center {
                Some(b)
            } else if b == center {
                Some(a)
            } else {
                None
            }
        })
    }

    /// Centers reachable from `start` through defined channels (including `start`).
    pub fn reachable_from(&self, start: Center) -> BTreeSet<Center> {
        let mut seen = BTreeSet::new();
        if !self.is_defined(start) {
            return seen;
        }
        let mut stack = vec![start];
        while let Some(center) = stack.pop() {
            if seen.insert(center) {
                stack.extend(self.neighbours(center).filter(|n| !seen.contains(n)));
            }
        }
        seen
    }

    pub fn connected(&self, a: Center, b: Center) -> bool {
        self.reachable_from(a).contains(&b)
    }

    /// Groups of mutually connected defined centers.
    pub fn components(&self) -> Vec<BTreeSet<Center>> {
        let mut remaining = self.defined.clone();
        let mut groups = Vec::new();
        while let Some(start) = remaining.pop_first() {
            let group = self.reachable_from(start);
            for c in &group {
                remaining.remove(c);
            }
            groups.push(group);
        }
        groups
    }

    pub fn motor_to_throat(&self) -> bool {
        let throat_group = self.reachable_from(Center::Throat);
        Center::MOTORS.iter().any(|m| throat_group.contains(m))
    }

    pub fn hd_type(&self) -> HdType {
        if self.defined.is_empty() {
            return HdType::Reflector;
        }
        match (self.is_defined(Center::Sacral), self.motor_to_throat()) {
            (true, true) => HdType::ManifestingGenerator,
            (true, false) => HdType::Generator,
            (false, true) => HdType::Manifestor,
            (false, false) => HdType::Projector,
        }
    }

    pub fn authority(&self) -> Authority {
        if self.is_defined(Center::SolarPlexus) {
            Authority::Emotional
        } else if self.is_defined(Center::Sacral) {
            Authority::Sacral
        } else if self.is_defined(Center::Spleen) {
            Authority::Splenic
        } else if self.is_defined(Center::Heart) {
            if self.connected(Center::Heart, Center::Throat) {
                Authority::EgoManifested
            } else {
                Authority::EgoProjected
            }
        } else if self.connected(Center::G, Center::Throat) {
            Authority::SelfProjected
        } else if !self.defined.is_empty() {
            Authority::Mental
        } else {
            Authority::Lunar
        }
    }

    pub fn definition(&self) -> Definition {
        Definition::from_components(self.components().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_gates_is_reflector() {
        let bg = Bodygraph::from_gates(Vec::new());
        assert_eq!(bg.hd_type(), HdType::Reflector);
        assert_eq!(bg.authority(), Authority::Lunar);
        assert_eq!(bg.definition(), Definition::None);
        assert_eq!(bg.undefined_centers().len(), 9);
    }

    #[test]
    fn test_hanging_gates_define_nothing() {
        let bg = Bodygraph::from_gates([1, 2, 3, 4]);
        assert!(bg.channels().is_empty());
        assert!(bg.defined_centers().is_empty());
    }

    #[test]
    fn test_sacral_only_is_generator() {
        // 2-14 joins G and Sacral
        let bg = Bodygraph::from_gates([2, 14]);
        assert_eq!(bg.hd_type(), HdType::Generator);
        assert_eq!(bg.authority(), Authority::Sacral);
        assert_eq!(bg.definition(), Definition::Single);
    }

    #[test]
    fn test_sacral_to_throat_is_manifesting_generator() {
        // 34-20 joins Sacral and Throat
        let bg = Bodygraph::from_gates([34, 20]);
        assert_eq!(bg.hd_type(), HdType::ManifestingGenerator);
    }

    #[test]
    fn test_motor_through_g_to_throat_counts() {
        // Root-Sacral via 3-60 and Sacral-G via 2-14, G-Throat via 1-8
        let bg = Bodygraph::from_gates([3, 60, 2, 14, 1, 8]);
        assert!(bg.motor_to_throat());
        assert_eq!(bg.hd_type(), HdType::ManifestingGenerator);
    }

    #[test]
    fn test_heart_to_throat_is_manifestor_ego() {
        // 21-45 joins Heart and Throat
        let bg = Bodygraph::from_gates([21, 45]);
        assert_eq!(bg.hd_type(), HdType::Manifestor);
        assert_eq!(bg.authority(), Authority::EgoManifested);
    }

    #[test]
    fn test_heart_to_g_is_projector_ego() {
        let bg = Bodygraph::from_gates([25, 51]);
        assert_eq!(bg.hd_type(), HdType::Projector);
        assert_eq!(bg.authority(), Authority::EgoProjected);
    }

    #[test]
    fn test_g_to_throat_is_self_projected() {
        let bg = Bodygraph::from_gates([1, 8]);
        assert_eq!(bg.hd_type(), HdType::Projector);
        assert_eq!(bg.authority(), Authority::SelfProjected);
    }

    #[test]
    fn test_mental_projector() {
        let bg = Bodygraph::from_gates([64, 47, 17, 62]);
        assert_eq!(bg.hd_type(), HdType::Projector);
        assert_eq!(bg.authority(), Authority::Mental);
        assert_eq!(bg.definition(), Definition::Single);
    }

    #[test]
    fn test_emotional_authority_wins_over_sacral() {
        let bg = Bodygraph::from_gates([59, 6, 34, 57]);
        assert_eq!(bg.authority(), Authority::Emotional);
    }

    #[test]
    fn test_split_definitions() {
        // Head-Ajna and Spleen-Root are disjoint
        let split = Bodygraph::from_gates([64, 47, 18, 58]);
        assert_eq!(split.definition(), Definition::Split);
        assert_eq!(split.authority(), Authority::Splenic);

        let triple = Bodygraph::from_gates([64, 47, 18, 58, 25, 51]);
        assert_eq!(triple.definition(), Definition::TripleSplit);
    }

    #[test]
    fn test_center_definition_is_monotonic() {
        let mut gates: Vec<u8> = Vec::new();
        let mut previous = Bodygraph::from_gates(gates.clone());
        for channel in CHANNELS {
            gates.push(channel.gates.0);
            gates.push(channel.gates.1);
            let next = Bodygraph::from_gates(gates.clone());
            assert!(previous.defined_centers().is_subset(next.defined_centers()));
            assert!(previous.channels().len() <= next.channels().len());
            previous = next;
        }
        assert_eq!(previous.defined_centers().len(), 9);
    }
}
