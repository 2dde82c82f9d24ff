//! Centers, the gates they hold, and the 36 channels joining them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    #[serde(rename = "Solar Plexus")]
    SolarPlexus,
    Spleen,
    Sacral,
    Root,
}

impl Center {
    pub const ALL: [Center; 9] = [
        Center::Head,
        Center::Ajna,
        Center::Throat,
        Center::G,
        Center::Heart,
        Center::SolarPlexus,
        Center::Spleen,
        Center::Sacral,
        Center::Root,
    ];

    pub const MOTORS: [Center; 4] = [
        Center::Heart,
        Center::SolarPlexus,
        Center::Sacral,
        Center::Root,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Center::Head => "Head",
            Center::Ajna => "Ajna",
            Center::Throat => "Throat",
            Center::G => "G",
            Center::Heart => "Heart",
            Center::SolarPlexus => "Solar Plexus",
            Center::Spleen => "Spleen",
            Center::Sacral => "Sacral",
            Center::Root => "Root",
        }
    }

    pub fn is_motor(self) -> bool {
        Self::MOTORS.contains(&self)
    }

    /// Gates belonging to this center.
    pub fn gates(self) -> &'static [u8] {
        match self {
            Center::Head => &[64, 61, 63],
            Center::Ajna => &[47, 24, 4, 17, 43, 11],
            Center::Throat => &[62, 23, 56, 35, 12, 45, 33, 8, 31, 20, 16],
            Center::G => &[1, 13, 25, 46, 2, 15, 10, 7],
            Center::Heart => &[21, 40, 26, 51],
            Center::SolarPlexus => &[36, 22, 37, 6, 49, 55, 30],
            Center::Spleen => &[48, 57, 44, 50, 32, 28, 18],
            Center::Sacral => &[5, 14, 29, 59, 9, 3, 42, 27, 34],
            Center::Root => &[53, 60, 52, 19, 39, 41, 58, 38, 54],
        }
    }

    /// Center holding `gate`, if it is a valid gate number.
    pub fn of_gate(gate: u8) -> Option<Center> {
        Self::ALL.into_iter().find(|c| c.gates().contains(&gate))
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A channel joins two gates in different centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub gates: (u8, u8),
    pub name: &'static str,
}

impl Channel {
    const fn new(a: u8, b: u8, name: &'static str) -> Self {
        Self { gates: (a, b), name }
    }

    pub fn contains(&self, gate: u8) -> bool {
        self.gates.0 == gate || self.gates.1 == gate
    }

    /// The other gate of this channel.
    pub fn partner(&self, gate: u8) -> Option<u8> {
        if self.gates.0 == gate {
            Some(self.gates.1)
        } else if self.gates.1 == gate {
            Some(self.gates.0)
        } else {
            None
        }
    }

    /// The two centers this channel connects.
    pub fn centers(&self) -> (Center, Center) {
        // Every channel gate is listed in exactly one center
        let a = Center::of_gate(self.gates.0).unwrap_or(Center::G);
        let b = Center::of_gate(self.gates.1).unwrap_or(Center::G);
        (a, b)
    }

    /// `a-b` key with the lower gate first.
    pub fn key(&self) -> String {
        let (a, b) = self.gates;
        format!("{}-{}", a.min(b), a.max(b))
    }
}

pub static CHANNELS: [Channel; 36] = [
    Channel::new(64, 47, "Abstraction"),
    Channel::new(61, 24, "Awareness"),
    Channel::new(63, 4, "Logic"),
    Channel::new(17, 62, "Acceptance"),
    Channel::new(43, 23, "Structuring"),
    Channel::new(11, 56, "Curiosity"),
    Channel::new(16, 48, "The Wavelength"),
    Channel::new(20, 57, "The Brainwave"),
    Channel::new(20, 34, "Charisma"),
    Channel::new(20, 10, "Awakening"),
    Channel::new(31, 7, "The Alpha"),
    Channel::new(8, 1, "Inspiration"),
    Channel::new(33, 13, "The Prodigal"),
    Channel::new(45, 21, "Money"),
    Channel::new(35, 36, "Transitoriness"),
    Channel::new(12, 22, "Openness"),
    Channel::new(32, 54, "Transformation"),
    Channel::new(28, 38, "Struggle"),
    Channel::new(57, 34, "Power"),
    Channel::new(50, 27, "Preservation"),
    Channel::new(18, 58, "Judgment"),
    Channel::new(10, 34, "Exploration"),
    Channel::new(15, 5, "Rhythm"),
    Channel::new(2, 14, "The Beat"),
    Channel::new(46, 29, "Discovery"),
    Channel::new(10, 57, "Perfected Form"),
    Channel::new(25, 51, "Initiation"),
    Channel::new(59, 6, "Mating"),
    Channel::new(42, 53, "Maturation"),
    Channel::new(3, 60, "Mutation"),
    Channel::new(9, 52, "Concentration"),
    Channel::new(26, 44, "Surrender"),
    Channel::new(40, 37, "Community"),
    Channel::new(49, 19, "Synthesis"),
    Channel::new(55, 39, "Emoting"),
    Channel::new(30, 41, "Recognition"),
];

/// Channel partners of `gate`, in channel-table order.
pub fn harmonic_gates(gate: u8) -> impl Iterator<Item = u8> {
    CHANNELS.iter().filter_map(move |c| c.partner(gate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_every_gate_in_exactly_one_center() {
        let mut seen = BTreeSet::new();
        for center in Center::ALL {
            for gate in center.gates() {
                assert!(seen.insert(*gate), "gate {} listed twice", gate);
            }
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn test_channels_join_distinct_centers() {
        for channel in CHANNELS {
            let (a, b) = channel.centers();
            assert_ne!(a, b, "channel {}", channel.key());
        }
    }

    #[test]
    fn test_channel_keys_unique() {
        let keys: BTreeSet<String> = CHANNELS.iter().map(|c| c.key()).collect();
        assert_eq!(keys.len(), 36);
    }

    #[test]
    fn test_harmonic_gates() {
        assert_eq!(harmonic_gates(1).collect::<Vec<_>>(), vec![8]);
        assert_eq!(harmonic_gates(20).collect::<Vec<_>>(), vec![57, 34, 10]);
        assert_eq!(harmonic_gates(34).collect::<Vec<_>>(), vec![20, 57, 10]);
    }

    #[test]
    fn test_of_gate() {
        assert_eq!(Center::of_gate(36), Some(Center::SolarPlexus));
        assert_eq!(Center::of_gate(0), None);
        assert_eq!(Center::of_gate(65), None);
    }
}
