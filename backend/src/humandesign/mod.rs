//! Human Design bodygraph engine.
//!
//! ```text
//! birth moment ──► Personality positions ─┐
//!      │                                  ├─► gate/line activations ─► channels ─► centers
//!      └─► Sun - 88° ──► Design positions ┘            │                              │
//!                                                      ▼                              ▼
//!                                              dignity annotations      type / authority / definition
//! ```

pub mod activation;
pub mod bodygraph;
pub mod centers;
pub mod chart;
pub mod dignity;
pub mod gates;
pub mod profile;

pub use activation::{Activation, HdPlanet, Imprint, Side};
pub use bodygraph::{Authority, Bodygraph, Definition, HdType};
pub use centers::{Center, Channel, CHANNELS};
pub use chart::{
    calculate_human_design, design_moment, ChannelActivation, GateActivation, HumanDesignChart,
    HumanDesignError, SideActivations,
};
pub use dignity::{DignityResult, DignityState, DignityTable, DignityTableError};
pub use gates::GatePosition;
pub use profile::{Arrow, CrossAngle, IncarnationCross, Profile, Quarter, Variables};
