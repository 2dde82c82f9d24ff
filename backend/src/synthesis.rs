//! Combined astrology and Human Design portraits.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::astrology::{calculate_natal_chart, AstrologyError, NatalChart};
use crate::ephemeris::{Body, Ephemeris};
use crate::humandesign::{
    calculate_human_design, Center, DignityTable, HdPlanet, HumanDesignChart, HumanDesignError,
};
use crate::models::{BirthData, BirthSummary};
use crate::render::{
    render_bodygraph, render_natal_chart, BodygraphLayout, BodygraphOptions, ChartFormat,
    Rasterizer, RenderError, Theme,
};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Astrology(#[from] AstrologyError),
    #[error(transparent)]
    HumanDesign(#[from] HumanDesignError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisNotes {
    pub sun_sign: String,
    pub hd_type: String,
    pub profile: String,
    pub sun_gate: String,
    pub cross_system_resonance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub name: String,
    pub birth_data: BirthSummary,
    pub astrology: NatalChart,
    pub human_design: HumanDesignChart,
    pub synthesis_notes: SynthesisNotes,
}

/// Base64 image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedChart {
    pub format: ChartFormat,
    pub data: String,
}

impl EncodedChart {
    fn new(format: ChartFormat, bytes: &[u8]) -> Self {
        Self {
            format,
            data: STANDARD.encode(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBundle {
    pub astrology_chart: EncodedChart,
    pub bodygraph: EncodedChart,
}

fn notes(natal: &NatalChart, hd: &HumanDesignChart) -> SynthesisNotes {
    let sun = natal.planet(Body::Sun);
    let sun_sign = sun.map(|p| p.sign.name().to_string()).unwrap_or_default();
    let sun_activation = hd.personality.get(HdPlanet::Sun);
    let sun_gate = sun_activation
        .map(|a| format!("{}.{}", a.gate(), a.line()))
        .unwrap_or_default();

    let cross_system_resonance = match (sun, sun_activation) {
        (Some(p), Some(a)) => format!(
            "Sun at {} activates gate {} line {} in the {} center; {} with {} authority",
            p.formatted,
            a.gate(),
            a.line(),
            Center::of_gate(a.gate())
                .map(|c| c.name())
                .unwrap_or("unknown"),
            hd.hd_type.name(),
            hd.authority.name()
        ),
        _ => String::new(),
    };

    SynthesisNotes {
        sun_sign,
        hd_type: hd.hd_type.name().to_string(),
        profile: format!("{} {}", hd.profile.label, hd.profile.name),
        sun_gate,
        cross_system_resonance,
    }
}

/// Calculate both charts for one birth record and cross-reference them.
pub fn synthesize(
    ephemeris: &dyn Ephemeris,
    table: &DignityTable,
    birth: &BirthData,
) -> Result<Synthesis, SynthesisError> {
    let astrology = calculate_natal_chart(ephemeris, birth)?;
    let human_design = calculate_human_design(ephemeris, table, birth)?;
    let synthesis_notes = notes(&astrology, &human_design);
    info!("Synthesis for {}: {}", birth.name, synthesis_notes.sun_gate);

    Ok(Synthesis {
        name: birth.name.clone(),
        birth_data: birth.summary(),
        astrology,
        human_design,
        synthesis_notes,
    })
}

/// Render the natal wheel as PNG and the bodygraph as SVG, both base64 encoded.
pub fn render_both(
    ephemeris: &dyn Ephemeris,
    table: &DignityTable,
    layout: &BodygraphLayout,
    rasterizer: &Rasterizer,
    birth: &BirthData,
) -> Result<ChartBundle, SynthesisError> {
    let natal = calculate_natal_chart(ephemeris, birth)?;
    let hd = calculate_human_design(ephemeris, table, birth)?;

    let wheel = rasterizer.to_png(&render_natal_chart(&natal, Theme::Light))?;
    let bodygraph = render_bodygraph(&hd, layout, &BodygraphOptions::default());

    Ok(ChartBundle {
        astrology_chart: EncodedChart::new(ChartFormat::Png, &wheel),
        bodygraph: EncodedChart::new(ChartFormat::Svg, bodygraph.as_bytes()),
    })
}
