//! Chart rendering: SVG generation for the bodygraph and the natal wheel, and
//! conversion to PNG or PDF.

pub mod bodygraph;
pub mod layout;
pub mod natal;
pub mod raster;
pub mod svg;
pub mod theme;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use bodygraph::{render_bodygraph, BodygraphOptions};
pub use layout::{BodygraphLayout, CenterShape, Point};
pub use natal::render_natal_chart;
pub use raster::{Rasterizer, RasterizerOptions};
pub use svg::{escape_xml, SvgDocument};
pub use theme::{Palette, Theme};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid bodygraph layout: {0}")]
    Layout(String),
    #[error("Failed to parse generated SVG: {0}")]
    Svg(String),
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Png(String),
    #[error("PDF conversion failed: {0}")]
    Pdf(String),
}

/// Output image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    Svg,
    #[default]
    Png,
    Pdf,
}

impl ChartFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            ChartFormat::Svg => "image/svg+xml",
            ChartFormat::Png => "image/png",
            ChartFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
            ChartFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChartFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ChartFormat::Svg),
            "png" => Ok(ChartFormat::Png),
            "pdf" => Ok(ChartFormat::Pdf),
            other => Err(format!("Unsupported format '{}', expected svg, png or pdf", other)),
        }
    }
}

/// Rendered image bytes with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub format: ChartFormat,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}
