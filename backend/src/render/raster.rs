//! SVG to PNG and PDF conversion.

use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{ChartFormat, RenderError, RenderedImage};

#[derive(Debug, Clone, PartialEq)]
pub struct RasterizerOptions {
    /// Pixel density multiplier for PNG output
    pub png_scale: f32,
    /// Family used for the generic `sans-serif` and as the fallback
    pub font_family: String,
    pub load_system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
}

impl Default for RasterizerOptions {
    fn default() -> Self {
        Self {
            png_scale: 2.0,
            font_family: "DejaVu Sans".to_string(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// Shared SVG converter. The font database is built once and shared by
/// every conversion.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
    png_scale: f32,
}

impl fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rasterizer")
            .field("fonts", &self.fontdb.len())
            .field("font_family", &self.font_family)
            .field("png_scale", &self.png_scale)
            .finish()
    }
}

impl Rasterizer {
    pub fn new(options: &RasterizerOptions) -> Self {
        let mut db = fontdb::Database::new();
        if options.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &options.font_dirs {
            if dir.is_dir() {
                db.load_fonts_dir(dir);
            } else {
                warn!("Font directory {} does not exist", dir.display());
            }
        }
        db.set_sans_serif_family(options.font_family.clone());
        if db.is_empty() {
            warn!("No fonts loaded; PNG and PDF output will omit text");
        }
        info!(
            "Rasterizer ready: {} font faces, png scale {}",
            db.len(),
            options.png_scale
        );

        let png_scale = if options.png_scale.is_finite() && options.png_scale > 0.0 {
            options.png_scale
        } else {
            1.0
        };
        Self {
            fontdb: Arc::new(db),
            font_family: options.font_family.clone(),
            png_scale,
        }
    }

    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }

    pub fn png_scale(&self) -> f32 {
        self.png_scale
    }

    fn parse(&self, svg: &str) -> Result<usvg::Tree, RenderError> {
        let mut opt = usvg::Options::default();
        opt.font_family = self.font_family.clone();
        opt.fontdb = self.fontdb.clone();
        usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))
    }

    pub fn to_png(&self, svg: &str) -> Result<Vec<u8>, RenderError> {
        let tree = self.parse(svg)?;
        let size = tree.size();
        let width = (size.width() * self.png_scale).ceil().max(1.0) as u32;
        let height = (size.height() * self.png_scale).ceil().max(1.0) as u32;

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.png_scale, self.png_scale),
            &mut pixmap.as_mut(),
        );
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Png(e.to_string()))?;
        debug!("Rendered {}x{} PNG ({} bytes)", width, height, png.len());
        Ok(png)
    }

    pub fn to_pdf(&self, svg: &str) -> Result<Vec<u8>, RenderError> {
        let tree = self.parse(svg)?;
        let pdf = svg2pdf::to_pdf(
            &tree,
            svg2pdf::ConversionOptions::default(),
            svg2pdf::PageOptions::default(),
        )
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
        debug!("Rendered PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }

    /// Encode an SVG document in the requested format.
    pub fn render(&self, svg: String, format: ChartFormat) -> Result<RenderedImage, RenderError> {
        let bytes = match format {
            ChartFormat::Svg => svg.into_bytes(),
            ChartFormat::Png => self.to_png(&svg)?,
            ChartFormat::Pdf => self.to_pdf(&svg)?,
        };
        Ok(RenderedImage { format, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20\" height=\"10\" viewBox=\"0 0 20 10\"><rect x=\"0\" y=\"0\" width=\"20\" height=\"10\" fill=\"#C0392B\"/></svg>";

    fn rasterizer(scale: f32) -> Rasterizer {
        Rasterizer::new(&RasterizerOptions {
            png_scale: scale,
            load_system_fonts: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_png_output() {
        let png = rasterizer(2.0).to_png(SQUARE).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR width and height, big endian
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 40);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 20);
    }

    #[test]
    fn test_pdf_output() {
        let pdf = rasterizer(1.0).to_pdf(SQUARE).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_svg_passthrough() {
        let image = rasterizer(1.0)
            .render(SQUARE.to_string(), ChartFormat::Svg)
            .unwrap();
        assert_eq!(image.bytes, SQUARE.as_bytes());
        assert_eq!(image.media_type(), "image/svg+xml");
    }

    #[test]
    fn test_invalid_svg_is_an_error() {
        let err = rasterizer(1.0).to_png("<svg").unwrap_err();
        assert!(matches!(err, RenderError::Svg(_)));
    }

    #[test]
    fn test_bad_scale_falls_back() {
        assert_eq!(rasterizer(0.0).png_scale(), 1.0);
        assert_eq!(rasterizer(f32::NAN).png_scale(), 1.0);
    }
}
