//! Natal chart wheel rendering.
//!
//! 0° Aries sits at nine o'clock and the zodiac runs counter-clockwise.

use super::svg::SvgDocument;
use super::theme::{Palette, Theme};
use crate::astrology::{AspectKind, NatalChart};
use crate::ephemeris::Body;
use crate::models::{angular_distance, format_degree, Element, Sign};

pub const CANVAS_WIDTH: f64 = 890.0;
pub const CANVAS_HEIGHT: f64 = 580.0;
const CENTER_X: f64 = 440.0;
const CENTER_Y: f64 = 290.0;

const CHART_RADIUS: f64 = 220.0;
const ZODIAC_RING_WIDTH: f64 = 35.0;
const HOUSE_RING_OUTER: f64 = CHART_RADIUS - ZODIAC_RING_WIDTH;
const HOUSE_RING_INNER: f64 = 80.0;
const PLANET_RING_RADIUS: f64 = 195.0;
const ASPECT_RING_RADIUS: f64 = 140.0;

/// Planets closer than this are pushed off the planet ring.
const COLLISION_DEGREES: f64 = 15.0;
const COLLISION_OFFSET: f64 = 20.0;

const FONT_FAMILY: &str = "sans-serif";

/// Canvas position of an ecliptic longitude at `radius`.
pub fn zodiac_to_canvas(longitude: f64, radius: f64) -> (f64, f64) {
    let angle = (180.0 - longitude).to_radians();
    (CENTER_X + radius * angle.cos(), CENTER_Y + radius * angle.sin())
}

fn element_color(element: Element) -> &'static str {
    match element {
        Element::Fire => "#ff7200",
        Element::Earth => "#6b3d00",
        Element::Air => "#69acf1",
        Element::Water => "#2b4972",
    }
}

/// Stroke colour and width for an aspect line.
fn aspect_style(kind: AspectKind) -> (&'static str, &'static str) {
    match kind {
        AspectKind::Conjunction => ("#5757e2", "2"),
        AspectKind::Sextile => ("#d59e28", "1"),
        AspectKind::Square => ("#dc0000", "1.5"),
        AspectKind::Trine => ("#36d100", "1.5"),
        AspectKind::Opposition => ("#510060", "2"),
    }
}

fn planet_color(body: Body, theme: Theme) -> &'static str {
    match theme {
        Theme::Light => match body {
            Body::Sun => "#984b00",
            Body::Moon => "#150052",
            Body::Mercury => "#520800",
            Body::Venus => "#400052",
            Body::Mars => "#540000",
            Body::Jupiter => "#47133d",
            Body::Saturn => "#124500",
            Body::Uranus => "#6f0766",
            Body::Neptune => "#06537f",
            Body::Pluto => "#713f04",
            Body::MeanNode | Body::TrueNode => "#4c1541",
            Body::Chiron => "#666f06",
        },
        Theme::Dark => match body {
            Body::Sun => "#f0a040",
            Body::Moon => "#b0a0ff",
            Body::Mercury => "#e07060",
            Body::Venus => "#d090e0",
            Body::Mars => "#ff6060",
            Body::Jupiter => "#d070c0",
            Body::Saturn => "#80d060",
            Body::Uranus => "#e070d8",
            Body::Neptune => "#60b0e0",
            Body::Pluto => "#e0a060",
            Body::MeanNode | Body::TrueNode => "#d080c0",
            Body::Chiron => "#c0c860",
        },
    }
}

/// Radius for each placement, pushing near-conjunct planets inward or
/// outward alternately.
fn planet_radii(longitudes: &[f64]) -> Vec<f64> {
    let mut radii = Vec::with_capacity(longitudes.len());
    for (i, lon) in longitudes.iter().enumerate() {
        let crowd = longitudes[..i]
            .iter()
            .filter(|other| angular_distance(**other, *lon) < COLLISION_DEGREES)
            .count();
        let radius = match crowd {
            0 => PLANET_RING_RADIUS,
            n if n % 2 == 1 => PLANET_RING_RADIUS - COLLISION_OFFSET,
            _ => PLANET_RING_RADIUS + COLLISION_OFFSET,
        };
        radii.push(radius);
    }
    radii
}

/// Render a natal chart wheel as an SVG document.
pub fn render_natal_chart(chart: &NatalChart, theme: Theme) -> String {
    let palette = theme.palette();
    let mut doc = SvgDocument::new(CANVAS_WIDTH, CANVAS_HEIGHT)
        .with_title(&format!("{} - Birth Chart", chart.name));
    doc.rect(
        0.0,
        0.0,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        &[("fill", palette.background)],
    );

    zodiac_wheel(&mut doc, palette);
    house_cusps(&mut doc, chart, palette);
    aspects(&mut doc, chart);
    planets(&mut doc, chart, theme);
    metadata(&mut doc, chart, palette);
    doc.finish()
}

fn zodiac_wheel(doc: &mut SvgDocument, palette: &Palette) {
    doc.open_group(&[("id", "zodiac_wheel")]);
    doc.circle(
        CENTER_X,
        CENTER_Y,
        CHART_RADIUS,
        &[("fill", "none"), ("stroke", palette.ink), ("stroke-width", "2")],
    );
    doc.circle(
        CENTER_X,
        CENTER_Y,
        HOUSE_RING_OUTER,
        &[("fill", "none"), ("stroke", palette.ink), ("stroke-width", "1")],
    );
    for sign in Sign::ALL {
        let start = sign.start_longitude();
        let (x1, y1) = zodiac_to_canvas(start, HOUSE_RING_OUTER);
        let (x2, y2) = zodiac_to_canvas(start, CHART_RADIUS);
        doc.line(
            x1,
            y1,
            x2,
            y2,
            &[("stroke", palette.ink_muted), ("stroke-width", "1")],
        );
        let (x, y) = zodiac_to_canvas(start + 15.0, CHART_RADIUS - ZODIAC_RING_WIDTH / 2.0);
        doc.text(
            x,
            y + 5.0,
            sign.glyph(),
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "20"),
                ("text-anchor", "middle"),
                ("fill", element_color(sign.element())),
            ],
        );
    }
    doc.close_group();
}

fn house_cusps(doc: &mut SvgDocument, chart: &NatalChart, palette: &Palette) {
    doc.open_group(&[("id", "house_cusps")]);
    doc.circle(
        CENTER_X,
        CENTER_Y,
        HOUSE_RING_INNER,
        &[("fill", "none"), ("stroke", palette.ink_muted), ("stroke-width", "1")],
    );
    for cusp in &chart.houses {
        let angular = matches!(cusp.house, 1 | 4 | 7 | 10);
        let width = if angular { "2" } else { "1" };
        let color = if matches!(cusp.house, 1 | 10) {
            palette.angle_cusp
        } else {
            palette.ink
        };
        let (x1, y1) = zodiac_to_canvas(cusp.longitude, HOUSE_RING_INNER);
        let (x2, y2) = zodiac_to_canvas(cusp.longitude, HOUSE_RING_OUTER);
        doc.line(x1, y1, x2, y2, &[("stroke", color), ("stroke-width", width)]);

        let (lx, ly) = zodiac_to_canvas(cusp.longitude, HOUSE_RING_INNER - 15.0);
        let label = cusp.house.to_string();
        doc.text(
            lx,
            ly + 4.0,
            &label,
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "12"),
                ("text-anchor", "middle"),
                ("fill", palette.angle_cusp),
            ],
        );
    }
    doc.close_group();
}

fn aspects(doc: &mut SvgDocument, chart: &NatalChart) {
    doc.open_group(&[("id", "aspects")]);
    for aspect in &chart.aspects {
        let (Some(a), Some(b)) = (chart.planet(aspect.planet1), chart.planet(aspect.planet2)) else {
            continue;
        };
        let (x1, y1) = zodiac_to_canvas(a.longitude, ASPECT_RING_RADIUS);
        let (x2, y2) = zodiac_to_canvas(b.longitude, ASPECT_RING_RADIUS);
        let (color, width) = aspect_style(aspect.aspect);
        doc.line(
            x1,
            y1,
            x2,
            y2,
            &[
                ("stroke", color),
                ("stroke-width", width),
                ("stroke-opacity", "0.8"),
                ("class", aspect.aspect.name()),
            ],
        );
    }
    doc.close_group();
}

fn planets(doc: &mut SvgDocument, chart: &NatalChart, theme: Theme) {
    let longitudes: Vec<f64> = chart.planets.iter().map(|p| p.longitude).collect();
    let radii = planet_radii(&longitudes);

    doc.open_group(&[("id", "planets")]);
    for (planet, radius) in chart.planets.iter().zip(radii) {
        let color = planet_color(planet.body, theme);
        let (x, y) = zodiac_to_canvas(planet.longitude, radius);
        doc.text(
            x,
            y + 6.0,
            planet.body.glyph(),
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "16"),
                ("font-weight", "bold"),
                ("text-anchor", "middle"),
                ("fill", color),
            ],
        );
        if planet.retrograde {
            doc.text(
                x + 10.0,
                y - 6.0,
                "Rx",
                &[
                    ("font-family", FONT_FAMILY),
                    ("font-size", "8"),
                    ("font-style", "italic"),
                    ("fill", color),
                ],
            );
        }
    }
    doc.close_group();
}

fn metadata(doc: &mut SvgDocument, chart: &NatalChart, palette: &Palette) {
    let text_attrs: [(&str, &str); 3] = [
        ("font-family", FONT_FAMILY),
        ("font-size", "11"),
        ("fill", palette.ink),
    ];

    doc.open_group(&[("id", "metadata")]);
    let title = format!("{} - Birth Chart", chart.name);
    doc.text(
        20.0,
        25.0,
        &title,
        &[
            ("font-family", FONT_FAMILY),
            ("font-size", "20"),
            ("font-weight", "bold"),
            ("fill", palette.ink),
        ],
    );

    let birth = &chart.birth_data;
    let mut lines = vec![format!("{} • {}", birth.date, birth.time)];
    if let Some(place) = &birth.location.place {
        lines.push(place.clone());
    }
    lines.push(format!(
        "{:.4}, {:.4} ({})",
        birth.location.lat, birth.location.lng, birth.location.timezone
    ));
    lines.push(format!("ASC: {}", format_degree(chart.angles.ascendant)));
    lines.push(format!("MC: {}", format_degree(chart.angles.midheaven)));
    lines.push(format!("Houses: {}", chart.house_system));

    let mut y = 50.0;
    for line in &lines {
        doc.text(20.0, y, line, &text_attrs);
        y += 20.0;
    }

    // Right-hand column: balance and lunar phase
    let e = &chart.elements;
    let m = &chart.modalities;
    let summary = [
        format!("Fire {} · Earth {} · Air {} · Water {}", e.fire, e.earth, e.air, e.water),
        format!("Cardinal {} · Fixed {} · Mutable {}", m.cardinal, m.fixed, m.mutable),
        format!(
            "Moon phase: {} ({:.0}%)",
            moon_phase_name(chart),
            chart.lunar_phase.illumination
        ),
    ];
    let mut y = 50.0;
    for line in &summary {
        doc.text(
            CANVAS_WIDTH - 20.0,
            y,
            line,
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "11"),
                ("text-anchor", "end"),
                ("fill", palette.ink),
            ],
        );
        y += 20.0;
    }
    doc.close_group();
}

fn moon_phase_name(chart: &NatalChart) -> String {
    serde_json::to_value(chart.lunar_phase.phase)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aries_point_is_nine_o_clock() {
        let (x, y) = zodiac_to_canvas(0.0, 100.0);
        assert_relative_eq!(x, CENTER_X - 100.0, epsilon = 1e-9);
        assert_relative_eq!(y, CENTER_Y, epsilon = 1e-9);
        // Cancer (90°) sits at the bottom: y grows downward
        let (x, y) = zodiac_to_canvas(90.0, 100.0);
        assert_relative_eq!(x, CENTER_X, epsilon = 1e-9);
        assert_relative_eq!(y, CENTER_Y + 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collision_offsets_alternate() {
        let radii = planet_radii(&[10.0, 12.0, 14.0, 200.0, 359.0]);
        assert_eq!(radii[0], PLANET_RING_RADIUS);
        assert_eq!(radii[1], PLANET_RING_RADIUS - COLLISION_OFFSET);
        assert_eq!(radii[2], PLANET_RING_RADIUS + COLLISION_OFFSET);
        assert_eq!(radii[3], PLANET_RING_RADIUS);
        // 359° crowds 10° and 12° across the Aries point
        assert_eq!(radii[4], PLANET_RING_RADIUS + COLLISION_OFFSET);
    }

    #[test]
    fn test_element_colors() {
        assert_eq!(element_color(Sign::Leo.element()), "#ff7200");
        assert_eq!(element_color(Sign::Pisces.element()), "#2b4972");
    }
}
