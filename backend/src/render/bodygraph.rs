//! Bodygraph SVG rendering.
//!
//! Layers, back to front: background, body silhouette, half channels,
//! centers, gate discs, planetary panels and the optional summary strip.

use super::layout::{BodygraphLayout, CenterShape, Point};
use super::svg::{num, SvgDocument};
use super::theme::{PanelPalette, Palette, Theme};
use crate::humandesign::{
    Activation, Center, HdPlanet, HumanDesignChart, Imprint, Side, SideActivations,
};

pub const PANEL_WIDTH: f64 = 58.0;
pub const SUMMARY_HEIGHT: f64 = 110.0;

const PANEL_TOP: f64 = 8.0;
const PANEL_HEADER_HEIGHT: f64 = 26.0;
const PANEL_ROW_HEIGHT: f64 = 21.0;

const ACTIVE_GATE_RADIUS: f64 = 4.2;
const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodygraphOptions {
    pub panels: bool,
    pub summary: bool,
    pub theme: Theme,
}

impl Default for BodygraphOptions {
    fn default() -> Self {
        Self {
            panels: true,
            summary: false,
            theme: Theme::Light,
        }
    }
}

impl BodygraphOptions {
    /// Canvas size for a layout under these options.
    pub fn canvas_size(&self, layout: &BodygraphLayout) -> (f64, f64) {
        let width = if self.panels {
            layout.width + PANEL_WIDTH * 2.0
        } else {
            layout.width
        };
        let height = if self.summary {
            layout.height + SUMMARY_HEIGHT
        } else {
            layout.height
        };
        (width, height)
    }
}

/// Render a chart onto the bodygraph layout as an SVG document.
pub fn render_bodygraph(
    chart: &HumanDesignChart,
    layout: &BodygraphLayout,
    options: &BodygraphOptions,
) -> String {
    let (width, height) = options.canvas_size(layout);
    let doc = SvgDocument::new(width, height).with_title(&format!("{} - Bodygraph", chart.name));
    let mut painter = Painter {
        doc,
        chart,
        layout,
        theme: options.theme,
        palette: options.theme.palette(),
        offset_x: if options.panels { PANEL_WIDTH } else { 0.0 },
        width,
        height,
    };

    painter.background();
    painter.body();
    painter.channels();
    painter.centers();
    painter.gates();
    if options.panels {
        painter.panel(Side::Design, 0.0);
        painter.panel(Side::Personality, width - PANEL_WIDTH);
    }
    if options.summary {
        painter.summary(layout.height);
    }
    painter.doc.finish()
}

fn center_slug(center: Center) -> String {
    center.name().to_ascii_lowercase().replace(' ', "-")
}

struct Painter<'a> {
    doc: SvgDocument,
    chart: &'a HumanDesignChart,
    layout: &'a BodygraphLayout,
    theme: Theme,
    palette: &'static Palette,
    offset_x: f64,
    width: f64,
    height: f64,
}

impl Painter<'_> {
    fn activation_color(&self, side: Side) -> &'static str {
        match side {
            Side::Design => self.palette.design,
            Side::Personality => self.palette.personality,
        }
    }

    fn translate(&self) -> String {
        format!("translate({},0)", num(self.offset_x))
    }

    fn background(&mut self) {
        self.doc.linear_gradient(
            "background",
            (0.0, 0.0),
            (0.0, 1.0),
            &[
                (0.0, self.palette.gradient_start, 1.0),
                (1.0, self.palette.gradient_end, 1.0),
            ],
        );
        let (w, h) = (self.width, self.height);
        self.doc
            .rect(0.0, 0.0, w, h, &[("fill", self.palette.background)]);
        self.doc.rect(
            0.0,
            0.0,
            w,
            h,
            &[("fill", "url(#background)"), ("opacity", "0.5")],
        );
    }

    fn body(&mut self) {
        self.doc.blur_filter("body-glow", 3.0);
        let transform = self.translate();
        let outline = self.layout.body_outline.clone();
        self.doc
            .open_group(&[("id", "body"), ("transform", transform.as_str())]);
        self.doc.path(
            &outline,
            &[
                ("fill", "none"),
                ("stroke", self.palette.body_glow),
                ("stroke-width", "12"),
                ("stroke-opacity", "0.25"),
                ("filter", "url(#body-glow)"),
            ],
        );
        self.doc.path(
            &outline,
            &[
                ("fill", "none"),
                ("stroke", self.palette.body_inner_glow),
                ("stroke-width", "5"),
                ("stroke-opacity", "0.4"),
            ],
        );
        self.doc.path(
            &outline,
            &[
                ("fill", self.palette.body_fill),
                ("fill-opacity", "0.9"),
                ("stroke", self.palette.body_stroke),
                ("stroke-width", "1.2"),
            ],
        );
        self.doc.close_group();
    }

    fn channels(&mut self) {
        self.doc.blur_filter("channel-glow", 1.5);
        let transform = self.translate();
        self.doc
            .open_group(&[("id", "channels"), ("transform", transform.as_str())]);

        for (gate, d) in self.layout.half_channel_paths() {
            self.doc.path(
                &d,
                &[
                    ("fill", "none"),
                    ("stroke", self.palette.channel_inactive),
                    ("stroke-width", "3"),
                    ("stroke-linecap", "round"),
                    ("stroke-opacity", "0.85"),
                ],
            );

            let Some(imprint) = self.chart.gate_imprint(gate) else {
                continue;
            };
            self.doc.path(
                &d,
                &[
                    ("fill", "none"),
                    ("stroke", self.palette.channel_glow),
                    ("stroke-width", "6"),
                    ("stroke-linecap", "round"),
                    ("stroke-opacity", "0.5"),
                    ("filter", "url(#channel-glow)"),
                ],
            );

            let base = match imprint {
                Imprint::Personality => self.palette.personality,
                Imprint::Design | Imprint::Both => self.palette.design,
            };
            self.doc.path(
                &d,
                &[
                    ("fill", "none"),
                    ("stroke", base),
                    ("stroke-width", "3.5"),
                    ("stroke-linecap", "round"),
                ],
            );
            if imprint == Imprint::Both {
                self.doc.path(
                    &d,
                    &[
                        ("class", "channel-overlay"),
                        ("fill", "none"),
                        ("stroke", self.palette.personality),
                        ("stroke-width", "3.5"),
                        ("stroke-dasharray", "0.5 2"),
                        ("stroke-linecap", "round"),
                    ],
                );
            }
        }
        self.doc.close_group();
    }

    fn centers(&mut self) {
        for center in Center::ALL {
            if self.chart.is_center_defined(center) {
                let colors = self.theme.center(center);
                self.doc.radial_gradient(
                    &format!("center-{}", center_slug(center)),
                    &[(0.0, colors.glow, 1.0), (1.0, colors.defined, 1.0)],
                );
            }
        }

        let transform = self.translate();
        self.doc
            .open_group(&[("id", "centers"), ("transform", transform.as_str())]);
        for (center, shape) in &self.layout.centers {
            let defined = self.chart.is_center_defined(*center);
            let (fill, stroke, width) = if defined {
                (
                    format!("url(#center-{})", center_slug(*center)),
                    self.theme.center(*center).stroke,
                    "2",
                )
            } else {
                (
                    self.palette.undefined_fill.to_string(),
                    self.palette.undefined_stroke,
                    "1.2",
                )
            };
            let id = format!("center-shape-{}", center_slug(*center));
            let attrs = [
                ("id", id.as_str()),
                ("fill", fill.as_str()),
                ("stroke", stroke),
                ("stroke-width", width),
                ("stroke-linejoin", "round"),
            ];
            match shape {
                CenterShape::Rect { x, y, w, h } => {
                    self.doc.rect(*x, *y, *w, *h, &attrs);
                }
                CenterShape::Path { d } => {
                    self.doc.path(d, &attrs);
                }
            }
        }
        self.doc.close_group();
    }

    fn gates(&mut self) {
        let transform = self.translate();
        self.doc
            .open_group(&[("id", "gates"), ("transform", transform.as_str())]);
        let anchors: Vec<(u8, Point)> = self.layout.gates.iter().map(|(g, p)| (*g, *p)).collect();
        for (gate, p) in anchors {
            match self.chart.gate_imprint(gate) {
                Some(imprint) => self.active_gate(gate, p, imprint),
                None => {
                    let label = gate.to_string();
                    self.doc.text(
                        p.x,
                        p.y + 0.85,
                        &label,
                        &[
                            ("font-family", FONT_FAMILY),
                            ("font-size", "2.4"),
                            ("text-anchor", "middle"),
                            ("fill", self.palette.gate_inactive_text),
                        ],
                    );
                }
            }
        }
        self.doc.close_group();
    }

    fn active_gate(&mut self, gate: u8, p: Point, imprint: Imprint) {
        let r = ACTIVE_GATE_RADIUS;
        let halo = match Center::of_gate(gate) {
            Some(center) if self.chart.is_center_defined(center) => self.theme.center(center).glow,
            _ => self.palette.open_gate_halo,
        };
        self.doc
            .circle(p.x, p.y, r + 2.0, &[("fill", halo), ("fill-opacity", "0.4")]);
        self.doc.circle(p.x, p.y, r, &[("fill", "#FFFFFF")]);

        match imprint {
            Imprint::Both => {
                // Design on the left half, Personality on the right
                let left = format!(
                    "M{} {} A{} {} 0 0 0 {} {}",
                    num(p.x),
                    num(p.y - r),
                    num(r),
                    num(r),
                    num(p.x),
                    num(p.y + r)
                );
                let right = format!(
                    "M{} {} A{} {} 0 0 1 {} {}",
                    num(p.x),
                    num(p.y - r),
                    num(r),
                    num(r),
                    num(p.x),
                    num(p.y + r)
                );
                self.doc.path(
                    &left,
                    &[
                        ("class", "gate-split"),
                        ("fill", "none"),
                        ("stroke", self.palette.design),
                        ("stroke-width", "2"),
                    ],
                );
                self.doc.path(
                    &right,
                    &[
                        ("class", "gate-split"),
                        ("fill", "none"),
                        ("stroke", self.palette.personality),
                        ("stroke-width", "2"),
                    ],
                );
            }
            Imprint::Design | Imprint::Personality => {
                let side = if imprint == Imprint::Design {
                    Side::Design
                } else {
                    Side::Personality
                };
                self.doc.circle(
                    p.x,
                    p.y,
                    r,
                    &[
                        ("fill", "none"),
                        ("stroke", self.activation_color(side)),
                        ("stroke-width", "2"),
                    ],
                );
            }
        }

        let label = gate.to_string();
        self.doc.text(
            p.x,
            p.y + 1.1,
            &label,
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "3.2"),
                ("font-weight", "bold"),
                ("text-anchor", "middle"),
                ("fill", self.palette.gate_active_text),
            ],
        );
    }

    fn panel_palette(&self, side: Side) -> &'static PanelPalette {
        match side {
            Side::Design => &self.palette.design_panel,
            Side::Personality => &self.palette.personality_panel,
        }
    }

    fn panel(&mut self, side: Side, x_start: f64) {
        let colors = self.panel_palette(side);
        let chart = self.chart;
        let activations: &SideActivations = chart.side(side);
        let rows = HdPlanet::ORDER.len() as f64;
        let panel_height = PANEL_HEADER_HEIGHT + rows * PANEL_ROW_HEIGHT + 4.0;
        let border_width = match self.theme {
            Theme::Light => "2",
            Theme::Dark => "2.5",
        };

        let id = format!("panel-{}", side.title().to_ascii_lowercase());
        self.doc.open_group(&[("id", id.as_str())]);
        self.doc.rect(
            x_start + 2.0,
            PANEL_TOP,
            PANEL_WIDTH - 4.0,
            panel_height,
            &[
                ("rx", "4"),
                ("fill", colors.fill),
                ("stroke", colors.border),
                ("stroke-width", border_width),
            ],
        );

        let header_y = PANEL_TOP + PANEL_HEADER_HEIGHT / 2.0 + 3.0;
        self.doc.text(
            x_start + PANEL_WIDTH / 2.0,
            header_y,
            side.title(),
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "7"),
                ("font-weight", "bold"),
                ("text-anchor", "middle"),
                ("fill", colors.header),
                ("fill-opacity", "0.9"),
            ],
        );
        let separator_y = header_y + 6.0;
        self.doc.line(
            x_start + 8.0,
            separator_y,
            x_start + PANEL_WIDTH - 8.0,
            separator_y,
            &[
                ("stroke", colors.border),
                ("stroke-width", "1.5"),
                ("stroke-linecap", "round"),
                ("stroke-opacity", "0.8"),
            ],
        );

        // Design reads planet, gate.line, marker toward the body; Personality mirrors it
        let (planet_x, gate_x, marker_x, anchor, arrow_x) = match side {
            Side::Design => (
                x_start + 7.0,
                x_start + 18.0,
                x_start + PANEL_WIDTH - 10.0,
                "start",
                x_start + PANEL_WIDTH + 8.0,
            ),
            Side::Personality => (
                x_start + PANEL_WIDTH - 7.0,
                x_start + PANEL_WIDTH - 18.0,
                x_start + 10.0,
                "end",
                x_start - 8.0,
            ),
        };

        let cells_top = PANEL_TOP + PANEL_HEADER_HEIGHT + 2.0;
        for (i, planet) in HdPlanet::ORDER.iter().enumerate() {
            let cell_top = cells_top + i as f64 * PANEL_ROW_HEIGHT;
            let baseline = cell_top + PANEL_ROW_HEIGHT / 2.0 + 2.0;

            if i % 2 == 0 {
                self.doc.rect(
                    x_start + 3.0,
                    cell_top,
                    PANEL_WIDTH - 6.0,
                    PANEL_ROW_HEIGHT,
                    &[("fill", colors.zebra), ("fill-opacity", "0.5")],
                );
            }
            if i > 0 {
                self.doc.line(
                    x_start + 4.0,
                    cell_top,
                    x_start + PANEL_WIDTH - 4.0,
                    cell_top,
                    &[
                        ("stroke", colors.divider),
                        ("stroke-width", "0.8"),
                        ("stroke-opacity", "0.6"),
                    ],
                );
            }

            let activation: Option<&Activation> = activations.get(*planet);
            self.doc.text(
                planet_x,
                baseline + 0.5,
                planet.glyph(),
                &[
                    ("font-family", FONT_FAMILY),
                    ("font-size", "8"),
                    ("text-anchor", anchor),
                    ("fill", colors.text),
                ],
            );
            let gate_line = match activation {
                Some(a) => format!("{}.{}", a.gate(), a.line()),
                None => "–.–".to_string(),
            };
            self.doc.text(
                gate_x,
                baseline,
                &gate_line,
                &[
                    ("font-family", FONT_FAMILY),
                    ("font-size", "5.5"),
                    ("font-weight", "bold"),
                    ("text-anchor", anchor),
                    ("fill", colors.text),
                ],
            );

            if let Some(marker) = activation.and_then(|a| a.dignity.state.marker()) {
                self.doc.text(
                    marker_x,
                    baseline,
                    marker,
                    &[
                        ("font-family", FONT_FAMILY),
                        ("font-size", "5"),
                        ("text-anchor", "middle"),
                        ("fill", colors.text),
                    ],
                );
            }

            if let Some(arrow) = self.arrow_for(side, *planet) {
                self.doc.text(
                    arrow_x,
                    baseline,
                    arrow,
                    &[
                        ("font-family", FONT_FAMILY),
                        ("font-size", "8"),
                        ("text-anchor", "middle"),
                        ("fill", colors.text),
                    ],
                );
            }
        }
        self.doc.close_group();
    }

    /// Variable arrow shown beside the Sun and North Node rows.
    fn arrow_for(&self, side: Side, planet: HdPlanet) -> Option<&'static str> {
        let vars = &self.chart.variables;
        let variable = match (side, planet) {
            (Side::Design, HdPlanet::Sun) => &vars.top_left,
            (Side::Personality, HdPlanet::Sun) => &vars.top_right,
            (Side::Design, HdPlanet::NorthNode) => &vars.bottom_left,
            (Side::Personality, HdPlanet::NorthNode) => &vars.bottom_right,
            _ => return None,
        };
        Some(variable.arrow.glyph())
    }

    fn summary(&mut self, y_start: f64) {
        let margin = (self.width * 0.025).round();
        let chart = self.chart;
        self.doc.open_group(&[("id", "summary")]);
        self.doc.rect(
            margin,
            y_start + 5.0,
            self.width - margin * 2.0,
            SUMMARY_HEIGHT - 10.0,
            &[
                ("rx", "6"),
                ("fill", self.palette.summary_fill),
                ("stroke", self.palette.summary_border),
                ("stroke-width", "1.5"),
            ],
        );

        let col_width = (self.width - margin * 2.0 - 8.0) / 3.0;
        let x0 = margin + 6.0;
        let rows = [
            [
                ("TYPE", chart.hd_type.name().to_string()),
                ("STRATEGY", chart.strategy.clone()),
                ("AUTHORITY", chart.authority.name().to_string()),
            ],
            [
                ("PROFILE", format!("{} {}", chart.profile.label, chart.profile.name)),
                ("DEFINITION", chart.definition.name().to_string()),
                ("VARIABLES", chart.variables.code.clone()),
            ],
        ];
        for (r, row) in rows.iter().enumerate() {
            let y = y_start + 24.0 + r as f64 * 30.0;
            for (c, (label, value)) in row.iter().enumerate() {
                self.info(x0 + c as f64 * col_width, y, label, value);
            }
        }
        self.info(x0, y_start + 84.0, "CROSS", &chart.incarnation_cross.label);
        self.doc.close_group();
    }

    fn info(&mut self, x: f64, y: f64, label: &str, value: &str) {
        self.doc.text(
            x,
            y - 6.0,
            label,
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "4.5"),
                ("font-weight", "bold"),
                ("fill", self.palette.label),
            ],
        );
        let fill = if label == "VARIABLES" {
            self.palette.badge_text
        } else {
            self.palette.value
        };
        self.doc.text(
            x,
            y + 3.0,
            value,
            &[
                ("font-family", FONT_FAMILY),
                ("font-size", "5.5"),
                ("font-weight", "bold"),
                ("fill", fill),
            ],
        );
    }
}
