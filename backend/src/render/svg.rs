//! A small SVG document builder.
//!
//! Elements are appended as text in call order and attributes are written in
//! the order given, so the same drawing calls always produce the same bytes.

/// Attribute list written verbatim in order.
pub type Attrs<'a> = &'a [(&'a str, &'a str)];

/// Escape the five XML special characters.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Coordinate formatting with two decimals. `-0.00` prints as `0.00`.
pub fn num(value: f64) -> String {
    let s = format!("{:.2}", value);
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

fn push_attrs(buf: &mut String, attrs: Attrs<'_>) {
    for (key, value) in attrs {
        buf.push_str(&format!(" {}=\"{}\"", key, escape_xml(value)));
    }
}

/// A gradient stop: offset (0-1), colour, opacity.
pub type Stop<'a> = (f64, &'a str, f64);

#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    title: Option<String>,
    defs: String,
    body: String,
    depth: usize,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            title: None,
            defs: String::new(),
            body: String::new(),
            depth: 0,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn linear_gradient(
        &mut self,
        id: &str,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        stops: &[Stop<'_>],
    ) {
        self.defs.push_str(&format!(
            "<linearGradient id=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
            escape_xml(id),
            num(x1),
            num(y1),
            num(x2),
            num(y2)
        ));
        push_stops(&mut self.defs, stops);
        self.defs.push_str("</linearGradient>");
    }

    pub fn radial_gradient(&mut self, id: &str, stops: &[Stop<'_>]) {
        self.defs.push_str(&format!(
            "<radialGradient id=\"{}\" cx=\"0.5\" cy=\"0.5\" r=\"0.6\">",
            escape_xml(id)
        ));
        push_stops(&mut self.defs, stops);
        self.defs.push_str("</radialGradient>");
    }

    /// Gaussian blur filter usable as `filter="url(#id)"`.
    pub fn blur_filter(&mut self, id: &str, std_deviation: f64) {
        self.defs.push_str(&format!(
            "<filter id=\"{}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
             <feGaussianBlur stdDeviation=\"{}\"/></filter>",
            escape_xml(id),
            num(std_deviation)
        ));
    }

    pub fn open_group(&mut self, attrs: Attrs<'_>) {
        self.body.push_str("<g");
        push_attrs(&mut self.body, attrs);
        self.body.push('>');
        self.depth += 1;
    }

    pub fn close_group(&mut self) {
        if self.depth > 0 {
            self.body.push_str("</g>");
            self.depth -= 1;
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, attrs: Attrs<'_>) {
        self.body.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
            num(x),
            num(y),
            num(w),
            num(h)
        ));
        push_attrs(&mut self.body, attrs);
        self.body.push_str("/>");
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, attrs: Attrs<'_>) {
        self.body.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
            num(cx),
            num(cy),
            num(r)
        ));
        push_attrs(&mut self.body, attrs);
        self.body.push_str("/>");
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, attrs: Attrs<'_>) {
        self.body.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
            num(x1),
            num(y1),
            num(x2),
            num(y2)
        ));
        push_attrs(&mut self.body, attrs);
        self.body.push_str("/>");
    }

    pub fn path(&mut self, d: &str, attrs: Attrs<'_>) {
        self.body
            .push_str(&format!("<path d=\"{}\"", escape_xml(d)));
        push_attrs(&mut self.body, attrs);
        self.body.push_str("/>");
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, attrs: Attrs<'_>) {
        self.body
            .push_str(&format!("<text x=\"{}\" y=\"{}\"", num(x), num(y)));
        push_attrs(&mut self.body, attrs);
        self.body.push('>');
        self.body.push_str(&escape_xml(content));
        self.body.push_str("</text>");
    }

    /// Serialize the document, closing any group left open.
    pub fn finish(mut self) -> String {
        while self.depth > 0 {
            self.close_group();
        }
        let mut svg = String::with_capacity(self.defs.len() + self.body.len() + 256);
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = num(self.width),
            h = num(self.height)
        ));
        if let Some(title) = &self.title {
            svg.push_str(&format!("<title>{}</title>", escape_xml(title)));
        }
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

fn push_stops(buf: &mut String, stops: &[Stop<'_>]) {
    for (offset, color, opacity) in stops {
        buf.push_str(&format!(
            "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
            num(*offset),
            escape_xml(color),
            num(*opacity)
        ));
    }
}
