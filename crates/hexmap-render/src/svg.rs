use crate::geometry::{Point, points_attr};
use crate::model::{HexmapFrame, Margin};
use crate::surface::{DrawingSurface, ShapeStyle, TextStyle, paint};
use std::fmt::Write as _;

/// Renders a frame to a standalone SVG document.
pub fn render_frame_svg(frame: &HexmapFrame) -> String {
    let mut surface = SvgSurface::new();
    paint(frame, &mut surface);
    surface.into_string()
}

/// [`DrawingSurface`] that accumulates SVG markup.
#[derive(Debug, Default, Clone)]
pub struct SvgSurface {
    out: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl DrawingSurface for SvgSurface {
    fn clear(&mut self) {
        self.out.clear();
    }

    fn begin(&mut self, width: f64, height: f64, margin: Margin) {
        let _ = write!(
            &mut self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="hexmap" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            fmt(width),
            fmt(height),
            fmt(width),
            fmt(height)
        );
        let _ = write!(
            &mut self.out,
            r#"<g class="hexGroup" transform="translate({},{})">"#,
            fmt(margin.left),
            fmt(margin.top)
        );
    }

    fn begin_region(&mut self, key: &str, center: Point, opacity: f64) {
        let _ = write!(
            &mut self.out,
            r#"<g class="hexagons" data-region="{}" transform="translate({},{})" opacity="{}">"#,
            escape_attr(key),
            fmt(center.x),
            fmt(center.y),
            fmt(opacity)
        );
    }

    fn polygon(&mut self, points: &[Point], style: &ShapeStyle) {
        let _ = write!(
            &mut self.out,
            r#"<polygon points="{}" stroke="{}" stroke-width="{}" fill="{}"/>"#,
            points_attr(points),
            style.stroke,
            fmt(style.stroke_width),
            style.fill
        );
    }

    fn text(&mut self, text: &str, style: &TextStyle) {
        let _ = write!(
            &mut self.out,
            r#"<text><tspan text-anchor="{}" font-size="{}px" fill="{}">{}</tspan></text>"#,
            style.anchor.as_str(),
            fmt(style.font_size),
            style.color,
            escape_xml(text)
        );
    }

    fn end_region(&mut self) {
        self.out.push_str("</g>");
    }

    fn end(&mut self) {
        self.out.push_str("</g></svg>");
    }
}

pub(crate) fn fmt(v: f64) -> String {
    // Plain decimal, no `-0`, and no float noise from the projection math.
    if !v.is_finite() {
        return "0".to_string();
    }
    let v = if v.abs() < 1e-9 { 0.0 } else { v };
    let rounded = (v * 1000.0).round() / 1000.0;
    let s = rounded.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
