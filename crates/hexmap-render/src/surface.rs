//! Drawing primitives a frame is painted through.

use crate::geometry::Point;
use crate::model::{HexmapFrame, Margin};
use hexmap_core::Rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Rgb,
    pub anchor: TextAnchor,
}

/// A retained-mode target for one overlay.
///
/// Calls arrive in document order: `clear`, `begin`, then one `begin_region`/`end_region` pair
/// per region (with its `polygon` and optional `text` inside), and a final `end`. Coordinates
/// inside a region are relative to the center passed to `begin_region`.
pub trait DrawingSurface {
    /// Drops whatever the previous paint produced.
    fn clear(&mut self);
    fn begin(&mut self, width: f64, height: f64, margin: Margin);
    fn begin_region(&mut self, key: &str, center: Point, opacity: f64);
    fn polygon(&mut self, points: &[Point], style: &ShapeStyle);
    fn text(&mut self, text: &str, style: &TextStyle);
    fn end_region(&mut self);
    fn end(&mut self);
}

/// Paints `frame` onto `surface`, replacing any previous overlay.
///
/// Regions without a shape (the geometry provider returned nothing for their key) are skipped.
pub fn paint(frame: &HexmapFrame, surface: &mut dyn DrawingSurface) {
    surface.clear();
    surface.begin(frame.width, frame.height, frame.margin);
    for region in &frame.regions {
        let Some(shape) = region.shape.as_ref() else {
            continue;
        };
        surface.begin_region(&region.key, shape.center, region.opacity);
        surface.polygon(
            &shape.vertices,
            &ShapeStyle {
                fill: region.fill,
                stroke: region.stroke,
                stroke_width: region.stroke_width,
            },
        );
        if let Some(label) = region.label.as_ref() {
            surface.text(
                &label.text,
                &TextStyle {
                    font_size: label.font_size,
                    color: label.color,
                    anchor: TextAnchor::Middle,
                },
            );
        }
        surface.end_region();
    }
    surface.end();
}
