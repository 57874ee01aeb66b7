use crate::geometry::HexShape;
use crate::merge::MergedRegion;
use hexmap_core::{HexLayoutMode, Rgb, SelectionId, TooltipEntry};
use serde::{Deserialize, Serialize};

pub const MARGIN: f64 = 10.0;
pub const OUTLINE_WIDTH: f64 = 2.0;
pub const FULL_OPACITY: f64 = 1.0;
pub const DIMMED_OPACITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(MARGIN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub text: String,
    pub font_size: f64,
    pub color: Rgb,
}

/// One region as drawn in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRegion {
    pub key: String,
    pub abbreviation: String,
    pub shape: Option<HexShape>,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub label: Option<TextLabel>,
    pub opacity: f64,
    pub measure_value: Option<f64>,
    pub tooltip_entries: Vec<TooltipEntry>,
    pub selection_id: Option<SelectionId>,
}

impl RenderedRegion {
    pub fn is_matched(&self) -> bool {
        self.selection_id.is_some()
    }
}

/// Everything needed to paint one render of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexmapFrame {
    /// Full surface size, margins included.
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub mode: HexLayoutMode,
    pub measure_bound: bool,
    pub domain: Option<(f64, f64)>,
    pub regions: Vec<RenderedRegion>,
}

impl HexmapFrame {
    pub fn region(&self, key: &str) -> Option<&RenderedRegion> {
        self.regions.iter().find(|r| r.key == key)
    }

    pub fn region_mut(&mut self, key: &str) -> Option<&mut RenderedRegion> {
        self.regions.iter_mut().find(|r| r.key == key)
    }

    /// Region under a surface coordinate, if any.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        let (lx, ly) = (x - self.margin.left, y - self.margin.top);
        self.regions
            .iter()
            .find(|r| r.shape.as_ref().is_some_and(|s| s.contains(lx, ly)))
            .map(|r| r.key.as_str())
    }
}

impl RenderedRegion {
    pub(crate) fn from_merged(
        merged: MergedRegion,
        fill: Rgb,
        stroke: Rgb,
        label: Option<TextLabel>,
    ) -> Self {
        let (measure_value, tooltip_entries, selection_id) = match merged.overlay {
            Some(o) => (Some(o.measure_value), o.tooltip_entries, Some(o.selection_id)),
            None => (None, Vec::new(), None),
        };
        Self {
            key: merged.key,
            abbreviation: merged.definition.abbreviation,
            shape: merged.shape,
            fill,
            stroke,
            stroke_width: OUTLINE_WIDTH,
            label,
            opacity: FULL_OPACITY,
            measure_value,
            tooltip_entries,
            selection_id,
        }
    }
}
