#![forbid(unsafe_code)]

//! Region merge, color scale, frame model and painting for the hex map.
//!
//! The pipeline for one update is: merge the view model onto the static [`RegionLayout`],
//! project every region through a [`HexGeometry`], build a [`ColorScale`] from matched values,
//! and emit a [`HexmapFrame`] that a [`DrawingSurface`] can paint.

pub mod geometry;
pub mod interaction;
pub mod merge;
pub mod model;
pub mod scale;
pub mod surface;
pub mod svg;

pub use geometry::{AxialHex, HexGeometry, HexJsonGeometry, HexShape, Point};
pub use interaction::{
    Dispatch, InMemorySelectionManager, InteractionController, PendingToggle, PointerEvent,
    PointerEventKind, Propagation, RecordingTooltipService, SelectionAck, SelectionManager,
    TooltipCall, TooltipEventArgs, TooltipService,
};
pub use merge::{MergedRegion, RegionOverlay, attach_shapes, inner_size, merge_regions};
pub use model::{HexmapFrame, Margin, RenderedRegion, TextLabel};
pub use scale::ColorScale;
pub use surface::{DrawingSurface, paint};
pub use svg::{SvgSurface, render_frame_svg};

use hexmap_core::{
    CategorySelectionIdBuilder, DataPointSettings, HexmapSettings, RegionLayout, ViewModel,
    Viewport, VisualUpdateOptions, build_view_model,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] hexmap_core::Error),
    #[error("frame JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct RenderOptions {
    pub geometry: Arc<dyn HexGeometry + Send + Sync>,
    pub margin: Margin,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            geometry: Arc::new(HexJsonGeometry),
            margin: Margin::default(),
        }
    }
}

/// Builds the frame for one render. Nothing from an earlier frame carries over.
pub fn render_frame(
    layout: &RegionLayout,
    view_model: &ViewModel,
    settings: &DataPointSettings,
    viewport: Viewport,
    options: &RenderOptions,
) -> HexmapFrame {
    let margin = options.margin;
    let mut merged = merge_regions(layout, view_model);
    let (width, height) = inner_size(viewport, margin);
    attach_shapes(
        &mut merged,
        layout,
        options.geometry.as_ref(),
        width,
        height,
    );

    let measure_bound = view_model.measure_bound();
    let scale = ColorScale::build(
        &merged,
        measure_bound,
        settings.low_color,
        settings.high_color,
    );

    let regions = merged
        .into_iter()
        .map(|region| {
            // Unmatched regions take the fallback fill.
            let fill = region
                .measure_value()
                .map_or(settings.high_color, |v| scale.color(v));
            let label = settings.show_text_labels.then(|| TextLabel {
                text: region.definition.abbreviation.clone(),
                font_size: settings.font_size,
                color: settings.font_color,
            });
            RenderedRegion::from_merged(region, fill, settings.outline_color, label)
        })
        .collect();

    HexmapFrame {
        width: width + margin.left + margin.right,
        height: height + margin.top + margin.bottom,
        margin,
        mode: layout.mode,
        measure_bound,
        domain: scale.domain(),
        regions,
    }
}

/// View model and frame produced from one host update.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedUpdate {
    pub view_model: ViewModel,
    pub settings: HexmapSettings,
    pub frame: HexmapFrame,
}

pub fn render_update(
    layout: &RegionLayout,
    update: &VisualUpdateOptions,
    options: &RenderOptions,
) -> RenderedUpdate {
    let view_model = build_view_model(update, &CategorySelectionIdBuilder);
    let settings = HexmapSettings::parse(update.first_data_view());
    let frame = render_frame(
        layout,
        &view_model,
        &settings.data_point,
        update.viewport,
        options,
    );
    RenderedUpdate {
        view_model,
        settings,
        frame,
    }
}

/// Parses a host update payload (or a bare dataView, rendered at `fallback_viewport`) and renders
/// it against the US states layout.
pub fn render_update_json(
    text: &str,
    fallback_viewport: Viewport,
    options: &RenderOptions,
) -> Result<RenderedUpdate> {
    let update = VisualUpdateOptions::from_json_lenient(text, fallback_viewport)?;
    Ok(render_update(&RegionLayout::us_states(), &update, options))
}

pub fn frame_to_json(frame: &HexmapFrame, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(frame)?
    } else {
        serde_json::to_string(frame)?
    })
}
