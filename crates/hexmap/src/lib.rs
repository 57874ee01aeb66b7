#![forbid(unsafe_code)]

//! `hexmap` is a headless hexagonal choropleth of the US states.
//!
//! Host updates (a tabular data view plus a viewport) become a per-row view model, which is
//! merged onto a fixed 51-region hex layout, colored along a Lab gradient and painted as SVG.
//! Selection and tooltips are delegated to host services.
//!
//! # Features
//!
//! - `render` (default): merge, color scale, SVG output and the interactive [`render::Visual`]

pub use hexmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use hexmap_render::{
        ColorScale, Dispatch, DrawingSurface, HexGeometry, HexJsonGeometry, HexmapFrame,
        InMemorySelectionManager, InteractionController, Margin, PendingToggle, PointerEvent,
        PointerEventKind, Propagation, RecordingTooltipService, RenderOptions, RenderedRegion,
        RenderedUpdate, SelectionAck, SelectionManager, SvgSurface, TooltipCall,
        TooltipEventArgs, TooltipService, frame_to_json, paint, render_frame, render_frame_svg,
        render_update,
    };

    mod visual;

    pub use visual::{Visual, VisualHost};

    #[derive(Debug, thiserror::Error)]
    pub enum VisualError {
        #[error(transparent)]
        Input(#[from] hexmap_core::Error),
        #[error(transparent)]
        Render(#[from] hexmap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, VisualError>;
}
