#![forbid(unsafe_code)]

//! Host data model and view-model building for the US hex map (headless).
//!
//! The crate turns a host update (data views + viewport) into a validated per-row
//! [`ViewModel`], and owns the static [`RegionLayout`] the renderer merges it onto. Nothing here
//! knows about geometry or drawing.

pub mod color;
pub mod dataview;
pub mod error;
pub mod format;
pub mod regions;
pub mod roles;
pub mod selection;
pub mod settings;
pub mod view_model;

pub use color::Rgb;
pub use dataview::{DataView, PrimitiveValue, Viewport, VisualUpdateOptions};
pub use error::{Error, Result};
pub use format::ValueFormatter;
pub use regions::{HexLayoutMode, RegionDefinition, RegionLayout};
pub use roles::{ColumnDescriptor, resolve_columns};
pub use selection::{CategorySelectionIdBuilder, SelectionId, SelectionIdBuilder};
pub use settings::{DataPointSettings, HexmapSettings};
pub use view_model::{
    BLANK_LABEL, RegionDataPoint, TooltipEntry, ViewModel, ViewModelMeta, build_view_model,
    build_view_model_for,
};
