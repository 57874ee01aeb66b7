//! Raw host rows → per-row data points.

use crate::dataview::{DataView, PrimitiveValue, VisualUpdateOptions};
use crate::roles::{ColumnDescriptor, resolve_columns};
use crate::selection::{SelectionId, SelectionIdBuilder};
use serde::{Deserialize, Serialize};

/// Tooltip label for a null category.
pub const BLANK_LABEL: &str = "(BLANK)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub display_name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDataPoint {
    /// Row label; `None` for a null category, which never matches a region.
    pub category: Option<String>,
    /// Measure with nulls coerced to 0. Always 0 when no measure is bound; check
    /// [`ViewModelMeta::measure_bound`] rather than testing for zero.
    pub measure_value: f64,
    /// Category entry followed by measure entry.
    pub tooltip_entries: [TooltipEntry; 2],
    pub selection_id: SelectionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModelMeta {
    pub measure_bound: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub data_points: Vec<RegionDataPoint>,
    /// `None` for the empty view model produced from unusable input.
    pub meta: Option<ViewModelMeta>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }

    pub fn measure_bound(&self) -> bool {
        self.meta.is_some_and(|m| m.measure_bound)
    }
}

/// Builds the view model for an update. Only the first data view is read.
pub fn build_view_model(
    options: &VisualUpdateOptions,
    ids: &dyn SelectionIdBuilder,
) -> ViewModel {
    match options.first_data_view() {
        Some(dv) => build_view_model_for(dv, ids),
        None => {
            tracing::debug!("no data view supplied; empty view model");
            ViewModel::default()
        }
    }
}

pub fn build_view_model_for(data_view: &DataView, ids: &dyn SelectionIdBuilder) -> ViewModel {
    let Some(columns) = resolve_columns(data_view) else {
        tracing::debug!("data view has no usable category series; empty view model");
        return ViewModel::default();
    };
    build_with_columns(data_view, &columns, ids)
}

fn build_with_columns(
    data_view: &DataView,
    columns: &ColumnDescriptor,
    ids: &dyn SelectionIdBuilder,
) -> ViewModel {
    let Some(categorical) = data_view.categorical.as_ref() else {
        return ViewModel::default();
    };
    let Some(category) = categorical
        .categories
        .as_deref()
        .and_then(|c| c.get(columns.category_index))
    else {
        return ViewModel::default();
    };
    let measure = columns
        .measure_index
        .and_then(|idx| categorical.values.as_deref()?.get(idx));

    let data_points = category
        .values
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            let measure_value = measure
                .and_then(|m| m.value_at(row).as_f64())
                .unwrap_or(0.0);

            let category_text = if cell.is_null() {
                BLANK_LABEL.to_string()
            } else {
                columns.category_format.format(cell)
            };
            let measure_text = match &columns.measure_format {
                Some(f) if measure.is_some() => f.format(&PrimitiveValue::Number(measure_value)),
                _ => String::new(),
            };

            RegionDataPoint {
                category: cell.as_label(),
                measure_value,
                tooltip_entries: [
                    TooltipEntry {
                        display_name: columns.category_display_name.clone(),
                        value: category_text,
                    },
                    TooltipEntry {
                        display_name: columns.measure_display_name.clone(),
                        value: measure_text,
                    },
                ],
                selection_id: ids.with_category(category, row),
            }
        })
        .collect();

    ViewModel {
        data_points,
        meta: Some(ViewModelMeta {
            measure_bound: measure.is_some(),
        }),
    }
}
