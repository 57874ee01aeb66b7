use crate::dataview::{CategoryColumn, DataView, DataViewColumn, ValueColumnGroup};
use crate::format::ValueFormatter;

pub const CATEGORY_ROLE: &str = "category";
pub const MEASURE_ROLE: &str = "measure";

/// Index of the category column bound to `role`.
pub fn category_index_of_role(categories: &[CategoryColumn], role: &str) -> Option<usize> {
    categories
        .iter()
        .position(|c| c.source.as_ref().is_some_and(|s| s.has_role(role)))
}

/// Index of the measure column bound to `role`, looked up in the first value group.
pub fn measure_index_of_role(grouped: &[ValueColumnGroup<'_>], role: &str) -> Option<usize> {
    grouped
        .first()?
        .values
        .iter()
        .position(|c| c.source.has_role(role))
}

/// Column bindings for one render, resolved once up front.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub category_index: usize,
    pub measure_index: Option<usize>,
    pub category_display_name: String,
    pub measure_display_name: String,
    pub category_format: ValueFormatter,
    pub measure_format: Option<ValueFormatter>,
}

impl ColumnDescriptor {
    pub fn measure_bound(&self) -> bool {
        self.measure_index.is_some()
    }
}

/// Resolves the category and measure bindings of a data view.
///
/// Returns `None` when the view cannot produce any rows: no categorical shape, no category
/// series, or a category series without a source column. A missing measure is not a failure; it
/// resolves to `measure_index: None`.
pub fn resolve_columns(data_view: &DataView) -> Option<ColumnDescriptor> {
    let categorical = data_view.categorical.as_ref()?;
    let categories = categorical.categories.as_deref()?;
    let first = categories.first()?;
    let first_source = first.source.as_ref()?;

    let category_index = category_index_of_role(categories, CATEGORY_ROLE).unwrap_or(0);
    let category_source = categories[category_index]
        .source
        .as_ref()
        .unwrap_or(first_source);
    let category_meta = data_view
        .metadata
        .column_for_role(CATEGORY_ROLE)
        .unwrap_or(category_source);

    let grouped = categorical.grouped();
    let measure_index = measure_index_of_role(&grouped, MEASURE_ROLE);
    let measure_meta: Option<&DataViewColumn> = measure_index.and_then(|idx| {
        data_view
            .metadata
            .column_for_role(MEASURE_ROLE)
            .or_else(|| grouped.first().map(|g| &g.values[idx].source))
    });

    Some(ColumnDescriptor {
        category_index,
        measure_index,
        category_display_name: category_meta.display_name.clone(),
        measure_display_name: measure_meta
            .map(|c| c.display_name.clone())
            .unwrap_or_default(),
        category_format: ValueFormatter::for_column(category_meta),
        measure_format: measure_meta.map(ValueFormatter::for_column),
    })
}
