//! Outer join of the static region layout against a view model.

use crate::geometry::{HexGeometry, HexShape, axial_table};
use crate::model::Margin;
use hexmap_core::{
    RegionDataPoint, RegionDefinition, RegionLayout, SelectionId, TooltipEntry, ViewModel,
    Viewport,
};
use serde::{Deserialize, Serialize};

/// Per-render data attached to a matched region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionOverlay {
    pub measure_value: f64,
    pub tooltip_entries: Vec<TooltipEntry>,
    pub selection_id: SelectionId,
    /// Index of the matched point in the view model.
    pub data_point: usize,
}

impl RegionOverlay {
    fn from_point(index: usize, point: &RegionDataPoint) -> Self {
        Self {
            measure_value: point.measure_value,
            tooltip_entries: point.tooltip_entries.to_vec(),
            selection_id: point.selection_id.clone(),
            data_point: index,
        }
    }
}

/// A region for one frame. Identity comes from the layout; overlay and shape are rebuilt on
/// every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRegion {
    pub key: String,
    pub definition: RegionDefinition,
    pub overlay: Option<RegionOverlay>,
    pub shape: Option<HexShape>,
}

impl MergedRegion {
    pub fn measure_value(&self) -> Option<f64> {
        self.overlay.as_ref().map(|o| o.measure_value)
    }

    pub fn selection_id(&self) -> Option<&SelectionId> {
        self.overlay.as_ref().map(|o| &o.selection_id)
    }

    pub fn tooltip_entries(&self) -> &[TooltipEntry] {
        self.overlay
            .as_ref()
            .map(|o| o.tooltip_entries.as_slice())
            .unwrap_or_default()
    }
}

/// Joins every layout region with the first data point naming it.
///
/// A region takes the first point (in view-model order) whose category equals its full name or
/// abbreviation; later duplicates are ignored. Points that name no region are dropped.
pub fn merge_regions(layout: &RegionLayout, view_model: &ViewModel) -> Vec<MergedRegion> {
    let mut claimed = vec![false; view_model.data_points.len()];

    let merged: Vec<MergedRegion> = layout
        .iter()
        .map(|(key, def)| {
            let mut matches = view_model
                .data_points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.category.as_deref().is_some_and(|c| def.matches(c)));

            let overlay = matches.next().map(|(idx, point)| {
                claimed[idx] = true;
                RegionOverlay::from_point(idx, point)
            });
            for (idx, point) in matches {
                claimed[idx] = true;
                tracing::debug!(
                    region = key,
                    category = point.category.as_deref().unwrap_or_default(),
                    row = idx,
                    "duplicate category for region; keeping the first match"
                );
            }

            MergedRegion {
                key: key.to_string(),
                definition: def.clone(),
                overlay,
                shape: None,
            }
        })
        .collect();

    for (idx, point) in view_model.data_points.iter().enumerate() {
        if !claimed[idx] {
            tracing::debug!(
                category = point.category.as_deref().unwrap_or("(null)"),
                row = idx,
                "category matches no region"
            );
        }
    }

    merged
}

/// Drawable area after removing the margin on all four sides.
pub fn inner_size(viewport: Viewport, margin: Margin) -> (f64, f64) {
    let width = viewport.width - margin.left - margin.right;
    let height = viewport.height - margin.top - margin.bottom;
    (width.max(0.0), height.max(0.0))
}

/// Requests pixel placement for every merged region from `geometry`.
pub fn attach_shapes(
    merged: &mut [MergedRegion],
    layout: &RegionLayout,
    geometry: &dyn HexGeometry,
    width: f64,
    height: f64,
) {
    let mut shapes = geometry.project(&axial_table(layout), layout.mode, width, height);
    for region in merged.iter_mut() {
        region.shape = shapes.swap_remove(&region.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmap_core::ViewModelMeta;

    fn point(category: Option<&str>, value: f64, id: &str) -> RegionDataPoint {
        RegionDataPoint {
            category: category.map(str::to_string),
            measure_value: value,
            tooltip_entries: [
                TooltipEntry {
                    display_name: "State".into(),
                    value: category.unwrap_or("(BLANK)").into(),
                },
                TooltipEntry {
                    display_name: "Sales".into(),
                    value: value.to_string(),
                },
            ],
            selection_id: SelectionId::new(id),
        }
    }

    fn vm(points: Vec<RegionDataPoint>) -> ViewModel {
        ViewModel {
            data_points: points,
            meta: Some(ViewModelMeta { measure_bound: true }),
        }
    }

    fn region<'a>(merged: &'a [MergedRegion], key: &str) -> &'a MergedRegion {
        merged.iter().find(|r| r.key == key).unwrap()
    }

    #[test]
    fn matches_by_abbreviation_or_full_name() {
        let layout = RegionLayout::us_states();
        let merged = merge_regions(
            &layout,
            &vm(vec![
                point(Some("CA"), 10.0, "a"),
                point(Some("Texas"), 50.0, "b"),
                point(Some("ZZ"), 5.0, "c"),
            ]),
        );
        assert_eq!(merged.len(), layout.len());
        assert_eq!(region(&merged, "California").measure_value(), Some(10.0));
        assert_eq!(region(&merged, "Texas").measure_value(), Some(50.0));
        let matched = merged.iter().filter(|r| r.overlay.is_some()).count();
        assert_eq!(matched, 2);
        assert!(merged.iter().all(|r| r.selection_id().map(|s| s.key()) != Some("c")));
    }

    #[test]
    fn first_match_wins_for_duplicate_categories() {
        let layout = RegionLayout::us_states();
        let merged = merge_regions(
            &layout,
            &vm(vec![
                point(Some("Texas"), 1.0, "first"),
                point(Some("TX"), 2.0, "second"),
            ]),
        );
        let tx = region(&merged, "Texas");
        assert_eq!(tx.measure_value(), Some(1.0));
        assert_eq!(tx.selection_id().unwrap().key(), "first");
    }

    #[test]
    fn null_and_wrong_case_categories_match_nothing() {
        let layout = RegionLayout::us_states();
        let merged = merge_regions(
            &layout,
            &vm(vec![point(None, 1.0, "n"), point(Some("texas"), 2.0, "t")]),
        );
        assert!(merged.iter().all(|r| r.overlay.is_none()));
        assert!(region(&merged, "Texas").tooltip_entries().is_empty());
    }

    #[test]
    fn overlays_do_not_leak_between_renders() {
        let layout = RegionLayout::us_states();
        let first = merge_regions(&layout, &vm(vec![point(Some("CA"), 10.0, "a")]));
        assert!(region(&first, "California").overlay.is_some());
        let second = merge_regions(&layout, &vm(vec![point(Some("NY"), 3.0, "b")]));
        assert!(region(&second, "California").overlay.is_none());
        assert_eq!(region(&second, "New York").measure_value(), Some(3.0));
        assert_eq!(layout, RegionLayout::us_states());
    }

    #[test]
    fn inner_size_removes_margins_and_never_goes_negative() {
        let m = Margin::uniform(10.0);
        assert_eq!(inner_size(Viewport::new(620.0, 420.0), m), (600.0, 400.0));
        assert_eq!(inner_size(Viewport::new(5.0, 5.0), m), (0.0, 0.0));
    }
}
