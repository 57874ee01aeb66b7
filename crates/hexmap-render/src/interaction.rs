//! Pointer handling: selection toggling, dimming and tooltips.
//!
//! The controller never keeps its own copy of what is selected. Every opacity pass is driven by
//! a set returned from the [`SelectionManager`].

use crate::geometry::Point;
use crate::model::{DIMMED_OPACITY, FULL_OPACITY, HexmapFrame};
use futures::FutureExt;
use futures::future::BoxFuture;
use hexmap_core::{SelectionId, TooltipEntry};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// Host-owned selection state.
pub trait SelectionManager {
    /// Toggles `id` and resolves to the selection set after the toggle.
    fn toggle(&self, id: &SelectionId) -> BoxFuture<'static, Vec<SelectionId>>;
    fn clear(&self);
    fn selected_ids(&self) -> Vec<SelectionId>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEventArgs {
    pub data_items: Vec<TooltipEntry>,
    pub identities: Vec<SelectionId>,
    pub coordinates: Point,
    pub is_touch_event: bool,
}

/// Fire-and-forget tooltip display.
pub trait TooltipService {
    fn show(&self, args: TooltipEventArgs);
    fn move_to(&self, args: TooltipEventArgs);
    fn hide(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    Click,
    Enter,
    Move,
    Leave,
}

/// A pointer event from the drawing surface. `region` is `None` for the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub region: Option<String>,
    pub position: Point,
    #[serde(default)]
    pub is_touch: bool,
}

impl PointerEvent {
    pub fn on_region(kind: PointerEventKind, region: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            kind,
            region: Some(region.into()),
            position: Point { x, y },
            is_touch: false,
        }
    }

    pub fn on_background(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            region: None,
            position: Point { x, y },
            is_touch: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Result of dispatching one pointer event.
#[must_use]
pub struct Dispatch {
    pub propagation: Propagation,
    /// Set when a click issued a toggle; resolve it and hand the ack to
    /// [`InteractionController::apply_ack`].
    pub pending: Option<PendingToggle>,
}

impl Dispatch {
    pub fn new(propagation: Propagation) -> Self {
        Self {
            propagation,
            pending: None,
        }
    }
}

/// An in-flight toggle request bound to the render that issued it.
pub struct PendingToggle {
    generation: u64,
    clicked: String,
    response: BoxFuture<'static, Vec<SelectionId>>,
}

impl PendingToggle {
    pub fn clicked(&self) -> &str {
        &self.clicked
    }

    pub async fn resolve(self) -> SelectionAck {
        let selected = self.response.await;
        SelectionAck {
            generation: self.generation,
            clicked: self.clicked,
            selected,
        }
    }
}

impl std::fmt::Debug for PendingToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingToggle")
            .field("generation", &self.generation)
            .field("clicked", &self.clicked)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionAck {
    pub generation: u64,
    pub clicked: String,
    pub selected: Vec<SelectionId>,
}

pub struct InteractionController {
    selection: Arc<dyn SelectionManager + Send + Sync>,
    tooltip: Arc<dyn TooltipService + Send + Sync>,
    generation: u64,
}

impl InteractionController {
    pub fn new(
        selection: Arc<dyn SelectionManager + Send + Sync>,
        tooltip: Arc<dyn TooltipService + Send + Sync>,
    ) -> Self {
        Self {
            selection,
            tooltip,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Adopts a freshly built frame. Acks issued against earlier frames become stale, and
    /// opacity is seeded from the manager's current selection.
    pub fn attach(&mut self, frame: &mut HexmapFrame) {
        self.generation += 1;
        let selected = self.selection.selected_ids();
        apply_opacity(frame, &selected, None);
    }

    pub fn dispatch(&self, frame: &mut HexmapFrame, event: &PointerEvent) -> Dispatch {
        let Some(key) = event.region.as_deref() else {
            if event.kind == PointerEventKind::Click {
                self.selection.clear();
                apply_opacity(frame, &[], None);
            }
            return Dispatch::new(Propagation::Continue);
        };
        let Some(region) = frame.region(key) else {
            tracing::debug!(region = key, "pointer event for unknown region");
            return Dispatch::new(Propagation::Continue);
        };

        match event.kind {
            PointerEventKind::Click => {
                let pending = region.selection_id.as_ref().map(|id| PendingToggle {
                    generation: self.generation,
                    clicked: region.key.clone(),
                    response: self.selection.toggle(id),
                });
                // The clicked region is never dimmed, not even while the toggle is in flight.
                if let Some(clicked) = frame.region_mut(key) {
                    clicked.opacity = FULL_OPACITY;
                }
                Dispatch {
                    propagation: Propagation::Stop,
                    pending,
                }
            }
            PointerEventKind::Enter | PointerEventKind::Move => {
                let args = TooltipEventArgs {
                    data_items: region.tooltip_entries.clone(),
                    identities: region.selection_id.iter().cloned().collect(),
                    coordinates: event.position,
                    is_touch_event: event.is_touch,
                };
                if event.kind == PointerEventKind::Enter {
                    self.tooltip.show(args);
                } else {
                    self.tooltip.move_to(args);
                }
                Dispatch::new(Propagation::Continue)
            }
            PointerEventKind::Leave => {
                self.tooltip.hide();
                Dispatch::new(Propagation::Continue)
            }
        }
    }

    /// Applies the opacity pass for a resolved toggle. Returns `false` when the ack belongs to an
    /// earlier render and was discarded.
    pub fn apply_ack(&self, frame: &mut HexmapFrame, ack: &SelectionAck) -> bool {
        if ack.generation != self.generation {
            tracing::debug!(
                ack = ack.generation,
                current = self.generation,
                "discarding stale selection ack"
            );
            return false;
        }
        apply_opacity(frame, &ack.selected, Some(&ack.clicked));
        true
    }
}

/// Nothing selected leaves every region at full opacity. Otherwise regions outside the set are
/// dimmed, and `clicked` always stays at full opacity.
fn apply_opacity(frame: &mut HexmapFrame, selected: &[SelectionId], clicked: Option<&str>) {
    let selected: FxHashSet<&SelectionId> = selected.iter().collect();
    for region in &mut frame.regions {
        let lit = selected.is_empty()
            || clicked == Some(region.key.as_str())
            || region
                .selection_id
                .as_ref()
                .is_some_and(|id| selected.contains(id));
        region.opacity = if lit { FULL_OPACITY } else { DIMMED_OPACITY };
    }
}

/// Single-select manager with toggle semantics: selecting a new id replaces the selection,
/// selecting the only selected id clears it.
#[derive(Debug, Clone, Default)]
pub struct InMemorySelectionManager {
    selected: Arc<Mutex<Vec<SelectionId>>>,
}

impl InMemorySelectionManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionManager for InMemorySelectionManager {
    fn toggle(&self, id: &SelectionId) -> BoxFuture<'static, Vec<SelectionId>> {
        let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        if selected.len() == 1 && selected[0] == *id {
            selected.clear();
        } else {
            *selected = vec![id.clone()];
        }
        futures::future::ready(selected.clone()).boxed()
    }

    fn clear(&self) {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn selected_ids(&self) -> Vec<SelectionId> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "lowercase")]
pub enum TooltipCall {
    Show(TooltipEventArgs),
    Move(TooltipEventArgs),
    Hide,
}

/// Tooltip service that records every call, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingTooltipService {
    calls: Arc<Mutex<Vec<TooltipCall>>>,
}

impl RecordingTooltipService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TooltipCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, call: TooltipCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl TooltipService for RecordingTooltipService {
    fn show(&self, args: TooltipEventArgs) {
        self.push(TooltipCall::Show(args));
    }

    fn move_to(&self, args: TooltipEventArgs) {
        self.push(TooltipCall::Move(args));
    }

    fn hide(&self) {
        self.push(TooltipCall::Hide);
    }
}
