use super::Result;
use hexmap_core::{
    CategorySelectionIdBuilder, HexmapSettings, RegionLayout, SelectionIdBuilder, ViewModel,
    Viewport, VisualUpdateOptions, build_view_model,
};
use hexmap_render::{
    Dispatch, DrawingSurface, HexmapFrame, InMemorySelectionManager, InteractionController,
    PointerEvent, PointerEventKind, Point, Propagation, RecordingTooltipService, RenderOptions,
    RenderedUpdate, SelectionAck, SelectionManager, TooltipService, frame_to_json, paint,
    render_frame, render_frame_svg,
};
use std::sync::Arc;

/// Services supplied by the embedding host.
#[derive(Clone)]
pub struct VisualHost {
    pub selection_manager: Arc<dyn SelectionManager + Send + Sync>,
    pub tooltip_service: Arc<dyn TooltipService + Send + Sync>,
    pub selection_ids: Arc<dyn SelectionIdBuilder + Send + Sync>,
}

impl VisualHost {
    pub fn new(
        selection_manager: Arc<dyn SelectionManager + Send + Sync>,
        tooltip_service: Arc<dyn TooltipService + Send + Sync>,
    ) -> Self {
        Self {
            selection_manager,
            tooltip_service,
            selection_ids: Arc::new(CategorySelectionIdBuilder),
        }
    }

    pub fn with_selection_ids(
        mut self,
        builder: Arc<dyn SelectionIdBuilder + Send + Sync>,
    ) -> Self {
        self.selection_ids = builder;
        self
    }
}

impl Default for VisualHost {
    /// In-process selection and a recording tooltip service.
    fn default() -> Self {
        Self::new(
            Arc::new(InMemorySelectionManager::new()),
            Arc::new(RecordingTooltipService::new()),
        )
    }
}

/// The hex map component.
///
/// Owns the region layout for its whole lifetime. Every [`Visual::update`] rebuilds the view
/// model and frame from scratch and re-attaches pointer handling to the new frame.
pub struct Visual {
    host: VisualHost,
    layout: RegionLayout,
    options: RenderOptions,
    controller: InteractionController,
    current: Option<RenderedUpdate>,
}

impl Visual {
    pub fn new(host: VisualHost) -> Self {
        Self::with_options(host, RenderOptions::default())
    }

    pub fn with_options(host: VisualHost, options: RenderOptions) -> Self {
        let controller = InteractionController::new(
            Arc::clone(&host.selection_manager),
            Arc::clone(&host.tooltip_service),
        );
        Self {
            host,
            layout: RegionLayout::us_states(),
            options,
            controller,
            current: None,
        }
    }

    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    pub fn update(&mut self, update: &VisualUpdateOptions) -> &HexmapFrame {
        let view_model = build_view_model(update, self.host.selection_ids.as_ref());
        let settings = HexmapSettings::parse(update.first_data_view());
        let mut frame = render_frame(
            &self.layout,
            &view_model,
            &settings.data_point,
            update.viewport,
            &self.options,
        );
        self.controller.attach(&mut frame);
        tracing::debug!(
            rows = view_model.data_points.len(),
            matched = frame.regions.iter().filter(|r| r.is_matched()).count(),
            generation = self.controller.generation(),
            "hexmap updated"
        );

        let current = self.current.insert(RenderedUpdate {
            view_model,
            settings,
            frame,
        });
        &current.frame
    }

    /// Parses a host payload (or a bare data view rendered at `fallback_viewport`) and updates.
    pub fn update_json(&mut self, text: &str, fallback_viewport: Viewport) -> Result<&HexmapFrame> {
        let update = VisualUpdateOptions::from_json_lenient(text, fallback_viewport)?;
        Ok(self.update(&update))
    }

    pub fn view_model(&self) -> Option<&ViewModel> {
        self.current.as_ref().map(|c| &c.view_model)
    }

    pub fn settings(&self) -> Option<&HexmapSettings> {
        self.current.as_ref().map(|c| &c.settings)
    }

    pub fn frame(&self) -> Option<&HexmapFrame> {
        self.current.as_ref().map(|c| &c.frame)
    }

    pub fn frame_json(&self, pretty: bool) -> Result<Option<String>> {
        match self.frame() {
            Some(frame) => Ok(Some(frame_to_json(frame, pretty)?)),
            None => Ok(None),
        }
    }

    pub fn render_svg(&self) -> Option<String> {
        self.frame().map(render_frame_svg)
    }

    /// Repaints the current frame onto `surface`. Returns `false` before the first update.
    pub fn repaint(&self, surface: &mut dyn DrawingSurface) -> bool {
        match self.frame() {
            Some(frame) => {
                paint(frame, surface);
                true
            }
            None => false,
        }
    }

    pub fn pointer_event(&mut self, event: &PointerEvent) -> Dispatch {
        match self.current.as_mut() {
            Some(current) => self.controller.dispatch(&mut current.frame, event),
            None => Dispatch::new(Propagation::Continue),
        }
    }

    /// Dispatches a pointer event at a surface coordinate, resolving the region by hit test.
    pub fn pointer_at(&mut self, kind: PointerEventKind, x: f64, y: f64) -> Dispatch {
        let region = self
            .frame()
            .and_then(|f| f.hit_test(x, y))
            .map(str::to_string);
        self.pointer_event(&PointerEvent {
            kind,
            region,
            position: Point { x, y },
            is_touch: false,
        })
    }

    pub fn apply_selection(&mut self, ack: &SelectionAck) -> bool {
        match self.current.as_mut() {
            Some(current) => self.controller.apply_ack(&mut current.frame, ack),
            None => false,
        }
    }

    /// Clicks a region and applies the selection manager's answer once it arrives.
    pub async fn click_and_wait(&mut self, region: &str) -> Propagation {
        let dispatch =
            self.pointer_event(&PointerEvent::on_region(PointerEventKind::Click, region, 0.0, 0.0));
        if let Some(pending) = dispatch.pending {
            let ack = pending.resolve().await;
            self.apply_selection(&ack);
        }
        dispatch.propagation
    }
}
