use futures::executor::block_on;
use hexmap::render::{
    InMemorySelectionManager, PointerEventKind, Propagation, RecordingTooltipService,
    SelectionManager, SvgSurface, TooltipCall, Visual, VisualHost,
};
use hexmap::{SelectionId, Viewport};
use std::path::PathBuf;
use std::sync::Arc;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> String {
    let path = workspace_root()
        .join("fixtures")
        .join("dataview")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture")
}

struct Harness {
    visual: Visual,
    selection: InMemorySelectionManager,
    tooltip: RecordingTooltipService,
}

fn harness() -> Harness {
    let selection = InMemorySelectionManager::new();
    let tooltip = RecordingTooltipService::new();
    let host = VisualHost::new(Arc::new(selection.clone()), Arc::new(tooltip.clone()));
    Harness {
        visual: Visual::new(host),
        selection,
        tooltip,
    }
}

fn opacity(visual: &Visual, key: &str) -> f64 {
    visual.frame().unwrap().region(key).unwrap().opacity
}

#[test]
fn category_only_input_fills_high_and_click_dims_the_rest() {
    let mut h = harness();
    let frame = h
        .visual
        .update_json(&fixture("states_only.json"), Viewport::new(620.0, 420.0))
        .unwrap();
    let high = hexmap::DataPointSettings::default().high_color;
    assert!(frame.regions.iter().all(|r| r.fill == high));

    let propagation = block_on(h.visual.click_and_wait("New York"));
    assert_eq!(propagation, Propagation::Stop);
    assert_eq!(opacity(&h.visual, "New York"), 1.0);
    assert_eq!(opacity(&h.visual, "Oregon"), 0.2);
    assert_eq!(opacity(&h.visual, "Texas"), 0.2);
}

#[test]
fn toggling_twice_restores_the_selection() {
    let mut h = harness();
    h.visual
        .update_json(&fixture("states_sales.json"), Viewport::default())
        .unwrap();
    let before = h.selection.selected_ids();

    block_on(h.visual.click_and_wait("Texas"));
    assert_eq!(
        h.selection.selected_ids(),
        vec![SelectionId::new("state:Texas")]
    );
    block_on(h.visual.click_and_wait("Texas"));

    assert_eq!(h.selection.selected_ids(), before);
    let frame = h.visual.frame().unwrap();
    assert!(frame.regions.iter().all(|r| r.opacity == 1.0));
}

#[test]
fn rerender_keeps_dimming_consistent_with_the_manager() {
    let mut h = harness();
    let text = fixture("states_sales.json");
    h.visual.update_json(&text, Viewport::default()).unwrap();
    block_on(h.visual.click_and_wait("California"));

    h.visual.update_json(&text, Viewport::default()).unwrap();
    assert_eq!(opacity(&h.visual, "California"), 1.0);
    assert_eq!(opacity(&h.visual, "Texas"), 0.2);
}

#[test]
fn new_data_replaces_the_previous_overlay() {
    let mut h = harness();
    h.visual
        .update_json(&fixture("states_sales.json"), Viewport::default())
        .unwrap();
    assert!(
        h.visual
            .frame()
            .unwrap()
            .region("California")
            .unwrap()
            .is_matched()
    );

    h.visual
        .update_json(&fixture("states_only.json"), Viewport::new(400.0, 300.0))
        .unwrap();
    let frame = h.visual.frame().unwrap();
    assert!(!frame.region("California").unwrap().is_matched());
    assert!(
        frame
            .region("California")
            .unwrap()
            .tooltip_entries
            .is_empty()
    );
    assert_eq!(frame.regions.len(), h.visual.layout().len());
}

#[test]
fn background_click_clears_and_region_click_does_not_bubble() {
    let mut h = harness();
    h.visual
        .update_json(&fixture("states_sales.json"), Viewport::default())
        .unwrap();
    block_on(h.visual.click_and_wait("Texas"));
    assert!(!h.selection.selected_ids().is_empty());

    let dispatch = h.visual.pointer_at(PointerEventKind::Click, -100.0, -100.0);
    assert_eq!(dispatch.propagation, Propagation::Continue);
    assert!(h.selection.selected_ids().is_empty());
    assert_eq!(opacity(&h.visual, "Ohio"), 1.0);
}

#[test]
fn hovering_by_coordinate_shows_and_moves_the_tooltip() {
    let mut h = harness();
    h.visual
        .update_json(&fixture("states_sales.json"), Viewport::default())
        .unwrap();
    let frame = h.visual.frame().unwrap();
    let center = frame
        .region("Texas")
        .unwrap()
        .shape
        .as_ref()
        .unwrap()
        .center;
    let (x, y) = (center.x + frame.margin.left, center.y + frame.margin.top);

    let _ = h.visual.pointer_at(PointerEventKind::Enter, x, y);
    let _ = h.visual.pointer_at(PointerEventKind::Move, x + 1.0, y);

    let calls = h.tooltip.calls();
    assert_eq!(calls.len(), 2);
    match &calls[1] {
        TooltipCall::Move(args) => {
            assert_eq!(args.coordinates.x, x + 1.0);
            assert_eq!(args.data_items[0].value, "Texas");
            assert_eq!(args.data_items[1].value, "50");
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn nothing_happens_before_the_first_update() {
    let mut visual = Visual::new(VisualHost::default());
    assert!(visual.frame().is_none());
    assert!(visual.render_svg().is_none());
    assert!(visual.frame_json(false).unwrap().is_none());
    let mut surface = SvgSurface::new();
    assert!(!visual.repaint(&mut surface));
    let dispatch = visual.pointer_at(PointerEventKind::Click, 1.0, 1.0);
    assert!(dispatch.pending.is_none());
}

#[test]
fn repaint_writes_the_same_svg() {
    let mut visual = Visual::new(VisualHost::default());
    visual
        .update_json(&fixture("styled_population.json"), Viewport::default())
        .unwrap();
    let mut surface = SvgSurface::new();
    assert!(visual.repaint(&mut surface));
    assert!(visual.repaint(&mut surface));
    assert_eq!(Some(surface.into_string()), visual.render_svg());
    let svg = visual.render_svg().unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert_eq!(doc.root_element().attribute("width"), Some("820"));
}

#[test]
fn malformed_json_is_an_input_error() {
    let mut visual = Visual::new(VisualHost::default());
    let err = visual
        .update_json("{not json", Viewport::default())
        .unwrap_err();
    assert!(matches!(err, hexmap::render::VisualError::Input(_)));
}

#[test]
fn visual_updates_on_another_thread() {
    let text = fixture("states_sales.json");
    let mut visual = Visual::new(VisualHost::default());
    let handle = std::thread::spawn(move || {
        visual.update_json(&text, Viewport::default()).unwrap();
        visual
    });
    let visual = handle.join().unwrap();
    assert!(
        visual
            .frame()
            .unwrap()
            .region("Texas")
            .unwrap()
            .is_matched()
    );
}
