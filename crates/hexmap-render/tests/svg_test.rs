use futures::executor::block_on;
use hexmap_core::Viewport;
use hexmap_render::{
    InMemorySelectionManager, InteractionController, PointerEvent, PointerEventKind,
    RecordingTooltipService, RenderOptions, render_frame_svg, render_update_json,
};
use std::path::PathBuf;
use std::sync::Arc;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> String {
    let path = workspace_root().join("fixtures").join("dataview").join(name);
    std::fs::read_to_string(&path).expect("fixture")
}

fn render(name: &str) -> hexmap_render::RenderedUpdate {
    render_update_json(
        &fixture(name),
        Viewport::new(620.0, 420.0),
        &RenderOptions::default(),
    )
    .expect("render")
}

fn hexagon<'a, 'i>(doc: &'a roxmltree::Document<'i>, key: &str) -> roxmltree::Node<'a, 'i> {
    doc.descendants()
        .find(|n| n.attribute("data-region") == Some(key))
        .expect("region group")
}

#[test]
fn svg_structure_matches_the_overlay() {
    let out = render("states_sales.json");
    let svg = render_frame_svg(&out.frame);
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");

    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.attribute("class"), Some("hexmap"));
    assert_eq!(root.attribute("width"), Some("620"));
    assert_eq!(root.attribute("height"), Some("420"));

    let group = root.first_element_child().unwrap();
    assert_eq!(group.attribute("class"), Some("hexGroup"));
    assert_eq!(group.attribute("transform"), Some("translate(10,10)"));

    let hexagons: Vec<_> = group
        .children()
        .filter(|n| n.attribute("class") == Some("hexagons"))
        .collect();
    assert_eq!(hexagons.len(), 51);

    for g in &hexagons {
        let polygon = g
            .children()
            .find(|n| n.has_tag_name("polygon"))
            .expect("polygon");
        assert_eq!(polygon.attribute("stroke-width"), Some("2"));
        assert_eq!(polygon.attribute("stroke"), Some("#ffffff"));
        assert_eq!(polygon.attribute("points").unwrap().split(' ').count(), 6);
        let tspan = g
            .descendants()
            .find(|n| n.has_tag_name("tspan"))
            .expect("label");
        assert_eq!(tspan.attribute("text-anchor"), Some("middle"));
        assert_eq!(tspan.attribute("font-size"), Some("12px"));
    }

    let ca = hexagon(&doc, "California");
    let fill = ca
        .children()
        .find(|n| n.has_tag_name("polygon"))
        .and_then(|p| p.attribute("fill"));
    assert_eq!(fill, Some("#e8f6f5"));
    assert_eq!(ca.descendants().find(|n| n.is_text()).and_then(|n| n.text()), Some("CA"));
}

#[test]
fn hidden_labels_emit_no_text() {
    let out = render("styled_population.json");
    let svg = render_frame_svg(&out.frame);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert!(!doc.descendants().any(|n| n.has_tag_name("text")));
}

#[test]
fn selection_is_reflected_in_repainted_opacity() {
    let mut out = render("states_only.json");
    let selection = InMemorySelectionManager::new();
    let mut controller = InteractionController::new(
        Arc::new(selection.clone()),
        Arc::new(RecordingTooltipService::new()),
    );
    controller.attach(&mut out.frame);

    let dispatch = controller.dispatch(
        &mut out.frame,
        &PointerEvent::on_region(PointerEventKind::Click, "Oregon", 0.0, 0.0),
    );
    let ack = block_on(dispatch.pending.expect("toggle").resolve());
    assert!(controller.apply_ack(&mut out.frame, &ack));

    let svg = render_frame_svg(&out.frame);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert_eq!(hexagon(&doc, "Oregon").attribute("opacity"), Some("1"));
    assert_eq!(hexagon(&doc, "Washington").attribute("opacity"), Some("0.2"));
    assert_eq!(hexagon(&doc, "Ohio").attribute("opacity"), Some("0.2"));
}
