//! Editing Scenario Tests
//!
//! Exercises the public editing surface end to end:
//! - Render order and layer reordering
//! - Drag repositioning
//! - Autofix directives against realistic creatives

use composer_core::{
    autofix, bring_to_front, move_element, render_order, safe_zone, Bounds, Color, Directive,
    Element, FontWeight, Format, FormatTable, Issue, Scene, TextContent,
};
use serde_json::json;

/// A square creative similar to what a user starts from.
fn demo_scene() -> Scene {
    Scene::new(Format::SQUARE, 1080, 1080)
        .with_element(Element::logo(
            "demo-logo",
            "https://placehold.co/150x150?text=Logo",
            Bounds::new(50, 50, 150, 150),
        ))
        .with_element(Element::packshot(
            "demo-prod",
            "https://placehold.co/600x600?text=Product",
            Bounds::new(240, 240, 600, 600),
        ))
        .with_element(Element::value_tile(
            "demo-price",
            TextContent::new("2 for £5", 80)
                .with_weight(FontWeight::Bold)
                .with_color(Color::rgb(255, 0, 0)),
            Bounds::new(300, 850, 480, 100),
        ))
}

fn ids(scene: &Scene) -> Vec<&str> {
    render_order(scene).iter().map(|e| e.id.as_str()).collect()
}

// ============================================================================
// Compositing
// ============================================================================

#[test]
fn test_equal_z_keeps_insertion_order() {
    let bounds = Bounds::new(0, 0, 10, 10);
    let scene = Scene::new(Format::SQUARE, 1080, 1080)
        .with_element(Element::image("a", "a.png", bounds).with_z(1))
        .with_element(Element::image("b", "b.png", bounds))
        .with_element(Element::image("c", "c.png", bounds).with_z(1));

    assert_eq!(ids(&scene), ["b", "a", "c"]);
}

#[test]
fn test_bring_to_front_sequence() {
    let bounds = Bounds::new(0, 0, 10, 10);
    let scene = Scene::new(Format::SQUARE, 1080, 1080)
        .with_element(Element::image("a", "a.png", bounds).with_z(3))
        .with_element(Element::image("b", "b.png", bounds).with_z(1))
        .with_element(Element::image("c", "c.png", bounds));

    let first = bring_to_front(&scene, &"b".into());
    let second = bring_to_front(&first, &"c".into());

    assert_eq!(first.element(&"b".into()).and_then(|e| e.z), Some(4));
    assert_eq!(second.element(&"c".into()).and_then(|e| e.z), Some(5));
    assert_eq!(ids(&second), ["a", "b", "c"]);
    assert_eq!(scene.element(&"b".into()).and_then(|e| e.z), Some(1));
}

#[test]
fn test_safe_zone_for_every_builtin_format() {
    let table = FormatTable::builtin();
    for (format, spec) in table.iter() {
        let scene = Scene::new(format.clone(), spec.width, spec.height);
        let zone = safe_zone(&scene, &table);
        assert_eq!(zone.x, i32::try_from(spec.safe_zone.left).expect("small"));
        assert_eq!(zone.y, i32::try_from(spec.safe_zone.top).expect("small"));
        assert_eq!(
            zone.width,
            spec.width - spec.safe_zone.left - spec.safe_zone.right
        );
    }
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn test_drag_only_touches_target() {
    let scene = demo_scene();
    let dragged = move_element(&scene, &"demo-prod".into(), 199.5, 260.49);

    assert_eq!(
        dragged.element(&"demo-prod".into()).map(|e| e.bounds),
        Some(Bounds::new(200, 260, 600, 600))
    );
    for id in ["demo-logo", "demo-price"] {
        assert_eq!(dragged.element(&id.into()), scene.element(&id.into()));
    }
}

// ============================================================================
// Autofix
// ============================================================================

#[test]
fn test_nudge_inside_scenario() {
    let scene = Scene::new(Format::SQUARE, 1080, 1080).with_element(Element::text(
        "t1",
        TextContent::new("Headline", 64),
        Bounds::new(500, 10, 300, 100),
    ));
    let issue = Issue::new("SAFE_ZONE", "Element t1 violates safe zone.")
        .with_autofix(Directive::nudge_inside("t1", None, Some(400.0), None, Some(400.0)));

    let fixed = autofix(&scene, &[issue]);
    let bounds = fixed.element(&"t1".into()).expect("t1").bounds;
    assert_eq!((bounds.x, bounds.y), (400, 10));
}

#[test]
fn test_limit_packshots_scenario() {
    let bounds = Bounds::new(0, 0, 200, 200);
    let scene = Scene::new(Format::SQUARE, 1080, 1080)
        .with_element(Element::packshot("p1", "1.png", bounds))
        .with_element(Element::packshot("p2", "2.png", bounds))
        .with_element(Element::logo("logo", "logo.png", bounds))
        .with_element(Element::packshot("p3", "3.png", bounds));

    let issues: Vec<Issue> = serde_json::from_value(json!([
        {"code": "PACKSHOT_LIMIT", "message": "Packshots exceed 2", "autofix": {"action": "limit_packshots", "keep": 2}}
    ]))
    .expect("decode");
    let fixed = autofix(&scene, &issues);

    let packshots: Vec<_> = fixed
        .elements()
        .iter()
        .filter(|e| e.is_packshot())
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(packshots, ["p1", "p2"]);
    assert_eq!(fixed.element(&"logo".into()), scene.element(&"logo".into()));
}

#[test]
fn test_mixed_issue_batch_from_wire() {
    let issues: Vec<Issue> = serde_json::from_value(json!([
        {"code": "WARN", "message": "Logo too close to edge", "suggestion": "Move logo inward"},
        {"code": "SAFE_ZONE", "message": "m", "autofix": {"action": "nudge_inside", "id": "demo-logo", "min_x": 150, "min_y": 150, "max_x": 780, "max_y": 780}},
        {"code": "CONTRAST", "message": "m", "autofix": {"action": "increase_contrast", "id": "demo-price"}},
        {"code": "BANNED_COPY", "message": "m", "autofix": {"action": "highlight_text", "id": "demo-price"}},
        {"code": "MOVE", "message": "m", "autofix": {"action": "move_to", "id": "ghost", "x": 0, "y": 0}}
    ]))
    .expect("decode");

    let fixed = autofix(&demo_scene(), &issues);

    assert_eq!(
        fixed.element(&"demo-logo".into()).map(|e| e.bounds),
        Some(Bounds::new(150, 150, 150, 150))
    );
    let price = fixed
        .element(&"demo-price".into())
        .and_then(|e| e.text_content())
        .expect("price tile");
    assert_eq!(price.background, Some(Color::BLACK));
    assert_eq!(price.color, Color::WHITE);
    assert_eq!(fixed.element_count(), 3);
}
