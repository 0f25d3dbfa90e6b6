//! Pointer drag handling.
//!
//! A drag ends in exactly one bounds update on one element. Positions are
//! rounded to whole pixels but never clamped; pulling an element off-canvas is
//! allowed and left for autofix to correct.

use serde::{Deserialize, Serialize};

use crate::compositing::element_at;
use crate::geometry::round_px;
use crate::{ElementId, Scene};

/// A pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl PointerPosition {
    /// Create a pointer position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// New scene with element `id` moved to the rounded position `(x, y)`.
///
/// Width, height and every other element are untouched. A non-finite
/// coordinate leaves that axis where it was. Unknown ids return an unchanged
/// copy.
#[must_use]
pub fn move_element(scene: &Scene, id: &ElementId, x: f64, y: f64) -> Scene {
    let Some(current) = scene.element(id).map(|e| e.bounds) else {
        tracing::debug!("Drag ignored, no element {id}");
        return scene.clone();
    };
    let x = if x.is_finite() { round_px(x) } else { current.x };
    let y = if y.is_finite() { round_px(y) } else { current.y };
    tracing::debug!("Element {id} dragged to ({x}, {y})");
    scene.update_element(id, |e| e.bounds = e.bounds.at(x, y))
}

/// An in-progress drag of a single element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    /// Element being dragged.
    pub target: ElementId,
    /// Element position when the drag started.
    origin: (i32, i32),
    /// Pointer position when the drag started.
    start: PointerPosition,
}

impl DragState {
    /// Start dragging the topmost element under `pointer`.
    ///
    /// Returns `None` when the pointer is not over any element.
    #[must_use]
    pub fn begin(scene: &Scene, pointer: PointerPosition) -> Option<Self> {
        let element = element_at(scene, pointer.x, pointer.y)?;
        tracing::debug!("Drag started on element {}", element.id);
        Some(Self {
            target: element.id.clone(),
            origin: (element.bounds.x, element.bounds.y),
            start: pointer,
        })
    }

    /// Start dragging a specific element, regardless of hit testing.
    #[must_use]
    pub fn for_element(scene: &Scene, id: &ElementId, pointer: PointerPosition) -> Option<Self> {
        let element = scene.element(id)?;
        Some(Self {
            target: element.id.clone(),
            origin: (element.bounds.x, element.bounds.y),
            start: pointer,
        })
    }

    /// Unrounded element position for the current pointer.
    #[must_use]
    pub fn position_at(&self, pointer: PointerPosition) -> (f64, f64) {
        (
            f64::from(self.origin.0) + (pointer.x - self.start.x),
            f64::from(self.origin.1) + (pointer.y - self.start.y),
        )
    }

    /// Finish the drag, producing the updated scene.
    #[must_use]
    pub fn finish(self, scene: &Scene, pointer: PointerPosition) -> Scene {
        let (x, y) = self.position_at(pointer);
        move_element(scene, &self.target, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::{Bounds, Element, TextContent};

    fn scene() -> Scene {
        Scene::new(Format::SQUARE, 1080, 1080)
            .with_element(Element::logo("logo", "logo.png", Bounds::new(50, 50, 150, 150)).with_z(2))
            .with_element(Element::text(
                "copy",
                TextContent::new("Hello", 32),
                Bounds::new(300, 300, 200, 80),
            ))
    }

    #[test]
    fn test_move_element_rounds_and_keeps_size() {
        let before = scene();
        let after = move_element(&before, &"copy".into(), 120.4, -35.6);

        let moved = after.element(&"copy".into()).expect("present");
        assert_eq!(moved.bounds, Bounds::new(120, -36, 200, 80));
        assert_eq!(after.element(&"logo".into()), before.element(&"logo".into()));
        assert_eq!(before.element(&"copy".into()).map(|e| e.bounds.x), Some(300));
    }

    #[test]
    fn test_move_element_keeps_non_finite_axis() {
        let before = scene();
        let after = move_element(&before, &"copy".into(), f64::NAN, 42.0);
        assert_eq!(
            after.element(&"copy".into()).map(|e| e.bounds),
            Some(Bounds::new(300, 42, 200, 80))
        );

        let after = move_element(&before, &"copy".into(), 10.0, f64::INFINITY);
        assert_eq!(
            after.element(&"copy".into()).map(|e| e.bounds),
            Some(Bounds::new(10, 300, 200, 80))
        );
    }

    #[test]
    fn test_move_missing_element_is_noop() {
        let before = scene();
        assert_eq!(move_element(&before, &"ghost".into(), 1.0, 1.0), before);
    }

    #[test]
    fn test_drag_gesture_applies_pointer_delta() {
        let before = scene();
        let drag = DragState::begin(&before, PointerPosition::new(60.0, 60.0)).expect("hit logo");
        assert_eq!(drag.target, "logo");
        assert_eq!(drag.position_at(PointerPosition::new(70.0, 55.0)), (60.0, 45.0));

        let after = drag.finish(&before, PointerPosition::new(160.7, 260.2));
        assert_eq!(
            after.element(&"logo".into()).map(|e| e.bounds),
            Some(Bounds::new(151, 250, 150, 150))
        );
    }

    #[test]
    fn test_drag_on_empty_canvas() {
        assert!(DragState::begin(&scene(), PointerPosition::new(900.0, 900.0)).is_none());
        assert!(DragState::for_element(&scene(), &"ghost".into(), PointerPosition::new(0.0, 0.0)).is_none());
    }
}
