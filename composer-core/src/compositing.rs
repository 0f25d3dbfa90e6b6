//! Paint order, safe-zone geometry and layer reordering.
//!
//! Painting walks [`render_order`] front to back, so later entries occlude
//! earlier ones. Safe zones are advisory; nothing here moves an element to
//! satisfy one.

use crate::format::FormatTable;
use crate::geometry::Bounds;
use crate::{Element, ElementId, Scene};

/// Elements in paint order: ascending effective z, ties in insertion order.
#[must_use]
pub fn render_order(scene: &Scene) -> Vec<&Element> {
    let mut ordered: Vec<&Element> = scene.elements().iter().collect();
    // `sort_by_key` is stable, which is the tie-break.
    ordered.sort_by_key(|e| e.effective_z());
    ordered
}

/// Safe rectangle for the scene's format; unknown formats cover the whole canvas.
#[must_use]
pub fn safe_zone(scene: &Scene, table: &FormatTable) -> Bounds {
    table
        .insets(scene.format.as_str())
        .safe_rect(scene.width, scene.height)
}

/// Ids of elements whose bounds leave the safe zone, in insertion order.
#[must_use]
pub fn outside_safe_zone<'a>(scene: &'a Scene, table: &FormatTable) -> Vec<&'a ElementId> {
    let zone = safe_zone(scene, table);
    scene
        .elements()
        .iter()
        .filter(|e| !zone.contains(&e.bounds))
        .map(|e| &e.id)
        .collect()
}

/// Topmost element containing the canvas point `(x, y)`.
#[must_use]
pub fn element_at(scene: &Scene, x: f64, y: f64) -> Option<&Element> {
    render_order(scene)
        .into_iter()
        .rev()
        .find(|e| e.contains_point(x, y))
}

/// New scene with `id` raised above every other element.
///
/// The new z is one more than the largest z in the scene, counting absent z
/// values and the floor as `0`. Missing ids leave the scene unchanged.
#[must_use]
pub fn bring_to_front(scene: &Scene, id: &ElementId) -> Scene {
    let top = scene
        .elements()
        .iter()
        .map(Element::effective_z)
        .fold(0, i32::max);
    set_z(scene, id, top.saturating_add(1))
}

/// New scene with `id` lowered beneath every other element.
///
/// The new z is one less than the smallest z in the scene, counting absent z
/// values and the ceiling as `0`. Missing ids leave the scene unchanged.
#[must_use]
pub fn send_to_back(scene: &Scene, id: &ElementId) -> Scene {
    let bottom = scene
        .elements()
        .iter()
        .map(Element::effective_z)
        .fold(0, i32::min);
    set_z(scene, id, bottom.saturating_sub(1))
}

fn set_z(scene: &Scene, id: &ElementId, z: i32) -> Scene {
    if scene.element(id).is_none() {
        tracing::debug!("Layer reorder ignored, no element {id}");
        return scene.clone();
    }
    tracing::debug!("Element {id} moved to z={z}");
    scene.update_element(id, |e| e.z = Some(z))
}
