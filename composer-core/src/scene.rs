//! The canvas document: format, background and elements in insertion order.
//!
//! Scenes follow an immutable-update discipline. Every operation that changes
//! a scene borrows `&self` and returns a fresh value, so a reader holding the
//! previous scene always sees a consistent snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{Format, FormatTable};
use crate::geometry::Color;
use crate::{CanvasError, CanvasResult, Element, ElementId};

/// A scene containing all canvas elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Output format name.
    pub format: Format,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Canvas fill color; absent or `null` means white.
    #[serde(
        default = "Scene::default_background",
        deserialize_with = "Scene::background_or_default"
    )]
    pub background_color: Color,
    /// Optional background image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Elements in insertion order (not render order).
    #[serde(default)]
    elements: Vec<Element>,
    /// Free-form metadata carried alongside the scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Scene {
    /// Create a new empty scene with the given format and size.
    #[must_use]
    pub fn new(format: impl Into<Format>, width: u32, height: u32) -> Self {
        Self {
            format: format.into(),
            width,
            height,
            background_color: Self::default_background(),
            background_image: None,
            elements: Vec::new(),
            metadata: None,
        }
    }

    /// Create an empty scene sized to the nominal dimensions of `format`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownFormat`] if the table has no such format.
    pub fn for_format(table: &FormatTable, format: &str) -> CanvasResult<Self> {
        let (width, height) = table
            .dimensions(format)
            .ok_or_else(|| CanvasError::UnknownFormat(format.to_string()))?;
        Ok(Self::new(format, width, height))
    }

    /// Append an element while building a scene.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Set the background color while building a scene.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// New scene with `element` appended.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DuplicateElement`] if the id is already present.
    pub fn add_element(&self, element: Element) -> CanvasResult<Self> {
        if self.position_of(&element.id).is_some() {
            return Err(CanvasError::DuplicateElement(element.id.to_string()));
        }
        Ok(self.clone().with_element(element))
    }

    /// New scene without the element `id`. Missing ids leave the scene as is.
    #[must_use]
    pub fn remove_element(&self, id: &ElementId) -> Self {
        let mut next = self.clone();
        next.elements.retain(|e| e.id != *id);
        next
    }

    /// New scene with `f` applied to the element `id`.
    ///
    /// Returns an unchanged copy when no element has that id.
    #[must_use]
    pub fn update_element<F>(&self, id: &ElementId, f: F) -> Self
    where
        F: FnOnce(&mut Element),
    {
        let mut next = self.clone();
        if let Some(element) = next.element_mut(id) {
            f(element);
        }
        next
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Index of the element `id` in insertion order.
    #[must_use]
    pub fn position_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get the number of elements in the scene.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Mutable access for engines that own a working copy.
    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    pub(crate) fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }

    /// Check the structural invariants of the scene.
    ///
    /// Ids must be unique and, when the format is known, the canvas size must
    /// match its nominal dimensions.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self, table: &FormatTable) -> CanvasResult<()> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(&element.id) {
                return Err(CanvasError::DuplicateElement(element.id.to_string()));
            }
        }

        if let Some((expected_width, expected_height)) = table.dimensions(self.format.as_str()) {
            if (expected_width, expected_height) != (self.width, self.height) {
                return Err(CanvasError::DimensionMismatch {
                    format: self.format.to_string(),
                    expected_width,
                    expected_height,
                    width: self.width,
                    height: self.height,
                });
            }
        }

        Ok(())
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }

    const fn default_background() -> Color {
        Color::WHITE
    }

    fn background_or_default<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Color>::deserialize(deserializer)?.unwrap_or_else(Self::default_background))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, TextContent};

    fn sample() -> Scene {
        Scene::new(Format::SQUARE, 1080, 1080)
            .with_element(Element::logo("logo", "logo.png", Bounds::new(50, 50, 150, 150)))
            .with_element(Element::text(
                "headline",
                TextContent::new("Fresh deals", 64),
                Bounds::new(108, 216, 864, 150),
            ))
    }

    #[test]
    fn test_scene_add_remove() {
        let scene = Scene::new(Format::SQUARE, 1080, 1080);
        assert!(scene.is_empty());

        let added = scene
            .add_element(Element::packshot("p1", "p1.png", Bounds::new(0, 0, 10, 10)))
            .expect("should add");

        assert!(scene.is_empty(), "original scene must not change");
        assert_eq!(added.element_count(), 1);
        assert!(added.element(&"p1".into()).is_some());

        let removed = added.remove_element(&"p1".into());
        assert!(removed.is_empty());
        assert_eq!(added.element_count(), 1);
    }

    #[test]
    fn test_add_duplicate_id_fails() {
        let scene = sample();
        let result = scene.add_element(Element::image("logo", "x.png", Bounds::default()));
        assert!(matches!(result, Err(CanvasError::DuplicateElement(id)) if id == "logo"));
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let scene = sample();
        let updated = scene.update_element(&"missing".into(), |e| e.bounds.x = 999);
        assert_eq!(updated, scene);
    }

    #[test]
    fn test_lookup_by_id() {
        let scene = sample();
        assert_eq!(scene.position_of(&"headline".into()), Some(1));
        assert_eq!(
            scene.element(&"logo".into()).map(|e| e.bounds),
            Some(Bounds::new(50, 50, 150, 150))
        );
        assert_eq!(scene.position_of(&"nope".into()), None);
    }

    #[test]
    fn test_validate() {
        let table = FormatTable::builtin();
        assert!(sample().validate(&table).is_ok());

        let mut wrong_size = sample();
        wrong_size.width = 1200;
        assert!(matches!(
            wrong_size.validate(&table),
            Err(CanvasError::DimensionMismatch { .. })
        ));

        let duplicate = sample().with_element(Element::logo("logo", "b.png", Bounds::default()));
        assert!(matches!(
            duplicate.validate(&table),
            Err(CanvasError::DuplicateElement(_))
        ));

        let custom = Scene::new("BILLBOARD", 10, 10);
        assert!(custom.validate(&table).is_ok());
    }

    #[test]
    fn test_for_format() {
        let table = FormatTable::builtin();
        let scene = Scene::for_format(&table, Format::LANDSCAPE).expect("known format");
        assert_eq!((scene.width, scene.height), (1200, 628));
        assert!(matches!(
            Scene::for_format(&table, "BILLBOARD"),
            Err(CanvasError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_insertion_order() {
        let scene = sample();
        let json = scene.to_json().expect("serialize");
        let restored = Scene::from_json(&json).expect("deserialize");
        assert_eq!(restored, scene);
        let ids: Vec<_> = restored.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["logo", "headline"]);
    }

    #[test]
    fn test_null_or_missing_background_is_white() {
        let explicit_null = Scene::from_json(
            r#"{"format": "SQUARE", "width": 1080, "height": 1080, "background_color": null}"#,
        )
        .expect("null background");
        assert_eq!(explicit_null.background_color, Color::WHITE);

        let missing = Scene::from_json(r#"{"format": "SQUARE", "width": 1080, "height": 1080}"#)
            .expect("missing background");
        assert_eq!(missing.background_color, Color::WHITE);

        let dark = Scene::from_json(
            r#"{"format": "SQUARE", "width": 1080, "height": 1080, "background_color": {"r": 10, "g": 20, "b": 30}}"#,
        )
        .expect("explicit background");
        assert_eq!(dark.background_color, Color::rgb(10, 20, 30));
    }
}
