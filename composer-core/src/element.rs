//! Canvas elements - the building blocks of scenes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Bounds, Color};

/// Identifier for an element, unique within one scene and stable across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ElementId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Font weight for text-bearing elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Right aligned.
    Right,
}

/// Content carried by `logo`, `packshot` and `image` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Image source path or URL.
    pub src: String,
    /// Whether the renderer should preserve the source aspect ratio.
    #[serde(default = "ImageContent::default_keep_aspect")]
    pub keep_aspect: bool,
}

impl ImageContent {
    /// Image content for the given source.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            keep_aspect: true,
        }
    }

    const fn default_keep_aspect() -> bool {
        true
    }
}

/// Content carried by `text` and `value_tile` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Text to display.
    pub text: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// Font family name.
    #[serde(default = "TextContent::default_font_family")]
    pub font_family: String,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Text color.
    #[serde(default)]
    pub color: Color,
    /// Optional fill behind the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

impl TextContent {
    /// Text content with default styling.
    #[must_use]
    pub fn new(text: impl Into<String>, font_size: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_family: Self::default_font_family(),
            font_weight: FontWeight::Normal,
            align: TextAlign::Center,
            color: Color::BLACK,
            background: None,
        }
    }

    /// Set the font weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    /// Set the text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the background fill.
    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    fn default_font_family() -> String {
        "Arial".to_string()
    }
}

/// The type of content an element contains, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// Brand logo.
    Logo(ImageContent),
    /// Product shot.
    Packshot(ImageContent),
    /// Generic image.
    Image(ImageContent),
    /// Free text (headline, subhead, legal copy).
    Text(TextContent),
    /// Price or offer tile.
    ValueTile(TextContent),
}

/// Discriminant of [`ElementKind`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Brand logo.
    Logo,
    /// Product shot.
    Packshot,
    /// Generic image.
    Image,
    /// Free text.
    Text,
    /// Price or offer tile.
    ValueTile,
}

impl ElementKind {
    /// The payload-free type of this kind.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Logo(_) => ElementType::Logo,
            Self::Packshot(_) => ElementType::Packshot,
            Self::Image(_) => ElementType::Image,
            Self::Text(_) => ElementType::Text,
            Self::ValueTile(_) => ElementType::ValueTile,
        }
    }
}

/// A positioned item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content, including its `type` tag.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Position and size.
    pub bounds: Bounds,
    /// Render-order hint. `None` behaves as `0` but is kept distinct.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
}

impl Element {
    /// Create a new element.
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            kind,
            bounds,
            z: None,
        }
    }

    /// Create a logo element.
    #[must_use]
    pub fn logo(id: impl Into<ElementId>, src: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(id, ElementKind::Logo(ImageContent::new(src)), bounds)
    }

    /// Create a packshot element.
    #[must_use]
    pub fn packshot(id: impl Into<ElementId>, src: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(id, ElementKind::Packshot(ImageContent::new(src)), bounds)
    }

    /// Create a generic image element.
    #[must_use]
    pub fn image(id: impl Into<ElementId>, src: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(id, ElementKind::Image(ImageContent::new(src)), bounds)
    }

    /// Create a text element.
    #[must_use]
    pub fn text(id: impl Into<ElementId>, content: TextContent, bounds: Bounds) -> Self {
        Self::new(id, ElementKind::Text(content), bounds)
    }

    /// Create a value tile element.
    #[must_use]
    pub fn value_tile(id: impl Into<ElementId>, content: TextContent, bounds: Bounds) -> Self {
        Self::new(id, ElementKind::ValueTile(content), bounds)
    }

    /// Set an explicit z-index.
    #[must_use]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = Some(z);
        self
    }

    /// Z-index used for ordering; absent means `0`.
    #[must_use]
    pub fn effective_z(&self) -> i32 {
        self.z.unwrap_or(0)
    }

    /// The payload-free type of this element.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Whether this element is a packshot.
    #[must_use]
    pub const fn is_packshot(&self) -> bool {
        matches!(self.kind, ElementKind::Packshot(_))
    }

    /// Text content for `text` and `value_tile` elements.
    #[must_use]
    pub const fn text_content(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(content) | ElementKind::ValueTile(content) => Some(content),
            _ => None,
        }
    }

    /// Mutable text content for `text` and `value_tile` elements.
    pub fn text_content_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            ElementKind::Text(content) | ElementKind::ValueTile(content) => Some(content),
            _ => None,
        }
    }

    /// Image content for `logo`, `packshot` and `image` elements.
    #[must_use]
    pub const fn image_content(&self) -> Option<&ImageContent> {
        match &self.kind {
            ElementKind::Logo(content)
            | ElementKind::Packshot(content)
            | ElementKind::Image(content) => Some(content),
            _ => None,
        }
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.bounds.contains_point(x, y)
    }
}
