//! Output formats and their geometry.
//!
//! Each format maps to nominal canvas dimensions and a safe-zone inset table.
//! The table ships with built-in entries and can be extended from JSON, so new
//! formats never require engine changes.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::Bounds;

/// Name of an output format, e.g. `SQUARE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(String);

impl Format {
    /// Facebook story, 1080x1920.
    pub const FB_STORY: &'static str = "FB_STORY";
    /// Instagram story, 1080x1920.
    pub const IG_STORY: &'static str = "IG_STORY";
    /// Square feed post, 1080x1080.
    pub const SQUARE: &'static str = "SQUARE";
    /// Landscape link ad, 1200x628.
    pub const LANDSCAPE: &'static str = "LANDSCAPE";
    /// Checkout banner, 1200x900.
    pub const CHECKOUT: &'static str = "CHECKOUT";

    /// Create a format name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the format name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Format {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Format {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Safe-zone margins in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeZoneInsets {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin.
    pub bottom: u32,
    /// Left margin.
    pub left: u32,
}

impl SafeZoneInsets {
    /// Create insets in CSS order: top, right, bottom, left.
    #[must_use]
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Equal margin on every side.
    #[must_use]
    pub const fn uniform(margin: u32) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Safe rectangle inside a `width` x `height` canvas.
    ///
    /// Extents that would go negative are clamped to zero.
    #[must_use]
    pub fn safe_rect(&self, width: u32, height: u32) -> Bounds {
        Bounds {
            x: i32::try_from(self.left).unwrap_or(i32::MAX),
            y: i32::try_from(self.top).unwrap_or(i32::MAX),
            width: width.saturating_sub(self.left).saturating_sub(self.right),
            height: height.saturating_sub(self.top).saturating_sub(self.bottom),
        }
    }
}

/// Geometry of one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Nominal canvas width.
    pub width: u32,
    /// Nominal canvas height.
    pub height: u32,
    /// Safe-zone margins.
    #[serde(default)]
    pub safe_zone: SafeZoneInsets,
}

impl FormatSpec {
    /// Create a format spec.
    #[must_use]
    pub const fn new(width: u32, height: u32, safe_zone: SafeZoneInsets) -> Self {
        Self {
            width,
            height,
            safe_zone,
        }
    }
}

/// Lookup table from format name to geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatTable {
    formats: BTreeMap<Format, FormatSpec>,
}

impl FormatTable {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            formats: BTreeMap::new(),
        }
    }

    /// The built-in advertising formats.
    #[must_use]
    pub fn builtin() -> Self {
        let story = FormatSpec::new(1080, 1920, SafeZoneInsets::new(250, 50, 250, 50));
        let mut table = Self::empty();
        table.insert(Format::FB_STORY, story);
        table.insert(Format::IG_STORY, story);
        table.insert(
            Format::SQUARE,
            FormatSpec::new(1080, 1080, SafeZoneInsets::uniform(150)),
        );
        table.insert(
            Format::LANDSCAPE,
            FormatSpec::new(1200, 628, SafeZoneInsets::uniform(200)),
        );
        table.insert(
            Format::CHECKOUT,
            FormatSpec::new(1200, 900, SafeZoneInsets::uniform(200)),
        );
        table
    }

    /// Parse a table from JSON of the form `{"NAME": {"width": .., "height": .., "safe_zone": {..}}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }

    /// Load the built-in table and merge the formats from a JSON file over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let overrides = Self::from_json(&contents)?;
        tracing::debug!(
            "Loaded {} format(s) from {}",
            overrides.len(),
            path.display()
        );
        let mut table = Self::builtin();
        table.extend(overrides);
        Ok(table)
    }

    /// Serialize the table to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string_pretty(self).map_err(CanvasError::Serialization)
    }

    /// Insert or replace a format.
    pub fn insert(&mut self, format: impl Into<Format>, spec: FormatSpec) {
        self.formats.insert(format.into(), spec);
    }

    /// Merge another table over this one; entries in `other` win.
    pub fn extend(&mut self, other: Self) {
        self.formats.extend(other.formats);
    }

    /// Geometry for a format, if known.
    #[must_use]
    pub fn get(&self, format: &str) -> Option<&FormatSpec> {
        self.formats.get(format)
    }

    /// Nominal `(width, height)` for a format, if known.
    #[must_use]
    pub fn dimensions(&self, format: &str) -> Option<(u32, u32)> {
        self.get(format).map(|spec| (spec.width, spec.height))
    }

    /// Safe-zone insets for a format; unknown formats get zero insets.
    #[must_use]
    pub fn insets(&self, format: &str) -> SafeZoneInsets {
        self.get(format)
            .map(|spec| spec.safe_zone)
            .unwrap_or_default()
    }

    /// Iterate over formats in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Format, &FormatSpec)> {
        self.formats.iter()
    }

    /// Format names in name order.
    pub fn names(&self) -> impl Iterator<Item = &Format> {
        self.formats.keys()
    }

    /// Number of formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Check if the table has no formats.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::builtin()
    }
}
