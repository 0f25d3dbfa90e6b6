//! # Creative Composer Core
//!
//! Scene model and editing rules for ad creatives built from logo, packshot
//! and text elements on a format-sized canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                composer-core                │
//! ├─────────────────────────────────────────────┤
//! │  Scene Model     │  Compositing             │
//! │  - Elements      │  - Render order (z)      │
//! │  - Bounds/Color  │  - Safe zones            │
//! │  - Formats       │  - Layer reordering      │
//! ├─────────────────────────────────────────────┤
//! │  Interaction     │  Autofix Engine          │
//! │  - Drag gestures │  - Directive interpreter │
//! │  - Hit testing   │  - Idempotent fixes      │
//! ├─────────────────────────────────────────────┤
//! │  Session: suggest → check → fix → export    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything except [`session`] is a pure transformation over scene values.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod autofix;
pub mod collab;
pub mod compositing;
pub mod element;
pub mod error;
pub mod format;
pub mod geometry;
pub mod interaction;
pub mod scene;
pub mod session;

pub use autofix::{autofix, autofix_with_report, AutofixReport, Directive, Issue, Severity};
pub use collab::{
    CollaboratorError, CollaboratorResult, ComplianceChecker, ComplianceReport, ExportedImage,
    ImageExporter, LayoutCriteria, LayoutSuggester, OutputFormat,
};
pub use compositing::{bring_to_front, render_order, safe_zone, send_to_back};
pub use element::{
    Element, ElementId, ElementKind, ElementType, FontWeight, ImageContent, TextAlign,
    TextContent,
};
pub use error::{CanvasError, CanvasResult};
pub use format::{Format, FormatSpec, FormatTable, SafeZoneInsets};
pub use geometry::{Bounds, Color};
pub use interaction::{move_element, DragState, PointerPosition};
pub use scene::Scene;
pub use session::{Composer, ComposerError, FormatExport};

/// Composer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
