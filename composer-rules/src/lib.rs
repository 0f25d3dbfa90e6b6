//! # Composer Rules
//!
//! In-process implementations of the composer's collaborator contracts:
//!
//! - [`RuleChecker`] flags safe-zone, packshot, copy, contrast, drinkaware and
//!   font-size violations, each with a corrective directive where one exists.
//! - [`TemplateSuggester`] places logo, copy, value tile and packshots on a
//!   fixed per-format template.
//!
//! Both plug into [`composer_core::Composer`] directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compliance;
pub mod config;
pub mod contrast;
pub mod error;
pub mod layout;

pub use compliance::RuleChecker;
pub use config::{MinFontSizes, RuleConfig};
pub use contrast::{contrast_ratio, passes_wcag_aa, relative_luminance};
pub use error::{RulesError, RulesResult};
pub use layout::TemplateSuggester;
