//! Contracts for the remote services the composer depends on.
//!
//! Layout suggestion, compliance checking and image export are opaque to the
//! core. Implementations may call a backend or run in-process; the core only
//! relies on the shapes defined here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::autofix::Issue;
use crate::format::Format;
use crate::Scene;

/// Failure reported by a collaborator.
#[derive(Debug, Clone, Error)]
#[error("{service} failed: {message}")]
pub struct CollaboratorError {
    /// Which service failed, e.g. `layout`.
    pub service: String,
    /// What went wrong.
    pub message: String,
}

impl CollaboratorError {
    /// Create a collaborator error.
    #[must_use]
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Creative inputs for a layout suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCriteria {
    /// Target format.
    pub format: Format,
    /// Main headline copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// Secondary copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subhead: Option<String>,
    /// Price or offer copy for the value tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_text: Option<String>,
    /// Logo source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Packshot sources in display order.
    #[serde(default)]
    pub packshots: Vec<String>,
}

impl LayoutCriteria {
    /// Criteria with no copy or assets.
    #[must_use]
    pub fn new(format: impl Into<Format>) -> Self {
        Self {
            format: format.into(),
            headline: None,
            subhead: None,
            value_text: None,
            logo: None,
            packshots: Vec::new(),
        }
    }

    /// Same criteria retargeted at another format.
    #[must_use]
    pub fn for_format(&self, format: Format) -> Self {
        Self {
            format,
            ..self.clone()
        }
    }
}

/// Outcome of a compliance check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Whether the scene passed every rule.
    pub passed: bool,
    /// Findings in rule order.
    pub issues: Vec<Issue>,
}

impl ComplianceReport {
    /// Build a report; it passes when there are no issues.
    #[must_use]
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
        }
    }
}

/// Raster output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image.
    Jpg,
}

/// Location and size of an exported image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedImage {
    /// Where the image can be fetched.
    pub url: String,
    /// Encoded size, when the exporter reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
}

/// Produces ranked candidate scenes for a set of creative inputs.
#[async_trait]
pub trait LayoutSuggester: Send + Sync {
    /// Candidates, best first. An empty list means no suggestion.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails.
    async fn suggest_layouts(&self, criteria: &LayoutCriteria) -> CollaboratorResult<Vec<Scene>>;
}

/// Inspects a scene against brand and platform rules.
#[async_trait]
pub trait ComplianceChecker: Send + Sync {
    /// Check a scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails.
    async fn check_compliance(&self, scene: &Scene) -> CollaboratorResult<ComplianceReport>;
}

/// Renders a scene to a raster image.
#[async_trait]
pub trait ImageExporter: Send + Sync {
    /// Render and store the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or upload fails.
    async fn export_image(
        &self,
        scene: &Scene,
        format: OutputFormat,
    ) -> CollaboratorResult<ExportedImage>;
}
