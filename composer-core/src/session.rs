//! Composer session: the current scene plus the collaborator workflow.
//!
//! At most one collaborator call sequence runs per session. A second request
//! while one is in flight fails fast with [`ComposerError::Busy`] instead of
//! queueing. Local edits (drags, layer moves, local autofix) never wait on
//! collaborators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::autofix::{autofix_with_report, AutofixReport, Issue};
use crate::collab::{
    CollaboratorError, ComplianceChecker, ComplianceReport, ExportedImage, ImageExporter,
    LayoutCriteria, LayoutSuggester, OutputFormat,
};
use crate::format::Format;
use crate::{compositing, interaction, ElementId, Scene};

/// Errors that can occur during session operations.
#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    /// Another collaborator call sequence is still running.
    #[error("Another operation is in progress")]
    Busy,
    /// The session has no collaborator for this step.
    #[error("No {0} collaborator configured")]
    Unavailable(&'static str),
    /// A collaborator call failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// One entry of a multi-format export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatExport {
    /// Format that was exported.
    pub format: Format,
    /// Export location and size.
    #[serde(flatten)]
    pub image: ExportedImage,
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ComposerError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ComposerError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The scene being edited and the services that act on it.
pub struct Composer {
    suggester: Arc<dyn LayoutSuggester>,
    checker: Arc<dyn ComplianceChecker>,
    exporter: Option<Arc<dyn ImageExporter>>,
    scene: RwLock<Scene>,
    issues: RwLock<Vec<Issue>>,
    busy: AtomicBool,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("scene", &self.scene())
            .field("issues", &self.issues().len())
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl Composer {
    /// Create a session starting from `scene`.
    pub fn new(
        scene: Scene,
        suggester: Arc<dyn LayoutSuggester>,
        checker: Arc<dyn ComplianceChecker>,
    ) -> Self {
        Self {
            suggester,
            checker,
            exporter: None,
            scene: RwLock::new(scene),
            issues: RwLock::new(Vec::new()),
            busy: AtomicBool::new(false),
        }
    }

    /// Attach an image exporter.
    #[must_use]
    pub fn with_exporter(mut self, exporter: Arc<dyn ImageExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Snapshot of the current scene.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the pending issues from the last check.
    #[must_use]
    pub fn issues(&self) -> Vec<Issue> {
        self.issues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a collaborator call sequence is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Replace the scene and drop pending issues.
    pub fn replace_scene(&self, scene: Scene) {
        self.set_scene(scene);
        self.set_issues(Vec::new());
    }

    /// Apply a drag end position to one element.
    pub fn drag_end(&self, id: &ElementId, x: f64, y: f64) {
        self.edit(|scene| interaction::move_element(scene, id, x, y));
    }

    /// Raise an element above all others.
    pub fn bring_to_front(&self, id: &ElementId) {
        self.edit(|scene| compositing::bring_to_front(scene, id));
    }

    /// Lower an element beneath all others.
    pub fn send_to_back(&self, id: &ElementId) {
        self.edit(|scene| compositing::send_to_back(scene, id));
    }

    /// Ask for layouts and adopt the best candidate.
    ///
    /// Returns `false`, keeping the current scene, when there is no candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Busy`] if another call is running, or the
    /// collaborator's error.
    pub async fn suggest(&self, criteria: &LayoutCriteria) -> Result<bool, ComposerError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        match self.first_candidate(criteria).await? {
            Some(scene) => {
                tracing::info!(
                    "Adopted suggested {} layout with {} elements",
                    scene.format,
                    scene.element_count()
                );
                self.replace_scene(scene);
                Ok(true)
            }
            None => {
                tracing::info!("No layout suggested for {}", criteria.format);
                Ok(false)
            }
        }
    }

    /// Check the current scene and keep the issues for a later fix.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Busy`] if another call is running, or the
    /// collaborator's error.
    pub async fn check(&self) -> Result<ComplianceReport, ComposerError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let scene = self.scene();
        let report = self.run_check(&scene).await?;
        self.set_issues(report.issues.clone());
        Ok(report)
    }

    /// Apply pending issues locally and clear them. No-op without issues.
    ///
    /// The fix is applied to the scene as it is when the fix runs, so edits
    /// made since the check are kept.
    pub fn apply_fixes(&self) -> AutofixReport {
        let mut scene = self.scene.write().unwrap_or_else(PoisonError::into_inner);
        let issues = std::mem::take(
            &mut *self.issues.write().unwrap_or_else(PoisonError::into_inner),
        );
        if issues.is_empty() {
            return AutofixReport::default();
        }
        let (fixed, report) = autofix_with_report(&scene, &issues);
        *scene = fixed;
        report
    }

    /// Check the current scene and apply every returned directive.
    ///
    /// Directives land on the scene as it is once the check returns, so local
    /// edits made while the checker runs are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Busy`] if another call is running, or the
    /// collaborator's error. The scene is left untouched on error.
    pub async fn server_autofix(&self) -> Result<AutofixReport, ComposerError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let scene = self.scene();
        let report = self.run_check(&scene).await?;

        let mut current = self.scene.write().unwrap_or_else(PoisonError::into_inner);
        let (fixed, applied) = autofix_with_report(&current, &report.issues);
        *current = fixed;
        self.set_issues(Vec::new());
        Ok(applied)
    }

    /// Export the current scene.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Busy`] if another call is running,
    /// [`ComposerError::Unavailable`] without an exporter, or the exporter's error.
    pub async fn export(&self, format: OutputFormat) -> Result<ExportedImage, ComposerError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let scene = self.scene();
        self.run_export(&scene, format).await
    }

    /// Suggest, check, fix and export one creative per format.
    ///
    /// Formats without a candidate are skipped. The session scene is not
    /// changed.
    ///
    /// # Errors
    ///
    /// Stops at the first collaborator failure.
    pub async fn export_all(
        &self,
        criteria: &LayoutCriteria,
        formats: &[Format],
        output: OutputFormat,
    ) -> Result<Vec<FormatExport>, ComposerError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let mut exports = Vec::with_capacity(formats.len());
        for format in formats {
            let candidate = self
                .first_candidate(&criteria.for_format(format.clone()))
                .await?;
            let Some(mut scene) = candidate else {
                tracing::debug!("Skipping {format}: no candidate");
                continue;
            };
            let report = self.run_check(&scene).await?;
            if !report.issues.is_empty() {
                let (fixed, applied) = autofix_with_report(&scene, &report.issues);
                tracing::debug!("{format}: applied {} fix(es)", applied.applied);
                scene = fixed;
            }
            let image = self.run_export(&scene, output).await?;
            exports.push(FormatExport {
                format: format.clone(),
                image,
            });
        }
        Ok(exports)
    }

    async fn first_candidate(
        &self,
        criteria: &LayoutCriteria,
    ) -> Result<Option<Scene>, ComposerError> {
        let candidates = self
            .suggester
            .suggest_layouts(criteria)
            .await
            .inspect_err(|err| tracing::warn!("Layout suggestion failed: {err}"))?;
        Ok(candidates.into_iter().next())
    }

    async fn run_check(&self, scene: &Scene) -> Result<ComplianceReport, ComposerError> {
        let report = self
            .checker
            .check_compliance(scene)
            .await
            .inspect_err(|err| tracing::warn!("Compliance check failed: {err}"))?;
        tracing::info!(
            "Compliance check found {} issue(s) on {}",
            report.issues.len(),
            scene.format
        );
        Ok(report)
    }

    async fn run_export(
        &self,
        scene: &Scene,
        format: OutputFormat,
    ) -> Result<ExportedImage, ComposerError> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or(ComposerError::Unavailable("image export"))?;
        let image = exporter
            .export_image(scene, format)
            .await
            .inspect_err(|err| tracing::warn!("Export failed: {err}"))?;
        Ok(image)
    }

    fn edit<F>(&self, f: F)
    where
        F: FnOnce(&Scene) -> Scene,
    {
        let mut scene = self.scene.write().unwrap_or_else(PoisonError::into_inner);
        *scene = f(&scene);
    }

    fn set_scene(&self, scene: Scene) {
        *self.scene.write().unwrap_or_else(PoisonError::into_inner) = scene;
    }

    fn set_issues(&self, issues: Vec<Issue>) {
        *self.issues.write().unwrap_or_else(PoisonError::into_inner) = issues;
    }
}
