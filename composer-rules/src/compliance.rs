//! In-process compliance checking.
//!
//! Rules run in a fixed order and each finding carries the directive that
//! [`composer_core::autofix`] needs to correct it, where one exists.

use async_trait::async_trait;
use composer_core::{
    safe_zone, CollaboratorResult, ComplianceChecker, ComplianceReport, Directive, Element,
    FormatTable, Issue, Scene, TextContent,
};
use regex::{Regex, RegexBuilder};

use crate::config::RuleConfig;
use crate::contrast::passes_wcag_aa;
use crate::error::RulesResult;

/// Brand and platform rules evaluated locally.
#[derive(Debug, Clone)]
pub struct RuleChecker {
    config: RuleConfig,
    formats: FormatTable,
    banned_copy: Option<Regex>,
}

impl RuleChecker {
    /// Build a checker.
    ///
    /// # Errors
    ///
    /// Returns an error if a banned-copy pattern does not compile.
    pub fn new(config: RuleConfig, formats: FormatTable) -> RulesResult<Self> {
        let banned_copy = if config.banned_copy_patterns.is_empty() {
            None
        } else {
            let combined = config
                .banned_copy_patterns
                .iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|");
            Some(RegexBuilder::new(&combined).case_insensitive(true).build()?)
        };
        Ok(Self {
            config,
            formats,
            banned_copy,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Run every rule against `scene` and collect the findings.
    #[must_use]
    pub fn check(&self, scene: &Scene) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.check_safe_zone(scene, &mut issues);
        self.check_packshot_limit(scene, &mut issues);
        self.check_banned_copy(scene, &mut issues);
        self.check_contrast(scene, &mut issues);
        self.check_drinkaware(scene, &mut issues);
        self.check_min_font_sizes(scene, &mut issues);

        tracing::debug!(
            format = %scene.format,
            issues = issues.len(),
            "Compliance check complete"
        );
        issues
    }

    fn check_safe_zone(&self, scene: &Scene, issues: &mut Vec<Issue>) {
        let zone = safe_zone(scene, &self.formats);
        let max_right = zone.right();
        let max_bottom = zone.bottom();

        for element in scene.elements() {
            if zone.contains(&element.bounds) {
                continue;
            }
            #[allow(clippy::cast_precision_loss)] // canvas-sized values
            let directive = Directive::nudge_inside(
                element.id.clone(),
                Some(f64::from(zone.x)),
                Some((max_right - i64::from(element.bounds.width)) as f64),
                Some(f64::from(zone.y)),
                Some((max_bottom - i64::from(element.bounds.height)) as f64),
            );
            issues.push(
                Issue::new("SAFE_ZONE", format!("Element {} violates safe zone.", element.id))
                    .with_autofix(directive),
            );
        }
    }

    fn check_packshot_limit(&self, scene: &Scene, issues: &mut Vec<Issue>) {
        let limit = self.config.packshot_limit;
        let count = scene.elements().iter().filter(|e| e.is_packshot()).count();
        if count > limit {
            issues.push(
                Issue::new(
                    "PACKSHOT_LIMIT",
                    format!("Packshots exceed {limit} (found {count})."),
                )
                .with_autofix(Directive::limit_packshots(limit)),
            );
        }
    }

    fn check_banned_copy(&self, scene: &Scene, issues: &mut Vec<Issue>) {
        let Some(pattern) = &self.banned_copy else {
            return;
        };
        for (element, text) in text_elements(scene) {
            if pattern.is_match(&text.text) {
                issues.push(
                    Issue::new("BANNED_COPY", format!("Banned copy detected in {}.", element.id))
                        .with_suggestion("Rewrite the copy without the prohibited claim."),
                );
            }
        }
    }

    fn check_contrast(&self, scene: &Scene, issues: &mut Vec<Issue>) {
        for (element, text) in text_elements(scene) {
            let background = text.background.unwrap_or(scene.background_color);
            let large = text.font_size >= self.config.large_text_size;
            if !passes_wcag_aa(text.color, background, large) {
                issues.push(
                    Issue::new("CONTRAST", format!("Contrast fails WCAG AA for {}.", element.id))
                        .with_autofix(Directive::increase_contrast(element.id.clone())),
                );
            }
        }
    }

    fn check_drinkaware(&self, scene: &Scene, issues: &mut Vec<Issue>) {
        let needle = self.config.drinkaware_text.to_lowercase();
        if needle.is_empty() {
            return;
        }
        let height = f64::from(scene.height);
        let band = (height * self.config.drinkaware_band).floor();
        let target = (height * self.config.drinkaware_target).floor();
        let min_size = self.config.min_font_sizes.drinkaware;

        for (element, text) in text_elements(scene) {
            if !text.text.to_lowercase().contains(&needle) {
                continue;
            }
            if text.font_size < min_size {
                issues.push(
                    Issue::new("DRINKAWARE_SIZE", "Drinkaware font size too small.").with_autofix(
                        Directive::set_font_size(element.id.clone(), f64::from(min_size)),
                    ),
                );
            }
            if f64::from(element.bounds.y) < band {
                issues.push(
                    Issue::new("DRINKAWARE_POSITION", "Drinkaware must be at the bottom area.")
                        .with_autofix(Directive::move_to(
                            element.id.clone(),
                            Some(f64::from(element.bounds.x)),
                            Some(target),
                        )),
                );
            }
        }
    }

    fn check_min_font_sizes(&self, scene: &Scene, issues: &mut Vec<Issue>) {
        let minimums = self.config.min_font_sizes.by_element_id();
        for (element, text) in text_elements(scene) {
            let Some(&min) = minimums.get(element.id.as_str()) else {
                continue;
            };
            if text.font_size < min {
                issues.push(
                    Issue::new("MIN_FONT_SIZE", format!("{} font size below minimum.", element.id))
                        .with_autofix(Directive::set_font_size(element.id.clone(), f64::from(min))),
                );
            }
        }
    }
}

fn text_elements(scene: &Scene) -> impl Iterator<Item = (&Element, &TextContent)> {
    scene
        .elements()
        .iter()
        .filter_map(|e| e.text_content().map(|text| (e, text)))
}

#[async_trait]
impl ComplianceChecker for RuleChecker {
    async fn check_compliance(&self, scene: &Scene) -> CollaboratorResult<ComplianceReport> {
        Ok(ComplianceReport::from_issues(self.check(scene)))
    }
}
