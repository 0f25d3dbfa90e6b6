//! Deterministic interpretation of compliance issues into scene corrections.
//!
//! [`autofix`] walks the issue list in order against a working copy of the
//! scene. Each issue may carry a [`Directive`]; directives that name a missing
//! element, or that cannot be decoded, are no-ops and never abort the batch.
//! Every handler is idempotent: feeding a corrected scene back through the same
//! issues changes nothing further.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::geometry::{round_px, Color};
use crate::{ElementId, Scene};

/// Packshots kept by `limit_packshots` when no count is given.
pub const DEFAULT_PACKSHOT_LIMIT: usize = 3;

/// How serious a compliance finding is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks publishing.
    #[default]
    Error,
    /// Should be reviewed.
    Warning,
    /// Informational only.
    Info,
}

/// A compliance finding, optionally paired with a corrective directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Machine-readable rule code, e.g. `SAFE_ZONE`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Severity of the finding.
    #[serde(default)]
    pub severity: Severity,
    /// Optional advice for manual correction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Optional automatic correction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autofix: Option<Directive>,
}

impl Issue {
    /// Create an error-severity issue without a directive.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: Severity::Error,
            suggestion: None,
            autofix: None,
        }
    }

    /// Attach a directive.
    #[must_use]
    pub fn with_autofix(mut self, directive: Directive) -> Self {
        self.autofix = Some(directive);
        self
    }

    /// Set the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach manual advice.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A corrective transform, tagged by `action` on the wire.
///
/// Decoding never fails. Unknown actions, and known actions without a usable
/// `id`, become [`Directive::Unrecognized`] and are skipped. A numeric field of
/// the wrong type is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Directive {
    /// Clamp an element's position into a box. Omitted bounds do not constrain.
    NudgeInside {
        /// Target element.
        id: ElementId,
        /// Lowest allowed x.
        min_x: Option<f64>,
        /// Highest allowed x.
        max_x: Option<f64>,
        /// Lowest allowed y.
        min_y: Option<f64>,
        /// Highest allowed y.
        max_y: Option<f64>,
    },
    /// Replace the font size of a text-bearing element.
    SetFontSize {
        /// Target element.
        id: ElementId,
        /// New size; absent or non-positive keeps the current size.
        size: Option<f64>,
    },
    /// Move an element; each axis changes only when given.
    MoveTo {
        /// Target element.
        id: ElementId,
        /// New x.
        x: Option<f64>,
        /// New y.
        y: Option<f64>,
    },
    /// Keep the first `keep` packshots and drop the rest.
    LimitPackshots {
        /// Packshots to keep, [`DEFAULT_PACKSHOT_LIMIT`] when absent.
        keep: Option<usize>,
    },
    /// Force white-on-black on a text-bearing element.
    IncreaseContrast {
        /// Target element.
        id: ElementId,
    },
    /// Any directive this engine does not understand.
    Unrecognized {
        /// The `action` tag, when one was present.
        action: Option<String>,
        /// The directive as received.
        raw: Value,
    },
}

/// Wire shape of the directives this engine understands.
///
/// Numeric fields decode independently: a value of the wrong type reads as
/// absent instead of rejecting the whole directive.
#[derive(Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum KnownDirective {
    NudgeInside {
        id: ElementId,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        min_x: Option<f64>,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        max_x: Option<f64>,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        min_y: Option<f64>,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        max_y: Option<f64>,
    },
    SetFontSize {
        id: ElementId,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        size: Option<f64>,
    },
    MoveTo {
        id: ElementId,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    LimitPackshots {
        #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
        keep: Option<usize>,
    },
    IncreaseContrast {
        id: ElementId,
    },
}

/// Any finite JSON number; everything else is `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite()))
}

/// A non-negative JSON number truncated to a count, so `2.0` and `2.7` both read as 2.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // non-negative, saturating
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as usize))
}

impl From<Value> for Directive {
    fn from(raw: Value) -> Self {
        match serde_json::from_value::<KnownDirective>(raw.clone()) {
            Ok(known) => Self::from_known(known),
            Err(err) => {
                tracing::debug!("Unrecognized directive {raw}: {err}");
                Self::Unrecognized {
                    action: raw.get("action").and_then(Value::as_str).map(String::from),
                    raw,
                }
            }
        }
    }
}

impl Directive {
    fn from_known(known: KnownDirective) -> Self {
        match known {
            KnownDirective::NudgeInside {
                id,
                min_x,
                max_x,
                min_y,
                max_y,
            } => Self::NudgeInside {
                id,
                min_x,
                max_x,
                min_y,
                max_y,
            },
            KnownDirective::SetFontSize { id, size } => Self::SetFontSize { id, size },
            KnownDirective::MoveTo { id, x, y } => Self::MoveTo { id, x, y },
            KnownDirective::LimitPackshots { keep } => Self::LimitPackshots { keep },
            KnownDirective::IncreaseContrast { id } => Self::IncreaseContrast { id },
        }
    }
}

impl From<Directive> for Value {
    fn from(directive: Directive) -> Self {
        let known = match directive {
            Directive::Unrecognized { raw, .. } => return raw,
            Directive::NudgeInside {
                id,
                min_x,
                max_x,
                min_y,
                max_y,
            } => KnownDirective::NudgeInside {
                id,
                min_x,
                max_x,
                min_y,
                max_y,
            },
            Directive::SetFontSize { id, size } => KnownDirective::SetFontSize { id, size },
            Directive::MoveTo { id, x, y } => KnownDirective::MoveTo { id, x, y },
            Directive::LimitPackshots { keep } => KnownDirective::LimitPackshots { keep },
            Directive::IncreaseContrast { id } => KnownDirective::IncreaseContrast { id },
        };
        serde_json::to_value(known).unwrap_or(Value::Null)
    }
}

impl Directive {
    /// Clamp element `id` into the given box.
    #[must_use]
    pub fn nudge_inside(
        id: impl Into<ElementId>,
        min_x: Option<f64>,
        max_x: Option<f64>,
        min_y: Option<f64>,
        max_y: Option<f64>,
    ) -> Self {
        Self::NudgeInside {
            id: id.into(),
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Set the font size of element `id`.
    #[must_use]
    pub fn set_font_size(id: impl Into<ElementId>, size: f64) -> Self {
        Self::SetFontSize {
            id: id.into(),
            size: Some(size),
        }
    }

    /// Move element `id`.
    #[must_use]
    pub fn move_to(id: impl Into<ElementId>, x: Option<f64>, y: Option<f64>) -> Self {
        Self::MoveTo { id: id.into(), x, y }
    }

    /// Keep at most `keep` packshots.
    #[must_use]
    pub const fn limit_packshots(keep: usize) -> Self {
        Self::LimitPackshots { keep: Some(keep) }
    }

    /// Force high contrast on element `id`.
    #[must_use]
    pub fn increase_contrast(id: impl Into<ElementId>) -> Self {
        Self::IncreaseContrast { id: id.into() }
    }

    /// The wire `action` tag.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::NudgeInside { .. } => Some("nudge_inside"),
            Self::SetFontSize { .. } => Some("set_font_size"),
            Self::MoveTo { .. } => Some("move_to"),
            Self::LimitPackshots { .. } => Some("limit_packshots"),
            Self::IncreaseContrast { .. } => Some("increase_contrast"),
            Self::Unrecognized { action, .. } => action.as_deref(),
        }
    }
}

/// What happened to each issue during an autofix pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutofixReport {
    /// Directives whose handler ran against an existing target.
    pub applied: usize,
    /// Directives naming a missing element or an inapplicable element type.
    pub skipped: usize,
    /// Directives with an unknown action or without a usable target id.
    pub unrecognized: usize,
    /// Issues without a directive.
    pub manual: usize,
}

enum Outcome {
    Applied,
    Skipped,
    Unrecognized,
}

/// Apply every issue's directive to a copy of `scene`, in order.
#[must_use]
pub fn autofix(scene: &Scene, issues: &[Issue]) -> Scene {
    autofix_with_report(scene, issues).0
}

/// Like [`autofix`], also reporting how each issue was handled.
#[must_use]
pub fn autofix_with_report(scene: &Scene, issues: &[Issue]) -> (Scene, AutofixReport) {
    let mut working = scene.clone();
    let mut report = AutofixReport::default();

    for issue in issues {
        let Some(directive) = &issue.autofix else {
            report.manual += 1;
            continue;
        };
        match apply(&mut working, directive) {
            Outcome::Applied => report.applied += 1,
            Outcome::Skipped => {
                tracing::debug!("Issue {} skipped: target not applicable", issue.code);
                report.skipped += 1;
            }
            Outcome::Unrecognized => report.unrecognized += 1,
        }
    }

    tracing::debug!(
        applied = report.applied,
        skipped = report.skipped,
        unrecognized = report.unrecognized,
        manual = report.manual,
        "Autofix pass complete"
    );
    (working, report)
}

fn apply(scene: &mut Scene, directive: &Directive) -> Outcome {
    match directive {
        Directive::NudgeInside {
            id,
            min_x,
            max_x,
            min_y,
            max_y,
        } => {
            let Some(element) = scene.element_mut(id) else {
                return Outcome::Skipped;
            };
            let x = clamp_axis(element.bounds.x, *min_x, *max_x);
            let y = clamp_axis(element.bounds.y, *min_y, *max_y);
            element.bounds = element.bounds.at(x, y);
            Outcome::Applied
        }
        Directive::SetFontSize { id, size } => {
            let Some(text) = scene.element_mut(id).and_then(|e| e.text_content_mut()) else {
                return Outcome::Skipped;
            };
            if let Some(size) = size.and_then(font_size_px) {
                text.font_size = size;
            }
            Outcome::Applied
        }
        Directive::MoveTo { id, x, y } => {
            let Some(element) = scene.element_mut(id) else {
                return Outcome::Skipped;
            };
            let new_x = x.filter(|v| v.is_finite()).map_or(element.bounds.x, round_px);
            let new_y = y.filter(|v| v.is_finite()).map_or(element.bounds.y, round_px);
            element.bounds = element.bounds.at(new_x, new_y);
            Outcome::Applied
        }
        Directive::LimitPackshots { keep } => {
            let keep = keep.unwrap_or(DEFAULT_PACKSHOT_LIMIT);
            let mut kept = 0;
            scene.elements_mut().retain(|e| {
                if !e.is_packshot() {
                    return true;
                }
                kept += 1;
                kept <= keep
            });
            Outcome::Applied
        }
        Directive::IncreaseContrast { id } => {
            let Some(text) = scene.element_mut(id).and_then(|e| e.text_content_mut()) else {
                return Outcome::Skipped;
            };
            text.background = Some(Color::BLACK);
            text.color = Color::WHITE;
            Outcome::Applied
        }
        Directive::Unrecognized { action, .. } => {
            tracing::debug!("Ignoring unrecognized directive {:?}", action);
            Outcome::Unrecognized
        }
    }
}

/// `min(max(value, lower), upper)` on whole pixels; absent bounds do not constrain
/// and the upper bound wins when the two cross.
fn clamp_axis(value: i32, lower: Option<f64>, upper: Option<f64>) -> i32 {
    let mut v = value;
    if let Some(lower) = lower.filter(|b| b.is_finite()) {
        v = v.max(round_px(lower));
    }
    if let Some(upper) = upper.filter(|b| b.is_finite()) {
        v = v.min(round_px(upper));
    }
    v
}

/// Rounded font size, or `None` when the requested size is not positive.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked
fn font_size_px(size: f64) -> Option<u32> {
    let rounded = size.round();
    (rounded >= 1.0 && rounded <= f64::from(u32::MAX)).then_some(rounded as u32)
}
