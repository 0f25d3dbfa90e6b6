//! Template layout suggestions.

use async_trait::async_trait;
use composer_core::{
    Bounds, CollaboratorResult, Color, Element, FontWeight, FormatTable, LayoutCriteria,
    LayoutSuggester, Scene, TextContent,
};

/// Most packshots a template places.
pub const MAX_TEMPLATE_PACKSHOTS: usize = 3;

const LOGO_SIZE: (u32, u32) = (200, 120);
const VALUE_TILE_SIZE: (u32, u32) = (320, 120);
const PACKSHOT_SIZE: (u32, u32) = (220, 240);
const PACKSHOT_GAP: u32 = 20;

/// Places the supplied assets on a fixed template for the requested format.
#[derive(Debug, Clone, Default)]
pub struct TemplateSuggester {
    formats: FormatTable,
}

impl TemplateSuggester {
    /// Suggester over the given format table.
    #[must_use]
    pub fn new(formats: FormatTable) -> Self {
        Self { formats }
    }

    /// The single template candidate, or `None` for an unknown format.
    #[must_use]
    pub fn template(&self, criteria: &LayoutCriteria) -> Option<Scene> {
        let spec = self.formats.get(criteria.format.as_str())?;
        let (w, h) = (spec.width, spec.height);
        let inset = spec.safe_zone;
        let left = px(i64::from(inset.left));
        let top = px(i64::from(inset.top));

        let mut elements = Vec::new();

        if let Some(logo) = non_empty(criteria.logo.as_deref()) {
            elements.push(Element::logo(
                "logo",
                logo,
                Bounds::new(left, top, LOGO_SIZE.0, LOGO_SIZE.1),
            ));
        }

        if let Some(headline) = non_empty(criteria.headline.as_deref()) {
            elements.push(Element::text(
                "headline",
                TextContent::new(headline, 64).with_weight(FontWeight::Bold),
                Bounds::new(
                    px(fraction(w, 0.1).into()),
                    px(fraction(h, 0.2).into()),
                    fraction(w, 0.8),
                    150,
                ),
            ));
        }

        if let Some(subhead) = non_empty(criteria.subhead.as_deref()) {
            elements.push(Element::text(
                "subhead",
                TextContent::new(subhead, 32),
                Bounds::new(
                    px(fraction(w, 0.15).into()),
                    px(fraction(h, 0.32).into()),
                    fraction(w, 0.7),
                    120,
                ),
            ));
        }

        if let Some(value) = non_empty(criteria.value_text.as_deref()) {
            let y = i64::from(h) - i64::from(inset.bottom) - 140;
            elements.push(Element::value_tile(
                "value",
                TextContent::new(value, 48)
                    .with_weight(FontWeight::Bold)
                    .with_color(Color::WHITE)
                    .with_background(Color::BLACK),
                Bounds::new(left, px(y), VALUE_TILE_SIZE.0, VALUE_TILE_SIZE.1),
            ));
        }

        let packshots = &criteria.packshots[..criteria.packshots.len().min(MAX_TEMPLATE_PACKSHOTS)];
        if !packshots.is_empty() {
            let count = i64::try_from(packshots.len()).unwrap_or(0);
            let step = i64::from(PACKSHOT_SIZE.0 + PACKSHOT_GAP);
            let total = count * step - i64::from(PACKSHOT_GAP);
            let start_x = i64::from(w) - i64::from(inset.right) - total;
            let y = px(i64::from(h) - i64::from(inset.bottom) - 260);

            for (i, src) in (0i64..).zip(packshots) {
                elements.push(Element::packshot(
                    format!("packshot_{i}"),
                    src.clone(),
                    Bounds::new(px(start_x + i * step), y, PACKSHOT_SIZE.0, PACKSHOT_SIZE.1),
                ));
            }
        }

        let scene = (1..)
            .zip(elements)
            .fold(Scene::new(criteria.format.clone(), w, h), |scene, (z, element)| {
                scene.with_element(element.with_z(z))
            });
        Some(scene)
    }
}

#[async_trait]
impl LayoutSuggester for TemplateSuggester {
    async fn suggest_layouts(&self, criteria: &LayoutCriteria) -> CollaboratorResult<Vec<Scene>> {
        let candidates: Vec<Scene> = self.template(criteria).into_iter().collect();
        if candidates.is_empty() {
            tracing::debug!("No template for format {}", criteria.format);
        }
        Ok(candidates)
    }
}

/// Copy or asset source, skipping blanks.
fn non_empty(input: Option<&str>) -> Option<&str> {
    input.filter(|s| !s.is_empty())
}

/// `floor(value * ratio)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // ratio is in [0, 1]
fn fraction(value: u32, ratio: f64) -> u32 {
    (f64::from(value) * ratio).floor() as u32
}

fn px(value: i64) -> i32 {
    i32::try_from(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX))).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::{ElementType, Format};

    fn criteria(format: &str) -> LayoutCriteria {
        LayoutCriteria {
            headline: Some("Fresh for summer".to_string()),
            subhead: Some("New range in store".to_string()),
            value_text: Some("Clubcard Price".to_string()),
            logo: Some("logo.png".to_string()),
            packshots: vec!["a.png".into(), "b.png".into(), "c.png".into(), "d.png".into()],
            ..LayoutCriteria::new(format)
        }
    }

    fn bounds(scene: &Scene, id: &str) -> Bounds {
        scene.element(&id.into()).expect("element").bounds
    }

    #[test]
    fn test_story_template_positions() {
        let scene = TemplateSuggester::default()
            .template(&criteria(Format::FB_STORY))
            .expect("known format");

        assert_eq!((scene.width, scene.height), (1080, 1920));
        assert_eq!(bounds(&scene, "logo"), Bounds::new(50, 250, 200, 120));
        assert_eq!(bounds(&scene, "headline"), Bounds::new(108, 384, 864, 150));
        assert_eq!(bounds(&scene, "subhead"), Bounds::new(162, 614, 756, 120));
        assert_eq!(bounds(&scene, "value"), Bounds::new(50, 1530, 320, 120));
        assert_eq!(bounds(&scene, "packshot_0"), Bounds::new(330, 1410, 220, 240));
        assert_eq!(bounds(&scene, "packshot_2"), Bounds::new(810, 1410, 220, 240));
        assert!(scene.element(&"packshot_3".into()).is_none());
    }

    #[test]
    fn test_z_ascends_in_placement_order() {
        let scene = TemplateSuggester::default()
            .template(&criteria(Format::SQUARE))
            .expect("known format");
        let z: Vec<_> = scene.elements().iter().filter_map(|e| e.z).collect();
        assert_eq!(z, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(scene.elements()[3].element_type(), ElementType::ValueTile);
    }

    #[test]
    fn test_omitted_assets_are_skipped() {
        let mut only_packshot = LayoutCriteria::new(Format::LANDSCAPE);
        only_packshot.packshots = vec!["a.png".into()];
        let scene = TemplateSuggester::default()
            .template(&only_packshot)
            .expect("known format");

        assert_eq!(scene.element_count(), 1);
        // 1200 - 200 - 220, 628 - 200 - 260
        assert_eq!(bounds(&scene, "packshot_0"), Bounds::new(780, 168, 220, 240));
        assert_eq!(scene.elements()[0].z, Some(1));
    }

    #[test]
    fn test_empty_inputs_are_skipped() {
        let criteria = LayoutCriteria {
            headline: Some(String::new()),
            subhead: Some("New range in store".to_string()),
            value_text: Some(String::new()),
            logo: Some(String::new()),
            ..LayoutCriteria::new(Format::SQUARE)
        };
        let scene = TemplateSuggester::default()
            .template(&criteria)
            .expect("known format");

        let ids: Vec<_> = scene.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["subhead"]);
        assert_eq!(scene.elements()[0].z, Some(1));
    }

    #[tokio::test]
    async fn test_unknown_format_has_no_candidates() {
        let suggester = TemplateSuggester::new(FormatTable::builtin());
        let candidates = suggester
            .suggest_layouts(&LayoutCriteria::new("BILLBOARD"))
            .await
            .expect("suggest");
        assert!(candidates.is_empty());
    }
}
