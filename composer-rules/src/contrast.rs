//! WCAG 2 contrast math.

use composer_core::Color;

/// Minimum ratio for normal text at level AA.
pub const AA_NORMAL: f64 = 4.5;
/// Minimum ratio for large text at level AA.
pub const AA_LARGE: f64 = 3.0;

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color's RGB channels; alpha is ignored.
#[must_use]
pub fn relative_luminance(color: Color) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// Contrast ratio between two colors, from 1.0 to 21.0.
#[must_use]
pub fn contrast_ratio(fg: Color, bg: Color) -> f64 {
    let a = relative_luminance(fg);
    let b = relative_luminance(bg);
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Whether `fg` on `bg` meets WCAG AA.
#[must_use]
pub fn passes_wcag_aa(fg: Color, bg: Color, large_text: bool) -> bool {
    let threshold = if large_text { AA_LARGE } else { AA_NORMAL };
    contrast_ratio(fg, bg) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_on_white_is_maximal() {
        let ratio = contrast_ratio(Color::BLACK, Color::WHITE);
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(Color::WHITE, Color::BLACK) - ratio).abs() < 1e-12);
    }

    #[test]
    fn test_same_color_is_minimal() {
        let grey = Color::rgb(128, 128, 128);
        assert!((contrast_ratio(grey, grey) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_thresholds() {
        // #777777 on white is ~4.48: fails normal, passes large.
        let grey = Color::rgb(119, 119, 119);
        assert!(!passes_wcag_aa(grey, Color::WHITE, false));
        assert!(passes_wcag_aa(grey, Color::WHITE, true));
        // Pure red on white is ~4.0.
        assert!(!passes_wcag_aa(Color::rgb(255, 0, 0), Color::WHITE, false));
        assert!(passes_wcag_aa(Color::rgb(255, 0, 0), Color::WHITE, true));
    }
}
