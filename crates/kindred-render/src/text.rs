use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

pub const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 13.0,
            font_weight: None,
        }
    }
}

impl TextStyle {
    pub fn with_size(font_size: f64) -> Self {
        Self {
            font_size,
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = Some("bold".to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Width estimate from terminal column widths: wide (CJK) characters count double.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };
        let bold = if style.font_weight.as_deref() == Some("bold") {
            1.1
        } else {
            1.0
        };

        let font_size = style.font_size.max(1.0);
        let columns = text.width();
        TextMetrics {
            width: columns as f64 * font_size * char_width_factor * bold,
            height: font_size * line_height_factor,
        }
    }
}

/// Shortens `text` so it fits `max_width`, ending with an ellipsis when anything was cut.
pub fn truncate_to_width(
    measurer: &dyn TextMeasurer,
    text: &str,
    style: &TextStyle,
    max_width: f64,
) -> String {
    let text = text.trim();
    if measurer.measure(text, style).width <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.truncate(candidate.trim_end().len());
        candidate.push(ELLIPSIS);
        if measurer.measure(&candidate, style).width <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_characters_measure_double() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::with_size(10.0);
        assert_eq!(m.measure("ab", &style).width, 12.0);
        assert_eq!(m.measure("漢字", &style).width, 24.0);
    }

    #[test]
    fn truncation_appends_ellipsis() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::with_size(10.0);
        assert_eq!(truncate_to_width(&m, "Short", &style, 100.0), "Short");
        let cut = truncate_to_width(&m, "Maximilian Alexander", &style, 60.0);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(m.measure(&cut, &style).width <= 60.0);
        assert_eq!(truncate_to_width(&m, "Anna", &style, 1.0), "…");
    }
}
