// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for layout.
//!
//! Layout needs the natural size of titles, legend items and tick labels before anything is
//! drawn. Shaping stays downstream, so chart code depends on this small trait; a shaping engine
//! or a browser canvas can implement it, and [`HeuristicTextMeasurer`] is the built-in fallback.

extern crate alloc;

use alloc::string::String;

/// Measures single lines of text.
pub trait TextMeasurer {
    /// Measures `text` as a single line.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in chart coordinates.
    pub font_size: f64,
    /// Whether the text is set in a bold weight.
    pub bold: bool,
}

impl TextStyle {
    /// Regular text at `font_size`.
    pub const fn new(font_size: f64) -> Self {
        Self {
            font_size,
            bold: false,
        }
    }

    /// Bold text at `font_size`.
    pub const fn bold(font_size: f64) -> Self {
        Self {
            font_size,
            bold: true,
        }
    }
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent`.
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Assumes ~0.6em per glyph (0.65em when bold), a 0.8em ascent and a 0.2em descent.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let em = if style.bold { 0.65 } else { 0.6 };
        TextMetrics {
            width: em * style.font_size * text.chars().count() as f64,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
        }
    }
}

/// Where to elide characters from a long label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TruncationKind {
    /// Keep the beginning: `"Lorem ips..."`.
    #[default]
    End,
    /// Keep both ends: `"Lor...sum"`.
    Mid,
    /// Keep the end: `"...m ipsum"`.
    Front,
    /// Never truncate.
    None,
}

/// Shortens `label` to `num_chars` characters (plus an ellipsis) if it is longer than
/// `threshold` characters.
pub fn truncate_label(label: &str, kind: TruncationKind, threshold: usize, num_chars: usize) -> String {
    let count = label.chars().count();
    if kind == TruncationKind::None || count <= threshold || num_chars >= count {
        return String::from(label);
    }
    let mut out = String::new();
    match kind {
        TruncationKind::End => {
            out.extend(label.chars().take(num_chars));
            out.push_str("...");
        }
        TruncationKind::Front => {
            out.push_str("...");
            out.extend(label.chars().skip(count - num_chars));
        }
        TruncationKind::Mid => {
            let head = num_chars / 2;
            let tail = num_chars - head;
            out.extend(label.chars().take(head));
            out.push_str("...");
            out.extend(label.chars().skip(count - tail));
        }
        TruncationKind::None => out.push_str(label),
    }
    out
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
pub fn fit_to_width(
    measurer: &dyn TextMeasurer,
    text: &str,
    style: TextStyle,
    max_width: f64,
) -> String {
    if measurer.measure(text, style).width <= max_width {
        return String::from(text);
    }
    let chars: alloc::vec::Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push_str("...");
        if measurer.measure(&candidate, style).width <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn heuristic_width_scales_with_chars() {
        let m = HeuristicTextMeasurer;
        let metrics = m.measure("abcd", TextStyle::new(10.0));
        assert!((metrics.width - 24.0).abs() < 1e-9, "0.6em per glyph");
        assert!((metrics.line_height() - 10.0).abs() < 1e-9, "1em line height");
    }

    #[test]
    fn truncation_variants() {
        let label = "Lorem ipsum dolor sit amet";
        assert_eq!(
            truncate_label(label, TruncationKind::End, 16, 5),
            "Lorem...",
            "end keeps the head"
        );
        assert_eq!(
            truncate_label(label, TruncationKind::Front, 16, 4),
            "...amet",
            "front keeps the tail"
        );
        assert_eq!(
            truncate_label(label, TruncationKind::Mid, 16, 4),
            "Lo...et",
            "mid keeps both ends"
        );
        assert_eq!(
            truncate_label("short", TruncationKind::End, 16, 4),
            "short",
            "under the threshold"
        );
    }

    #[test]
    fn fit_to_width_elides() {
        let m = HeuristicTextMeasurer;
        let out = fit_to_width(&m, "abcdefghij", TextStyle::new(10.0), 40.0);
        assert_eq!(out, "abc...", "6 glyphs fit in 40px at 6px each");
    }
}
