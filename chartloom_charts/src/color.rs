// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group colors.

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;
use peniko::Color;

/// The default categorical palette.
pub const DEFAULT_PALETTE: [Color; 14] = [
    Color::from_rgb8(0x69, 0x29, 0xc4),
    Color::from_rgb8(0x11, 0x92, 0xe8),
    Color::from_rgb8(0x00, 0x5d, 0x5d),
    Color::from_rgb8(0x9f, 0x18, 0x53),
    Color::from_rgb8(0xfa, 0x4d, 0x56),
    Color::from_rgb8(0x57, 0x04, 0x08),
    Color::from_rgb8(0x19, 0x80, 0x38),
    Color::from_rgb8(0x00, 0x2d, 0x9c),
    Color::from_rgb8(0xee, 0x53, 0x8b),
    Color::from_rgb8(0xb2, 0x86, 0x00),
    Color::from_rgb8(0x00, 0x9d, 0x9a),
    Color::from_rgb8(0x01, 0x27, 0x49),
    Color::from_rgb8(0x8a, 0x38, 0x00),
    Color::from_rgb8(0xa5, 0x6e, 0xff),
];

/// Neutral colors used by chrome (axes, grid, skeletons, legend text).
pub mod neutral {
    use peniko::Color;

    /// Primary text.
    pub const TEXT: Color = Color::from_rgb8(0x16, 0x16, 0x16);
    /// Secondary text and axis ticks.
    pub const TEXT_SECONDARY: Color = Color::from_rgb8(0x52, 0x52, 0x52);
    /// Axis domain lines.
    pub const AXIS: Color = Color::from_rgb8(0x8d, 0x8d, 0x8d);
    /// Grid lines.
    pub const GRID: Color = Color::from_rgb8(0xe0, 0xe0, 0xe0);
    /// Skeleton shapes.
    pub const SKELETON: Color = Color::from_rgb8(0xe5, 0xe5, 0xe5);
    /// Shimmer highlight on skeletons.
    pub const SHIMMER: Color = Color::from_rgb8(0xf4, 0xf4, 0xf4);
    /// Disabled legend checkboxes and meter tracks.
    pub const DISABLED: Color = Color::from_rgb8(0xc6, 0xc6, 0xc6);
    /// Default threshold lines.
    pub const THRESHOLD: Color = Color::from_rgb8(0xfa, 0x4d, 0x56);
    /// Backgrounds.
    pub const BACKGROUND: Color = Color::WHITE;
}

/// `color` with its alpha multiplied by `opacity`.
pub fn faded(color: Color, opacity: f64) -> Color {
    #[allow(clippy::cast_possible_truncation, reason = "opacity is clamped to [0, 1]")]
    let opacity = opacity.clamp(0.0, 1.0) as f32;
    color.multiply_alpha(opacity)
}

/// Assigns palette slots to group names in first-seen order.
///
/// A name keeps its slot for the lifetime of the scale, whether or not the group is active or
/// still present in the data.
#[derive(Clone, Debug, Default)]
pub struct ColorScale {
    slots: HashMap<String, usize>,
}

impl ColorScale {
    /// Creates an empty scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `name` a slot if it does not have one yet.
    pub fn assign(&mut self, name: &str) {
        if !self.slots.contains_key(name) {
            let next = self.slots.len();
            self.slots.insert(String::from(name), next);
        }
    }

    /// Slot of `name`.
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    /// Palette color of `name`; unknown names use the first color.
    pub fn color(&self, name: &str, palette: &[Color]) -> Color {
        let palette = if palette.is_empty() {
            &DEFAULT_PALETTE[..]
        } else {
            palette
        };
        let slot = self.slot(name).unwrap_or(0);
        palette[slot % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn first_seen_order_is_permanent() {
        let mut scale = ColorScale::new();
        scale.assign("A");
        scale.assign("B");
        scale.assign("A");
        assert_eq!(scale.slot("A"), Some(0), "first");
        assert_eq!(scale.slot("B"), Some(1), "second");
        assert_eq!(scale.color("B", &[]), DEFAULT_PALETTE[1], "palette lookup");
    }

    #[test]
    fn palette_wraps() {
        let mut scale = ColorScale::new();
        for i in 0..=DEFAULT_PALETTE.len() {
            scale.assign(&alloc::format!("g{i}"));
        }
        let last = alloc::format!("g{}", DEFAULT_PALETTE.len());
        assert_eq!(scale.color(&last, &[]), DEFAULT_PALETTE[0], "wraps around");
    }
}
