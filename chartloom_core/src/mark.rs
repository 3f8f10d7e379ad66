// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark payloads and the mark builder.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, PathEl, Point, Rect, Shape};
use peniko::{Brush, Color};

use crate::ids::MarkId;

/// Horizontal text alignment relative to the text position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

/// Vertical text alignment relative to the text position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The position is the vertical middle of the text.
    #[default]
    Middle,
    /// The position is the alphabetic baseline.
    Alphabetic,
    /// The position is the hanging (top) baseline.
    Hanging,
    /// The position is the ideographic (bottom) baseline.
    Ideographic,
}

/// The primitive kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// An axis-aligned rectangle.
    Rect,
    /// A single line of unshaped text.
    Text,
    /// An arbitrary Bézier path.
    Path,
}

/// A filled and optionally stroked rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectPayload {
    /// Geometry in surface coordinates.
    pub rect: Rect,
    /// Corner radius.
    pub corner_radius: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the stroke.
    pub stroke_width: f64,
    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for RectPayload {
    fn default() -> Self {
        Self {
            rect: Rect::ZERO,
            corner_radius: 0.0,
            fill: Brush::default(),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

/// A single line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    /// Anchor position.
    pub pos: Point,
    /// Unshaped text content.
    pub text: String,
    /// Font size in surface coordinates.
    pub font_size: f64,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for TextPayload {
    fn default() -> Self {
        Self {
            pos: Point::ZERO,
            text: String::new(),
            font_size: 12.0,
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Middle,
            fill: Brush::default(),
            opacity: 1.0,
        }
    }
}

/// A filled and/or stroked path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPayload {
    /// Path geometry.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the stroke.
    pub stroke_width: f64,
    /// Dash pattern (on, off); `None` for solid strokes.
    pub dash: Option<(f64, f64)>,
    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for PathPayload {
    fn default() -> Self {
        Self {
            path: BezPath::new(),
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: Brush::default(),
            stroke_width: 0.0,
            dash: None,
            opacity: 1.0,
        }
    }
}

/// Geometry and paint of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rectangle payload.
    Rect(RectPayload),
    /// Text payload.
    Text(TextPayload),
    /// Path payload.
    Path(PathPayload),
}

impl MarkPayload {
    /// Returns the primitive kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
            Self::Path(_) => MarkKind::Path,
        }
    }

    /// Returns geometric bounds where they are known without text measurement.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect),
            Self::Text(_) => None,
            Self::Path(p) => {
                if p.path.elements().is_empty() {
                    None
                } else {
                    Some(p.path.bounding_box())
                }
            }
        }
    }

    /// Returns the overall opacity.
    pub fn opacity(&self) -> f64 {
        match self {
            Self::Rect(r) => r.opacity,
            Self::Text(t) => t.opacity,
            Self::Path(p) => p.opacity,
        }
    }

    /// Returns a copy with the given overall opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        match &mut self {
            Self::Rect(r) => r.opacity = opacity,
            Self::Text(t) => t.opacity = opacity,
            Self::Path(p) => p.opacity = opacity,
        }
        self
    }

    /// Interpolates from `self` towards `to` at parameter `t` in `[0, 1]`.
    ///
    /// Geometry, paint and opacity interpolate when both payloads have the same kind. Paths
    /// interpolate point-wise only when they have the same element structure; otherwise the
    /// target geometry is used while opacity still interpolates. Mismatched kinds snap to `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        match (self, to) {
            (Self::Rect(a), Self::Rect(b)) => Self::Rect(RectPayload {
                rect: lerp_rect(a.rect, b.rect, t),
                corner_radius: lerp(a.corner_radius, b.corner_radius, t),
                fill: lerp_brush(&a.fill, &b.fill, t),
                stroke: lerp_brush(&a.stroke, &b.stroke, t),
                stroke_width: lerp(a.stroke_width, b.stroke_width, t),
                opacity: lerp(a.opacity, b.opacity, t),
            }),
            (Self::Text(a), Self::Text(b)) => Self::Text(TextPayload {
                pos: a.pos.lerp(b.pos, t),
                text: b.text.clone(),
                font_size: lerp(a.font_size, b.font_size, t),
                angle: lerp(a.angle, b.angle, t),
                anchor: b.anchor,
                baseline: b.baseline,
                fill: lerp_brush(&a.fill, &b.fill, t),
                opacity: lerp(a.opacity, b.opacity, t),
            }),
            (Self::Path(a), Self::Path(b)) => Self::Path(PathPayload {
                path: lerp_path(&a.path, &b.path, t),
                fill: lerp_brush(&a.fill, &b.fill, t),
                stroke: lerp_brush(&a.stroke, &b.stroke, t),
                stroke_width: lerp(a.stroke_width, b.stroke_width, t),
                dash: b.dash,
                opacity: lerp(a.opacity, b.opacity, t),
            }),
            _ => to.clone(),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

fn lerp_brush(a: &Brush, b: &Brush, t: f64) -> Brush {
    match (a, b) {
        (Brush::Solid(ca), Brush::Solid(cb)) => {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "color channels are f32; t is in [0, 1]"
            )]
            let t = t as f32;
            let mut out = [0.0_f32; 4];
            for (i, c) in out.iter_mut().enumerate() {
                *c = ca.components[i] + (cb.components[i] - ca.components[i]) * t;
            }
            Brush::Solid(Color::new(out))
        }
        _ => b.clone(),
    }
}

fn lerp_path(a: &BezPath, b: &BezPath, t: f64) -> BezPath {
    let ea = a.elements();
    let eb = b.elements();
    if ea.len() != eb.len() {
        return b.clone();
    }
    let mut out = Vec::with_capacity(eb.len());
    for (x, y) in ea.iter().zip(eb) {
        let el = match (x, y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(*q, t)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(*q, t)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(p1.lerp(*q1, t), p2.lerp(*q2, t))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                PathEl::CurveTo(p1.lerp(*q1, t), p2.lerp(*q2, t), p3.lerp(*q3, t))
            }
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            _ => return b.clone(),
        };
        out.push(el);
    }
    BezPath::from_vec(out)
}

/// A stable-identity drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Paint order; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Role tag (for example `"line"` or `"legend-item"`), surfaced as the SVG class.
    pub class: &'static str,
    /// Name of the transition that animates changes to this mark.
    pub transition: Option<&'static str>,
    /// Geometry and paint.
    pub payload: MarkPayload,
    /// Drawing is cut to this rectangle, when set.
    pub clip: Option<Rect>,
}

impl Mark {
    /// Starts building a mark with the given id. The payload defaults to an empty rectangle.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder {
            mark: Self {
                id,
                z_index: 0,
                class: "",
                transition: None,
                payload: MarkPayload::Rect(RectPayload::default()),
                clip: None,
            },
        }
    }

    /// Returns the primitive kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }

    /// The part of the payload bounds left visible by the clip.
    ///
    /// Returns `None` for text, empty paths, and marks clipped away entirely.
    pub fn visible_bounds(&self) -> Option<Rect> {
        let bounds = self.payload.bounds()?;
        let Some(clip) = self.clip else {
            return Some(bounds);
        };
        if bounds.x1 < clip.x0 || bounds.x0 > clip.x1 || bounds.y1 < clip.y0 || bounds.y0 > clip.y1
        {
            return None;
        }
        Some(bounds.intersect(clip))
    }
}

/// Builder for [`Mark`].
///
/// Setters that do not apply to the current payload kind are ignored.
#[derive(Clone, Debug)]
pub struct MarkBuilder {
    mark: Mark,
}

impl MarkBuilder {
    /// Makes this a rectangle mark.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.mark.payload = MarkPayload::Rect(RectPayload {
            rect,
            ..RectPayload::default()
        });
        self
    }

    /// Makes this a text mark.
    pub fn text(mut self, pos: Point, text: impl Into<String>) -> Self {
        self.mark.payload = MarkPayload::Text(TextPayload {
            pos,
            text: text.into(),
            ..TextPayload::default()
        });
        self
    }

    /// Makes this a path mark.
    pub fn path(mut self, path: BezPath) -> Self {
        self.mark.payload = MarkPayload::Path(PathPayload {
            path,
            ..PathPayload::default()
        });
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        let fill = fill.into();
        match &mut self.mark.payload {
            MarkPayload::Rect(r) => r.fill = fill,
            MarkPayload::Text(t) => t.fill = fill,
            MarkPayload::Path(p) => p.fill = fill,
        }
        self
    }

    /// Sets the stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, width: f64) -> Self {
        let stroke = stroke.into();
        match &mut self.mark.payload {
            MarkPayload::Rect(r) => {
                r.stroke = stroke;
                r.stroke_width = width;
            }
            MarkPayload::Path(p) => {
                p.stroke = stroke;
                p.stroke_width = width;
            }
            MarkPayload::Text(_) => {}
        }
        self
    }

    /// Sets a dash pattern on path strokes.
    pub fn dash(mut self, on: f64, off: f64) -> Self {
        if let MarkPayload::Path(p) = &mut self.mark.payload {
            p.dash = Some((on, off));
        }
        self
    }

    /// Sets the overall opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.mark.payload = self.mark.payload.with_opacity(opacity);
        self
    }

    /// Sets the rectangle corner radius.
    pub fn corner_radius(mut self, radius: f64) -> Self {
        if let MarkPayload::Rect(r) = &mut self.mark.payload {
            r.corner_radius = radius;
        }
        self
    }

    /// Sets the text font size.
    pub fn font_size(mut self, size: f64) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.font_size = size;
        }
        self
    }

    /// Sets the text anchor.
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.anchor = anchor;
        }
        self
    }

    /// Sets the text baseline.
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.baseline = baseline;
        }
        self
    }

    /// Sets the text rotation in degrees.
    pub fn angle(mut self, degrees: f64) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.angle = degrees;
        }
        self
    }

    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.mark.z_index = z_index;
        self
    }

    /// Sets the role tag.
    pub fn class(mut self, class: &'static str) -> Self {
        self.mark.class = class;
        self
    }

    /// Sets the transition name used to animate this mark.
    pub fn transition(mut self, name: &'static str) -> Self {
        self.mark.transition = Some(name);
        self
    }

    /// Cuts drawing to `rect`.
    pub fn clip(mut self, rect: Rect) -> Self {
        self.mark.clip = Some(rect);
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        self.mark
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn rect_lerp_halfway() {
        let a = MarkPayload::Rect(RectPayload {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            opacity: 0.0,
            ..RectPayload::default()
        });
        let b = MarkPayload::Rect(RectPayload {
            rect: Rect::new(10.0, 0.0, 30.0, 20.0),
            opacity: 1.0,
            ..RectPayload::default()
        });
        let MarkPayload::Rect(mid) = a.lerp(&b, 0.5) else {
            panic!("kind is preserved");
        };
        assert_eq!(mid.rect, Rect::new(5.0, 0.0, 20.0, 15.0), "geometry halfway");
        assert!((mid.opacity - 0.5).abs() < 1e-9, "opacity halfway");
    }

    #[test]
    fn incompatible_paths_snap_to_target() {
        let mut a = BezPath::new();
        a.move_to((0.0, 0.0));
        a.line_to((1.0, 1.0));
        let mut b = BezPath::new();
        b.move_to((0.0, 0.0));
        b.line_to((2.0, 2.0));
        b.line_to((3.0, 0.0));
        let pa = MarkPayload::Path(PathPayload {
            path: a,
            ..PathPayload::default()
        });
        let pb = MarkPayload::Path(PathPayload {
            path: b.clone(),
            ..PathPayload::default()
        });
        let MarkPayload::Path(out) = pa.lerp(&pb, 0.25) else {
            panic!("kind is preserved");
        };
        assert_eq!(out.path, b, "structure mismatch uses the target path");
    }

    #[test]
    fn builder_ignores_setters_for_other_kinds() {
        let m = Mark::builder(MarkId(1))
            .text(Point::new(1.0, 2.0), "hi")
            .corner_radius(4.0)
            .anchor(TextAnchor::End)
            .class("label")
            .build();
        let MarkPayload::Text(t) = &m.payload else {
            panic!("text payload");
        };
        assert_eq!(t.anchor, TextAnchor::End, "anchor applied");
        assert_eq!(m.class, "label", "class applied");
        assert_eq!(m.kind(), MarkKind::Text, "kind reported");
    }

    #[test]
    fn clip_limits_visible_bounds() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let straddling = Mark::builder(MarkId(1))
            .rect(Rect::new(-20.0, 10.0, 20.0, 30.0))
            .clip(clip)
            .build();
        assert_eq!(
            straddling.visible_bounds(),
            Some(Rect::new(0.0, 10.0, 20.0, 30.0)),
            "cut at the clip edge"
        );
        let outside = Mark::builder(MarkId(2))
            .rect(Rect::new(-60.0, 10.0, -40.0, 30.0))
            .clip(clip)
            .build();
        assert_eq!(outside.visible_bounds(), None, "clipped away");
        let free = Mark::builder(MarkId(3))
            .rect(Rect::new(-60.0, 10.0, -40.0, 30.0))
            .build();
        assert_eq!(
            free.visible_bounds(),
            Some(Rect::new(-60.0, 10.0, -40.0, 30.0)),
            "unclipped marks keep their bounds"
        );
    }
}
