// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A retained SVG document surface.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use hashbrown::HashMap;
use kurbo::{BezPath, PathEl, Rect};
use peniko::Brush;

use crate::ids::MarkId;
use crate::mark::{Mark, MarkPayload, TextAnchor, TextBaseline};
use crate::surface::Surface;

/// A [`Surface`] that keeps the current marks and serializes them as SVG.
#[derive(Debug, Default)]
pub struct SvgSurface {
    marks: HashMap<MarkId, Mark>,
    size: Option<(f64, f64)>,
}

impl Surface for SvgSurface {
    fn upsert(&mut self, mark: &Mark) {
        self.marks.insert(mark.id, mark.clone());
    }

    fn remove(&mut self, id: MarkId) {
        self.marks.remove(&id);
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.size = Some((width, height));
    }
}

impl SvgSurface {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mark currently shown for `id`.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Number of marks in the document.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if the document has no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns the marks in paint order.
    pub fn marks(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Returns the marks tagged with `class`, in paint order.
    pub fn marks_with_class(&self, class: &str) -> Vec<&Mark> {
        self.marks()
            .into_iter()
            .filter(|m| m.class == class)
            .collect()
    }

    /// Serializes the document.
    pub fn to_svg_string(&self) -> String {
        let view_box = match self.size {
            Some((w, h)) => Rect::new(0.0, 0.0, w, h),
            None => self
                .content_bounds()
                .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0)),
        };
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            Num(view_box.x0),
            Num(view_box.y0),
            Num(view_box.width()),
            Num(view_box.height()),
            Num(view_box.width()),
            Num(view_box.height())
        ));
        out.push('\n');

        let marks = self.marks();
        let mut clips: Vec<Rect> = Vec::new();
        for mark in &marks {
            if let Some(clip) = mark.clip
                && !clips.contains(&clip)
            {
                clips.push(clip);
            }
        }
        if !clips.is_empty() {
            out.push_str("<defs>\n");
            for (i, clip) in clips.iter().enumerate() {
                out.push_str(&format!(
                    r#"<clipPath id="clip-{i}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    Num(clip.x0),
                    Num(clip.y0),
                    Num(clip.width()),
                    Num(clip.height()),
                ));
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }
        for mark in marks {
            let clip = mark.clip.and_then(|c| clips.iter().position(|r| *r == c));
            write_mark(&mut out, mark, clip);
        }

        out.push_str("</svg>\n");
        out
    }

    fn content_bounds(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        for mark in self.marks.values() {
            let b = match &mark.payload {
                MarkPayload::Text(t) => {
                    let width = 0.6 * t.font_size * t.text.chars().count() as f64;
                    let (x0, x1) = match t.anchor {
                        TextAnchor::Start => (t.pos.x, t.pos.x + width),
                        TextAnchor::Middle => (t.pos.x - width / 2.0, t.pos.x + width / 2.0),
                        TextAnchor::End => (t.pos.x - width, t.pos.x),
                    };
                    Some(Rect::new(
                        x0,
                        t.pos.y - t.font_size,
                        x1,
                        t.pos.y + t.font_size,
                    ))
                }
                _ => mark.visible_bounds(),
            };
            let Some(b) = b else {
                continue;
            };
            rect = Some(match rect {
                None => b,
                Some(r) => r.union(b),
            });
        }
        rect
    }
}

fn write_mark(out: &mut String, mark: &Mark, clip: Option<usize>) {
    match &mark.payload {
        MarkPayload::Rect(r) => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                Num(r.rect.x0),
                Num(r.rect.y0),
                Num(r.rect.width()),
                Num(r.rect.height()),
            ));
            if r.corner_radius > 0.0 {
                out.push_str(&format!(r#" rx="{}""#, Num(r.corner_radius)));
            }
            write_paint_attr(out, "fill", &r.fill);
            if r.stroke_width > 0.0 {
                write_paint_attr(out, "stroke", &r.stroke);
                out.push_str(&format!(r#" stroke-width="{}""#, Num(r.stroke_width)));
            }
            write_common(out, mark.class, r.opacity, clip);
            out.push_str("/>\n");
        }
        MarkPayload::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
                TextBaseline::Ideographic => "ideographic",
            };
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                Num(t.pos.x),
                Num(t.pos.y),
                Num(t.font_size),
                baseline
            ));
            if t.angle != 0.0 {
                out.push_str(&format!(
                    r#" transform="rotate({} {} {})""#,
                    Num(t.angle),
                    Num(t.pos.x),
                    Num(t.pos.y)
                ));
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            write_paint_attr(out, "fill", &t.fill);
            write_common(out, mark.class, t.opacity, clip);
            out.push('>');
            out.push_str(&escape_xml(&t.text));
            out.push_str("</text>\n");
        }
        MarkPayload::Path(p) => {
            out.push_str(&format!(r#"<path d="{}""#, path_data(&p.path)));
            write_paint_attr(out, "fill", &p.fill);
            if p.stroke_width > 0.0 {
                write_paint_attr(out, "stroke", &p.stroke);
                out.push_str(&format!(r#" stroke-width="{}""#, Num(p.stroke_width)));
                if let Some((on, off)) = p.dash {
                    out.push_str(&format!(r#" stroke-dasharray="{} {}""#, Num(on), Num(off)));
                }
            }
            write_common(out, mark.class, p.opacity, clip);
            out.push_str("/>\n");
        }
    }
}

fn write_common(out: &mut String, class: &str, opacity: f64, clip: Option<usize>) {
    if !class.is_empty() {
        out.push_str(&format!(r#" class="{}""#, escape_xml(class)));
    }
    if let Some(clip) = clip {
        out.push_str(&format!(r##" clip-path="url(#clip-{clip})""##));
    }
    if opacity < 1.0 {
        out.push_str(&format!(r#" opacity="{}""#, Num(opacity)));
    }
}

/// Serializes path geometry as SVG path data.
fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        if !d.is_empty() {
            d.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = match el {
            PathEl::MoveTo(p) => write!(d, "M{},{}", Num(p.x), Num(p.y)),
            PathEl::LineTo(p) => write!(d, "L{},{}", Num(p.x), Num(p.y)),
            PathEl::QuadTo(a, b) => {
                write!(d, "Q{},{} {},{}", Num(a.x), Num(a.y), Num(b.x), Num(b.y))
            }
            PathEl::CurveTo(a, b, c) => write!(
                d,
                "C{},{} {},{} {},{}",
                Num(a.x),
                Num(a.y),
                Num(b.x),
                Num(b.y),
                Num(c.x),
                Num(c.y)
            ),
            PathEl::ClosePath => write!(d, "Z"),
        };
    }
    d
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return (String::from("none"), None);
            }
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => (String::from("none"), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{}""#, Num(o)));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = if self.0 == 0.0 { 0.0 } else { self.0 };
        let s = format!("{v:.3}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        f.write_str(if s == "-0" { "0" } else { s })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scene::Scene;
    use alloc::vec;
    use kurbo::Point;
    use peniko::Color;

    #[test]
    fn writes_marks_in_paint_order() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![
            Mark::builder(MarkId(2))
                .text(Point::new(5.0, 5.0), "a<b")
                .z_index(10)
                .class("label")
                .build(),
            Mark::builder(MarkId(1))
                .rect(Rect::new(0.0, 0.0, 10.5, 20.0))
                .fill(Color::from_rgb8(255, 0, 0))
                .build(),
        ]);
        let mut svg = SvgSurface::new();
        svg.set_size(100.0, 50.0);
        svg.apply_diffs(&diffs);

        let out = svg.to_svg_string();
        let rect_at = out.find("<rect").expect("rect written");
        let text_at = out.find("<text").expect("text written");
        assert!(rect_at < text_at, "lower z-index first");
        assert!(out.contains(r#"width="10.5""#), "trimmed decimals");
        assert!(out.contains("a&lt;b"), "text escaped");
        assert!(out.contains(r#"class="label""#), "class written");
        assert!(out.contains(r##"fill="#ff0000""##), "solid fill written");
    }

    #[test]
    fn exit_removes_mark() {
        let mut scene = Scene::new();
        let mut svg = SvgSurface::new();
        svg.apply_diffs(&scene.tick(vec![Mark::builder(MarkId(1)).build()]));
        assert_eq!(svg.len(), 1, "entered");
        svg.apply_diffs(&scene.tick(vec![]));
        assert!(svg.is_empty(), "exited");
    }

    #[test]
    fn clipped_marks_share_clip_paths() {
        let clip = Rect::new(10.0, 10.0, 90.0, 40.0);
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![
            Mark::builder(MarkId(1))
                .rect(Rect::new(0.0, 0.0, 20.0, 20.0))
                .clip(clip)
                .build(),
            Mark::builder(MarkId(2))
                .rect(Rect::new(50.0, 0.0, 70.0, 20.0))
                .clip(clip)
                .build(),
            Mark::builder(MarkId(3))
                .rect(Rect::new(0.0, 0.0, 5.0, 5.0))
                .build(),
        ]);
        let mut svg = SvgSurface::new();
        svg.set_size(100.0, 50.0);
        svg.apply_diffs(&diffs);

        let out = svg.to_svg_string();
        assert_eq!(out.matches("<clipPath").count(), 1, "one clip per rectangle");
        assert!(
            out.contains(r#"<clipPath id="clip-0"><rect x="10" y="10" width="80" height="30"/>"#),
            "clip rectangle written: {out}"
        );
        assert_eq!(
            out.matches(r##"clip-path="url(#clip-0)""##).count(),
            2,
            "both clipped marks reference it"
        );
    }
}
