// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named curve interpolations for lines and areas.
//!
//! The interpolations follow the usual `d3-shape` definitions, so a curve name from an existing
//! configuration draws the same shape here.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::error::ConfigError;

/// How consecutive points of a series are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Curve {
    /// Straight segments.
    #[default]
    Linear,
    /// Straight segments, closed back to the first point.
    LinearClosed,
    /// Steps changing half way between points.
    Step,
    /// Steps changing at the previous point.
    StepBefore,
    /// Steps changing at the next point.
    StepAfter,
    /// Monotone cubic in x.
    MonotoneX,
    /// Centripetal Catmull-Rom spline (alpha 0.5).
    CatmullRom,
    /// Cardinal spline with the given tension.
    Cardinal(f64),
    /// Uniform cubic B-spline; does not pass through interior points.
    Basis,
    /// Natural cubic spline.
    Natural,
}

impl Curve {
    /// Parses a curve name. Both `"monotone-x"` and `"curveMonotoneX"` spellings are accepted.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        let short = name.strip_prefix("curve").unwrap_or(name);
        let normalized: String = short
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Ok(match normalized.as_str() {
            "linear" => Self::Linear,
            "linearclosed" => Self::LinearClosed,
            "step" => Self::Step,
            "stepbefore" => Self::StepBefore,
            "stepafter" => Self::StepAfter,
            "monotonex" | "monotone" => Self::MonotoneX,
            "catmullrom" => Self::CatmullRom,
            "cardinal" => Self::Cardinal(0.0),
            "basis" => Self::Basis,
            "natural" => Self::Natural,
            _ => return Err(ConfigError::UnknownCurve(String::from(name))),
        })
    }

    /// Builds an open path through `points`.
    pub fn path(self, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        self.append(&mut path, points, true);
        path
    }

    /// Appends the curve through `points` to `path`.
    ///
    /// With `move_first` the curve starts a new subpath; otherwise the first point is joined to
    /// the current end of `path` with a straight segment (used to connect an area's top edge to
    /// its baseline).
    pub fn append(self, path: &mut BezPath, points: &[Point], move_first: bool) {
        let Some(&first) = points.first() else {
            return;
        };
        if move_first {
            path.move_to(first);
        } else {
            path.line_to(first);
        }
        if points.len() == 1 {
            return;
        }
        match self {
            Self::Linear => linear(path, points),
            Self::LinearClosed => {
                linear(path, points);
                path.close_path();
            }
            Self::Step => step(path, points, 0.5),
            Self::StepBefore => step(path, points, 0.0),
            Self::StepAfter => step(path, points, 1.0),
            Self::MonotoneX => monotone_x(path, points),
            Self::CatmullRom => catmull_rom(path, points, 0.5),
            Self::Cardinal(tension) => cardinal(path, points, tension),
            Self::Basis => basis(path, points),
            Self::Natural => natural(path, points),
        }
    }
}

fn linear(path: &mut BezPath, points: &[Point]) {
    for p in &points[1..] {
        path.line_to(*p);
    }
}

fn step(path: &mut BezPath, points: &[Point], t: f64) {
    for w in points.windows(2) {
        let (p0, p1) = (w[0], w[1]);
        if t <= 0.0 {
            path.line_to((p0.x, p1.y));
        } else if t >= 1.0 {
            path.line_to((p1.x, p0.y));
        } else {
            let x = p0.x * (1.0 - t) + p1.x * t;
            path.line_to((x, p0.y));
            path.line_to((x, p1.y));
        }
        path.line_to(p1);
    }
}

fn cardinal(path: &mut BezPath, points: &[Point], tension: f64) {
    let k = (1.0 - tension) / 6.0;
    let n = points.len();
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        let c1 = p1 + (p2 - p0) * k;
        let c2 = p2 - (p3 - p1) * k;
        path.curve_to(c1, c2, p2);
    }
}

fn catmull_rom(path: &mut BezPath, points: &[Point], alpha: f64) {
    let n = points.len();
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        let l01 = (p1 - p0).hypot();
        let l12 = (p2 - p1).hypot();
        let l23 = (p3 - p2).hypot();
        let l01_a = l01.powf(alpha);
        let l12_a = l12.powf(alpha);
        let l23_a = l23.powf(alpha);
        let l01_2a = l01_a * l01_a;
        let l12_2a = l12_a * l12_a;
        let l23_2a = l23_a * l23_a;

        let mut c1 = p1;
        if l01_a > 1e-12 {
            let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
            let m = 3.0 * l01_a * (l01_a + l12_a);
            c1 = Point::new(
                (p1.x * a - p0.x * l12_2a + p2.x * l01_2a) / m,
                (p1.y * a - p0.y * l12_2a + p2.y * l01_2a) / m,
            );
        }
        let mut c2 = p2;
        if l23_a > 1e-12 {
            let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
            let m = 3.0 * l23_a * (l23_a + l12_a);
            c2 = Point::new(
                (p2.x * b + p1.x * l23_2a - p3.x * l12_2a) / m,
                (p2.y * b + p1.y * l23_2a - p3.y * l12_2a) / m,
            );
        }
        path.curve_to(c1, c2, p2);
    }
}

fn basis(path: &mut BezPath, points: &[Point]) {
    let n = points.len();
    if n == 2 {
        path.line_to(points[1]);
        return;
    }
    let third = |a: Point, b: Point| Point::new((2.0 * a.x + b.x) / 3.0, (2.0 * a.y + b.y) / 3.0);
    let sixth =
        |a: Point, b: Point, c: Point| Point::new((a.x + 4.0 * b.x + c.x) / 6.0, (a.y + 4.0 * b.y + c.y) / 6.0);

    path.line_to(Point::new(
        (5.0 * points[0].x + points[1].x) / 6.0,
        (5.0 * points[0].y + points[1].y) / 6.0,
    ));
    let mut emit = |p0: Point, p1: Point, p: Point| {
        path.curve_to(third(p0, p1), third(p1, p0), sixth(p0, p1, p));
    };
    for i in 2..n {
        emit(points[i - 2], points[i - 1], points[i]);
    }
    let last = points[n - 1];
    emit(points[n - 2], last, last);
    path.line_to(last);
}

fn natural(path: &mut BezPath, points: &[Point]) {
    if points.len() == 2 {
        path.line_to(points[1]);
        return;
    }
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let (ax, bx) = natural_controls(&xs);
    let (ay, by) = natural_controls(&ys);
    for i in 0..points.len() - 1 {
        path.curve_to(
            Point::new(ax[i], ay[i]),
            Point::new(bx[i], by[i]),
            points[i + 1],
        );
    }
}

/// Control points of a natural cubic spline through `x` (one coordinate at a time).
fn natural_controls(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = alloc::vec![0.0; n];
    let mut b = alloc::vec![0.0; n];
    let mut r = alloc::vec![0.0; n];
    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }
    (a, b)
}

fn monotone_x(path: &mut BezPath, points: &[Point]) {
    let n = points.len();
    if n == 2 {
        path.line_to(points[1]);
        return;
    }
    let mut tangents = alloc::vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = slope3(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = slope2(points[0], points[1], tangents[1]);
    tangents[n - 1] = slope2(points[n - 2], points[n - 1], tangents[n - 2]);
    for i in 0..n - 1 {
        let (p0, p1) = (points[i], points[i + 1]);
        let dx = (p1.x - p0.x) / 3.0;
        path.curve_to(
            Point::new(p0.x + dx, p0.y + dx * tangents[i]),
            Point::new(p1.x - dx, p1.y - dx * tangents[i + 1]),
            p1,
        );
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn slope3(p0: Point, p1: Point, p2: Point) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    if h0 == 0.0 || h1 == 0.0 {
        return 0.0;
    }
    let s0 = (p1.y - p0.y) / h0;
    let s1 = (p2.y - p1.y) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

fn slope2(p0: Point, p1: Point, t: f64) -> f64 {
    let h = p1.x - p0.x;
    if h == 0.0 {
        t
    } else {
        (3.0 * (p1.y - p0.y) / h - t) / 2.0
    }
}

/// Splits `points` at gaps, dropping the `None`s.
pub fn split_defined(points: impl IntoIterator<Item = Option<Point>>) -> Vec<Vec<Point>> {
    let mut out: Vec<Vec<Point>> = Vec::new();
    let mut current = Vec::new();
    for p in points {
        match p {
            Some(p) => current.push(p),
            None => {
                if !current.is_empty() {
                    out.push(core::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
