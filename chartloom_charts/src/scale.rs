// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: domain to pixel mappings and their inverses.
//!
//! Continuous scales ([`ScaleLinear`], [`ScaleLog`], [`ScaleTime`]) map numbers; the band scale
//! maps category keys to evenly spaced bands. Domains are used exactly as given (no "nicing"),
//! so a domain computed from data spans exactly that data.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::time;

/// The kind of scale an axis uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScaleType {
    /// Continuous linear scale.
    #[default]
    Linear,
    /// Continuous logarithmic scale.
    Log,
    /// Continuous time scale over Unix seconds.
    Time,
    /// Discrete categories, one tick per key.
    Labels,
    /// Discrete bands, for bars.
    Band,
}

impl ScaleType {
    /// Returns `true` for linear, log and time scales.
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Linear | Self::Log | Self::Time)
    }

    /// Returns `true` for labels and band scales.
    pub fn is_discrete(self) -> bool {
        !self.is_continuous()
    }

    /// Parses the configuration name (`"linear"`, `"log"`, `"time"`, `"labels"`, `"band"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "linear" => Self::Linear,
            "log" => Self::Log,
            "time" => Self::Time,
            "labels" => Self::Labels,
            "band" => Self::Band,
            _ => return None,
        })
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range value back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (px - r0) / denom * (d1 - d0)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// A log-scale mapping from a positive domain to a range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl ScaleLog {
    /// Creates a new base-10 log scale.
    ///
    /// Non-positive domain ends are clamped to a small positive value with a warning.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let fix = |v: f64| {
            if v > 0.0 {
                v
            } else {
                tracing::warn!(value = v, "log scale domain must be positive; clamping");
                1e-6
            }
        };
        Self {
            domain: (fix(domain.0), fix(domain.1)),
            range,
            base: 10.0,
        }
    }

    /// Sets the log base.
    #[must_use]
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    fn log_base(&self, x: f64) -> f64 {
        x.ln() / self.base.ln()
    }

    /// Maps a value from domain space into range space. Non-positive values map to the range
    /// start.
    pub fn map(&self, x: f64) -> f64 {
        let (r0, r1) = self.range;
        if x <= 0.0 {
            return r0;
        }
        let ld0 = self.log_base(self.domain.0);
        let ld1 = self.log_base(self.domain.1);
        let denom = ld1 - ld0;
        if denom == 0.0 {
            return r0;
        }
        let t = (self.log_base(x) - ld0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range value back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        let ld0 = self.log_base(self.domain.0);
        let ld1 = self.log_base(self.domain.1);
        let t = if r1 == r0 { 0.0 } else { (px - r0) / (r1 - r0) };
        self.base.powf(ld0 + t * (ld1 - ld0))
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the powers of the base inside the domain, at most `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut min, mut max) = self.domain;
        if min > max {
            core::mem::swap(&mut min, &mut max);
        }
        if !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        let clamp_exp = |e: f64| {
            let e = e.clamp(-300.0, 300.0);
            #[allow(clippy::cast_possible_truncation, reason = "clamped to [-300, 300]")]
            {
                e as i32
            }
        };
        let min_e = clamp_exp((self.log_base(min) - 1e-9).ceil());
        let max_e = clamp_exp((self.log_base(max) + 1e-9).floor());
        let mut out = Vec::new();
        for e in min_e..=max_e {
            out.push(self.base.powi(e));
            if count != 0 && out.len() >= count {
                break;
            }
        }
        out
    }
}

/// A linear scale over Unix timestamps (seconds) with calendar-aware ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range value back to a timestamp.
    pub fn invert(&self, px: f64) -> f64 {
        self.inner.invert(px)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    /// Returns calendar-aligned ticks inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.inner.domain();
        time::nice_time_ticks(d0, d1, count)
    }
}

/// A discrete band scale: one evenly spaced band per key.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    keys: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a band scale over `keys` with no padding.
    pub fn new(keys: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            keys,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner and outer padding in band units.
    #[must_use]
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// The keys, in band order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the index of `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let n = self.keys.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let (r0, r1) = self.range;
        let denom = n - self.padding_inner + 2.0 * self.padding_outer;
        if denom <= 0.0 {
            0.0
        } else {
            (r1 - r0) / denom
        }
    }

    /// Returns the band width (signed like the range).
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let step = self.step();
        self.range.0 + step * self.padding_outer + step * index as f64
    }

    /// Returns the center of the band for `key`.
    pub fn map(&self, key: &str) -> Option<f64> {
        self.index_of(key)
            .map(|i| self.x(i) + self.band_width() / 2.0)
    }

    /// Returns the index of the band whose center is nearest to `px`.
    pub fn invert(&self, px: f64) -> Option<usize> {
        let step = self.step();
        if self.keys.is_empty() || step == 0.0 {
            return None;
        }
        let first = self.x(0) + self.band_width() / 2.0;
        let i = ((px - first) / step).round();
        let last = (self.keys.len() - 1) as f64;
        let i = i.clamp(0.0, last);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the key range")]
        Some(i as usize)
    }
}

/// A concrete scale bound to a pixel range.
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    /// Linear.
    Linear(ScaleLinear),
    /// Logarithmic.
    Log(ScaleLog),
    /// Time.
    Time(ScaleTime),
    /// Bands (for both `labels` and `band` scale types).
    Band(ScaleBand),
}

impl Scale {
    /// Returns `true` for continuous scales.
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Band(_))
    }

    /// Maps a number. Band scales return `None`.
    pub fn map_number(&self, v: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.map(v)),
            Self::Log(s) => Some(s.map(v)),
            Self::Time(s) => Some(s.map(v)),
            Self::Band(_) => None,
        }
    }

    /// Maps a key. Continuous scales return `None`.
    pub fn map_key(&self, key: &str) -> Option<f64> {
        match self {
            Self::Band(s) => s.map(key),
            _ => None,
        }
    }

    /// Maps a range value back to a number (continuous) or the nearest band center (band).
    pub fn invert(&self, px: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.invert(px)),
            Self::Log(s) => Some(s.invert(px)),
            Self::Time(s) => Some(s.invert(px)),
            Self::Band(s) => s.invert(px).map(|i| s.x(i) + s.band_width() / 2.0),
        }
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Log(s) => s.range(),
            Self::Time(s) => s.range(),
            Self::Band(s) => s.range(),
        }
    }

    /// Returns the continuous domain, if any.
    pub fn continuous_domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(s) => Some(s.domain()),
            Self::Log(s) => Some(s.domain()),
            Self::Time(s) => Some(s.domain()),
            Self::Band(_) => None,
        }
    }

    /// Returns the band width, or `0` for continuous scales.
    pub fn band_width(&self) -> f64 {
        match self {
            Self::Band(s) => s.band_width(),
            _ => 0.0,
        }
    }

    /// Returns the band scale, if this is one.
    pub fn as_band(&self) -> Option<&ScaleBand> {
        match self {
            Self::Band(s) => Some(s),
            _ => None,
        }
    }
}

/// Returns round tick values covering `[min, max]` (ticks never leave the interval).
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step - 1e-9).ceil();
    let stop = (max / step + 1e-9).floor();
    let n_f = stop - start;
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| (start + i as f64) * step).collect()
}

/// Rounds a raw tick step to 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn linear_maps_and_inverts() {
        let s = ScaleLinear::new((0.0, 20.0), (100.0, 0.0));
        assert!((s.map(5.0) - 75.0).abs() < 1e-9, "inverted range");
        assert!((s.invert(75.0) - 5.0).abs() < 1e-9, "round trip through invert");
    }

    #[test]
    fn ticks_stay_inside_domain() {
        assert_eq!(nice_ticks(0.0, 20.0, 5), vec![0.0, 5.0, 10.0, 15.0, 20.0], "step 5");
        let ticks = nice_ticks(3.0, 17.0, 5);
        assert!(ticks.iter().all(|t| (3.0..=17.0).contains(t)), "inside [3, 17]");
        assert_eq!(ticks.first().copied(), Some(4.0), "first multiple of the step");
    }

    #[test]
    fn log_scale_maps_endpoints_to_range() {
        let s = ScaleLog::new((1.0, 100.0), (0.0, 10.0));
        assert!((s.map(1.0) - 0.0).abs() < 1e-9, "start");
        assert!((s.map(100.0) - 10.0).abs() < 1e-9, "end");
        assert!((s.invert(5.0) - 10.0).abs() < 1e-9, "midpoint is 10");
        assert_eq!(s.ticks(10), vec![1.0, 10.0, 100.0], "powers of ten");
    }

    #[test]
    fn band_centers_and_invert() {
        let s = ScaleBand::new(keys(&["a", "b", "c", "d"]), (0.0, 400.0));
        assert_eq!(s.map("a"), Some(50.0), "first center");
        assert_eq!(s.map("d"), Some(350.0), "last center");
        assert_eq!(s.map("z"), None, "unknown key");
        assert_eq!(s.invert(160.0), Some(1), "nearest band");
        assert_eq!(s.invert(-50.0), Some(0), "clamped low");
    }

    #[test]
    fn band_padding_shrinks_bands() {
        let s = ScaleBand::new(keys(&["a", "b"]), (0.0, 100.0)).with_padding(0.5, 0.25);
        assert!(s.band_width() < 50.0, "padding removes space");
        let a = s.map("a").unwrap_or_default();
        let b = s.map("b").unwrap_or_default();
        assert!((a + b - 100.0).abs() < 1e-9, "bands are centered in the range");
    }
}
