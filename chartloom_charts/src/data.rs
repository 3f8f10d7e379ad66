// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input data shapes and their canonical record form.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Named field holding the lower bound of a confidence interval.
pub const INTERVAL_MIN: &str = "min";
/// Named field holding the upper bound of a confidence interval.
pub const INTERVAL_MAX: &str = "max";

/// One canonical data record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Datum {
    /// Group (dataset) name; drives legend identity and color.
    pub group: String,
    /// Category key, for discrete axes.
    pub key: Option<String>,
    /// Timestamp in Unix seconds, for time axes.
    pub date: Option<f64>,
    /// Measured value; `None` is a gap.
    pub value: Option<f64>,
    /// Extra numeric fields addressable with [`Field::Named`].
    pub extra: SmallVec<[(String, f64); 2]>,
}

impl Datum {
    /// A keyed record.
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self {
            group: group.into(),
            key: Some(key.into()),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A timestamped record.
    pub fn dated(group: impl Into<String>, date: f64, value: f64) -> Self {
        Self {
            group: group.into(),
            date: Some(date),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A record with only a group and a value (pie, meter).
    pub fn grouped(group: impl Into<String>, value: f64) -> Self {
        Self {
            group: group.into(),
            value: Some(value),
            ..Self::default()
        }
    }

    /// Adds a named numeric field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra.push((name.into(), value));
        self
    }

    /// Adds a confidence interval around the value, stored as the `min` and `max` fields.
    #[must_use]
    pub fn with_interval(self, min: f64, max: f64) -> Self {
        self.with_field(INTERVAL_MIN, min)
            .with_field(INTERVAL_MAX, max)
    }

    /// The confidence interval as `(low, high)`, if both bounds are finite.
    pub fn interval(&self) -> Option<(f64, f64)> {
        let named = |name: &str| {
            self.extra
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| *v)
                .filter(|v| v.is_finite())
        };
        let (a, b) = (named(INTERVAL_MIN)?, named(INTERVAL_MAX)?);
        Some((a.min(b), a.max(b)))
    }

    /// Reads a field.
    pub fn field(&self, field: &Field) -> FieldValue<'_> {
        match field {
            Field::Key => self
                .key
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            Field::Value => self.value.map_or(FieldValue::Missing, FieldValue::Number),
            Field::Date => self.date.map_or(FieldValue::Missing, FieldValue::Number),
            Field::Named(name) => self
                .extra
                .iter()
                .find(|(n, _)| n == name)
                .map_or(FieldValue::Missing, |(_, v)| FieldValue::Number(*v)),
        }
    }

    /// Reads a numeric field; non-finite numbers and text are `None`.
    pub fn number(&self, field: &Field) -> Option<f64> {
        match self.field(field) {
            FieldValue::Number(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    /// Reads a field as text (numbers are formatted).
    pub fn text(&self, field: &Field) -> Option<String> {
        match self.field(field) {
            FieldValue::Text(s) => Some(String::from(s)),
            FieldValue::Number(v) => Some(format!("{v}")),
            FieldValue::Missing => None,
        }
    }

    /// Stable identity of this record within its group: the key, else the timestamp.
    pub fn identity(&self) -> Option<String> {
        if let Some(key) = &self.key {
            return Some(key.clone());
        }
        self.date.map(|d| format!("@{}", d.to_bits()))
    }
}

/// Selects a field of a [`Datum`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Field {
    /// The category key.
    Key,
    /// The measured value.
    #[default]
    Value,
    /// The timestamp.
    Date,
    /// A named extra field.
    Named(String),
}

/// A borrowed field value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    /// Text.
    Text(&'a str),
    /// Number.
    Number(f64),
    /// Absent.
    Missing,
}

/// One series of the tabular input shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    /// Group name.
    pub label: String,
    /// Values aligned with the table labels; `None` is a gap.
    pub data: Vec<Option<f64>>,
}

impl Dataset {
    /// Creates a dataset from dense values.
    pub fn new(label: impl Into<String>, data: impl IntoIterator<Item = f64>) -> Self {
        Self {
            label: label.into(),
            data: data.into_iter().map(Some).collect(),
        }
    }
}

/// Chart input data.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartData {
    /// `{labels, datasets}`: `labels[i]` is the key of `dataset.data[i]`.
    Tabular {
        /// Category keys.
        labels: Vec<String>,
        /// Series.
        datasets: Vec<Dataset>,
    },
    /// Flat records.
    Records(Vec<Datum>),
}

impl Default for ChartData {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

impl From<Vec<Datum>> for ChartData {
    fn from(records: Vec<Datum>) -> Self {
        Self::Records(records)
    }
}

impl ChartData {
    /// Converts either shape into canonical records.
    ///
    /// Records that repeat a `(group, key)` or `(group, date)` pair are reported with a warning;
    /// the later record replaces the earlier one in place.
    pub fn normalize(self) -> Vec<Datum> {
        let records = match self {
            Self::Records(records) => records,
            Self::Tabular { labels, datasets } => {
                let mut out = Vec::with_capacity(labels.len() * datasets.len());
                for dataset in datasets {
                    if dataset.data.len() > labels.len() {
                        tracing::warn!(
                            group = dataset.label.as_str(),
                            values = dataset.data.len(),
                            labels = labels.len(),
                            "dataset has more values than labels; extra values are ignored"
                        );
                    }
                    for (i, label) in labels.iter().enumerate() {
                        out.push(Datum {
                            group: dataset.label.clone(),
                            key: Some(label.clone()),
                            value: dataset.data.get(i).copied().flatten(),
                            ..Datum::default()
                        });
                    }
                }
                out
            }
        };
        dedupe(records)
    }
}

fn dedupe(records: Vec<Datum>) -> Vec<Datum> {
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut out: Vec<Datum> = Vec::with_capacity(records.len());
    for datum in records {
        let Some(identity) = datum.identity() else {
            out.push(datum);
            continue;
        };
        let slot = (datum.group.clone(), identity);
        if let Some(&at) = seen.get(&slot) {
            tracing::warn!(
                group = slot.0.as_str(),
                key = slot.1.as_str(),
                "duplicate data key; the last record wins"
            );
            out[at] = datum;
        } else {
            seen.insert(slot, out.len());
            out.push(datum);
        }
    }
    out
}

/// A record placed on a stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stacked<'a> {
    /// The record.
    pub datum: &'a Datum,
    /// Bottom of the band.
    pub y0: f64,
    /// Top of the band.
    pub y1: f64,
}

/// Stacks `data` by record identity, in `groups` order. Gaps contribute zero.
///
/// Positive and negative values stack separately from zero.
pub fn stack<'a>(data: &'a [Datum], groups: &[&str], value: &Field) -> Vec<Stacked<'a>> {
    let mut pos: HashMap<String, f64> = HashMap::new();
    let mut neg: HashMap<String, f64> = HashMap::new();
    let mut out = Vec::with_capacity(data.len());
    for group in groups {
        for datum in data.iter().filter(|d| d.group == *group) {
            let Some(identity) = datum.identity() else {
                continue;
            };
            let v = datum.number(value).unwrap_or(0.0);
            let acc = if v >= 0.0 {
                pos.entry(identity).or_insert(0.0)
            } else {
                neg.entry(identity).or_insert(0.0)
            };
            let y0 = *acc;
            *acc += v;
            out.push(Stacked {
                datum,
                y0,
                y1: *acc,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    #[test]
    fn tabular_normalizes_to_records() {
        let data = ChartData::Tabular {
            labels: vec![String::from("x"), String::from("y")],
            datasets: vec![Dataset::new("A", [1.0, 2.0]), Dataset::new("B", [3.0])],
        };
        let records = data.normalize();
        assert_eq!(records.len(), 4, "one record per label per dataset");
        assert_eq!(records[1], Datum::new("A", "y", 2.0), "labels become keys");
        assert_eq!(records[3].value, None, "missing value is a gap");
        assert_eq!(records[3].key.as_deref(), Some("y"), "gap keeps its key");
    }

    #[test]
    fn intervals_are_ordered_and_need_both_bounds() {
        let datum = Datum::new("A", "x", 5.0).with_interval(7.0, 3.0);
        assert_eq!(datum.interval(), Some((3.0, 7.0)), "bounds sorted");
        let half = Datum::new("A", "x", 5.0).with_field(INTERVAL_MIN, 3.0);
        assert_eq!(half.interval(), None, "one bound is not an interval");
    }

    #[test]
    fn duplicates_last_write_wins_in_place() {
        let records = ChartData::Records(vec![
            Datum::new("A", "x", 1.0),
            Datum::new("A", "y", 2.0),
            Datum::new("A", "x", 9.0),
        ])
        .normalize();
        assert_eq!(records.len(), 2, "duplicate dropped");
        assert_eq!(records[0].value, Some(9.0), "later value kept");
        assert_eq!(records[0].key.as_deref(), Some("x"), "position of first kept");
    }

    #[test]
    fn field_access() {
        let d = Datum::dated("A", 10.0, 3.0).with_field("size", 7.0);
        assert_eq!(d.number(&Field::Date), Some(10.0), "date");
        assert_eq!(d.number(&Field::Named(String::from("size"))), Some(7.0), "named");
        assert_eq!(d.field(&Field::Key), FieldValue::Missing, "no key");
    }

    #[test]
    fn stacking_accumulates_per_key() {
        let data = vec![
            Datum::new("A", "x", 1.0),
            Datum::new("B", "x", 2.0),
            Datum::new("A", "y", 4.0),
            Datum {
                value: None,
                ..Datum::new("B", "y", 0.0)
            },
        ];
        let stacked = stack(&data, &["A", "B"], &Field::Value);
        let bx = stacked
            .iter()
            .find(|s| s.datum.group == "B" && s.datum.key.as_deref() == Some("x"))
            .expect("B/x stacked");
        assert_eq!((bx.y0, bx.y1), (1.0, 3.0), "B sits on A");
        let by = stacked
            .iter()
            .find(|s| s.datum.group == "B" && s.datum.key.as_deref() == Some("y"))
            .expect("B/y stacked");
        assert_eq!((by.y0, by.y1), (4.0, 4.0), "gap is zero height");
    }
}
