// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart model: the single source of truth for data, options and group activation.
//!
//! All state changes go through [`ChartModel::apply`]. Derived state (display data) is
//! recomputed after every mutation and never edited directly.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use peniko::Color;

use crate::color::ColorScale;
use crate::data::{ChartData, Datum};
use crate::options::ChartOptions;

/// Activation state of a data group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupStatus {
    /// Drawn.
    #[default]
    Active,
    /// Hidden by the legend.
    Disabled,
}

/// A named data group and its activation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataGroup {
    /// Group name.
    pub name: String,
    /// Activation state.
    pub status: GroupStatus,
}

/// A model mutation.
#[derive(Clone, Debug)]
pub enum Mutation {
    /// Replaces the data.
    SetData(ChartData),
    /// Replaces the options.
    SetOptions(ChartOptions),
    /// Legend click on a group.
    ToggleGroup(String),
    /// Sets or clears the zoom domain of the continuous domain axis.
    SetZoomDomain(Option<(f64, f64)>),
}

/// What a batch of mutations changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelChange {
    /// Data was replaced.
    pub data: bool,
    /// Options were replaced.
    pub options: bool,
    /// Group activation changed.
    pub groups: bool,
    /// Zoom domain changed.
    pub zoom: bool,
}

impl ModelChange {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        !(self.data || self.options || self.groups || self.zoom)
    }

    fn merge(&mut self, other: Self) {
        self.data |= other.data;
        self.options |= other.options;
        self.groups |= other.groups;
        self.zoom |= other.zoom;
    }
}

/// Chart state.
#[derive(Debug)]
pub struct ChartModel {
    data: Vec<Datum>,
    options: Arc<ChartOptions>,
    groups: Vec<DataGroup>,
    display: Vec<Datum>,
    colors: ColorScale,
    zoom: Option<(f64, f64)>,
}

impl ChartModel {
    /// Creates a model from initial data and options.
    pub fn new(data: ChartData, options: ChartOptions) -> Self {
        let mut model = Self {
            data: Vec::new(),
            options: Arc::new(options),
            groups: Vec::new(),
            display: Vec::new(),
            colors: ColorScale::new(),
            zoom: None,
        };
        model.apply(Mutation::SetData(data));
        model
    }

    /// Applies one mutation.
    pub fn apply(&mut self, mutation: Mutation) -> ModelChange {
        let change = match mutation {
            Mutation::SetData(data) => {
                self.set_data(data);
                ModelChange {
                    data: true,
                    ..ModelChange::default()
                }
            }
            Mutation::SetOptions(options) => {
                self.options = Arc::new(options);
                ModelChange {
                    options: true,
                    ..ModelChange::default()
                }
            }
            Mutation::ToggleGroup(name) => ModelChange {
                groups: self.toggle(&name),
                ..ModelChange::default()
            },
            Mutation::SetZoomDomain(domain) => {
                let changed = self.zoom != domain;
                self.zoom = domain;
                ModelChange {
                    zoom: changed,
                    ..ModelChange::default()
                }
            }
        };
        self.recompute_display();
        change
    }

    /// Applies several mutations and reports their combined effect.
    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = Mutation>) -> ModelChange {
        let mut change = ModelChange::default();
        for mutation in mutations {
            change.merge(self.apply(mutation));
        }
        change
    }

    fn set_data(&mut self, data: ChartData) {
        let records = data.normalize();
        let mut groups: Vec<DataGroup> = Vec::new();
        for datum in &records {
            if groups.iter().any(|g| g.name == datum.group) {
                continue;
            }
            let status = self.group_status(&datum.group).unwrap_or_default();
            self.colors.assign(&datum.group);
            groups.push(DataGroup {
                name: datum.group.clone(),
                status,
            });
        }
        tracing::debug!(records = records.len(), groups = groups.len(), "data set");
        self.groups = groups;
        self.data = records;
    }

    /// Legend toggle.
    ///
    /// With every group active, the clicked group is isolated. Otherwise only the clicked group
    /// flips; if that leaves no group active, every group is re-activated.
    fn toggle(&mut self, name: &str) -> bool {
        if !self.groups.iter().any(|g| g.name == name) {
            tracing::warn!(group = name, "toggle of unknown data group ignored");
            return false;
        }
        let any_disabled = self.groups.iter().any(|g| g.status == GroupStatus::Disabled);
        if any_disabled {
            for group in &mut self.groups {
                if group.name == name {
                    group.status = match group.status {
                        GroupStatus::Active => GroupStatus::Disabled,
                        GroupStatus::Disabled => GroupStatus::Active,
                    };
                }
            }
            if self.groups.iter().all(|g| g.status == GroupStatus::Disabled) {
                for group in &mut self.groups {
                    group.status = GroupStatus::Active;
                }
            }
        } else {
            for group in &mut self.groups {
                group.status = if group.name == name {
                    GroupStatus::Active
                } else {
                    GroupStatus::Disabled
                };
            }
        }
        true
    }

    fn recompute_display(&mut self) {
        let groups = &self.groups;
        self.display = self
            .data
            .iter()
            .filter(|d| {
                groups
                    .iter()
                    .any(|g| g.name == d.group && g.status == GroupStatus::Active)
            })
            .cloned()
            .collect();
    }

    /// All records.
    pub fn data(&self) -> &[Datum] {
        &self.data
    }

    /// Records of active groups.
    pub fn display_data(&self) -> &[Datum] {
        &self.display
    }

    /// Current options.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Shared handle to the current options.
    pub fn options_arc(&self) -> Arc<ChartOptions> {
        Arc::clone(&self.options)
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> &[DataGroup] {
        &self.groups
    }

    /// Names of active groups, in order.
    pub fn active_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| g.status == GroupStatus::Active)
            .map(|g| g.name.as_str())
            .collect()
    }

    /// Status of `name`, if it is a known group.
    pub fn group_status(&self, name: &str) -> Option<GroupStatus> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.status)
    }

    /// Returns `true` if `name` is a known, active group.
    pub fn is_active(&self, name: &str) -> bool {
        self.group_status(name) == Some(GroupStatus::Active)
    }

    /// Zoom domain, if zoomed.
    pub fn zoom_domain(&self) -> Option<(f64, f64)> {
        self.zoom
    }

    /// Palette slot of `name`.
    pub fn color_slot(&self, name: &str) -> Option<usize> {
        self.colors.slot(name)
    }

    fn base_color(&self, group: &str) -> Color {
        let color = &self.options.color;
        if let Some((_, c)) = color.scale.iter().find(|(g, _)| g == group) {
            return *c;
        }
        let palette = color.palette.as_deref().unwrap_or(&[]);
        self.colors.color(group, palette)
    }

    /// Fill color for `group` (and optionally one of its records).
    pub fn fill_color(&self, group: &str, datum: Option<&Datum>) -> Color {
        let base = self.base_color(group);
        match &self.options.color.get_fill_color {
            Some(cb) => (cb.0)(group, datum, base),
            None => base,
        }
    }

    /// Stroke color for `group` (and optionally one of its records).
    pub fn stroke_color(&self, group: &str, datum: Option<&Datum>) -> Color {
        let base = self.base_color(group);
        match &self.options.color.get_stroke_color {
            Some(cb) => (cb.0)(group, datum, base),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::color::DEFAULT_PALETTE;
    use crate::options::ColorCallback;
    use alloc::vec;

    fn records(groups: &[&str]) -> ChartData {
        ChartData::Records(
            groups
                .iter()
                .enumerate()
                .map(|(i, g)| Datum::new(*g, "k", i as f64))
                .collect(),
        )
    }

    fn statuses(model: &ChartModel) -> Vec<GroupStatus> {
        model.groups().iter().map(|g| g.status).collect()
    }

    use GroupStatus::{Active, Disabled};

    #[test]
    fn first_click_isolates_second_click_adds() {
        let mut model = ChartModel::new(records(&["A", "B", "C", "D"]), ChartOptions::default());
        model.apply(Mutation::ToggleGroup(String::from("B")));
        assert_eq!(statuses(&model), vec![Disabled, Active, Disabled, Disabled], "isolated");
        model.apply(Mutation::ToggleGroup(String::from("D")));
        assert_eq!(statuses(&model), vec![Disabled, Active, Disabled, Active], "added");
        assert_eq!(model.display_data().len(), 2, "display data follows activation");
    }

    #[test]
    fn disabling_the_last_active_group_restores_all() {
        let mut model = ChartModel::new(records(&["A", "B"]), ChartOptions::default());
        model.apply(Mutation::ToggleGroup(String::from("A")));
        model.apply(Mutation::ToggleGroup(String::from("A")));
        assert_eq!(statuses(&model), vec![Active, Active], "nothing left hidden");
    }

    #[test]
    fn activation_survives_refresh_by_name() {
        let mut model = ChartModel::new(records(&["A", "B"]), ChartOptions::default());
        model.apply(Mutation::ToggleGroup(String::from("B")));
        model.apply(Mutation::SetData(records(&["C", "B", "A"])));
        assert_eq!(model.group_status("A"), Some(Disabled), "A stays hidden");
        assert_eq!(model.group_status("B"), Some(Active), "B stays shown");
        assert_eq!(model.group_status("C"), Some(Active), "new groups start active");
    }

    #[test]
    fn colors_are_stable_across_toggles_and_refreshes() {
        let mut model = ChartModel::new(records(&["A", "B"]), ChartOptions::default());
        let b = model.fill_color("B", None);
        model.apply(Mutation::ToggleGroup(String::from("A")));
        assert_eq!(model.fill_color("B", None), b, "toggle keeps color");
        model.apply(Mutation::SetData(records(&["Z", "B"])));
        assert_eq!(model.fill_color("B", None), b, "refresh keeps color");
        assert_eq!(model.fill_color("Z", None), DEFAULT_PALETTE[2], "new names take the next slot");
    }

    #[test]
    fn color_overrides_take_precedence() {
        let red = Color::from_rgb8(255, 0, 0);
        let mut options = ChartOptions::default();
        options.color.scale.push((String::from("A"), red));
        options.color.get_stroke_color = Some(ColorCallback::new(|_, _, _| Color::BLACK));
        let model = ChartModel::new(records(&["A", "B"]), options);
        assert_eq!(model.fill_color("A", None), red, "scale override");
        assert_eq!(model.stroke_color("B", None), Color::BLACK, "callback override");
    }

    #[test]
    fn batched_mutations_merge_changes() {
        let mut model = ChartModel::new(records(&["A"]), ChartOptions::default());
        let change = model.apply_all([
            Mutation::SetData(records(&["A", "B"])),
            Mutation::SetOptions(ChartOptions::default().with_title("t")),
        ]);
        assert!(change.data && change.options, "both reported");
        assert!(!change.groups, "no toggle");
        assert_eq!(model.options().title.as_deref(), Some("t"), "options replaced");
    }
}
