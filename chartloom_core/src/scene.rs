// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed enter/update/exit reconciliation.

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::ids::{LayerId, MarkId};
use crate::mark::{Mark, MarkKind};

/// A change to the retained mark set produced by [`Scene::tick_layer`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark that did not exist before.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// The new mark.
        new: Box<Mark>,
        /// Bounds of the new payload, if known.
        bounds: Option<Rect>,
    },
    /// A mark whose payload, paint order or tags changed.
    Update {
        /// Mark id.
        id: MarkId,
        /// Primitive kind of the new payload.
        kind: MarkKind,
        /// Previous paint order.
        old_z_index: i32,
        /// New paint order.
        new_z_index: i32,
        /// The previous mark.
        old: Box<Mark>,
        /// The new mark.
        new: Box<Mark>,
        /// Bounds of the previous payload, if known.
        old_bounds: Option<Rect>,
        /// Bounds of the new payload, if known.
        new_bounds: Option<Rect>,
    },
    /// A mark that no longer exists.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// The removed mark.
        old: Box<Mark>,
        /// Bounds of the removed payload, if known.
        bounds: Option<Rect>,
    },
}

impl MarkDiff {
    /// Returns the id of the affected mark.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }

    /// Returns the transition name that should animate this change.
    ///
    /// Enters and updates use the new mark's transition; exits use the removed mark's.
    pub fn transition(&self) -> Option<&'static str> {
        match self {
            Self::Enter { new, .. } | Self::Update { new, .. } => new.transition,
            Self::Exit { old, .. } => old.transition,
        }
    }

    /// Returns the mark's role tag.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Enter { new, .. } | Self::Update { new, .. } => new.class,
            Self::Exit { old, .. } => old.class,
        }
    }

    /// Returns `true` for [`MarkDiff::Enter`].
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter { .. })
    }

    /// Returns `true` for [`MarkDiff::Update`].
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update { .. })
    }

    /// Returns `true` for [`MarkDiff::Exit`].
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }
}

/// The retained set of marks, partitioned into layers.
///
/// Each call to [`Scene::tick_layer`] replaces one layer's marks and reports what changed.
/// Marks are matched by [`MarkId`] only, so the order in which they are produced does not matter.
#[derive(Debug, Default)]
pub struct Scene {
    marks: BTreeMap<MarkId, (LayerId, Mark)>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the default layer's marks.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        self.tick_layer(LayerId::default(), marks)
    }

    /// Replaces the marks of `layer` and returns the resulting diffs.
    ///
    /// A mark id previously owned by another layer moves to `layer` and is reported as an update.
    pub fn tick_layer(
        &mut self,
        layer: LayerId,
        marks: impl IntoIterator<Item = Mark>,
    ) -> Vec<MarkDiff> {
        let mut incoming: BTreeMap<MarkId, Mark> = BTreeMap::new();
        for mark in marks {
            if let Some(prev) = incoming.insert(mark.id, mark) {
                tracing::warn!(
                    id = prev.id.0,
                    class = prev.class,
                    "duplicate mark id in one tick; keeping the last one"
                );
            }
        }

        let mut diffs = Vec::new();

        let stale: Vec<MarkId> = self
            .marks
            .iter()
            .filter(|(id, (owner, _))| *owner == layer && !incoming.contains_key(id))
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            if let Some((_, old)) = self.marks.remove(&id) {
                diffs.push(MarkDiff::Exit {
                    id,
                    kind: old.kind(),
                    z_index: old.z_index,
                    bounds: old.payload.bounds(),
                    old: Box::new(old),
                });
            }
        }

        for (id, mark) in incoming {
            match self.marks.get_mut(&id) {
                Some((owner, old)) => {
                    let moved = *owner != layer;
                    *owner = layer;
                    if !moved && *old == mark {
                        continue;
                    }
                    let previous = core::mem::replace(old, mark.clone());
                    diffs.push(MarkDiff::Update {
                        id,
                        kind: mark.kind(),
                        old_z_index: previous.z_index,
                        new_z_index: mark.z_index,
                        old_bounds: previous.payload.bounds(),
                        new_bounds: mark.payload.bounds(),
                        old: Box::new(previous),
                        new: Box::new(mark),
                    });
                }
                None => {
                    diffs.push(MarkDiff::Enter {
                        id,
                        kind: mark.kind(),
                        z_index: mark.z_index,
                        bounds: mark.payload.bounds(),
                        new: Box::new(mark.clone()),
                    });
                    self.marks.insert(id, (layer, mark));
                }
            }
        }
        diffs
    }

    /// Exits every mark whose layer is not in `live`.
    pub fn retain_layers(&mut self, live: &[LayerId]) -> Vec<MarkDiff> {
        let dead: Vec<MarkId> = self
            .marks
            .iter()
            .filter(|(_, (layer, _))| !live.contains(layer))
            .map(|(id, _)| *id)
            .collect();
        dead.into_iter()
            .filter_map(|id| self.marks.remove(&id))
            .map(|(_, old)| MarkDiff::Exit {
                id: old.id,
                kind: old.kind(),
                z_index: old.z_index,
                bounds: old.payload.bounds(),
                old: Box::new(old),
            })
            .collect()
    }

    /// Exits every mark.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        self.retain_layers(&[])
    }

    /// Returns a retained mark.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id).map(|(_, m)| m)
    }

    /// Iterates retained marks in id order.
    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.marks.values().map(|(_, m)| m)
    }

    /// Iterates the marks of one layer in id order.
    pub fn layer(&self, layer: LayerId) -> impl Iterator<Item = &Mark> {
        self.marks
            .values()
            .filter(move |(owner, _)| *owner == layer)
            .map(|(_, m)| m)
    }

    /// Number of retained marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if no marks are retained.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
