// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ids::MarkId;
use crate::mark::Mark;
use crate::scene::MarkDiff;

/// A retained drawing surface that marks are rendered into.
///
/// Surfaces are mutated in place: a mark is inserted or replaced by id, or removed by id.
/// Intermediate animation frames arrive as ordinary upserts.
pub trait Surface {
    /// Inserts or replaces the mark with `mark.id`.
    fn upsert(&mut self, mark: &Mark);

    /// Removes the mark with `id`, if present.
    fn remove(&mut self, id: MarkId);

    /// Informs the surface of the chart's outer size.
    fn set_size(&mut self, _width: f64, _height: f64) {}

    /// Applies scene diffs without animation.
    fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter { new, .. } | MarkDiff::Update { new, .. } => self.upsert(new),
                MarkDiff::Exit { id, .. } => self.remove(*id),
            }
        }
    }
}
