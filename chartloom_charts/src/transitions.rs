// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cycle bookkeeping over the animator.
//!
//! Every update cycle opens a batch. Transitions started during the cycle join it, and the
//! batch is sealed when the cycle has finished rendering. A sealed batch resolves once each of
//! its transitions has ended, whether it completed or was cancelled by a later cycle. Each
//! batch resolves exactly once.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::time::Duration;

use chartloom_core::{Animator, MarkDiff, Surface, TransitionHandle, TransitionOutcome};

#[derive(Debug, Default)]
struct Batch {
    pending: BTreeSet<TransitionHandle>,
    sealed: bool,
}

/// Tracks which update cycle each running transition belongs to.
#[derive(Debug, Default)]
pub struct TransitionService {
    animator: Animator,
    batches: BTreeMap<u64, Batch>,
    owners: BTreeMap<TransitionHandle, u64>,
    finished: Vec<u64>,
}

impl TransitionService {
    /// An idle service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the batch for `cycle`.
    pub fn begin_cycle(&mut self, cycle: u64) {
        self.batches.entry(cycle).or_default();
    }

    /// Starts a transition on behalf of `cycle`.
    pub fn start<'a>(
        &mut self,
        cycle: u64,
        name: &'static str,
        duration: Duration,
        diffs: impl IntoIterator<Item = &'a MarkDiff>,
        surface: &mut dyn Surface,
    ) -> TransitionHandle {
        let handle = self.animator.start(name, duration, diffs, surface);
        self.batches.entry(cycle).or_default().pending.insert(handle);
        self.owners.insert(handle, cycle);
        handle
    }

    /// Applies `diffs` at once, outside of any cycle.
    ///
    /// Marks still animating are taken over, so a later frame never overwrites them.
    pub fn apply_now<'a>(
        &mut self,
        diffs: impl IntoIterator<Item = &'a MarkDiff>,
        surface: &mut dyn Surface,
    ) {
        self.animator
            .start("interaction", Duration::ZERO, diffs, surface);
        self.collect();
    }

    /// Marks `cycle` as fully started. It may resolve immediately.
    pub fn seal(&mut self, cycle: u64) {
        self.batches.entry(cycle).or_default().sealed = true;
        self.collect();
    }

    /// Advances running transitions by `dt`.
    pub fn advance(&mut self, dt: Duration, surface: &mut dyn Surface) {
        self.animator.advance(dt, surface);
        self.collect();
    }

    /// Jumps every running transition to its end state.
    pub fn finish_all(&mut self, surface: &mut dyn Surface) {
        self.animator.finish_all(surface);
        self.collect();
    }

    /// Cycles resolved since the last call, oldest first.
    pub fn take_finished(&mut self) -> Vec<u64> {
        let mut finished = core::mem::take(&mut self.finished);
        finished.sort_unstable();
        finished
    }

    /// Returns `true` if no transition is in flight.
    pub fn is_idle(&self) -> bool {
        self.animator.is_idle()
    }

    /// Names of the transitions in flight.
    pub fn running(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.animator.running()
    }

    fn collect(&mut self) {
        for end in self.animator.take_ended() {
            let Some(cycle) = self.owners.remove(&end.handle) else {
                continue;
            };
            if end.outcome == TransitionOutcome::Cancelled {
                tracing::debug!(name = end.name, cycle, "transition cancelled");
            }
            if let Some(batch) = self.batches.get_mut(&cycle) {
                batch.pending.remove(&end.handle);
            }
        }
        let resolved: Vec<u64> = self
            .batches
            .iter()
            .filter(|(_, b)| b.sealed && b.pending.is_empty())
            .map(|(cycle, _)| *cycle)
            .collect();
        for cycle in resolved {
            self.batches.remove(&cycle);
            tracing::debug!(cycle, "render finished");
            self.finished.push(cycle);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;
    use chartloom_core::{IdArena, Mark, Scene, SvgSurface};
    use kurbo::Rect;

    fn diffs(scene: &mut Scene, ids: &mut IdArena, width: f64) -> Vec<MarkDiff> {
        let id = ids.id("bar", "A");
        scene.tick([Mark::builder(id)
            .rect(Rect::new(0.0, 0.0, width, 10.0))
            .transition("bar-update-enter")
            .build()])
    }

    #[test]
    fn empty_cycle_resolves_on_seal() {
        let mut service = TransitionService::new();
        service.begin_cycle(1);
        assert!(service.take_finished().is_empty(), "still open");
        service.seal(1);
        assert_eq!(service.take_finished(), vec![1], "nothing to wait for");
        assert!(service.take_finished().is_empty(), "exactly once");
    }

    #[test]
    fn resolves_after_the_last_transition_ends() {
        let mut surface = SvgSurface::new();
        let mut scene = Scene::new();
        let mut ids = IdArena::new();
        let mut service = TransitionService::new();
        let d = diffs(&mut scene, &mut ids, 10.0);
        service.begin_cycle(1);
        service.start(1, "bar-update-enter", Duration::from_millis(300), &d, &mut surface);
        service.seal(1);
        service.advance(Duration::from_millis(100), &mut surface);
        assert!(service.take_finished().is_empty(), "in flight");
        service.advance(Duration::from_millis(250), &mut surface);
        assert_eq!(service.take_finished(), vec![1], "completed");
    }

    #[test]
    fn cancelled_cycles_still_resolve_once() {
        let mut surface = SvgSurface::new();
        let mut scene = Scene::new();
        let mut ids = IdArena::new();
        let mut service = TransitionService::new();
        let first = diffs(&mut scene, &mut ids, 10.0);
        service.begin_cycle(1);
        service.start(1, "bar-update-enter", Duration::from_millis(300), &first, &mut surface);
        service.seal(1);
        service.advance(Duration::from_millis(100), &mut surface);

        let second = diffs(&mut scene, &mut ids, 20.0);
        service.begin_cycle(2);
        service.start(2, "bar-update-enter", Duration::from_millis(300), &second, &mut surface);
        service.seal(2);
        assert_eq!(service.take_finished(), vec![1], "superseded cycle resolves");

        service.finish_all(&mut surface);
        assert_eq!(service.take_finished(), vec![2], "newer cycle resolves on its own");
        assert!(service.is_idle(), "nothing left");
    }
}
