// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named, interruptible transitions over scene diffs.
//!
//! A transition animates a batch of [`MarkDiff`]s over a duration:
//! - enters fade in from zero opacity,
//! - updates interpolate from the old payload to the new one,
//! - exits fade out and are removed at the end.
//!
//! Transitions are registered by name. Starting a transition under a name that is still in
//! flight interrupts the old one, and a mark that is still animating under any transition is
//! taken over by the newer transition, continuing from its current interpolated state. The
//! interrupted transition resolves as [`TransitionOutcome::Cancelled`] once it has no tracks left.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::time::Duration;

use smallvec::SmallVec;

use crate::ids::MarkId;
use crate::mark::Mark;
use crate::scene::MarkDiff;
use crate::surface::Surface;

/// Identifies one started transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionHandle(pub u64);

/// How a transition resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Ran to the end.
    Completed,
    /// Superseded by a newer transition before it finished.
    Cancelled,
}

/// Resolution record for a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEnd {
    /// The transition.
    pub handle: TransitionHandle,
    /// Its registered name.
    pub name: &'static str,
    /// How it resolved.
    pub outcome: TransitionOutcome,
}

#[derive(Clone, Debug)]
struct Track {
    from: Mark,
    to: Mark,
    remove_at_end: bool,
}

impl Track {
    fn frame(&self, eased: f64) -> Mark {
        Mark {
            payload: self.from.payload.lerp(&self.to.payload, eased),
            ..self.to.clone()
        }
    }

    fn finish(&self, surface: &mut dyn Surface) {
        if self.remove_at_end {
            surface.remove(self.to.id);
        } else {
            surface.upsert(&self.to);
        }
    }
}

#[derive(Debug)]
struct Running {
    handle: TransitionHandle,
    duration: Duration,
    elapsed: Duration,
    tracks: BTreeMap<MarkId, Track>,
    interrupted: bool,
}

impl Running {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Drives named transitions and writes intermediate frames to a [`Surface`].
#[derive(Debug, Default)]
pub struct Animator {
    running: BTreeMap<&'static str, Running>,
    ended: Vec<TransitionEnd>,
    next_handle: u64,
}

impl Animator {
    /// Creates an idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a transition named `name` over `diffs`.
    ///
    /// The first frame is written immediately. A zero `duration` applies the final state and
    /// resolves the transition as completed before returning.
    pub fn start<'a>(
        &mut self,
        name: &'static str,
        duration: Duration,
        diffs: impl IntoIterator<Item = &'a MarkDiff>,
        surface: &mut dyn Surface,
    ) -> TransitionHandle {
        self.next_handle += 1;
        let handle = TransitionHandle(self.next_handle);

        let mut tracks = BTreeMap::new();
        for diff in diffs {
            let id = diff.id();
            let current = self.take_over(id);
            let track = match diff {
                MarkDiff::Enter { new, .. } => Track {
                    from: current.unwrap_or_else(|| Mark {
                        payload: new.payload.clone().with_opacity(0.0),
                        ..(**new).clone()
                    }),
                    to: (**new).clone(),
                    remove_at_end: false,
                },
                MarkDiff::Update { old, new, .. } => Track {
                    from: current.unwrap_or_else(|| (**old).clone()),
                    to: (**new).clone(),
                    remove_at_end: false,
                },
                MarkDiff::Exit { old, .. } => {
                    let from = current.unwrap_or_else(|| (**old).clone());
                    Track {
                        to: Mark {
                            payload: from.payload.clone().with_opacity(0.0),
                            ..from.clone()
                        },
                        from,
                        remove_at_end: true,
                    }
                }
            };
            tracks.insert(id, track);
        }

        // Last writer wins per name: whatever the old transition still owns jumps to its end.
        if let Some(old) = self.running.remove(name) {
            for track in old.tracks.values() {
                track.finish(surface);
            }
            tracing::trace!(name, handle = old.handle.0, "transition interrupted");
            self.ended.push(TransitionEnd {
                handle: old.handle,
                name,
                outcome: TransitionOutcome::Cancelled,
            });
        }
        self.resolve_emptied();

        let running = Running {
            handle,
            duration,
            elapsed: Duration::ZERO,
            tracks,
            interrupted: false,
        };
        if duration.is_zero() {
            for track in running.tracks.values() {
                track.finish(surface);
            }
            self.ended.push(TransitionEnd {
                handle,
                name,
                outcome: TransitionOutcome::Completed,
            });
            return handle;
        }
        for track in running.tracks.values() {
            surface.upsert(&track.frame(0.0));
        }
        tracing::trace!(name, handle = handle.0, marks = running.tracks.len(), "transition started");
        self.running.insert(name, running);
        handle
    }

    /// Removes the in-flight track for `id` from whichever transition owns it and returns the
    /// mark as currently displayed.
    fn take_over(&mut self, id: MarkId) -> Option<Mark> {
        for running in self.running.values_mut() {
            let eased = ease_cubic_in_out(running.progress());
            if let Some(track) = running.tracks.remove(&id) {
                running.interrupted = true;
                return Some(track.frame(eased));
            }
        }
        None
    }

    /// Resolves transitions that lost all of their tracks to newer transitions.
    fn resolve_emptied(&mut self) {
        let emptied: SmallVec<[&'static str; 4]> = self
            .running
            .iter()
            .filter(|(_, r)| r.tracks.is_empty() && r.interrupted)
            .map(|(name, _)| *name)
            .collect();
        for name in emptied {
            if let Some(old) = self.running.remove(name) {
                self.ended.push(TransitionEnd {
                    handle: old.handle,
                    name,
                    outcome: TransitionOutcome::Cancelled,
                });
            }
        }
    }

    /// Advances every running transition by `dt` and writes the resulting frames.
    pub fn advance(&mut self, dt: Duration, surface: &mut dyn Surface) {
        let mut finished: SmallVec<[&'static str; 4]> = SmallVec::new();
        for (name, running) in &mut self.running {
            running.elapsed = running.elapsed.saturating_add(dt);
            let t = running.progress();
            if t >= 1.0 {
                for track in running.tracks.values() {
                    track.finish(surface);
                }
                finished.push(*name);
            } else {
                let eased = ease_cubic_in_out(t);
                for track in running.tracks.values() {
                    surface.upsert(&track.frame(eased));
                }
            }
        }
        for name in finished {
            if let Some(done) = self.running.remove(name) {
                tracing::trace!(name, handle = done.handle.0, "transition completed");
                self.ended.push(TransitionEnd {
                    handle: done.handle,
                    name,
                    outcome: TransitionOutcome::Completed,
                });
            }
        }
    }

    /// Jumps every running transition to its end state.
    pub fn finish_all(&mut self, surface: &mut dyn Surface) {
        let running = core::mem::take(&mut self.running);
        for (name, done) in running {
            for track in done.tracks.values() {
                track.finish(surface);
            }
            self.ended.push(TransitionEnd {
                handle: done.handle,
                name,
                outcome: TransitionOutcome::Completed,
            });
        }
    }

    /// Drains the resolution records collected since the last call.
    pub fn take_ended(&mut self) -> Vec<TransitionEnd> {
        core::mem::take(&mut self.ended)
    }

    /// Returns `true` if no transition is in flight.
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Names of the transitions in flight.
    pub fn running(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.running.keys().copied()
    }
}

/// Cubic ease-in-out over `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::ids::MarkId;
    use crate::mark::MarkPayload;
    use crate::scene::Scene;
    use crate::svg::SvgSurface;
    use alloc::vec;
    use kurbo::Rect;

    fn bar(x: f64) -> Mark {
        Mark::builder(MarkId(1))
            .rect(Rect::new(x, 0.0, x + 10.0, 10.0))
            .transition("bar")
            .build()
    }

    fn x0(surface: &SvgSurface) -> f64 {
        match &surface.get(MarkId(1)).expect("mark present").payload {
            MarkPayload::Rect(r) => r.rect.x0,
            _ => panic!("rect payload"),
        }
    }

    #[test]
    fn enter_fades_in_and_completes() {
        let mut scene = Scene::new();
        let mut surface = SvgSurface::new();
        let mut animator = Animator::new();
        let diffs = scene.tick(vec![bar(0.0)]);
        let handle = animator.start("bar", Duration::from_millis(300), &diffs, &mut surface);
        let opacity = surface.get(MarkId(1)).map(|m| m.payload.opacity());
        assert_eq!(opacity, Some(0.0), "first frame is transparent");

        animator.advance(Duration::from_millis(300), &mut surface);
        let opacity = surface.get(MarkId(1)).map(|m| m.payload.opacity());
        assert_eq!(opacity, Some(1.0), "last frame is opaque");
        assert_eq!(
            animator.take_ended(),
            vec![TransitionEnd {
                handle,
                name: "bar",
                outcome: TransitionOutcome::Completed
            }],
            "completion recorded once"
        );
        assert!(animator.is_idle(), "nothing left in flight");
    }

    #[test]
    fn same_name_interrupts_and_continues_from_current_state() {
        let mut scene = Scene::new();
        let mut surface = SvgSurface::new();
        let mut animator = Animator::new();
        let enter = scene.tick(vec![bar(0.0)]);
        animator.start("bar", Duration::ZERO, &enter, &mut surface);
        animator.take_ended();

        let first = scene.tick(vec![bar(100.0)]);
        let h1 = animator.start("bar", Duration::from_millis(100), &first, &mut surface);
        animator.advance(Duration::from_millis(50), &mut surface);
        let mid = x0(&surface);
        assert!(mid > 0.0 && mid < 100.0, "mid-flight position");

        let second = scene.tick(vec![bar(0.0)]);
        let h2 = animator.start("bar", Duration::from_millis(100), &second, &mut surface);
        let ended = animator.take_ended();
        assert_eq!(ended.len(), 1, "the first transition resolved");
        assert_eq!(ended[0].handle, h1, "it was the first one");
        assert_eq!(ended[0].outcome, TransitionOutcome::Cancelled, "as cancelled");
        assert!((x0(&surface) - mid).abs() < 1e-9, "no jump on interruption");

        animator.advance(Duration::from_millis(100), &mut surface);
        assert_eq!(x0(&surface), 0.0, "second transition reached its target");
        assert_eq!(animator.take_ended()[0].handle, h2, "second completes");
    }

    #[test]
    fn exit_is_removed_at_end() {
        let mut scene = Scene::new();
        let mut surface = SvgSurface::new();
        let mut animator = Animator::new();
        surface.apply_diffs(&scene.tick(vec![bar(0.0)]));
        let exit = scene.tick(vec![]);
        animator.start("bar", Duration::from_millis(10), &exit, &mut surface);
        assert_eq!(surface.len(), 1, "still fading out");
        animator.advance(Duration::from_millis(10), &mut surface);
        assert!(surface.is_empty(), "removed at the end");
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0, "starts at zero");
        assert_eq!(ease_cubic_in_out(1.0), 1.0, "ends at one");
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12, "symmetric midpoint");
    }
}
