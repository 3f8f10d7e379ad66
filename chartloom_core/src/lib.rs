// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained, keyed drawing primitives for chartloom.
//!
//! This crate is the small runtime underneath the chart engine:
//! - **Marks** are stable-identity drawing primitives (rects, text, paths).
//! - A [`Scene`] reconciles each new set of marks against the previous one and
//!   reports [`MarkDiff`]s (enter/update/exit), keyed by [`MarkId`].
//! - A [`Surface`] consumes those diffs; [`SvgSurface`] is a retained SVG document.
//! - An [`Animator`] turns diffs into time-bounded, named, interruptible transitions.
//!
//! Identity comes from an [`IdArena`] owned by whoever renders (one per chart), never from
//! process-global counters.

#![no_std]

extern crate alloc;

mod animate;
mod ids;
mod mark;
mod scene;
mod surface;
mod svg;

pub use animate::{Animator, TransitionEnd, TransitionHandle, TransitionOutcome, ease_cubic_in_out};
pub use ids::{IdArena, LayerId, MarkId};
pub use mark::{
    Mark, MarkBuilder, MarkKind, MarkPayload, PathPayload, RectPayload, TextAnchor, TextBaseline,
    TextPayload,
};
pub use scene::{MarkDiff, Scene};
pub use surface::Surface;
pub use svg::SvgSurface;
