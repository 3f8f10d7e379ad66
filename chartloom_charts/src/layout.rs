// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical space partitioning.
//!
//! A [`LayoutNode`] splits its rectangle along one direction among its children. Each child
//! declares how it grows along that direction:
//! - **Fixed** children take their size hint,
//! - **Preferred** children are measured and take their natural size,
//! - **Stretch** children share whatever is left equally.
//!
//! Sizes are percentages of the parent's extent along the split direction, so a layout can be
//! reused at any resolution. Partitioning runs in two passes: a provisional split (fixed sizes
//! plus an equal share for everything else) that gives preferred children something to measure
//! against, then the final split once preferred sizes are known.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

/// A width/height pair used by layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Index of a component in the chart's component list.
pub type ComponentId = usize;

/// Split direction of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    /// Left to right.
    #[default]
    Row,
    /// Top to bottom.
    Column,
    /// Right to left.
    RowReverse,
    /// Bottom to top.
    ColumnReverse,
}

impl LayoutDirection {
    /// Returns `true` for row directions.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Returns `true` for reversed directions.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// How a child grows along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Growth {
    /// Takes its size hint.
    Fixed,
    /// Takes its measured size.
    Preferred,
    /// Shares the remaining space.
    #[default]
    Stretch,
}

/// Growth along both axes. Only the axis matching the parent's direction is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Horizontal growth.
    pub x: Growth,
    /// Vertical growth.
    pub y: Growth,
}

impl GrowthPolicy {
    /// Same growth on both axes.
    pub const fn both(growth: Growth) -> Self {
        Self {
            x: growth,
            y: growth,
        }
    }
}

/// A size hint for fixed children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutSize {
    /// Percentage of the parent's extent.
    Percent(f64),
    /// Absolute size in chart units.
    Pixels(f64),
}

/// What a child region holds.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutContent {
    /// Components drawn into the same region.
    Components(SmallVec<[ComponentId; 4]>),
    /// A nested node.
    Node(LayoutNode),
}

/// One child of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutChild {
    /// Name of the region (for diagnostics and lookups).
    pub id: &'static str,
    /// Region content.
    pub content: LayoutContent,
    /// Growth policy.
    pub growth: GrowthPolicy,
    /// Size hint for fixed growth.
    pub size: Option<LayoutSize>,
}

impl LayoutChild {
    /// A region holding components.
    pub fn components(
        id: &'static str,
        components: impl IntoIterator<Item = ComponentId>,
        growth: GrowthPolicy,
    ) -> Self {
        Self {
            id,
            content: LayoutContent::Components(components.into_iter().collect()),
            growth,
            size: None,
        }
    }

    /// A region holding a nested node.
    pub fn node(id: &'static str, node: LayoutNode, growth: GrowthPolicy) -> Self {
        Self {
            id,
            content: LayoutContent::Node(node),
            growth,
            size: None,
        }
    }

    /// An empty fixed-size gap.
    pub fn spacer(id: &'static str, size: LayoutSize) -> Self {
        Self {
            id,
            content: LayoutContent::Components(SmallVec::new()),
            growth: GrowthPolicy::both(Growth::Fixed),
            size: Some(size),
        }
    }
}

/// A layout node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutNode {
    /// Split direction.
    pub direction: LayoutDirection,
    /// Children, in declaration order.
    pub children: Vec<LayoutChild>,
}

/// Final size of one child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildSize {
    /// Region name.
    pub id: &'static str,
    /// Percentage of the parent's extent along its direction.
    pub percent: f64,
    /// Final rectangle.
    pub rect: Rect,
}

/// Output of a layout run.
#[derive(Clone, Debug, Default)]
pub struct LayoutResult {
    regions: HashMap<ComponentId, Rect>,
    nodes: Vec<(&'static str, SmallVec<[ChildSize; 4]>)>,
}

impl LayoutResult {
    /// Region of `component`, if it was laid out.
    pub fn region(&self, component: ComponentId) -> Option<Rect> {
        self.regions.get(&component).copied()
    }

    /// Child sizes of the node reached through the child named `id` (`"root"` for the root).
    pub fn node_sizes(&self, id: &str) -> Option<&[ChildSize]> {
        self.nodes
            .iter()
            .find(|(n, _)| *n == id)
            .map(|(_, sizes)| sizes.as_slice())
    }

    /// Rectangle of the child region named `id`.
    pub fn child_rect(&self, id: &str) -> Option<Rect> {
        self.nodes
            .iter()
            .flat_map(|(_, sizes)| sizes.iter())
            .find(|c| c.id == id)
            .map(|c| c.rect)
    }

    /// All nodes and their child sizes, in visiting order.
    pub fn nodes(&self) -> impl Iterator<Item = (&'static str, &[ChildSize])> {
        self.nodes.iter().map(|(n, s)| (*n, s.as_slice()))
    }
}

impl LayoutNode {
    /// A node with the given direction and children.
    pub fn new(direction: LayoutDirection, children: Vec<LayoutChild>) -> Self {
        Self {
            direction,
            children,
        }
    }

    /// Partitions `rect` among the tree.
    ///
    /// `measure(component, available)` reports the natural size of a preferred component, or
    /// `None` if the component cannot be measured.
    pub fn layout(
        &self,
        rect: Rect,
        measure: &mut dyn FnMut(ComponentId, Size) -> Option<Size>,
    ) -> LayoutResult {
        let mut result = LayoutResult::default();
        self.layout_into("root", rect, measure, &mut result);
        result
    }

    fn layout_into(
        &self,
        name: &'static str,
        rect: Rect,
        measure: &mut dyn FnMut(ComponentId, Size) -> Option<Size>,
        result: &mut LayoutResult,
    ) {
        if !(rect.width() > 0.0 && rect.height() > 0.0) {
            tracing::warn!(
                node = name,
                width = rect.width(),
                height = rect.height(),
                "layout container has no area; skipping"
            );
            return;
        }
        let horizontal = self.direction.is_horizontal();
        let extent = if horizontal {
            rect.width()
        } else {
            rect.height()
        };
        let mut order: SmallVec<[&LayoutChild; 8]> = self.children.iter().collect();
        if self.direction.is_reversed() {
            order.reverse();
        }
        let growth = |c: &LayoutChild| if horizontal { c.growth.x } else { c.growth.y };

        // Pass 1: fixed sizes and a provisional share for everything else.
        let mut percents: SmallVec<[f64; 8]> = SmallVec::new();
        let mut fixed_total = 0.0;
        let mut flexible = 0_usize;
        for child in &order {
            let pct = match growth(child) {
                Growth::Fixed => {
                    let pct = match child.size {
                        Some(LayoutSize::Percent(p)) => p,
                        Some(LayoutSize::Pixels(px)) => px / extent * 100.0,
                        None => 0.0,
                    }
                    .max(0.0);
                    fixed_total += pct;
                    pct
                }
                Growth::Preferred | Growth::Stretch => {
                    flexible += 1;
                    0.0
                }
            };
            percents.push(pct);
        }
        let provisional = if flexible == 0 {
            0.0
        } else {
            (100.0 - fixed_total).max(0.0) / flexible as f64
        };

        // Re-measure preferred children against their provisional region.
        for (i, child) in order.iter().enumerate() {
            if growth(child) != Growth::Preferred {
                continue;
            }
            let share = provisional / 100.0 * extent;
            let available = if horizontal {
                Size::new(share, rect.height())
            } else {
                Size::new(rect.width(), share)
            };
            percents[i] = match measure_content(&child.content, available, horizontal, measure) {
                Some(natural) => (natural / extent * 100.0).max(0.0),
                None => provisional,
            };
        }

        // Overflowing fixed + preferred sizes shrink proportionally.
        let claimed: f64 = percents.iter().sum();
        if claimed > 100.0 {
            tracing::debug!(node = name, claimed, "layout overflow; scaling children down");
            for pct in &mut percents {
                *pct *= 100.0 / claimed;
            }
        }

        // Stretch children split the rest.
        let stretch = order
            .iter()
            .filter(|c| growth(c) == Growth::Stretch)
            .count();
        if stretch > 0 {
            let rest = (100.0 - percents.iter().sum::<f64>()).max(0.0) / stretch as f64;
            for (i, child) in order.iter().enumerate() {
                if growth(child) == Growth::Stretch {
                    percents[i] = rest;
                }
            }
        }

        // Pass 2: final rectangles.
        let mut cursor = if horizontal { rect.x0 } else { rect.y0 };
        let mut sizes: SmallVec<[ChildSize; 4]> = SmallVec::new();
        let mut nested: SmallVec<[(&LayoutChild, Rect); 4]> = SmallVec::new();
        for (child, pct) in order.iter().zip(percents.iter()) {
            let len = pct / 100.0 * extent;
            let child_rect = if horizontal {
                Rect::new(cursor, rect.y0, cursor + len, rect.y1)
            } else {
                Rect::new(rect.x0, cursor, rect.x1, cursor + len)
            };
            cursor += len;
            sizes.push(ChildSize {
                id: child.id,
                percent: *pct,
                rect: child_rect,
            });
            nested.push((child, child_rect));
        }
        tracing::trace!(node = name, children = sizes.len(), "layout node arranged");
        result.nodes.push((name, sizes));

        for (child, child_rect) in nested {
            match &child.content {
                LayoutContent::Components(ids) => {
                    for id in ids {
                        result.regions.insert(*id, child_rect);
                    }
                }
                LayoutContent::Node(node) => {
                    node.layout_into(child.id, child_rect, measure, result);
                }
            }
        }
    }
}

/// Natural extent of `content` along the parent's direction.
fn measure_content(
    content: &LayoutContent,
    available: Size,
    horizontal: bool,
    measure: &mut dyn FnMut(ComponentId, Size) -> Option<Size>,
) -> Option<f64> {
    let along = |s: Size| if horizontal { s.width } else { s.height };
    match content {
        LayoutContent::Components(ids) => {
            let mut best: Option<f64> = None;
            for id in ids {
                let size = measure(*id, available)?;
                best = Some(best.map_or(along(size), |b: f64| b.max(along(size))));
            }
            best.or(Some(0.0))
        }
        LayoutContent::Node(node) => {
            let mut total = 0.0_f64;
            let stacked = node.direction.is_horizontal() == horizontal;
            for child in &node.children {
                let own = match (child.size, if horizontal { child.growth.x } else { child.growth.y }) {
                    (Some(LayoutSize::Pixels(px)), Growth::Fixed) if stacked => Some(px),
                    _ => measure_content(&child.content, available, horizontal, measure),
                };
                let own = own.unwrap_or(0.0);
                total = if stacked { total + own } else { total.max(own) };
            }
            Some(total)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    fn preferred_y() -> GrowthPolicy {
        GrowthPolicy {
            x: Growth::Stretch,
            y: Growth::Preferred,
        }
    }

    fn column() -> LayoutNode {
        LayoutNode::new(
            LayoutDirection::Column,
            vec![
                LayoutChild::components("title", [0], preferred_y()),
                LayoutChild::spacer("gap", LayoutSize::Pixels(10.0)),
                LayoutChild::components("graph", [1], GrowthPolicy::both(Growth::Stretch)),
                LayoutChild::components("legend", [2], preferred_y()),
            ],
        )
    }

    fn measure(id: ComponentId, available: Size) -> Option<Size> {
        match id {
            0 => Some(Size::new(available.width, 20.0)),
            2 => Some(Size::new(available.width, 30.0)),
            _ => None,
        }
    }

    #[test]
    fn sizes_sum_to_one_hundred() {
        let result = column().layout(Rect::new(0.0, 0.0, 400.0, 200.0), &mut measure);
        let sizes = result.node_sizes("root").expect("root laid out");
        let total: f64 = sizes.iter().map(|c| c.percent).sum();
        assert!((total - 100.0).abs() < 1e-9, "children fill the node");
        assert!(sizes.iter().all(|c| c.percent >= 0.0), "no negative sizes");
        assert_eq!(result.region(0), Some(Rect::new(0.0, 0.0, 400.0, 20.0)), "title measured");
        assert_eq!(result.region(1), Some(Rect::new(0.0, 30.0, 400.0, 170.0)), "graph stretched");
        assert_eq!(result.region(2), Some(Rect::new(0.0, 170.0, 400.0, 200.0)), "legend at the end");
    }

    #[test]
    fn reverse_flips_order_before_partitioning() {
        let mut node = column();
        node.direction = LayoutDirection::ColumnReverse;
        let result = node.layout(Rect::new(0.0, 0.0, 400.0, 200.0), &mut measure);
        assert_eq!(result.region(2), Some(Rect::new(0.0, 0.0, 400.0, 30.0)), "legend first");
        assert_eq!(result.region(0), Some(Rect::new(0.0, 180.0, 400.0, 200.0)), "title last");
    }

    #[test]
    fn overflow_scales_down() {
        let node = LayoutNode::new(
            LayoutDirection::Row,
            vec![
                LayoutChild::spacer("a", LayoutSize::Percent(80.0)),
                LayoutChild::spacer("b", LayoutSize::Percent(80.0)),
                LayoutChild::components("c", [1], GrowthPolicy::both(Growth::Stretch)),
            ],
        );
        let result = node.layout(Rect::new(0.0, 0.0, 100.0, 100.0), &mut |_, _| None);
        let sizes = result.node_sizes("root").expect("root laid out");
        assert!((sizes[0].percent - 50.0).abs() < 1e-9, "scaled to half");
        assert!(sizes[2].percent.abs() < 1e-9, "nothing left to stretch");
        let total: f64 = sizes.iter().map(|c| c.percent).sum();
        assert!((total - 100.0).abs() < 1e-9, "still sums to 100");
    }

    #[test]
    fn nested_nodes_measure_their_children() {
        let header = LayoutNode::new(
            LayoutDirection::Row,
            vec![
                LayoutChild::components("title", [0], GrowthPolicy::both(Growth::Stretch)),
                LayoutChild::components("toolbar", [2], GrowthPolicy::both(Growth::Preferred)),
            ],
        );
        let root = LayoutNode::new(
            LayoutDirection::Column,
            vec![
                LayoutChild::node("header", header, preferred_y()),
                LayoutChild::components("graph", [1], GrowthPolicy::both(Growth::Stretch)),
            ],
        );
        let result = root.layout(Rect::new(0.0, 0.0, 300.0, 300.0), &mut |id, avail| match id {
            0 => Some(Size::new(50.0, 20.0)),
            2 => Some(Size::new(60.0, 30.0)),
            _ => Some(avail),
        });
        assert_eq!(result.child_rect("header"), Some(Rect::new(0.0, 0.0, 300.0, 30.0)), "tallest child");
        assert_eq!(result.region(2), Some(Rect::new(240.0, 0.0, 300.0, 30.0)), "toolbar at its width");
        assert_eq!(result.region(0), Some(Rect::new(0.0, 0.0, 240.0, 30.0)), "title stretches");
    }

    #[test]
    fn zero_size_container_is_a_no_op() {
        let result = column().layout(Rect::new(0.0, 0.0, 0.0, 200.0), &mut measure);
        assert!(result.region(0).is_none(), "nothing laid out");
        assert!(result.node_sizes("root").is_none(), "no sizes recorded");
    }
}
