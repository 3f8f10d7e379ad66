// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart lifecycle and interaction events.
//!
//! Listeners never get a handle to the chart. Instead they receive a [`Commands`] queue and
//! record follow-up work there; the chart drains the queue once the current cycle is over. A
//! listener reacting to `RenderFinished` by changing data therefore schedules a new cycle
//! instead of re-entering the one that is finishing.

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::component::HitPoint;
use crate::data::ChartData;
use crate::model::Mutation;
use crate::options::{ChartOptions, ToolbarControl};
use crate::tooltip::TooltipPosition;

/// Something that happened to a chart.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    /// Data was replaced.
    DataUpdated,
    /// Options were replaced.
    OptionsUpdated,
    /// Every transition started by update cycle `cycle` has resolved.
    RenderFinished {
        /// Update cycle number, starting at 1.
        cycle: u64,
    },
    /// The chart was given a new size.
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// A legend item was clicked.
    LegendItemClick {
        /// Group name.
        group: String,
    },
    /// The pointer entered a legend item.
    LegendItemHover {
        /// Group name.
        group: String,
    },
    /// The pointer left a legend item.
    LegendItemMouseout {
        /// Group name.
        group: String,
    },
    /// A tooltip appeared.
    TooltipShow {
        /// Tooltip HTML.
        html: String,
        /// Panel placement, when the chart draws the panel itself.
        position: Option<TooltipPosition>,
    },
    /// The tooltip content or position changed while shown.
    TooltipMove {
        /// Tooltip HTML.
        html: String,
        /// Panel placement, when the chart draws the panel itself.
        position: Option<TooltipPosition>,
    },
    /// The tooltip was hidden.
    TooltipHide,
    /// Records came under the pointer.
    PointHover {
        /// The records.
        points: SmallVec<[HitPoint; 4]>,
    },
    /// Records are no longer under the pointer.
    PointMouseout {
        /// The records.
        points: SmallVec<[HitPoint; 4]>,
    },
    /// A toolbar button was clicked.
    ToolbarControlClick {
        /// The control.
        control: ToolbarControl,
    },
    /// The zoom domain changed.
    ZoomDomainChanged {
        /// New domain, `None` when reset.
        domain: Option<(f64, f64)>,
    },
}

impl ChartEvent {
    /// Kebab-case event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DataUpdated => "data-update",
            Self::OptionsUpdated => "options-update",
            Self::RenderFinished { .. } => "render-finished",
            Self::Resize { .. } => "chart-resize",
            Self::LegendItemClick { .. } => "legend-item-onclick",
            Self::LegendItemHover { .. } => "legend-item-onhover",
            Self::LegendItemMouseout { .. } => "legend-item-onmouseout",
            Self::TooltipShow { .. } => "show-tooltip",
            Self::TooltipMove { .. } => "move-tooltip",
            Self::TooltipHide => "hide-tooltip",
            Self::PointHover { .. } => "point-mouseover",
            Self::PointMouseout { .. } => "point-mouseout",
            Self::ToolbarControlClick { .. } => "toolbar-control-click",
            Self::ZoomDomainChanged { .. } => "zoom-domain-change",
        }
    }
}

/// Follow-up work requested by a listener.
#[derive(Clone, Debug)]
pub enum Command {
    /// Applies a model mutation and runs an update cycle.
    Mutate(Mutation),
    /// Resizes the chart.
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
}

/// Queue of [`Command`]s collected while dispatching events.
#[derive(Debug, Default)]
pub struct Commands {
    queue: VecDeque<Command>,
}

impl Commands {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a command.
    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Queues a data replacement.
    pub fn set_data(&mut self, data: ChartData) {
        self.push(Command::Mutate(Mutation::SetData(data)));
    }

    /// Queues an options replacement.
    pub fn set_options(&mut self, options: ChartOptions) {
        self.push(Command::Mutate(Mutation::SetOptions(options)));
    }

    /// Queues a legend toggle.
    pub fn toggle_group(&mut self, group: impl Into<String>) {
        self.push(Command::Mutate(Mutation::ToggleGroup(group.into())));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes and returns every queued command, oldest first.
    pub fn drain(&mut self) -> Vec<Command> {
        self.queue.drain(..).collect()
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(&ChartEvent, &mut Commands)>;

/// Listeners of one chart, called in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ChartEvent, &mut Commands) + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener.
    pub fn emit(&mut self, event: &ChartEvent, commands: &mut Commands) {
        tracing::trace!(event = event.name(), listeners = self.listeners.len(), "emit");
        for (_, listener) in &mut self.listeners {
            listener(event, commands);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    #[test]
    fn listeners_run_in_order_and_can_leave() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let first = {
            let log = Rc::clone(&log);
            bus.subscribe(move |e, _| log.borrow_mut().push((1, e.name())))
        };
        {
            let log = Rc::clone(&log);
            bus.subscribe(move |e, _| log.borrow_mut().push((2, e.name())));
        }
        let mut commands = Commands::new();
        bus.emit(&ChartEvent::DataUpdated, &mut commands);
        assert!(bus.unsubscribe(first), "was subscribed");
        assert!(!bus.unsubscribe(first), "already gone");
        bus.emit(&ChartEvent::TooltipHide, &mut commands);
        assert_eq!(
            *log.borrow(),
            [(1, "data-update"), (2, "data-update"), (2, "hide-tooltip")],
            "subscription order, then only the remaining listener"
        );
    }

    #[test]
    fn listeners_queue_commands_instead_of_reentering() {
        let mut bus = EventBus::new();
        bus.subscribe(|e, commands| {
            if let ChartEvent::RenderFinished { cycle: 1 } = e {
                commands.toggle_group("A");
            }
        });
        let mut commands = Commands::new();
        bus.emit(&ChartEvent::RenderFinished { cycle: 1 }, &mut commands);
        bus.emit(&ChartEvent::RenderFinished { cycle: 2 }, &mut commands);
        let drained = commands.drain();
        assert_eq!(drained.len(), 1, "one follow-up");
        assert!(
            matches!(&drained[0], Command::Mutate(Mutation::ToggleGroup(g)) if g == "A"),
            "toggle queued"
        );
        assert!(commands.is_empty(), "drained");
    }
}
