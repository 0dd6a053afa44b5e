#![forbid(unsafe_code)]

//! Pointer-gesture sessions owned by a dock.
//!
//! [`DividerDragMachine`] tracks one divider drag:
//!
//! ```text
//! Idle -> Pressed -> Dragging -> Idle
//!            \------> Idle (release/cancel before the threshold)
//! ```
//!
//! [`DropSession`] tracks the hover target of an in-flight drag-and-drop so
//! the overlay can highlight it and the drop can commit it.

use std::fmt;

use dockwright_core::event::DockableId;
use dockwright_core::geometry::Point;
use serde::{Deserialize, Serialize};

use crate::side::Side;
use crate::tree::{DockNode, LayoutId};

/// Default pointer travel before a pressed divider starts dragging.
pub const DIVIDER_DRAG_DEFAULT_THRESHOLD: f32 = 4.0;

/// Divider drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DividerDragState {
    #[default]
    Idle,
    Pressed {
        layout: LayoutId,
        horizontal: bool,
        press: Point,
        initial: f32,
    },
    Dragging {
        layout: LayoutId,
        horizontal: bool,
        press: Point,
        initial: f32,
        current: Point,
    },
}

impl DividerDragState {
    /// The layout whose divider is pressed or dragged.
    #[must_use]
    pub const fn layout(&self) -> Option<LayoutId> {
        match self {
            Self::Idle => None,
            Self::Pressed { layout, .. } | Self::Dragging { layout, .. } => Some(*layout),
        }
    }

    /// Axis captured at press time.
    #[must_use]
    pub const fn horizontal(&self) -> Option<bool> {
        match self {
            Self::Idle => None,
            Self::Pressed { horizontal, .. } | Self::Dragging { horizontal, .. } => {
                Some(*horizontal)
            }
        }
    }
}

/// Why an event left the machine unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerDragNoopReason {
    IdleWithoutPress,
    AlreadyPressed,
    ThresholdNotReached,
}

/// Effect emitted by one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DividerDragEffect {
    Pressed {
        layout: LayoutId,
        press: Point,
    },
    /// The threshold was crossed; `position` is the divider to apply.
    DragStarted {
        layout: LayoutId,
        position: f32,
    },
    DragUpdated {
        layout: LayoutId,
        position: f32,
    },
    Released {
        layout: LayoutId,
        dragged: bool,
    },
    /// `restore` is the divider value captured at press time.
    Canceled {
        layout: LayoutId,
        restore: f32,
    },
    Noop {
        reason: DividerDragNoopReason,
    },
}

impl DividerDragEffect {
    /// Divider position this step asks the dock to apply, if any.
    #[must_use]
    pub const fn position(&self) -> Option<(LayoutId, f32)> {
        match *self {
            Self::DragStarted { layout, position } | Self::DragUpdated { layout, position } => {
                Some((layout, position))
            }
            Self::Canceled { layout, restore } => Some((layout, restore)),
            _ => None,
        }
    }
}

/// One state-machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerDragTransition {
    pub transition_id: u64,
    pub from: DividerDragState,
    pub to: DividerDragState,
    pub effect: DividerDragEffect,
}

/// Lifecycle machine for divider drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerDragMachine {
    state: DividerDragState,
    drag_threshold: f32,
    transition_counter: u64,
}

impl Default for DividerDragMachine {
    fn default() -> Self {
        Self {
            state: DividerDragState::Idle,
            drag_threshold: DIVIDER_DRAG_DEFAULT_THRESHOLD,
            transition_counter: 0,
        }
    }
}

impl DividerDragMachine {
    /// Construct a machine with an explicit drag-start threshold.
    pub fn new(drag_threshold: f32) -> Result<Self, DividerDragError> {
        if !drag_threshold.is_finite() || drag_threshold < 0.0 {
            return Err(DividerDragError::InvalidDragThreshold {
                threshold: drag_threshold,
            });
        }
        Ok(Self {
            drag_threshold,
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn state(&self) -> DividerDragState {
        self.state
    }

    #[must_use]
    pub const fn drag_threshold(&self) -> f32 {
        self.drag_threshold
    }

    /// Whether the machine is Pressed or Dragging.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DividerDragState::Idle)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DividerDragState::Dragging { .. })
    }

    /// Press on the divider of `layout`, whose current position is `initial`.
    pub fn press(
        &mut self,
        layout: LayoutId,
        horizontal: bool,
        press: Point,
        initial: f32,
    ) -> DividerDragTransition {
        let from = self.state;
        if self.is_active() {
            return self.transition(
                from,
                DividerDragEffect::Noop {
                    reason: DividerDragNoopReason::AlreadyPressed,
                },
            );
        }
        self.state = DividerDragState::Pressed {
            layout,
            horizontal,
            press,
            initial,
        };
        self.transition(from, DividerDragEffect::Pressed { layout, press })
    }

    /// Pointer moved to `current`.
    pub fn drag(&mut self, current: Point) -> DividerDragTransition {
        let from = self.state;
        let effect = match self.state {
            DividerDragState::Idle => DividerDragEffect::Noop {
                reason: DividerDragNoopReason::IdleWithoutPress,
            },
            DividerDragState::Pressed {
                layout,
                horizontal,
                press,
                initial,
            } => {
                if crossed_drag_threshold(press, current, self.drag_threshold) {
                    self.state = DividerDragState::Dragging {
                        layout,
                        horizontal,
                        press,
                        initial,
                        current,
                    };
                    DividerDragEffect::DragStarted {
                        layout,
                        position: dragged_position(horizontal, press, initial, current),
                    }
                } else {
                    DividerDragEffect::Noop {
                        reason: DividerDragNoopReason::ThresholdNotReached,
                    }
                }
            }
            DividerDragState::Dragging {
                layout,
                horizontal,
                press,
                initial,
                ..
            } => {
                self.state = DividerDragState::Dragging {
                    layout,
                    horizontal,
                    press,
                    initial,
                    current,
                };
                DividerDragEffect::DragUpdated {
                    layout,
                    position: dragged_position(horizontal, press, initial, current),
                }
            }
        };
        self.transition(from, effect)
    }

    /// Pointer released.
    pub fn release(&mut self) -> DividerDragTransition {
        let from = self.state;
        let effect = match self.state {
            DividerDragState::Idle => DividerDragEffect::Noop {
                reason: DividerDragNoopReason::IdleWithoutPress,
            },
            DividerDragState::Pressed { layout, .. } => DividerDragEffect::Released {
                layout,
                dragged: false,
            },
            DividerDragState::Dragging { layout, .. } => DividerDragEffect::Released {
                layout,
                dragged: true,
            },
        };
        self.state = DividerDragState::Idle;
        self.transition(from, effect)
    }

    /// Abort the gesture, returning the press-time divider value to restore.
    ///
    /// `None` when already idle.
    pub fn cancel(&mut self) -> Option<DividerDragTransition> {
        let from = self.state;
        match from {
            DividerDragState::Idle => None,
            DividerDragState::Pressed {
                layout, initial, ..
            }
            | DividerDragState::Dragging {
                layout, initial, ..
            } => {
                self.state = DividerDragState::Idle;
                Some(self.transition(
                    from,
                    DividerDragEffect::Canceled {
                        layout,
                        restore: initial,
                    },
                ))
            }
        }
    }

    fn transition(
        &mut self,
        from: DividerDragState,
        effect: DividerDragEffect,
    ) -> DividerDragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DividerDragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        }
    }
}

/// Divider drag configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DividerDragError {
    InvalidDragThreshold { threshold: f32 },
}

impl fmt::Display for DividerDragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDragThreshold { threshold } => {
                write!(f, "drag threshold must be finite and >= 0 (got {threshold})")
            }
        }
    }
}

impl std::error::Error for DividerDragError {}

fn crossed_drag_threshold(press: Point, current: Point, threshold: f32) -> bool {
    press.distance(current) > threshold
}

fn dragged_position(horizontal: bool, press: Point, initial: f32, current: Point) -> f32 {
    let delta = if horizontal {
        press.x - current.x
    } else {
        press.y - current.y
    };
    initial - delta
}

/// Drag-and-drop hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropState {
    #[default]
    Idle,
    DragOver {
        dockable: DockableId,
        hover: DockNode,
        side: Side,
    },
}

/// Tracks where a dragged dockable would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropSession {
    state: DropState,
}

impl DropSession {
    #[must_use]
    pub const fn state(&self) -> DropState {
        self.state
    }

    /// Current `(dockable, hover, side)` while a drag is over the dock.
    #[must_use]
    pub const fn target(&self) -> Option<(DockableId, DockNode, Side)> {
        match self.state {
            DropState::Idle => None,
            DropState::DragOver {
                dockable,
                hover,
                side,
            } => Some((dockable, hover, side)),
        }
    }

    /// Record the hover target. Returns whether it changed.
    pub fn hover(&mut self, dockable: DockableId, hover: DockNode, side: Side) -> bool {
        let next = DropState::DragOver {
            dockable,
            hover,
            side,
        };
        let changed = self.state != next;
        self.state = next;
        changed
    }

    /// Return to Idle. Returns whether a hover target was cleared.
    pub fn clear(&mut self) -> bool {
        let changed = self.state != DropState::Idle;
        self.state = DropState::Idle;
        changed
    }
}
