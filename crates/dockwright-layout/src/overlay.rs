#![forbid(unsafe_code)]

//! Overlay drawing: divider grips and the drop-zone highlight.
//!
//! The dock never talks to a renderer directly. It emits rectangles and
//! polylines tagged with a semantic [`DockInk`] through [`DockCanvas`], and
//! the host maps inks to its own colors.

use dockwright_core::geometry::{Point, Rect};

use crate::side::Side;

/// Length of the grip line drawn in the middle of a divider.
pub const DIVIDER_GRIP_LENGTH: f32 = 24.0;

/// Semantic paint for overlay primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockInk {
    DividerGrip,
    DropHighlight,
}

/// Cursor hint for the host's pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockCursor {
    /// Over a left/right divider: drag moves along x.
    ResizeHorizontal,
    /// Over a top/bottom divider: drag moves along y.
    ResizeVertical,
}

impl DockCursor {
    #[must_use]
    pub const fn for_axis(horizontal: bool) -> Self {
        if horizontal {
            Self::ResizeHorizontal
        } else {
            Self::ResizeVertical
        }
    }
}

/// Drawing surface supplied by the host.
pub trait DockCanvas {
    fn draw_rect(&mut self, rect: Rect, ink: DockInk);
    fn draw_path(&mut self, points: &[Point], ink: DockInk);
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DockDrawCommand {
    Rect { rect: Rect, ink: DockInk },
    Path { points: Vec<Point>, ink: DockInk },
}

/// Records calls for hosts that batch drawing (and for tests).
impl DockCanvas for Vec<DockDrawCommand> {
    fn draw_rect(&mut self, rect: Rect, ink: DockInk) {
        self.push(DockDrawCommand::Rect { rect, ink });
    }

    fn draw_path(&mut self, points: &[Point], ink: DockInk) {
        self.push(DockDrawCommand::Path {
            points: points.to_vec(),
            ink,
        });
    }
}

/// Half of `rect` on `side`: where a drop on that side would land.
#[must_use]
pub fn drop_highlight_rect(rect: Rect, side: Side) -> Rect {
    let half_width = rect.width / 2.0;
    let half_height = rect.height / 2.0;
    match side {
        Side::Left => Rect::new(rect.x, rect.y, half_width, rect.height),
        Side::Right => Rect::new(rect.x + rect.width - half_width, rect.y, half_width, rect.height),
        Side::Top => Rect::new(rect.x, rect.y, rect.width, half_height),
        Side::Bottom => Rect::new(rect.x, rect.y + rect.height - half_height, rect.width, half_height),
    }
}

/// Short line centered in a divider gap, running along the divider.
#[must_use]
pub fn divider_grip_path(divider: Rect, horizontal: bool) -> [Point; 2] {
    let center = divider.center();
    if horizontal {
        let half = divider.height.min(DIVIDER_GRIP_LENGTH) / 2.0;
        [
            Point::new(center.x, center.y - half),
            Point::new(center.x, center.y + half),
        ]
    } else {
        let half = divider.width.min(DIVIDER_GRIP_LENGTH) / 2.0;
        [
            Point::new(center.x - half, center.y),
            Point::new(center.x + half, center.y),
        ]
    }
}
