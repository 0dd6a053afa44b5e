#![forbid(unsafe_code)]

//! Dock sides, slot ordering, and the drop quadrant test.

use dockwright_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Edge of a node that an incoming container docks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];

    /// Whether docking on this side produces a left/right (horizontal) split.
    #[must_use]
    pub const fn horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// `(primary, secondary)` slot indices for this side.
    ///
    /// The primary slot is the one nearer the origin edge on the side's axis:
    /// Top/Left dock into slot 0, Bottom/Right into slot 1.
    #[must_use]
    pub const fn dock_order(self) -> (usize, usize) {
        match self {
            Self::Top | Self::Left => (0, 1),
            Self::Bottom | Self::Right => (1, 0),
        }
    }

    /// Resolve the side of `rect` that `point` is proportionally closest to.
    ///
    /// Horizontal distance is measured to the nearer of the left/right edges
    /// and divided by the width; vertical distance likewise against the
    /// height. An exact tie goes to the left/right edges, and within one axis
    /// to the origin edge (Left over Right, Top over Bottom).
    #[must_use]
    pub fn from_point(rect: Rect, point: Point) -> Self {
        let left = point.x - rect.x;
        let right = rect.right() - point.x;
        let top = point.y - rect.y;
        let bottom = rect.bottom() - point.y;

        let horizontal = proportion(left.min(right), rect.width);
        let vertical = proportion(top.min(bottom), rect.height);

        if horizontal <= vertical {
            if left <= right { Self::Left } else { Self::Right }
        } else if top <= bottom {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

fn proportion(distance: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    (distance / extent).max(0.0)
}
