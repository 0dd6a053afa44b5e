#![forbid(unsafe_code)]

//! Leaf contracts for the dock tree.
//!
//! The tree never owns panels. It references containers by [`ContainerId`];
//! the containers themselves live in the [`Dock`](crate::dock::Dock)'s
//! collection and are reached through the [`DockContainer`] trait. Hosts
//! plug in their own tab-group widget, or use [`TabGroup`].

use dockwright_core::event::DockableId;
use dockwright_core::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Stable identifier for a container within one dock.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Lowest valid container ID.
    pub const MIN: Self = Self(1);

    /// Create a container ID, rejecting 0.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The next ID, saturating at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Anything placed in a tree slot: reports a preferred size and carries a
/// frame rectangle assigned by the layout pass.
pub trait DockLayoutNode {
    fn preferred_size(&self) -> Size;
    fn frame_rect(&self) -> Rect;
    fn set_frame_rect(&mut self, rect: Rect);
}

/// A tab group hosting one or more dockables.
pub trait DockContainer: DockLayoutNode {
    /// Create a container hosting a single dockable.
    fn with_dockable(dockable: DockableId) -> Self
    where
        Self: Sized;

    /// Hosted dockables in tab order.
    fn dockables(&self) -> &[DockableId];

    /// The dockable whose tab is showing.
    fn current_dockable(&self) -> Option<DockableId>;

    /// Insert `dockable` as a tab at `index` (clamped; `None` appends) and make
    /// it current.
    fn stack(&mut self, dockable: DockableId, index: Option<usize>);

    /// Evict one dockable. Returns `false` if it was not hosted here.
    fn close(&mut self, dockable: DockableId) -> bool;

    fn is_hidden(&self) -> bool;
    fn set_hidden(&mut self, hidden: bool);
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    /// Move keyboard focus into the current dockable.
    fn acquire_focus(&mut self);

    fn is_empty(&self) -> bool {
        self.dockables().is_empty()
    }

    fn hosts(&self, dockable: DockableId) -> bool {
        self.dockables().contains(&dockable)
    }
}

/// Default preferred size reported by an empty [`TabGroup`].
pub const TAB_GROUP_DEFAULT_PREFERRED: Size = Size::new(200.0, 150.0);

/// Minimal tab group: an ordered list of dockables plus the current tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabGroup {
    dockables: Vec<DockableId>,
    current: usize,
    frame: Rect,
    preferred: Size,
    hidden: bool,
    active: bool,
    focus_requests: u32,
}

impl TabGroup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dockables: Vec::new(),
            current: 0,
            frame: Rect::default(),
            preferred: TAB_GROUP_DEFAULT_PREFERRED,
            hidden: false,
            active: false,
            focus_requests: 0,
        }
    }

    #[must_use]
    pub fn with_preferred_size(mut self, preferred: Size) -> Self {
        self.preferred = preferred;
        self
    }

    /// Select the tab at `index`. Returns `false` when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.dockables.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Number of times focus was requested.
    #[must_use]
    pub const fn focus_requests(&self) -> u32 {
        self.focus_requests
    }
}

impl Default for TabGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl DockLayoutNode for TabGroup {
    fn preferred_size(&self) -> Size {
        self.preferred
    }

    fn frame_rect(&self) -> Rect {
        self.frame
    }

    fn set_frame_rect(&mut self, rect: Rect) {
        self.frame = rect;
    }
}

impl DockContainer for TabGroup {
    fn with_dockable(dockable: DockableId) -> Self {
        let mut group = Self::new();
        group.dockables.push(dockable);
        group
    }

    fn dockables(&self) -> &[DockableId] {
        &self.dockables
    }

    fn current_dockable(&self) -> Option<DockableId> {
        self.dockables.get(self.current).copied()
    }

    fn stack(&mut self, dockable: DockableId, index: Option<usize>) {
        if let Some(existing) = self.dockables.iter().position(|d| *d == dockable) {
            self.dockables.remove(existing);
        }
        let index = index.map_or(self.dockables.len(), |i| i.min(self.dockables.len()));
        self.dockables.insert(index, dockable);
        self.current = index;
    }

    fn close(&mut self, dockable: DockableId) -> bool {
        let Some(index) = self.dockables.iter().position(|d| *d == dockable) else {
            return false;
        };
        self.dockables.remove(index);
        if self.dockables.is_empty() {
            self.current = 0;
        } else if index < self.current || self.current >= self.dockables.len() {
            self.current = self.current.saturating_sub(1);
        }
        true
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn acquire_focus(&mut self) {
        self.focus_requests = self.focus_requests.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: u64) -> DockableId {
        DockableId::new(raw)
    }

    #[test]
    fn container_id_rejects_zero() {
        assert!(ContainerId::new(0).is_none());
        assert_eq!(ContainerId::new(4).map(ContainerId::get), Some(4));
        assert_eq!(ContainerId::MIN.next().get(), 2);
    }

    #[test]
    fn stack_inserts_and_selects() {
        let mut group = TabGroup::with_dockable(d(1));
        group.stack(d(2), None);
        group.stack(d(3), Some(0));
        assert_eq!(group.dockables(), &[d(3), d(1), d(2)]);
        assert_eq!(group.current_dockable(), Some(d(3)));

        // Restacking moves instead of duplicating.
        group.stack(d(2), Some(99));
        assert_eq!(group.dockables(), &[d(3), d(1), d(2)]);
        assert_eq!(group.current_dockable(), Some(d(2)));
    }

    #[test]
    fn close_keeps_current_tab_stable() {
        let mut group = TabGroup::with_dockable(d(1));
        group.stack(d(2), None);
        group.stack(d(3), None);
        assert!(group.select(2));

        assert!(group.close(d(1)));
        assert_eq!(group.current_dockable(), Some(d(3)));

        assert!(group.close(d(3)));
        assert_eq!(group.current_dockable(), Some(d(2)));

        assert!(!group.close(d(9)));
        assert!(group.close(d(2)));
        assert!(group.is_empty());
        assert_eq!(group.current_dockable(), None);
    }

    #[test]
    fn select_out_of_range_is_rejected() {
        let mut group = TabGroup::with_dockable(d(1));
        assert!(!group.select(1));
        assert!(group.select(0));
    }
}
