#![forbid(unsafe_code)]

//! The dock: owns the layout tree, the containers it references, and the
//! pointer sessions that mutate them.
//!
//! Every mutation re-runs layout against the last frame passed to
//! [`Dock::layout`] and asks the listener for a redraw. Operations are total:
//! unknown dockables, containers, or stale nodes make them return `false`
//! without touching state.
//!
//! # Re-docking
//!
//! Moving a dockable that is the only tab of its container moves the
//! container itself. Pulling it out of the tree can collapse layouts,
//! including the one the caller targeted (a root absorbing its last split
//! frees that split's id). The target's ancestor chain is captured first and
//! the nearest member still present in the tree is used, falling back to the
//! root.

use std::collections::BTreeMap;

use dockwright_core::event::{DockableId, DragData, DragPayload, PointerButton};
use dockwright_core::geometry::{Point, Rect, Size};
use rustc_hash::FxHashMap;

use crate::config::{DockConfig, DockConfigError};
use crate::container::{ContainerId, DockContainer, TabGroup};
use crate::keys::{DragKey, DragKeyGenerator};
use crate::overlay::{
    DockCanvas, DockCursor, DockInk, divider_grip_path, drop_highlight_rect,
};
use crate::session::{DividerDragMachine, DividerDragState, DropSession, DropState};
use crate::side::Side;
use crate::tree::{DockNode, DockTree, DockTreeError, LayoutId};

/// Host notifications. Every method defaults to doing nothing.
pub trait DockListener {
    /// `dockable` now lives in `container`.
    fn on_dockable_moved(&mut self, _dockable: DockableId, _container: ContainerId) {}

    /// A divider moved; `position` is the resolved (clamped) value.
    fn on_divider_changed(&mut self, _layout: LayoutId, _position: f32) {}

    /// `container` lost its last dockable and was removed.
    fn on_container_closed(&mut self, _container: ContainerId) {}

    fn on_maximize_changed(&mut self, _maximized: Option<ContainerId>) {}

    /// Frames or overlay state changed.
    fn request_redraw(&mut self) {}
}

impl DockListener for () {}

/// Docking layout engine.
#[derive(Debug)]
pub struct Dock<C = TabGroup, L = ()> {
    config: DockConfig,
    tree: DockTree,
    containers: BTreeMap<ContainerId, C>,
    index: FxHashMap<DockableId, ContainerId>,
    next_container: ContainerId,
    maximized: Option<ContainerId>,
    active: Option<ContainerId>,
    drag_key: DragKey,
    divider_drag: DividerDragMachine,
    pressed_divider: f32,
    drop: DropSession,
    frame: Rect,
    listener: L,
}

impl<C: DockContainer, L: DockListener> Dock<C, L> {
    /// Create an empty dock. The configuration is validated first.
    pub fn new(
        config: DockConfig,
        keys: &DragKeyGenerator,
        listener: L,
    ) -> Result<Self, DockConfigError> {
        config.validate()?;
        let divider_drag = DividerDragMachine::new(config.drag_threshold).map_err(|err| {
            DockConfigError::Validation(vec![err.to_string()])
        })?;
        Ok(Self {
            tree: DockTree::new(config.divider_thickness),
            containers: BTreeMap::new(),
            index: FxHashMap::default(),
            next_container: ContainerId::MIN,
            maximized: None,
            active: None,
            drag_key: keys.next_key(),
            divider_drag,
            pressed_divider: 0.0,
            drop: DropSession::default(),
            frame: Rect::default(),
            listener,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &DockConfig {
        &self.config
    }

    #[must_use]
    pub const fn tree(&self) -> &DockTree {
        &self.tree
    }

    /// Every container, keyed by id.
    #[must_use]
    pub const fn containers(&self) -> &BTreeMap<ContainerId, C> {
        &self.containers
    }

    #[must_use]
    pub fn container(&self, id: ContainerId) -> Option<&C> {
        self.containers.get(&id)
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut C> {
        self.containers.get_mut(&id)
    }

    /// The container hosting `dockable`.
    #[must_use]
    pub fn container_of(&self, dockable: DockableId) -> Option<ContainerId> {
        self.index.get(&dockable).copied()
    }

    /// Number of docked dockables.
    #[must_use]
    pub fn dockable_count(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub const fn maximized(&self) -> Option<ContainerId> {
        self.maximized
    }

    #[must_use]
    pub const fn active(&self) -> Option<ContainerId> {
        self.active
    }

    #[must_use]
    pub const fn drag_key(&self) -> &DragKey {
        &self.drag_key
    }

    /// Frame last passed to [`Dock::layout`], before insets.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    #[must_use]
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    #[must_use]
    pub const fn divider_drag_state(&self) -> DividerDragState {
        self.divider_drag.state()
    }

    #[must_use]
    pub const fn drop_state(&self) -> DropState {
        self.drop.state()
    }

    /// Dock `dockable` against `target` on `side`. `None` targets the root.
    ///
    /// Dockables not yet in the dock get a new container. Returns `false`
    /// when the target is not in the tree, or when a dockable that is the
    /// only tab of its container is docked onto that same container.
    pub fn dock_to(&mut self, dockable: DockableId, target: Option<DockNode>, side: Side) -> bool {
        let target = target.unwrap_or(DockNode::Split(self.tree.root()));
        if !self.tree.contains(target) {
            return false;
        }
        let previous = self.index.get(&dockable).copied();
        let sole = previous.filter(|id| self.is_sole_occupant(*id, dockable));
        if sole.is_some_and(|own| target == DockNode::Leaf(own)) {
            return false;
        }

        #[cfg(feature = "tracing")]
        self.trace_mutation("dock_to");

        let (container, target) = match (previous, sole) {
            (_, Some(own)) => {
                let owner = self.tree.find_layout(own);
                if owner.is_some() && owner == self.tree.target_layout(target) {
                    (own, target)
                } else {
                    let chain = self.tree.ancestors(target);
                    let _ = self.tree.remove(own);
                    let root = DockNode::Split(self.tree.root());
                    let revalidated = chain
                        .into_iter()
                        .find(|node| self.tree.contains(*node))
                        .unwrap_or(root);
                    (own, revalidated)
                }
            }
            (Some(shared), None) => {
                if let Some(container) = self.containers.get_mut(&shared) {
                    let _ = container.close(dockable);
                }
                (self.insert_container(C::with_dockable(dockable)), target)
            }
            (None, None) => (self.insert_container(C::with_dockable(dockable)), target),
        };

        if !self.tree.dock_to(container, Some(target), side) {
            let _ = self.tree.dock_to(container, None, side);
        }
        let _ = self.index.insert(dockable, container);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dockable = dockable.get(),
            container = container.get(),
            ?side,
            "dockable docked"
        );

        self.listener.on_dockable_moved(dockable, container);
        self.relayout();
        true
    }

    /// Tab `dockable` into `container` at `index` (`None` appends).
    ///
    /// A dockable hosted elsewhere is detached first; its old container
    /// closes if that empties it.
    pub fn stack(&mut self, dockable: DockableId, container: ContainerId, index: Option<usize>) -> bool {
        if !self.containers.contains_key(&container) {
            return false;
        }

        #[cfg(feature = "tracing")]
        self.trace_mutation("stack");

        if self.index.get(&dockable) != Some(&container) {
            let _ = self.detach(dockable);
        }
        if let Some(target) = self.containers.get_mut(&container) {
            target.stack(dockable, index);
        }
        let _ = self.index.insert(dockable, container);
        self.listener.on_dockable_moved(dockable, container);
        self.relayout();
        true
    }

    /// Remove `dockable`, closing its container if that empties it.
    pub fn close(&mut self, dockable: DockableId) -> bool {
        if !self.index.contains_key(&dockable) {
            return false;
        }

        #[cfg(feature = "tracing")]
        self.trace_mutation("close");

        let _ = self.detach(dockable);
        self.relayout();
        true
    }

    /// Show only `container`, hiding every other one.
    pub fn maximize(&mut self, container: ContainerId) -> bool {
        if self.maximized == Some(container) || self.tree.find_layout(container).is_none() {
            return false;
        }

        #[cfg(feature = "tracing")]
        self.trace_mutation("maximize");

        self.cancel_divider_drag();
        self.maximized = Some(container);
        self.listener.on_maximize_changed(self.maximized);
        self.relayout();
        true
    }

    /// Leave maximized mode.
    pub fn restore(&mut self) -> bool {
        if self.maximized.is_none() {
            return false;
        }

        #[cfg(feature = "tracing")]
        self.trace_mutation("restore");

        self.maximized = None;
        self.listener.on_maximize_changed(None);
        self.relayout();
        true
    }

    pub fn toggle_maximize(&mut self, container: ContainerId) -> bool {
        if self.maximized == Some(container) {
            self.restore()
        } else {
            self.maximize(container)
        }
    }

    /// Make `container` the active one and move focus into it.
    pub fn activate(&mut self, container: ContainerId) -> bool {
        if !self.containers.contains_key(&container) {
            return false;
        }
        for (id, candidate) in &mut self.containers {
            candidate.set_active(*id == container);
        }
        if let Some(target) = self.containers.get_mut(&container) {
            target.acquire_focus();
        }
        self.active = Some(container);
        self.listener.request_redraw();
        true
    }

    /// Store `frame` and lay the tree out inside it (minus configured insets).
    pub fn layout(&mut self, frame: Rect) {
        self.frame = frame;
        self.relayout();
    }

    /// Preferred size of the docked content plus insets.
    #[must_use]
    pub fn preferred_size(&self) -> Size {
        let content = self.tree.preferred_size(&self.containers);
        Size::new(
            content.width + self.config.insets.width(),
            content.height + self.config.insets.height(),
        )
    }

    /// Deepest node under `point`. While maximized only the maximized
    /// container is hit.
    #[must_use]
    pub fn over_node(&self, point: Point) -> Option<DockNode> {
        match self.maximized {
            Some(maximized) => self
                .containers
                .get(&maximized)
                .filter(|container| container.frame_rect().contains(point))
                .map(|_| DockNode::Leaf(maximized)),
            None => self.tree.over_node(point, &self.containers),
        }
    }

    /// Programmatically move a divider. Returns whether the stored value
    /// changed.
    pub fn set_divider_position(&mut self, layout: LayoutId, position: f32) -> bool {
        if !self.tree.set_divider_position(layout, position) {
            return false;
        }
        self.divider_changed(layout);
        true
    }

    /// Return a divider to the automatic 50/50 split.
    pub fn reset_divider(&mut self, layout: LayoutId) -> bool {
        if !self.tree.reset_divider(layout) {
            return false;
        }
        self.divider_changed(layout);
        true
    }

    /// Primary press. Starts a divider session when `point` is over the
    /// divider of a full layout.
    pub fn mouse_down(&mut self, point: Point, button: PointerButton) -> bool {
        if button != PointerButton::Primary || self.divider_drag.is_active() {
            return false;
        }
        let Some(layout) = self.divider_at(point) else {
            return false;
        };
        let Some(record) = self.tree.layout(layout) else {
            return false;
        };
        let horizontal = record.is_horizontal();

        #[cfg(feature = "tracing")]
        self.trace_mutation("divider_press");

        self.pressed_divider = record.raw_divider();
        let initial = self.tree.divider_position(layout);
        let _ = self.divider_drag.press(layout, horizontal, point, initial);

        #[cfg(feature = "tracing")]
        tracing::trace!(layout = layout.get(), initial, "divider pressed");

        true
    }

    /// Pointer moved. Returns whether a divider moved.
    pub fn mouse_drag(&mut self, point: Point) -> bool {
        let transition = self.divider_drag.drag(point);
        let Some((layout, position)) = transition.effect.position() else {
            return false;
        };

        #[cfg(feature = "tracing")]
        self.trace_mutation("divider_drag");

        self.set_divider_position(layout, position)
    }

    /// Pointer released. Returns whether a divider drag completed.
    pub fn mouse_up(&mut self, point: Point) -> bool {
        if self.divider_drag.is_dragging() {
            let _ = self.mouse_drag(point);
        }
        let dragged = self.divider_drag.is_dragging();
        if !self.divider_drag.is_active() {
            return false;
        }

        #[cfg(feature = "tracing")]
        self.trace_mutation("divider_release");

        let _ = self.divider_drag.release();

        #[cfg(feature = "tracing")]
        tracing::trace!(dragged, "divider released");

        dragged
    }

    /// Abort a divider drag, restoring the divider as it was at press time.
    pub fn cancel_divider_drag(&mut self) -> bool {
        let Some(transition) = self.divider_drag.cancel() else {
            return false;
        };
        if let Some((layout, _)) = transition.effect.position() {
            if self.pressed_divider < 0.0 {
                let _ = self.reset_divider(layout);
            } else {
                let _ = self.set_divider_position(layout, self.pressed_divider);
            }
        }
        true
    }

    /// Resize cursor hint for `point`.
    #[must_use]
    pub fn cursor_at(&self, point: Point) -> Option<DockCursor> {
        let layout = self
            .divider_drag
            .state()
            .layout()
            .or_else(|| self.divider_at(point))?;
        self.tree
            .layout(layout)
            .map(|record| DockCursor::for_axis(record.is_horizontal()))
    }

    /// Drag payload for `dockable`, keyed by this dock's drag key.
    #[must_use]
    pub fn drag_payload(&self, dockable: DockableId) -> Option<DragData> {
        self.index.contains_key(&dockable).then(|| {
            DragData::single(self.drag_key.as_str(), DragPayload::Dockable(dockable))
        })
    }

    /// A drag moved over the dock. Returns whether a drop at `point` would
    /// be accepted.
    pub fn data_drag_over(&mut self, point: Point, data: &DragData) -> bool {
        let target = data
            .dockable(self.drag_key.as_str())
            .and_then(|dockable| self.drop_target(point, dockable).map(|t| (dockable, t)));
        let (changed, accepted) = match target {
            Some((dockable, (hover, side))) => (self.drop.hover(dockable, hover, side), true),
            None => (self.drop.clear(), false),
        };
        if changed {
            self.listener.request_redraw();
        }
        accepted
    }

    /// The drag left the dock.
    pub fn data_drag_exit(&mut self) {
        if self.drop.clear() {
            self.listener.request_redraw();
        }
    }

    /// Commit a drop at `point`. Returns whether the dockable was docked.
    pub fn data_drop(&mut self, point: Point, data: &DragData) -> bool {
        let accepted = self.data_drag_over(point, data);
        let target = self.drop.target();
        self.data_drag_exit();
        match target {
            Some((dockable, hover, side)) if accepted => self.dock_to(dockable, Some(hover), side),
            _ => false,
        }
    }

    /// Draw divider grips and the drop highlight.
    pub fn draw_over(&self, canvas: &mut impl DockCanvas) {
        if self.maximized.is_none() {
            for layout in self.tree.full_layouts() {
                let Some(record) = self.tree.layout(layout) else {
                    continue;
                };
                if let Some(rect) = self.tree.divider_rect(layout) {
                    let grip = divider_grip_path(rect, record.is_horizontal());
                    canvas.draw_path(&grip, DockInk::DividerGrip);
                }
            }
        }
        if let Some((_, hover, side)) = self.drop.target()
            && let Some(frame) = self.tree.node_frame(hover, &self.containers)
        {
            canvas.draw_rect(drop_highlight_rect(frame, side), DockInk::DropHighlight);
        }
    }

    /// Check tree invariants plus agreement between the tree, the container
    /// collection, and the dockable index.
    pub fn validate(&self) -> Result<(), DockTreeError> {
        self.tree.validate()?;
        let docked = self.tree.containers();
        for container in &docked {
            let Some(record) = self.containers.get(container) else {
                return Err(DockTreeError::UnknownContainer {
                    container: *container,
                });
            };
            if record.is_empty() {
                return Err(DockTreeError::EmptyContainer {
                    container: *container,
                });
            }
            for dockable in record.dockables() {
                if self.index.get(dockable) != Some(container) {
                    return Err(DockTreeError::IndexMismatch {
                        dockable: *dockable,
                    });
                }
            }
        }
        if let Some(container) = self.containers.keys().find(|id| !docked.contains(*id)) {
            return Err(DockTreeError::UnknownContainer {
                container: *container,
            });
        }
        for (dockable, container) in &self.index {
            if !self
                .containers
                .get(container)
                .is_some_and(|record| record.hosts(*dockable))
            {
                return Err(DockTreeError::IndexMismatch {
                    dockable: *dockable,
                });
            }
        }
        Ok(())
    }

    fn is_sole_occupant(&self, container: ContainerId, dockable: DockableId) -> bool {
        self.containers
            .get(&container)
            .is_some_and(|record| record.dockables() == [dockable])
    }

    fn insert_container(&mut self, container: C) -> ContainerId {
        let id = self.next_container;
        self.next_container = id.next();
        let _ = self.containers.insert(id, container);
        id
    }

    /// Pull `dockable` out of its container, closing the container if empty.
    fn detach(&mut self, dockable: DockableId) -> Option<ContainerId> {
        let container = self.index.remove(&dockable)?;
        let emptied = match self.containers.get_mut(&container) {
            Some(record) => {
                let _ = record.close(dockable);
                record.is_empty()
            }
            None => true,
        };
        if emptied {
            self.close_container(container);
        }
        Some(container)
    }

    fn close_container(&mut self, container: ContainerId) {
        let _ = self.tree.remove(container);
        let _ = self.containers.remove(&container);
        if self.maximized == Some(container) {
            self.maximized = None;
            self.listener.on_maximize_changed(None);
        }
        if self.active == Some(container) {
            self.active = None;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(container = container.get(), "container closed");

        self.listener.on_container_closed(container);
    }

    fn divider_at(&self, point: Point) -> Option<LayoutId> {
        if self.maximized.is_some() {
            return None;
        }
        match self.tree.over_node(point, &self.containers) {
            Some(DockNode::Split(layout)) => Some(layout),
            _ => None,
        }
    }

    fn drop_target(&self, point: Point, dockable: DockableId) -> Option<(DockNode, Side)> {
        let hover = self
            .over_node(point)
            .unwrap_or(DockNode::Split(self.tree.root()));
        if let DockNode::Leaf(container) = hover
            && self.index.get(&dockable) == Some(&container)
            && self.is_sole_occupant(container, dockable)
        {
            return None;
        }
        let frame = self.tree.node_frame(hover, &self.containers)?;
        Some((hover, Side::from_point(frame, point)))
    }

    fn divider_changed(&mut self, layout: LayoutId) {
        self.relayout();
        let position = self.tree.divider_position(layout);

        #[cfg(feature = "tracing")]
        tracing::trace!(layout = layout.get(), position, "divider changed");

        self.listener.on_divider_changed(layout, position);
    }

    fn relayout(&mut self) {
        let state = self.divider_drag.state();
        if let (Some(layout), Some(horizontal)) = (state.layout(), state.horizontal()) {
            let still_divided = self
                .tree
                .layout(layout)
                .is_some_and(|record| record.is_full() && record.is_horizontal() == horizontal);
            if !still_divided {
                let _ = self.divider_drag.cancel();

                #[cfg(feature = "tracing")]
                tracing::trace!(layout = layout.get(), "divider drag dropped");
            }
        }
        let frame = self.frame.inset(self.config.insets);
        self.tree
            .perform_layout(frame, &mut self.containers, self.maximized);
        self.listener.request_redraw();
    }

    #[cfg(feature = "tracing")]
    fn trace_mutation(&self, operation: &'static str) {
        let _span = tracing::debug_span!(
            "dock.mutation",
            operation,
            containers = self.containers.len(),
            dockables = self.index.len(),
            maximized = self.maximized.is_some()
        )
        .entered();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::DockLayoutNode;
    use crate::overlay::DockDrawCommand;
    use crate::tree::DOCK_DIVIDER_AUTO;
    #[cfg(feature = "tracing")]
    use std::sync::{Arc, Mutex};

    #[cfg(feature = "tracing")]
    use tracing::Subscriber;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::Layer;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::layer::{Context, SubscriberExt};

    #[derive(Debug, Default)]
    struct Recorder {
        moved: Vec<(DockableId, ContainerId)>,
        closed: Vec<ContainerId>,
        dividers: Vec<(LayoutId, f32)>,
        maximize: Vec<Option<ContainerId>>,
        redraws: usize,
    }

    impl DockListener for Recorder {
        fn on_dockable_moved(&mut self, dockable: DockableId, container: ContainerId) {
            self.moved.push((dockable, container));
        }

        fn on_divider_changed(&mut self, layout: LayoutId, position: f32) {
            self.dividers.push((layout, position));
        }

        fn on_container_closed(&mut self, container: ContainerId) {
            self.closed.push(container);
        }

        fn on_maximize_changed(&mut self, maximized: Option<ContainerId>) {
            self.maximize.push(maximized);
        }

        fn request_redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn d(raw: u64) -> DockableId {
        DockableId::new(raw)
    }

    fn dock() -> Dock<TabGroup, Recorder> {
        let keys = DragKeyGenerator::new();
        let mut dock = Dock::new(DockConfig::default(), &keys, Recorder::default())
            .expect("default config is valid");
        dock.layout(Rect::new(0.0, 0.0, 204.0, 104.0));
        dock
    }

    fn leaf_of(dock: &Dock<TabGroup, Recorder>, dockable: DockableId) -> DockNode {
        DockNode::Leaf(dock.container_of(dockable).expect("dockable is docked"))
    }

    /// D1 | (D2 / D3)
    fn three_panel() -> Dock<TabGroup, Recorder> {
        let mut dock = dock();
        assert!(dock.dock_to(d(1), None, Side::Left));
        let first = leaf_of(&dock, d(1));
        assert!(dock.dock_to(d(2), Some(first), Side::Right));
        let second = leaf_of(&dock, d(2));
        assert!(dock.dock_to(d(3), Some(second), Side::Bottom));
        dock.validate().expect("valid");
        dock
    }

    #[test]
    fn new_rejects_invalid_config() {
        let keys = DragKeyGenerator::new();
        let config = DockConfig::default().with_drag_threshold(-2.0);
        assert!(Dock::<TabGroup, ()>::new(config, &keys, ()).is_err());
    }

    #[test]
    fn each_dock_gets_its_own_key() {
        let keys = DragKeyGenerator::new();
        let a = Dock::<TabGroup, ()>::new(DockConfig::default(), &keys, ()).expect("dock a");
        let b = Dock::<TabGroup, ()>::new(DockConfig::default(), &keys, ()).expect("dock b");
        assert_ne!(a.drag_key(), b.drag_key());
        assert_eq!(a.tree().root_layout().raw_divider(), DOCK_DIVIDER_AUTO);
    }

    #[test]
    fn docking_lays_out_frames() {
        let dock = three_panel();
        let frame_of = |raw| {
            dock.container(dock.container_of(d(raw)).expect("docked"))
                .expect("container")
                .frame_rect()
        };
        assert_eq!(frame_of(1), Rect::new(0.0, 0.0, 100.0, 104.0));
        assert_eq!(frame_of(2), Rect::new(104.0, 0.0, 100.0, 50.0));
        assert_eq!(frame_of(3), Rect::new(104.0, 54.0, 100.0, 50.0));
        assert_eq!(dock.listener().moved.len(), 3);
        assert!(dock.listener().redraws >= 3);
    }

    #[test]
    fn insets_shrink_layout_frame() {
        let keys = DragKeyGenerator::new();
        let config = DockConfig::default().with_insets(dockwright_core::Insets::uniform(10.0));
        let mut dock: Dock = Dock::new(config, &keys, ()).expect("dock");
        assert!(dock.dock_to(d(1), None, Side::Left));
        dock.layout(Rect::new(0.0, 0.0, 100.0, 100.0));
        let id = dock.container_of(d(1)).expect("docked");
        assert_eq!(
            dock.container(id).map(|c| c.frame_rect()),
            Some(Rect::new(10.0, 10.0, 80.0, 80.0))
        );
        assert_eq!(dock.preferred_size(), Size::new(220.0, 170.0));
    }

    #[test]
    fn redock_retargets_surviving_ancestor() {
        let mut dock = three_panel();
        let sub = dock
            .tree()
            .root_layout()
            .child(1)
            .and_then(DockNode::as_split)
            .expect("sub split");
        let own = dock.container_of(d(1)).expect("docked");

        // Pulling D1 out makes the root absorb `sub`, freeing its id.
        assert!(dock.dock_to(d(1), Some(DockNode::Split(sub)), Side::Right));
        dock.validate().expect("valid");
        assert!(!dock.tree().contains(DockNode::Split(sub)));

        let root = dock.tree().root_layout();
        assert!(root.is_horizontal());
        assert_eq!(root.child(1), Some(DockNode::Leaf(own)));
        let pushed = root.child(0).and_then(DockNode::as_split).expect("pushed pair");
        let pushed = dock.tree().layout(pushed).expect("pushed record");
        assert!(!pushed.is_horizontal());
        assert!(dock.listener().closed.is_empty(), "container is reused");
    }

    #[test]
    fn self_dock_is_noop() {
        let mut dock = three_panel();
        let before = dock.tree().clone();
        let own = leaf_of(&dock, d(2));
        assert!(!dock.dock_to(d(2), Some(own), Side::Top));
        assert_eq!(dock.tree(), &before);
    }

    #[test]
    fn stale_target_is_rejected() {
        let mut dock = three_panel();
        let stale = LayoutId::new(99).expect("non-zero");
        assert!(!dock.dock_to(d(4), Some(DockNode::Split(stale)), Side::Left));
        assert_eq!(dock.container_of(d(4)), None);
    }

    #[test]
    fn stacking_and_closing_tabs() {
        let mut dock = three_panel();
        let target = dock.container_of(d(1)).expect("docked");
        let source = dock.container_of(d(3)).expect("docked");

        assert!(dock.stack(d(3), target, None));
        assert_eq!(dock.container_of(d(3)), Some(target));
        assert_eq!(dock.listener().closed, vec![source]);
        assert_eq!(dock.tree().containers().len(), 2);
        dock.validate().expect("valid");

        // Docking a tab out of a shared container creates a new container.
        let second = leaf_of(&dock, d(2));
        assert!(dock.dock_to(d(3), Some(second), Side::Bottom));
        assert_ne!(dock.container_of(d(3)), Some(target));
        assert_eq!(
            dock.container(target).map(|c| c.dockables().to_vec()),
            Some(vec![d(1)])
        );
        dock.validate().expect("valid");

        assert!(dock.close(d(3)));
        assert!(!dock.close(d(3)));
        assert_eq!(dock.dockable_count(), 2);
        dock.validate().expect("valid");
    }

    #[test]
    fn maximize_hides_siblings_and_restores_on_close() {
        let mut dock = three_panel();
        let big = dock.container_of(d(2)).expect("docked");
        assert!(dock.maximize(big));
        assert!(!dock.maximize(big));
        assert_eq!(dock.container(big).map(|c| c.frame_rect()), Some(dock.frame()));
        for (id, container) in dock.containers() {
            assert_eq!(container.is_hidden(), *id != big);
        }
        assert_eq!(dock.over_node(Point::new(5.0, 5.0)), Some(DockNode::Leaf(big)));

        assert!(dock.close(d(2)));
        assert_eq!(dock.maximized(), None);
        assert_eq!(dock.listener().maximize, vec![Some(big), None]);
        assert!(dock.containers().values().all(|c| !c.is_hidden()));
    }

    #[test]
    fn toggle_maximize_round_trips() {
        let mut dock = three_panel();
        let id = dock.container_of(d(1)).expect("docked");
        assert!(dock.toggle_maximize(id));
        assert_eq!(dock.maximized(), Some(id));
        assert!(dock.toggle_maximize(id));
        assert_eq!(dock.maximized(), None);
        assert!(!dock.restore());
    }

    #[test]
    fn activate_tracks_focus() {
        let mut dock = three_panel();
        let a = dock.container_of(d(1)).expect("docked");
        let b = dock.container_of(d(2)).expect("docked");
        assert!(dock.activate(a));
        assert!(dock.activate(b));
        assert_eq!(dock.active(), Some(b));
        assert!(!dock.container(a).expect("a").is_active());
        let b_group = dock.container(b).expect("b");
        assert!(b_group.is_active());
        assert_eq!(b_group.focus_requests(), 1);
        assert!(!dock.activate(ContainerId::new(77).expect("non-zero")));
    }

    #[test]
    fn divider_drag_moves_by_pointer_delta() {
        let mut dock = three_panel();
        let root = dock.tree().root();
        assert!(!dock.mouse_down(Point::new(10.0, 10.0), PointerButton::Primary));
        assert!(!dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Secondary));
        assert!(dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Primary));
        assert_eq!(dock.cursor_at(Point::new(0.0, 0.0)), Some(DockCursor::ResizeHorizontal));

        // Within the threshold nothing moves.
        assert!(!dock.mouse_drag(Point::new(103.0, 10.0)));
        assert!(dock.mouse_drag(Point::new(121.0, 10.0)));
        assert_eq!(dock.tree().divider_position(root), 120.0);
        assert!(dock.mouse_up(Point::new(131.0, 10.0)));
        assert_eq!(dock.tree().divider_position(root), 130.0);
        assert_eq!(dock.divider_drag_state(), DividerDragState::Idle);

        let first = dock.container_of(d(1)).expect("docked");
        assert_eq!(dock.container(first).map(|c| c.frame_rect().width), Some(130.0));
        assert_eq!(dock.listener().dividers.last(), Some(&(root, 130.0)));
    }

    #[test]
    fn divider_drag_clamps() {
        let mut dock = three_panel();
        let root = dock.tree().root();
        assert!(dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Primary));
        assert!(dock.mouse_drag(Point::new(900.0, 10.0)));
        assert_eq!(dock.tree().divider_position(root), 200.0);
        assert!(dock.mouse_drag(Point::new(-900.0, 10.0)));
        assert_eq!(dock.tree().divider_position(root), 0.0);
    }

    #[test]
    fn cancel_restores_auto_divider() {
        let mut dock = three_panel();
        let root = dock.tree().root();
        assert!(dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Primary));
        assert!(dock.mouse_drag(Point::new(150.0, 10.0)));
        assert!(dock.cancel_divider_drag());
        assert_eq!(dock.tree().root_layout().raw_divider(), DOCK_DIVIDER_AUTO);
        assert_eq!(dock.tree().divider_position(root), 100.0);
        assert!(!dock.cancel_divider_drag());
    }

    /// D1 | D2
    fn two_panel() -> Dock<TabGroup, Recorder> {
        let mut dock = dock();
        assert!(dock.dock_to(d(1), None, Side::Left));
        let first = leaf_of(&dock, d(1));
        assert!(dock.dock_to(d(2), Some(first), Side::Right));
        dock
    }

    #[test]
    fn closing_a_side_ends_divider_drag() {
        let mut dock = two_panel();
        assert!(dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Primary));
        assert!(dock.close(d(2)));
        assert_eq!(dock.divider_drag_state(), DividerDragState::Idle);

        assert!(!dock.mouse_drag(Point::new(40.0, 10.0)));
        assert!(!dock.mouse_up(Point::new(40.0, 10.0)));
        assert_eq!(dock.tree().root_layout().raw_divider(), DOCK_DIVIDER_AUTO);

        // The next split starts from the automatic midpoint.
        assert!(dock.dock_to(d(3), None, Side::Right));
        let first = dock.container_of(d(1)).expect("docked");
        assert_eq!(dock.container(first).map(|c| c.frame_rect().width), Some(100.0));
    }

    #[test]
    fn reorienting_layout_ends_divider_drag() {
        let mut dock = two_panel();
        assert!(dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Primary));
        assert!(dock.mouse_drag(Point::new(121.0, 10.0)));
        let first = leaf_of(&dock, d(1));
        assert!(dock.dock_to(d(2), Some(first), Side::Bottom));
        assert!(!dock.tree().root_layout().is_horizontal());
        assert_eq!(dock.divider_drag_state(), DividerDragState::Idle);

        let raw = dock.tree().root_layout().raw_divider();
        assert!(!dock.mouse_drag(Point::new(160.0, 10.0)));
        assert_eq!(dock.tree().root_layout().raw_divider(), raw);
        dock.validate().expect("valid");
    }

    #[test]
    fn cursor_hint_over_dividers() {
        let dock = three_panel();
        assert_eq!(dock.cursor_at(Point::new(101.0, 10.0)), Some(DockCursor::ResizeHorizontal));
        assert_eq!(dock.cursor_at(Point::new(150.0, 51.0)), Some(DockCursor::ResizeVertical));
        assert_eq!(dock.cursor_at(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn drag_over_rejects_foreign_keys_and_self_drops() {
        let mut dock = three_panel();
        let foreign = DragData::single("elsewhere-1", DragPayload::Dockable(d(1)));
        assert!(!dock.data_drag_over(Point::new(150.0, 10.0), &foreign));

        let own = dock.drag_payload(d(2)).expect("docked dockable has a payload");
        // Over its own single-tab container.
        assert!(!dock.data_drag_over(Point::new(150.0, 10.0), &own));
        assert_eq!(dock.drop_state(), DropState::Idle);

        // Over D1's container, near its bottom edge.
        assert!(dock.data_drag_over(Point::new(50.0, 100.0), &own));
        let target = leaf_of(&dock, d(1));
        assert_eq!(
            dock.drop_state(),
            DropState::DragOver {
                dockable: d(2),
                hover: target,
                side: Side::Bottom
            }
        );

        dock.data_drag_exit();
        assert_eq!(dock.drop_state(), DropState::Idle);
        assert!(dock.drag_payload(d(9)).is_none());
    }

    #[test]
    fn drop_commits_dock_to() {
        let mut dock = three_panel();
        let payload = dock.drag_payload(d(3)).expect("payload");
        let target = leaf_of(&dock, d(1));
        assert!(dock.data_drop(Point::new(50.0, 5.0), &payload));
        assert_eq!(dock.drop_state(), DropState::Idle);
        dock.validate().expect("valid");

        let owner = dock
            .tree()
            .find_layout(dock.container_of(d(3)).expect("docked"))
            .expect("owner");
        let record = dock.tree().layout(owner).expect("record");
        assert_eq!(
            record.children(),
            [Some(leaf_of(&dock, d(3))), Some(target)]
        );
    }

    #[test]
    fn draw_over_emits_grips_and_highlight() {
        let mut dock = three_panel();
        let mut canvas: Vec<DockDrawCommand> = Vec::new();
        dock.draw_over(&mut canvas);
        let grips = canvas
            .iter()
            .filter(|cmd| matches!(cmd, DockDrawCommand::Path { .. }))
            .count();
        assert_eq!(grips, 2);

        let payload = dock.drag_payload(d(2)).expect("payload");
        assert!(dock.data_drag_over(Point::new(5.0, 50.0), &payload));
        let mut canvas: Vec<DockDrawCommand> = Vec::new();
        dock.draw_over(&mut canvas);
        assert!(canvas.contains(&DockDrawCommand::Rect {
            rect: Rect::new(0.0, 0.0, 50.0, 104.0),
            ink: DockInk::DropHighlight,
        }));
    }

    #[test]
    fn validate_catches_index_drift() {
        let mut dock = three_panel();
        let _ = dock.index.insert(d(42), ContainerId::MIN);
        assert_eq!(
            dock.validate(),
            Err(DockTreeError::IndexMismatch { dockable: d(42) })
        );
    }

    #[cfg(feature = "tracing")]
    #[derive(Debug, Default)]
    struct DockTraceState {
        span_count: usize,
        operations: Vec<String>,
    }

    #[cfg(feature = "tracing")]
    struct DockTraceCapture {
        state: Arc<Mutex<DockTraceState>>,
    }

    #[cfg(feature = "tracing")]
    impl<S> Layer<S> for DockTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::Id,
            _ctx: Context<'_, S>,
        ) {
            if attrs.metadata().name() != "dock.mutation" {
                return;
            }

            #[derive(Default)]
            struct OperationVisitor {
                operation: Option<String>,
            }

            impl tracing::field::Visit for OperationVisitor {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "operation" {
                        self.operation = Some(format!("{value:?}").trim_matches('"').to_owned());
                    }
                }

                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    if field.name() == "operation" {
                        self.operation = Some(value.to_owned());
                    }
                }
            }

            let mut visitor = OperationVisitor::default();
            attrs.record(&mut visitor);

            let mut state = self.state.lock().expect("trace state lock");
            state.span_count += 1;
            if let Some(operation) = visitor.operation {
                state.operations.push(operation);
            }
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_mutation_spans_name_operations() {
        let state = Arc::new(Mutex::new(DockTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(DockTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let mut dock = dock();
        assert!(dock.dock_to(d(1), None, Side::Left));
        let id = dock.container_of(d(1)).expect("docked");
        assert!(dock.maximize(id));
        assert!(dock.close(d(1)));

        tracing::callsite::rebuild_interest_cache();
        let snapshot = state.lock().expect("trace state lock");
        assert_eq!(snapshot.span_count, 3);
        assert_eq!(
            snapshot.operations,
            vec!["dock_to".to_string(), "maximize".to_string(), "close".to_string()]
        );
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_divider_drag_spans() {
        let state = Arc::new(Mutex::new(DockTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(DockTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let mut dock = two_panel();
        let base = state.lock().expect("trace state lock").operations.len();
        assert!(dock.mouse_down(Point::new(101.0, 10.0), PointerButton::Primary));
        assert!(!dock.mouse_drag(Point::new(102.0, 10.0)));
        assert!(dock.mouse_drag(Point::new(130.0, 10.0)));
        assert!(dock.mouse_up(Point::new(130.0, 10.0)));

        tracing::callsite::rebuild_interest_cache();
        let snapshot = state.lock().expect("trace state lock");
        assert_eq!(
            snapshot.operations[base..],
            [
                "divider_press".to_string(),
                "divider_drag".to_string(),
                // Release replays the final pointer position.
                "divider_drag".to_string(),
                "divider_release".to_string()
            ]
        );
    }
}
