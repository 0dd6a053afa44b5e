#![forbid(unsafe_code)]

//! Binary space-partition tree of dock layouts.
//!
//! The tree is an arena of [`DockLayout`] records keyed by [`LayoutId`].
//! Each record has two ordered slots holding a [`DockNode`]: either another
//! layout (`Split`) or a container leaf (`Leaf`). Parent links are stored as
//! ids, so restructuring never juggles shared references.
//!
//! # Invariants
//!
//! - The root always exists and is the only record without a parent.
//! - After any public mutation, a non-root layout holds exactly two
//!   children. A layout left with one child is replaced in its parent by
//!   that child ("pull-up"); a layout left empty is cleared from its parent,
//!   which is then re-checked. The root may hold a single leaf; a root left
//!   with a single split child absorbs that child's slots.
//! - A container appears in at most one slot.
//! - Layout ids are allocated monotonically and never reused, so a handle to
//!   a collapsed layout is detectably stale rather than aliasing a new node.
//!
//! Mutations are total: unknown containers or stale layout ids turn them into
//! no-ops that report `false`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use dockwright_core::event::DockableId;
use dockwright_core::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::container::{ContainerId, DockContainer, DockLayoutNode};
use crate::side::Side;

/// Divider sentinel: split the available space evenly.
pub const DOCK_DIVIDER_AUTO: f32 = -1.0;

/// Default thickness of the gap between the two children of a full layout.
pub const DOCK_DEFAULT_DIVIDER_THICKNESS: f32 = 4.0;

/// Stable identifier for layout records.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(u64);

impl LayoutId {
    /// Lowest valid layout ID (always the root of a fresh tree).
    pub const MIN: Self = Self(1);

    /// Create a layout ID, rejecting 0.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Occupant of a tree slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DockNode {
    Split(LayoutId),
    Leaf(ContainerId),
}

impl DockNode {
    #[must_use]
    pub const fn as_split(self) -> Option<LayoutId> {
        match self {
            Self::Split(id) => Some(id),
            Self::Leaf(_) => None,
        }
    }

    #[must_use]
    pub const fn as_leaf(self) -> Option<ContainerId> {
        match self {
            Self::Leaf(id) => Some(id),
            Self::Split(_) => None,
        }
    }
}

/// One internal node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DockLayout {
    id: LayoutId,
    parent: Option<LayoutId>,
    children: [Option<DockNode>; 2],
    divider: f32,
    horizontal: bool,
    frame: Rect,
}

impl DockLayout {
    fn new(id: LayoutId, parent: Option<LayoutId>) -> Self {
        Self {
            id,
            parent,
            children: [None, None],
            divider: DOCK_DIVIDER_AUTO,
            horizontal: false,
            frame: Rect::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> LayoutId {
        self.id
    }

    /// Parent layout, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Occupant of slot `index` (0 or 1).
    #[must_use]
    pub fn child(&self, index: usize) -> Option<DockNode> {
        self.children.get(index).copied().flatten()
    }

    #[must_use]
    pub const fn children(&self) -> [Option<DockNode>; 2] {
        self.children
    }

    /// Stored divider value; [`DOCK_DIVIDER_AUTO`] until explicitly set.
    ///
    /// Use [`DockTree::divider_position`] for the clamped, resolved value.
    #[must_use]
    pub const fn raw_divider(&self) -> f32 {
        self.divider
    }

    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    /// Frame assigned by the last layout pass.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Both slots occupied.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.children[0].is_some() && self.children[1].is_some()
    }

    /// Both slots vacant.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.children[0].is_none() && self.children[1].is_none()
    }

    fn slot_of(&self, node: DockNode) -> Option<usize> {
        self.children.iter().position(|child| *child == Some(node))
    }

    fn occupied(&self) -> impl Iterator<Item = DockNode> + '_ {
        self.children.iter().flatten().copied()
    }
}

/// The dock's layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DockTree {
    root: LayoutId,
    next_id: LayoutId,
    layouts: BTreeMap<LayoutId, DockLayout>,
    divider_thickness: f32,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new(DOCK_DEFAULT_DIVIDER_THICKNESS)
    }
}

impl DockTree {
    /// Build a tree holding only an empty root with an automatic divider.
    #[must_use]
    pub fn new(divider_thickness: f32) -> Self {
        let root = LayoutId::MIN;
        let mut layouts = BTreeMap::new();
        let _ = layouts.insert(root, DockLayout::new(root, None));
        Self {
            root,
            next_id: root.next(),
            layouts,
            divider_thickness: divider_thickness.max(0.0),
        }
    }

    #[must_use]
    pub const fn root(&self) -> LayoutId {
        self.root
    }

    /// The root layout record.
    #[must_use]
    pub fn root_layout(&self) -> &DockLayout {
        // The root is inserted at construction and never removed.
        &self.layouts[&self.root]
    }

    #[must_use]
    pub fn layout(&self, id: LayoutId) -> Option<&DockLayout> {
        self.layouts.get(&id)
    }

    /// Iterate layouts in id order.
    pub fn layouts(&self) -> impl Iterator<Item = &DockLayout> {
        self.layouts.values()
    }

    #[must_use]
    pub const fn divider_thickness(&self) -> f32 {
        self.divider_thickness
    }

    /// Whether `node` is the root or found anywhere beneath it.
    #[must_use]
    pub fn contains(&self, node: DockNode) -> bool {
        self.contains_in(self.root, node)
    }

    /// Whether `node` is `layout` itself or found anywhere beneath it.
    #[must_use]
    pub fn contains_in(&self, layout: LayoutId, node: DockNode) -> bool {
        if node == DockNode::Split(layout) {
            return self.layouts.contains_key(&layout);
        }
        let Some(record) = self.layouts.get(&layout) else {
            return false;
        };
        record.occupied().any(|child| match child {
            DockNode::Leaf(_) => child == node,
            DockNode::Split(id) => self.contains_in(id, node),
        })
    }

    /// The layout whose direct slot holds `container`.
    #[must_use]
    pub fn find_layout(&self, container: ContainerId) -> Option<LayoutId> {
        let target = DockNode::Leaf(container);
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let record = self.layouts.get(&id)?;
            for child in record.occupied() {
                match child {
                    DockNode::Leaf(_) if child == target => return Some(id),
                    DockNode::Split(next) => stack.push(next),
                    DockNode::Leaf(_) => {}
                }
            }
        }
        None
    }

    /// Containers in depth-first slot order.
    #[must_use]
    pub fn containers(&self) -> Vec<ContainerId> {
        let mut out = Vec::new();
        self.collect_containers(self.root, &mut out);
        out
    }

    fn collect_containers(&self, layout: LayoutId, out: &mut Vec<ContainerId>) {
        let Some(record) = self.layouts.get(&layout) else {
            return;
        };
        for child in record.occupied() {
            match child {
                DockNode::Leaf(id) => out.push(id),
                DockNode::Split(id) => self.collect_containers(id, out),
            }
        }
    }

    /// `node` followed by every enclosing layout up to the root.
    ///
    /// Empty when `node` is not in the tree.
    #[must_use]
    pub fn ancestors(&self, node: DockNode) -> Vec<DockNode> {
        let mut cursor = match node {
            DockNode::Leaf(id) => match self.find_layout(id) {
                Some(layout) => Some(layout),
                None => return Vec::new(),
            },
            DockNode::Split(id) => match self.layouts.get(&id) {
                Some(record) => record.parent,
                None => return Vec::new(),
            },
        };
        let mut chain = vec![node];
        while let Some(id) = cursor {
            chain.push(DockNode::Split(id));
            cursor = self.layouts.get(&id).and_then(|record| record.parent);
        }
        chain
    }

    /// Dock `container` against `target` on `side`.
    ///
    /// `None` targets the root. A `Split` target is split within; a `Leaf`
    /// target is split alongside within its owning layout. When the container
    /// is already held by the layout the target resolves to, its slot is
    /// repositioned in place. Returns `false` if the target cannot be
    /// resolved.
    pub fn dock_to(
        &mut self,
        container: ContainerId,
        target: Option<DockNode>,
        side: Side,
    ) -> bool {
        let target = target.unwrap_or(DockNode::Split(self.root));
        let Some(resolved) = self.target_layout(target) else {
            return false;
        };

        if let Some(existing) = self.find_layout(container) {
            if existing == resolved {
                self.reposition(existing, container, side);
                return true;
            }
            let _ = self.remove(container);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            container = container.get(),
            ?target,
            ?side,
            "dock tree insert"
        );

        match target {
            DockNode::Split(id) if self.layouts.contains_key(&id) => {
                self.dock_within(id, container, side);
                true
            }
            // The target layout collapsed while the container was pulled out.
            DockNode::Split(_) => {
                self.dock_within(self.root, container, side);
                true
            }
            DockNode::Leaf(target_container) => match self.find_layout(target_container) {
                Some(owner) => {
                    self.dock_with_container(owner, container, target_container, side);
                    true
                }
                None => false,
            },
        }
    }

    /// The layout a docking target resolves to: the layout itself for
    /// `Split`, the owning layout for `Leaf`.
    #[must_use]
    pub fn target_layout(&self, target: DockNode) -> Option<LayoutId> {
        match target {
            DockNode::Split(id) => self.layouts.contains_key(&id).then_some(id),
            DockNode::Leaf(id) => self.find_layout(id),
        }
    }

    fn reposition(&mut self, layout: LayoutId, container: ContainerId, side: Side) {
        let Some(record) = self.layouts.get_mut(&layout) else {
            return;
        };
        let (primary, secondary) = side.dock_order();
        let leaf = Some(DockNode::Leaf(container));
        if record.children[primary] != leaf {
            record.children[secondary] = record.children[primary];
            record.children[primary] = leaf;
        }
        record.horizontal = side.horizontal();
    }

    fn dock_within(&mut self, layout: LayoutId, container: ContainerId, side: Side) {
        let (primary, secondary) = side.dock_order();
        let Some(record) = self.layouts.get(&layout).cloned() else {
            return;
        };
        let leaf = Some(DockNode::Leaf(container));

        match (record.children[primary], record.children[secondary]) {
            (None, _) => {
                if let Some(record) = self.layouts.get_mut(&layout) {
                    record.children[primary] = leaf;
                }
            }
            (Some(existing), None) => {
                if let Some(record) = self.layouts.get_mut(&layout) {
                    record.children[secondary] = Some(existing);
                    record.children[primary] = leaf;
                }
            }
            (Some(_), Some(_)) => {
                let pushed_id = self.allocate_id();
                let mut pushed = DockLayout::new(pushed_id, Some(layout));
                pushed.children = record.children;
                pushed.divider = record.divider;
                pushed.horizontal = record.horizontal;
                pushed.frame = record.frame;
                for child in pushed.children.iter().flatten() {
                    self.set_parent(*child, Some(pushed_id));
                }
                let _ = self.layouts.insert(pushed_id, pushed);
                if let Some(record) = self.layouts.get_mut(&layout) {
                    record.children[secondary] = Some(DockNode::Split(pushed_id));
                    record.children[primary] = leaf;
                    record.divider = DOCK_DIVIDER_AUTO;
                }
            }
        }

        if let Some(record) = self.layouts.get_mut(&layout) {
            record.horizontal = side.horizontal();
        }
    }

    fn dock_with_container(
        &mut self,
        owner: LayoutId,
        container: ContainerId,
        target: ContainerId,
        side: Side,
    ) {
        let (primary, secondary) = side.dock_order();
        let Some(record) = self.layouts.get(&owner) else {
            return;
        };
        let leaf = Some(DockNode::Leaf(container));

        match (record.children[primary], record.children[secondary]) {
            (None, _) => {
                if let Some(record) = self.layouts.get_mut(&owner) {
                    record.children[primary] = leaf;
                    record.horizontal = side.horizontal();
                }
            }
            (Some(existing), None) => {
                if let Some(record) = self.layouts.get_mut(&owner) {
                    record.children[secondary] = Some(existing);
                    record.children[primary] = leaf;
                    record.horizontal = side.horizontal();
                }
            }
            (Some(_), Some(_)) => {
                let Some(target_slot) = record.slot_of(DockNode::Leaf(target)) else {
                    return;
                };
                let owner_divider = record.divider;
                let split_id = self.allocate_id();
                let mut split = DockLayout::new(split_id, Some(owner));
                split.children[primary] = leaf;
                split.children[secondary] = Some(DockNode::Leaf(target));
                split.horizontal = side.horizontal();
                if target_slot == 0 {
                    split.divider = owner_divider;
                }
                let _ = self.layouts.insert(split_id, split);
                if let Some(record) = self.layouts.get_mut(&owner) {
                    record.children[target_slot] = Some(DockNode::Split(split_id));
                    if target_slot == 0 {
                        record.divider = DOCK_DIVIDER_AUTO;
                    }
                }
            }
        }
    }

    /// Remove `container` from the tree, collapsing layouts left with fewer
    /// than two children. Returns `false` if the container is not in the tree.
    pub fn remove(&mut self, container: ContainerId) -> bool {
        let Some(layout) = self.find_layout(container) else {
            return false;
        };
        if let Some(record) = self.layouts.get_mut(&layout) {
            for slot in &mut record.children {
                if *slot == Some(DockNode::Leaf(container)) {
                    *slot = None;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            container = container.get(),
            layout = layout.get(),
            "dock tree remove"
        );

        self.collapse(layout);
        true
    }

    fn collapse(&mut self, start: LayoutId) {
        let mut cursor = start;
        loop {
            let Some(record) = self.layouts.get(&cursor) else {
                return;
            };
            let parent = record.parent;
            let occupied: Vec<DockNode> = record.occupied().collect();
            match (parent, occupied.as_slice()) {
                (_, [_, _]) => return,
                (None, [DockNode::Split(only)]) => {
                    self.absorb_into_root(*only);
                    return;
                }
                (None, _) => return,
                (Some(parent), [only]) => {
                    let only = *only;
                    self.replace_child(parent, DockNode::Split(cursor), Some(only));
                    self.set_parent(only, Some(parent));
                    let _ = self.layouts.remove(&cursor);
                    cursor = parent;
                }
                (Some(parent), _) => {
                    self.replace_child(parent, DockNode::Split(cursor), None);
                    let _ = self.layouts.remove(&cursor);
                    cursor = parent;
                }
            }
        }
    }

    fn absorb_into_root(&mut self, child: LayoutId) {
        let Some(absorbed) = self.layouts.remove(&child) else {
            return;
        };
        let root = self.root;
        for node in absorbed.children.iter().flatten() {
            self.set_parent(*node, Some(root));
        }
        if let Some(record) = self.layouts.get_mut(&root) {
            record.children = absorbed.children;
            record.divider = absorbed.divider;
            record.horizontal = absorbed.horizontal;
        }
    }

    fn replace_child(&mut self, parent: LayoutId, old: DockNode, new: Option<DockNode>) {
        if let Some(record) = self.layouts.get_mut(&parent)
            && let Some(slot) = record.slot_of(old)
        {
            record.children[slot] = new;
        }
    }

    fn set_parent(&mut self, node: DockNode, parent: Option<LayoutId>) {
        if let DockNode::Split(id) = node
            && let Some(record) = self.layouts.get_mut(&id)
        {
            record.parent = parent;
        }
    }

    fn allocate_id(&mut self) -> LayoutId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Largest divider position: axis extent of the last frame minus the
    /// divider thickness, floored at 0.
    #[must_use]
    pub fn divider_maximum(&self, layout: LayoutId) -> f32 {
        let Some(record) = self.layouts.get(&layout) else {
            return 0.0;
        };
        (axis_extent(record.frame, record.horizontal) - self.divider_thickness).max(0.0)
    }

    /// Resolved divider position in `[0, divider_maximum()]`.
    ///
    /// The auto sentinel resolves to the extent slot 0 receives from the
    /// layout pass: half the available space when full, everything when
    /// slot 0 is the only child, nothing when slot 0 is vacant.
    #[must_use]
    pub fn divider_position(&self, layout: LayoutId) -> f32 {
        let Some(record) = self.layouts.get(&layout) else {
            return 0.0;
        };
        let maximum = self.divider_maximum(layout);
        let position = if record.divider >= 0.0 {
            record.divider
        } else if record.is_full() {
            maximum / 2.0
        } else if record.children[0].is_some() {
            axis_extent(record.frame, record.horizontal)
        } else {
            0.0
        };
        position.clamp(0.0, maximum)
    }

    /// Store an explicit divider position. Negative and non-finite values
    /// store 0; reads clamp against the current maximum. Returns whether the
    /// stored value changed.
    pub fn set_divider_position(&mut self, layout: LayoutId, position: f32) -> bool {
        let Some(record) = self.layouts.get_mut(&layout) else {
            return false;
        };
        let position = if position.is_finite() {
            position.max(0.0)
        } else {
            0.0
        };
        let changed = record.divider != position;
        record.divider = position;
        changed
    }

    /// Return the divider to the automatic 50/50 split.
    pub fn reset_divider(&mut self, layout: LayoutId) -> bool {
        let Some(record) = self.layouts.get_mut(&layout) else {
            return false;
        };
        let changed = record.divider >= 0.0;
        record.divider = DOCK_DIVIDER_AUTO;
        changed
    }

    /// Gap between the two children of a full layout.
    #[must_use]
    pub fn divider_rect(&self, layout: LayoutId) -> Option<Rect> {
        let record = self.layouts.get(&layout)?;
        if !record.is_full() {
            return None;
        }
        let frame = record.frame;
        let position = self.divider_position(layout);
        Some(if record.horizontal {
            Rect::new(
                frame.x + position,
                frame.y,
                self.divider_thickness,
                frame.height,
            )
        } else {
            Rect::new(
                frame.x,
                frame.y + position,
                frame.width,
                self.divider_thickness,
            )
        })
    }

    /// Full layouts (the ones with a divider), in id order.
    pub fn full_layouts(&self) -> impl Iterator<Item = LayoutId> + '_ {
        self.layouts
            .values()
            .filter(|record| record.is_full())
            .map(|record| record.id)
    }

    /// Assign frames to every layout and container.
    ///
    /// With a maximized container present in the tree, every other container
    /// is hidden and the maximized one receives the whole `frame`. Otherwise
    /// every container is shown and the tree is partitioned recursively.
    pub fn perform_layout<C: DockContainer>(
        &mut self,
        frame: Rect,
        containers: &mut BTreeMap<ContainerId, C>,
        maximized: Option<ContainerId>,
    ) {
        let maximized = maximized.filter(|id| self.find_layout(*id).is_some());
        let docked = self.containers();

        if let Some(maximized) = maximized {
            for id in &docked {
                if let Some(container) = containers.get_mut(id) {
                    container.set_hidden(*id != maximized);
                }
            }
            if let Some(record) = self.layouts.get_mut(&self.root) {
                record.frame = frame;
            }
            if let Some(container) = containers.get_mut(&maximized) {
                container.set_frame_rect(frame);
            }
            return;
        }

        for id in &docked {
            if let Some(container) = containers.get_mut(id) {
                container.set_hidden(false);
            }
        }
        self.layout_node(DockNode::Split(self.root), frame, containers);
    }

    fn layout_node<C: DockContainer>(
        &mut self,
        node: DockNode,
        frame: Rect,
        containers: &mut BTreeMap<ContainerId, C>,
    ) {
        let layout = match node {
            DockNode::Leaf(id) => {
                if let Some(container) = containers.get_mut(&id) {
                    container.set_frame_rect(frame);
                }
                return;
            }
            DockNode::Split(id) => id,
        };
        let Some(record) = self.layouts.get_mut(&layout) else {
            return;
        };
        record.frame = frame;
        let children = record.children;
        let horizontal = record.horizontal;
        let divider = record.divider;

        match children {
            [Some(first), Some(second)] => {
                let thickness = self.divider_thickness;
                let available = (axis_extent(frame, horizontal) - thickness).max(0.0);
                let primary = if divider < 0.0 {
                    available / 2.0
                } else {
                    divider.min(available)
                };
                let secondary = available - primary;
                let (first_frame, second_frame) = if horizontal {
                    (
                        Rect::new(frame.x, frame.y, primary, frame.height),
                        Rect::new(
                            frame.x + primary + thickness,
                            frame.y,
                            secondary,
                            frame.height,
                        ),
                    )
                } else {
                    (
                        Rect::new(frame.x, frame.y, frame.width, primary),
                        Rect::new(
                            frame.x,
                            frame.y + primary + thickness,
                            frame.width,
                            secondary,
                        ),
                    )
                };
                self.layout_node(first, first_frame, containers);
                self.layout_node(second, second_frame, containers);
            }
            [Some(only), None] | [None, Some(only)] => self.layout_node(only, frame, containers),
            [None, None] => {}
        }
    }

    /// Preferred size of the whole tree: leaf preferences combined along
    /// split axes plus one divider per full layout.
    #[must_use]
    pub fn preferred_size<C: DockLayoutNode>(&self, containers: &BTreeMap<ContainerId, C>) -> Size {
        self.preferred_node(DockNode::Split(self.root), containers)
    }

    fn preferred_node<C: DockLayoutNode>(
        &self,
        node: DockNode,
        containers: &BTreeMap<ContainerId, C>,
    ) -> Size {
        let layout = match node {
            DockNode::Leaf(id) => {
                return containers
                    .get(&id)
                    .map(|container| container.preferred_size())
                    .unwrap_or_default();
            }
            DockNode::Split(id) => id,
        };
        let Some(record) = self.layouts.get(&layout) else {
            return Size::default();
        };
        match record.children {
            [Some(first), Some(second)] => {
                let a = self.preferred_node(first, containers);
                let b = self.preferred_node(second, containers);
                if record.horizontal {
                    Size::new(
                        a.width + self.divider_thickness + b.width,
                        a.height.max(b.height),
                    )
                } else {
                    Size::new(
                        a.width.max(b.width),
                        a.height + self.divider_thickness + b.height,
                    )
                }
            }
            [Some(only), None] | [None, Some(only)] => self.preferred_node(only, containers),
            [None, None] => Size::default(),
        }
    }

    /// Deepest node under `point`.
    ///
    /// Leaves win over their layouts. A full layout is returned only when no
    /// child contains the point, i.e. the point lies in its divider gap.
    #[must_use]
    pub fn over_node<C: DockLayoutNode>(
        &self,
        point: Point,
        containers: &BTreeMap<ContainerId, C>,
    ) -> Option<DockNode> {
        self.over(DockNode::Split(self.root), point, containers)
    }

    fn over<C: DockLayoutNode>(
        &self,
        node: DockNode,
        point: Point,
        containers: &BTreeMap<ContainerId, C>,
    ) -> Option<DockNode> {
        match node {
            DockNode::Leaf(id) => containers
                .get(&id)
                .filter(|container| container.frame_rect().contains(point))
                .map(|_| node),
            DockNode::Split(id) => {
                let record = self.layouts.get(&id)?;
                if !record.frame.contains(point) {
                    return None;
                }
                record
                    .occupied()
                    .find_map(|child| self.over(child, point, containers))
                    .or_else(|| record.is_full().then_some(node))
            }
        }
    }

    /// Frame of any node: a layout's cached frame or a container's frame.
    #[must_use]
    pub fn node_frame<C: DockLayoutNode>(
        &self,
        node: DockNode,
        containers: &BTreeMap<ContainerId, C>,
    ) -> Option<Rect> {
        match node {
            DockNode::Split(id) => self.layouts.get(&id).map(|record| record.frame),
            DockNode::Leaf(id) => containers.get(&id).map(|container| container.frame_rect()),
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), DockTreeError> {
        let root = self
            .layouts
            .get(&self.root)
            .ok_or(DockTreeError::MissingRoot { root: self.root })?;
        if let Some(parent) = root.parent {
            return Err(DockTreeError::RootHasParent {
                root: self.root,
                parent,
            });
        }

        let mut visited = BTreeSet::new();
        let mut leaves = BTreeSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(DockTreeError::CycleDetected { layout: id });
            }
            let record = self
                .layouts
                .get(&id)
                .ok_or(DockTreeError::MissingRoot { root: id })?;
            let occupied: Vec<DockNode> = record.occupied().collect();
            let lone_split_root =
                record.parent.is_none() && matches!(occupied.as_slice(), [DockNode::Split(_)]);
            if (record.parent.is_some() && occupied.len() != 2) || lone_split_root {
                return Err(DockTreeError::ShapeViolation {
                    layout: id,
                    children: occupied.len(),
                });
            }
            for child in occupied {
                match child {
                    DockNode::Leaf(container) => {
                        if !leaves.insert(container) {
                            return Err(DockTreeError::DuplicateContainer { container });
                        }
                    }
                    DockNode::Split(child_id) => {
                        let child_record = self.layouts.get(&child_id).ok_or(
                            DockTreeError::MissingLayout {
                                parent: id,
                                child: child_id,
                            },
                        )?;
                        if child_record.parent != Some(id) {
                            return Err(DockTreeError::ParentMismatch {
                                layout: child_id,
                                expected: id,
                                actual: child_record.parent,
                            });
                        }
                        stack.push(child_id);
                    }
                }
            }
        }

        if let Some(orphan) = self.layouts.keys().find(|id| !visited.contains(*id)) {
            return Err(DockTreeError::UnreachableLayout { layout: *orphan });
        }
        Ok(())
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, node: Option<DockNode>, depth: usize) -> fmt::Result {
        let indent = depth * 2;
        match node {
            None => writeln!(f, "{:indent$}-", ""),
            Some(DockNode::Leaf(id)) => writeln!(f, "{:indent$}leaf#{}", "", id.get()),
            Some(DockNode::Split(id)) => {
                let Some(record) = self.layouts.get(&id) else {
                    return writeln!(f, "{:indent$}split#{} <missing>", "", id.get());
                };
                let axis = if record.horizontal {
                    "horizontal"
                } else {
                    "vertical"
                };
                if record.divider < 0.0 {
                    writeln!(f, "{:indent$}split#{} {axis} divider=auto", "", id.get())?;
                } else {
                    writeln!(
                        f,
                        "{:indent$}split#{} {axis} divider={}",
                        "",
                        id.get(),
                        record.divider
                    )?;
                }
                for child in record.children {
                    self.fmt_node(f, child, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DockTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, Some(DockNode::Split(self.root)), 0)
    }
}

fn axis_extent(frame: Rect, horizontal: bool) -> f32 {
    if horizontal { frame.width } else { frame.height }
}

/// Structural invariant violations reported by [`DockTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockTreeError {
    MissingRoot {
        root: LayoutId,
    },
    RootHasParent {
        root: LayoutId,
        parent: LayoutId,
    },
    MissingLayout {
        parent: LayoutId,
        child: LayoutId,
    },
    ParentMismatch {
        layout: LayoutId,
        expected: LayoutId,
        actual: Option<LayoutId>,
    },
    CycleDetected {
        layout: LayoutId,
    },
    DuplicateContainer {
        container: ContainerId,
    },
    ShapeViolation {
        layout: LayoutId,
        children: usize,
    },
    UnreachableLayout {
        layout: LayoutId,
    },
    /// A tree slot references a container the dock does not own.
    UnknownContainer {
        container: ContainerId,
    },
    /// A docked container hosts no dockables.
    EmptyContainer {
        container: ContainerId,
    },
    /// The dockable index disagrees with the containers' dockable lists.
    IndexMismatch {
        dockable: DockableId,
    },
}

impl fmt::Display for DockTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot { root } => write!(f, "layout {} not found", root.get()),
            Self::RootHasParent { root, parent } => write!(
                f,
                "root layout {} must not have parent {}",
                root.get(),
                parent.get()
            ),
            Self::MissingLayout { parent, child } => write!(
                f,
                "layout {} references missing child layout {}",
                parent.get(),
                child.get()
            ),
            Self::ParentMismatch {
                layout,
                expected,
                actual,
            } => write!(
                f,
                "layout {} parent mismatch: expected {}, got {:?}",
                layout.get(),
                expected.get(),
                actual.map(LayoutId::get)
            ),
            Self::CycleDetected { layout } => {
                write!(f, "cycle detected at layout {}", layout.get())
            }
            Self::DuplicateContainer { container } => {
                write!(f, "container {} appears in more than one slot", container.get())
            }
            Self::ShapeViolation { layout, children } => write!(
                f,
                "layout {} holds {children} children; non-root layouts must hold 2",
                layout.get()
            ),
            Self::UnreachableLayout { layout } => {
                write!(f, "layout {} is not reachable from the root", layout.get())
            }
            Self::UnknownContainer { container } => {
                write!(f, "container {} is docked but not owned", container.get())
            }
            Self::EmptyContainer { container } => {
                write!(f, "container {} is docked with no dockables", container.get())
            }
            Self::IndexMismatch { dockable } => {
                write!(f, "dockable {} index entry disagrees with its container", dockable.get())
            }
        }
    }
}

impl std::error::Error for DockTreeError {}
