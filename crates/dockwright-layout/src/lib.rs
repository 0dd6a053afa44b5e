#![forbid(unsafe_code)]

//! Docking layout engine.
//!
//! Panels ("dockables") live as tabs in containers; containers sit in the
//! leaves of a binary space-partition tree of [`DockLayout`]s. A [`Dock`]
//! owns that tree and the containers, and drives it from three kinds of
//! input: explicit calls ([`Dock::dock_to`], [`Dock::stack`],
//! [`Dock::close`]), divider drags (`mouse_down`/`mouse_drag`/`mouse_up`),
//! and drag-and-drop of tabs (`data_drag_over`/`data_drop`).
//!
//! ```rust,ignore
//! let keys = DragKeyGenerator::new();
//! let mut dock: Dock = Dock::new(DockConfig::default(), &keys, ())?;
//! dock.dock_to(editor, None, Side::Left);
//! dock.dock_to(console, Some(DockNode::Leaf(dock.container_of(editor)?)), Side::Bottom);
//! dock.layout(Rect::new(0.0, 0.0, 1280.0, 800.0));
//! ```
//!
//! # Feature flags
//! - `tracing`: emit `dock.mutation` spans and debug/trace events.
//! - `config-json`: [`DockConfig::from_json_str`].

pub mod config;
pub mod container;
pub mod dock;
pub mod keys;
pub mod overlay;
pub mod session;
pub mod side;
pub mod tree;

pub use config::{DockConfig, DockConfigError};
pub use container::{ContainerId, DockContainer, DockLayoutNode, TabGroup};
pub use dock::{Dock, DockListener};
pub use dockwright_core::event::{DockableId, DragData, DragPayload, PointerButton};
pub use dockwright_core::geometry::{Insets, Point, Rect, Size};
pub use keys::{DragKey, DragKeyGenerator};
pub use overlay::{DockCanvas, DockCursor, DockDrawCommand, DockInk};
pub use session::{
    DividerDragEffect, DividerDragMachine, DividerDragState, DividerDragTransition, DropSession,
    DropState,
};
pub use side::Side;
pub use tree::{
    DOCK_DEFAULT_DIVIDER_THICKNESS, DOCK_DIVIDER_AUTO, DockLayout, DockNode, DockTree,
    DockTreeError, LayoutId,
};
