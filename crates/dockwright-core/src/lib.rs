#![forbid(unsafe_code)]

//! Core: host-agnostic primitives shared by the dockwright crates.
//!
//! # Role in dockwright
//! `dockwright-core` carries the vocabulary the layout engine speaks with its
//! host: logical-unit geometry and the payload map that rides the host's
//! generic drag-and-drop channel. It knows nothing about trees or docks.
//!
//! # Primary responsibilities
//! - **Geometry**: [`Point`], [`Size`], [`Rect`], [`Insets`] in `f32` logical units.
//! - **Drag payloads**: [`DragData`], a string-keyed map carrying dragged
//!   dockables between drag sources and drop targets.

pub mod event;
pub mod geometry;

pub use event::{DockableId, DragData, DragPayload, PointerButton};
pub use geometry::{Insets, Point, Rect, Size};
