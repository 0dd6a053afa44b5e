#![forbid(unsafe_code)]

//! Pointer and drag-and-drop payload types.
//!
//! Hosts translate their native pointer events into calls on the dock with
//! plain [`Point`](crate::geometry::Point) coordinates. Drag-and-drop goes
//! through the host's generic data channel, which carries a [`DragData`]
//! map. Each dock only looks at the entry stored under its own key, so two
//! docks living side by side never accept each other's drags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Host-chosen identity of a dockable panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DockableId(u64);

impl DockableId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Pointer button for press/release events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// One value carried by the drag channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DragPayload {
    /// A dockable being dragged by its tab.
    Dockable(DockableId),
    /// Free-form text (file paths, URLs) from other drag sources.
    Text(String),
}

/// String-keyed payload map for one drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragData {
    entries: BTreeMap<String, DragPayload>,
}

impl DragData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a payload map holding exactly one entry.
    #[must_use]
    pub fn single(key: impl Into<String>, payload: DragPayload) -> Self {
        let mut data = Self::new();
        data.insert(key, payload);
        data
    }

    /// Insert or replace the payload stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, payload: DragPayload) -> Option<DragPayload> {
        self.entries.insert(key.into(), payload)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DragPayload> {
        self.entries.get(key)
    }

    /// The dockable stored under `key`, if that entry is a dockable.
    #[must_use]
    pub fn dockable(&self, key: &str) -> Option<DockableId> {
        match self.get(key) {
            Some(DragPayload::Dockable(id)) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DragPayload)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dockable_lookup_requires_matching_key_and_kind() {
        let mut data = DragData::single("dock-1", DragPayload::Dockable(DockableId::new(7)));
        data.insert("text/plain", DragPayload::Text("hello".into()));

        assert_eq!(data.dockable("dock-1"), Some(DockableId::new(7)));
        assert_eq!(data.dockable("dock-2"), None);
        assert_eq!(data.dockable("text/plain"), None);
        assert_eq!(data.iter().count(), 2);
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut data = DragData::new();
        assert!(data.is_empty());
        assert!(
            data.insert("k", DragPayload::Dockable(DockableId::new(1)))
                .is_none()
        );
        let previous = data.insert("k", DragPayload::Dockable(DockableId::new(2)));
        assert_eq!(previous, Some(DragPayload::Dockable(DockableId::new(1))));
        assert_eq!(data.dockable("k"), Some(DockableId::new(2)));
    }

    #[test]
    fn payload_json_is_tagged() {
        let json = serde_json::to_value(DragPayload::Dockable(DockableId::new(3)))
            .expect("payload should serialize");
        assert_eq!(json["kind"], serde_json::json!("dockable"));
        assert_eq!(json["value"], serde_json::json!(3));
    }
}
