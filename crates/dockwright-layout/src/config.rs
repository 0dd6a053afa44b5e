#![forbid(unsafe_code)]

//! Dock tuning parameters.
//!
//! ```rust,ignore
//! let config = DockConfig::from_json_str(r#"{ "divider_thickness": 6.0 }"#)?;
//! ```
//!
//! Missing fields keep their defaults.

use dockwright_core::geometry::Insets;
use serde::{Deserialize, Serialize};

use crate::session::DIVIDER_DRAG_DEFAULT_THRESHOLD;
use crate::tree::DOCK_DEFAULT_DIVIDER_THICKNESS;

/// Configuration for a [`Dock`](crate::dock::Dock).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Gap between the two children of a full layout.
    pub divider_thickness: f32,
    /// Pointer travel (strictly exceeded) before a divider press becomes a drag.
    pub drag_threshold: f32,
    /// Shrinks the frame passed to [`Dock::layout`](crate::dock::Dock::layout).
    pub insets: Insets,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            divider_thickness: DOCK_DEFAULT_DIVIDER_THICKNESS,
            drag_threshold: DIVIDER_DRAG_DEFAULT_THRESHOLD,
            insets: Insets::default(),
        }
    }
}

impl DockConfig {
    #[must_use]
    pub fn with_divider_thickness(mut self, thickness: f32) -> Self {
        self.divider_thickness = thickness;
        self
    }

    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Check every field, collecting all problems.
    pub fn validate(&self) -> Result<(), DockConfigError> {
        let mut errors = Vec::new();
        if !self.divider_thickness.is_finite() || self.divider_thickness < 0.0 {
            errors.push(format!(
                "divider_thickness must be finite and >= 0, got {}",
                self.divider_thickness
            ));
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            errors.push(format!(
                "drag_threshold must be finite and >= 0, got {}",
                self.drag_threshold
            ));
        }
        if self.insets.is_degenerate() {
            errors.push(format!(
                "insets must be finite and >= 0, got {:?}",
                self.insets
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DockConfigError::Validation(errors))
        }
    }

    /// Parse from a JSON string and validate.
    #[cfg(feature = "config-json")]
    pub fn from_json_str(s: &str) -> Result<Self, DockConfigError> {
        let config: Self = serde_json::from_str(s).map_err(DockConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors from loading or validating a [`DockConfig`].
#[derive(Debug)]
pub enum DockConfigError {
    /// JSON parse error.
    #[cfg(feature = "config-json")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for DockConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "config-json")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for DockConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config-json")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
