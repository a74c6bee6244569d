//! Raw-state export of an entity.

use entirec_value::Fields;
use serde::Serialize;

/// Options for [`Entity::export`](crate::Entity::export).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Include resolved virtual fields under the `virtual` key.
    pub virtual_fields: bool,
}

impl ExportOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the `virtual` key.
    #[must_use]
    pub const fn with_virtual(mut self) -> Self {
        self.virtual_fields = true;
        self
    }
}

/// Snapshot of an entity's raw state.
///
/// Serialises to a map with keys `exists`, `data`, `update` and
/// `increment`, plus `virtual` when it was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    /// Whether the record is persisted.
    pub exists: bool,
    /// Baseline values.
    pub data: Fields,
    /// Pending assignments.
    pub update: Fields,
    /// Pending counter deltas.
    pub increment: Fields,
    /// Resolved virtual fields, when requested.
    #[serde(rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub virtual_fields: Option<Fields>,
}
