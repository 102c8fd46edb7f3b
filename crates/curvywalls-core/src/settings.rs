//! Tool options consumed from the host's settings store.

use serde::{Deserialize, Serialize};

/// Default segment resolution for new sessions.
pub const DEFAULT_SEGMENTS: u32 = 10;

/// Modifier key required to start a fresh placement click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropKey {
    /// Any plain left click places the tool.
    #[default]
    None,
    /// Placement requires Ctrl held.
    Ctrl,
    /// Placement requires Alt held.
    Alt,
}

/// Options for the curve tools. Storage and UI stay with the host; this is
/// the value the host hands over (and persists on change).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Modifier gate for placement clicks.
    #[serde(default)]
    pub drop_key: DropKey,
    /// Segment resolution applied when the manager is constructed.
    #[serde(default = "default_segments")]
    pub default_segments: u32,
}

fn default_segments() -> u32 {
    DEFAULT_SEGMENTS
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            drop_key: DropKey::default(),
            default_segments: DEFAULT_SEGMENTS,
        }
    }
}
