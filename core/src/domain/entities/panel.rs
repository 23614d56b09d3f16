//! Gateway panel configuration entity.

use serde::{Deserialize, Serialize};

/// Configuration record holding the gateway status feed URL.
/// Read-only from the pollers' perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Unique panel code
    pub code: u32,

    /// Gateway status feed URL
    pub url: String,
}
