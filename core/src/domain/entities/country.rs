//! Country reference entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A country reference record. The gateway poller get-or-creates the
/// configured home country before filing numbers under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Unique identifier for the country
    pub id: Uuid,

    /// Lowercased unique country name
    pub name: String,
}

impl Country {
    /// Creates a new country with a normalized (lowercased) name
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_lowercase(),
        }
    }
}
