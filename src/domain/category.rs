//! Domain types representing jar categories.

use serde::{Deserialize, Serialize};

/// Named grouping of jars. Every jar references exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}
