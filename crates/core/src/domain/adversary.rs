// Adversary Domain Model

use serde::{Deserialize, Serialize};

/// Named, ordered attack profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
    #[serde(default, rename = "adversary_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ability ids in intended execution order
    #[serde(default)]
    pub atomic_ordering: Vec<String>,
}

impl Adversary {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        atomic_ordering: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            atomic_ordering,
        }
    }
}
