// Fact Domain Model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A trait/value pair used to parameterize command templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub value: String,
}

impl Fact {
    pub fn new(trait_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_name: trait_name.into(),
            value: value.into(),
        }
    }

    /// Dedup key (trait + value)
    pub fn unique(&self) -> String {
        format!("{}{}", self.trait_name, self.value)
    }
}

/// Fact source record as loaded from a data file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub facts: Vec<Fact>,
}

impl Source {
    pub fn new(facts: Vec<Fact>) -> Self {
        Self { facts }
    }

    /// Flatten the source into the trait -> facts mapping used for expansion
    pub fn into_store(self) -> FactStore {
        self.facts.into_iter().collect()
    }
}

/// Trait -> ordered facts multimap
///
/// Read-only once an operation starts. Facts keep their insertion order
/// within a trait, which fixes the order of generated commands.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    facts: HashMap<String, Vec<Fact>>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fact: Fact) {
        self.facts
            .entry(fact.trait_name.clone())
            .or_default()
            .push(fact);
    }

    /// Facts for a trait (empty slice if the trait is unknown)
    pub fn get(&self, trait_name: &str) -> &[Fact] {
        self.facts
            .get(trait_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_trait(&self, trait_name: &str) -> bool {
        self.facts.contains_key(trait_name)
    }

    /// Total number of facts across all traits
    pub fn len(&self) -> usize {
        self.facts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl FromIterator<Fact> for FactStore {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut store = FactStore::new();
        for fact in iter {
            store.insert(fact);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_preserves_insertion_order_per_trait() {
        let store: FactStore = vec![
            Fact::new("host.user", "alice"),
            Fact::new("host.ip", "10.0.0.5"),
            Fact::new("host.user", "bob"),
        ]
        .into_iter()
        .collect();

        let users: Vec<&str> = store.get("host.user").iter().map(|f| f.value.as_str()).collect();
        assert_eq!(users, vec!["alice", "bob"]);
        assert_eq!(store.len(), 3);
        assert!(store.get("missing").is_empty());
    }

    #[test]
    fn test_source_deserializes_trait_field() {
        let source: Source = serde_json::from_value(serde_json::json!({
            "facts": [{"trait": "file.path", "value": "/tmp/x"}]
        }))
        .unwrap();

        let store = source.into_store();
        assert!(store.contains_trait("file.path"));
        assert_eq!(store.get("file.path")[0].unique(), "file.path/tmp/x");
    }
}
