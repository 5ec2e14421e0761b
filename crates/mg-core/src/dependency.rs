use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A DependsOn entry that names nothing the type declares or generates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissingDependency {
    /// Member carrying the DependsOn annotation.
    pub member: String,
    /// The name as written in the annotation.
    pub name: String,
}

/// Producer -> consumers. Keys keep the order in which their first edge was added, so
/// every traversal over the map is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyMap {
    edges: IndexMap<String, IndexSet<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    missing: Vec<MissingDependency>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `producer -> consumer`; returns false when the edge already existed.
    pub fn add_edge(&mut self, producer: impl Into<String>, consumer: impl Into<String>) -> bool {
        self.edges
            .entry(producer.into())
            .or_default()
            .insert(consumer.into())
    }

    /// Set union per key with another map, keeping this map's key order first.
    pub fn merge(&mut self, other: &DependencyMap) {
        for (producer, consumers) in &other.edges {
            for consumer in consumers {
                self.add_edge(producer.clone(), consumer.clone());
            }
        }
        for missing in &other.missing {
            self.record_missing(missing.clone());
        }
    }

    pub fn record_missing(&mut self, missing: MissingDependency) {
        if !self.missing.contains(&missing) {
            self.missing.push(missing);
        }
    }

    pub fn missing(&self) -> &[MissingDependency] {
        &self.missing
    }

    pub fn missing_for<'a>(
        &'a self,
        member: &'a str,
    ) -> impl Iterator<Item = &'a MissingDependency> + 'a {
        self.missing.iter().filter(move |m| m.member == member)
    }

    /// Consumers to notify when `producer` changes, in insertion order.
    pub fn consumers<'a>(&'a self, producer: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .get(producer)
            .into_iter()
            .flat_map(|consumers| consumers.iter().map(String::as_str))
    }

    pub fn producers(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.edges.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_producer(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Every edge as an ordered pair set, for order-insensitive comparisons.
    pub fn edge_set(&self) -> BTreeSet<(String, String)> {
        self.edges
            .iter()
            .flat_map(|(producer, consumers)| {
                consumers
                    .iter()
                    .map(move |consumer| (producer.clone(), consumer.clone()))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
