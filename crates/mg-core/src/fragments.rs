//! Text fragments contributed by emitters and their aggregation into one unit per type.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::TypeModel;

/// What one member (or one emitter pass) contributes to the declaring type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragments {
    pub usings: Vec<String>,
    pub interfaces: Vec<String>,
    pub nested_types: Vec<String>,
    pub implementations: Vec<String>,
    pub fields: Vec<String>,
    pub properties: Vec<String>,
    pub static_fields: Vec<String>,
    pub static_properties: Vec<String>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.usings.is_empty()
            && self.interfaces.is_empty()
            && self.nested_types.is_empty()
            && self.implementations.is_empty()
            && self.fields.is_empty()
            && self.properties.is_empty()
            && self.static_fields.is_empty()
            && self.static_properties.is_empty()
    }

    pub fn using(&mut self, namespace: &str) {
        self.usings.push(format!("using {};", namespace));
    }

    pub fn append(&mut self, other: Fragments) {
        self.usings.extend(other.usings);
        self.interfaces.extend(other.interfaces);
        self.nested_types.extend(other.nested_types);
        self.implementations.extend(other.implementations);
        self.fields.extend(other.fields);
        self.properties.extend(other.properties);
        self.static_fields.extend(other.static_fields);
        self.static_properties.extend(other.static_properties);
    }
}

/// The merged, de-duplicated output for one declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedUnit {
    pub type_name: String,
    pub namespace: Option<String>,
    /// Sorted.
    pub usings: Vec<String>,
    pub interfaces: Vec<String>,
    pub nested_types: Vec<String>,
    pub implementations: Vec<String>,
    pub fields: Vec<String>,
    pub properties: Vec<String>,
    pub static_fields: Vec<String>,
    pub static_properties: Vec<String>,
}

fn first_seen(entries: Vec<String>) -> Vec<String> {
    entries.into_iter().unique().collect()
}

/// Merge every fragment list contributed for `ty`. Returns `None` when nothing at all was
/// contributed, in which case the type is left untouched.
pub fn aggregate<I>(ty: &TypeModel, fragments: I) -> Option<GeneratedUnit>
where
    I: IntoIterator<Item = Fragments>,
{
    let mut merged = Fragments::new();
    for fragment in fragments {
        merged.append(fragment);
    }
    if merged.is_empty() {
        return None;
    }

    Some(GeneratedUnit {
        type_name: ty.name.clone(),
        namespace: ty.namespace.clone(),
        usings: merged.usings.into_iter().sorted().dedup().collect(),
        interfaces: first_seen(merged.interfaces),
        nested_types: first_seen(merged.nested_types),
        implementations: first_seen(merged.implementations),
        fields: first_seen(merged.fields),
        properties: first_seen(merged.properties),
        static_fields: first_seen(merged.static_fields),
        static_properties: first_seen(merged.static_properties),
    })
}
