//! Capability queries the generator asks of the host's symbol layer.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::model::{MemberModel, TypeModel, TypeRef};

bitflags! {
    /// Where an attribute may be applied, as declared by its usage attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AttributeTargets: u32 {
        const ASSEMBLY = 1;
        const MODULE = 1 << 1;
        const CLASS = 1 << 2;
        const STRUCT = 1 << 3;
        const ENUM = 1 << 4;
        const CONSTRUCTOR = 1 << 5;
        const METHOD = 1 << 6;
        const PROPERTY = 1 << 7;
        const FIELD = 1 << 8;
        const EVENT = 1 << 9;
        const INTERFACE = 1 << 10;
        const PARAMETER = 1 << 11;
        const DELEGATE = 1 << 12;
        const RETURN_VALUE = 1 << 13;
        const GENERIC_PARAMETER = 1 << 14;
    }
}

/// Answers the semantic questions a member model alone cannot: type shapes, ancestry and
/// attribute usage declarations.
pub trait SymbolOracle: Send + Sync {
    fn is_static_type(&self, ty: &TypeRef) -> bool;

    fn is_abstract_type(&self, ty: &TypeRef) -> bool;

    /// Whether `ty` is the type named `base` or has it as an ancestor.
    fn is_or_derives_from(&self, ty: &TypeRef, base: &str) -> bool;

    fn supports_collection_notification(&self, ty: &TypeRef) -> bool;

    fn attribute_targets(&self, attribute: &TypeRef) -> Option<AttributeTargets>;

    /// Whether an ancestor of the type already provides property-change notification.
    fn inherits_notification(&self, ty: &TypeModel) -> bool;

    /// Whether the base method overridden by `method` already carries CommandMethod.
    fn overridden_has_command(&self, ty: &TypeModel, method: &MemberModel) -> bool;
}

/// Table-driven [`SymbolOracle`]. Names are matched either fully qualified or by their
/// simple name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnownTypes {
    pub static_types: BTreeSet<String>,
    pub abstract_types: BTreeSet<String>,
    /// Type name -> direct base type name.
    pub base_types: BTreeMap<String, String>,
    pub collection_notifying: BTreeSet<String>,
    pub attribute_usages: BTreeMap<String, AttributeTargets>,
    /// Types that already implement property-change notification.
    pub notifying_types: BTreeSet<String>,
    /// Command methods declared on other types, as `Type.Method`.
    pub command_methods: BTreeSet<String>,
}

const QUALIFIED_NAME_SEP: char = '.';

fn simple_name(name: &str) -> &str {
    name.rsplit(QUALIFIED_NAME_SEP).next().unwrap_or(name)
}

impl KnownTypes {
    /// Facts about the base class library the generator relies on.
    pub fn standard() -> Self {
        let mut known = KnownTypes::default();
        for name in [
            "System.Math",
            "System.Console",
            "System.Convert",
            "System.Environment",
            "System.IO.File",
            "System.IO.Path",
        ] {
            known.static_types.insert(name.to_string());
        }
        for name in ["System.IO.Stream", "System.Array", "System.Enum"] {
            known.abstract_types.insert(name.to_string());
        }
        for (ty, base) in [
            ("System.ComponentModel.PropertyChangedEventArgs", "System.EventArgs"),
            (
                "System.Collections.Specialized.NotifyCollectionChangedEventArgs",
                "System.EventArgs",
            ),
            (
                "System.Collections.ObjectModel.ObservableCollection",
                "System.Collections.ObjectModel.Collection",
            ),
            (
                "System.Collections.ObjectModel.ReadOnlyObservableCollection",
                "System.Collections.ObjectModel.ReadOnlyCollection",
            ),
        ] {
            known.base_types.insert(ty.to_string(), base.to_string());
        }
        for name in [
            "System.Collections.Specialized.INotifyCollectionChanged",
            "System.Collections.ObjectModel.ObservableCollection",
            "System.Collections.ObjectModel.ReadOnlyObservableCollection",
        ] {
            known.collection_notifying.insert(name.to_string());
        }
        let member_targets = AttributeTargets::PROPERTY | AttributeTargets::FIELD;
        for (attribute, targets) in [
            ("System.Text.Json.Serialization.JsonIgnoreAttribute", member_targets),
            ("System.Text.Json.Serialization.JsonPropertyNameAttribute", member_targets),
            ("Newtonsoft.Json.JsonIgnoreAttribute", member_targets | AttributeTargets::PARAMETER),
            (
                "Newtonsoft.Json.JsonConverterAttribute",
                member_targets
                    | AttributeTargets::CLASS
                    | AttributeTargets::STRUCT
                    | AttributeTargets::ENUM
                    | AttributeTargets::INTERFACE
                    | AttributeTargets::PARAMETER,
            ),
            (
                "System.ComponentModel.DataAnnotations.RequiredAttribute",
                member_targets | AttributeTargets::PARAMETER,
            ),
            ("System.NonSerializedAttribute", AttributeTargets::FIELD),
        ] {
            known.attribute_usages.insert(attribute.to_string(), targets);
        }
        known
    }

    /// Merge another table into this one; entries from `other` win on conflicting keys.
    pub fn merge(mut self, other: KnownTypes) -> Self {
        self.static_types.extend(other.static_types);
        self.abstract_types.extend(other.abstract_types);
        self.base_types.extend(other.base_types);
        self.collection_notifying.extend(other.collection_notifying);
        self.attribute_usages.extend(other.attribute_usages);
        self.notifying_types.extend(other.notifying_types);
        self.command_methods.extend(other.command_methods);
        self
    }

    fn contains(set: &BTreeSet<String>, name: &str) -> bool {
        set.contains(name) || set.iter().any(|entry| simple_name(entry) == simple_name(name))
    }

    fn lookup<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
        map.get(name).or_else(|| {
            map.iter()
                .find(|(key, _)| simple_name(key) == simple_name(name))
                .map(|(_, value)| value)
        })
    }

    /// The type itself followed by each known ancestor. Stops at the first repeated name.
    fn ancestry(&self, name: &str) -> Vec<String> {
        let mut chain = vec![name.to_string()];
        let mut seen = HashSet::new();
        seen.insert(simple_name(name).to_string());
        let mut current = name.to_string();
        while let Some(base) = Self::lookup(&self.base_types, &current) {
            if !seen.insert(simple_name(base).to_string()) {
                break;
            }
            chain.push(base.clone());
            current = base.clone();
        }
        chain
    }
}

impl SymbolOracle for KnownTypes {
    fn is_static_type(&self, ty: &TypeRef) -> bool {
        ty.array_rank == 0 && Self::contains(&self.static_types, &ty.qualified_name())
    }

    fn is_abstract_type(&self, ty: &TypeRef) -> bool {
        ty.array_rank == 0 && Self::contains(&self.abstract_types, &ty.qualified_name())
    }

    fn is_or_derives_from(&self, ty: &TypeRef, base: &str) -> bool {
        if ty.array_rank > 0 {
            return false;
        }
        self.ancestry(&ty.qualified_name())
            .iter()
            .any(|name| name == base || simple_name(name) == simple_name(base))
    }

    fn supports_collection_notification(&self, ty: &TypeRef) -> bool {
        if ty.array_rank > 0 {
            return false;
        }
        self.ancestry(&ty.qualified_name())
            .iter()
            .any(|name| Self::contains(&self.collection_notifying, name))
    }

    fn attribute_targets(&self, attribute: &TypeRef) -> Option<AttributeTargets> {
        Self::lookup(&self.attribute_usages, &attribute.qualified_name()).copied()
    }

    fn inherits_notification(&self, ty: &TypeModel) -> bool {
        let Some(base) = &ty.base_type else {
            return false;
        };
        self.ancestry(base)
            .iter()
            .any(|name| Self::contains(&self.notifying_types, name))
    }

    fn overridden_has_command(&self, ty: &TypeModel, method: &MemberModel) -> bool {
        if !method.is_override {
            return false;
        }
        let Some(base) = &ty.base_type else {
            return false;
        };
        self.ancestry(base).iter().any(|name| {
            let key = format!("{}.{}", name, method.name);
            self.command_methods.contains(&key)
                || self.command_methods.iter().any(|entry| {
                    entry.rsplit_once(QUALIFIED_NAME_SEP).map_or(false, |(owner, m)| {
                        m == method.name && simple_name(owner) == simple_name(name)
                    })
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_args_ancestry_is_known() {
        let known = KnownTypes::standard();
        let args = TypeRef::new("NotifyCollectionChangedEventArgs")
            .in_namespace("System.Collections.Specialized");
        assert!(known.is_or_derives_from(&args, "NotifyCollectionChangedEventArgs"));
        assert!(known.is_or_derives_from(&args, "EventArgs"));
        let plain = TypeRef::new("EventArgs").in_namespace("System");
        assert!(!known.is_or_derives_from(&plain, "NotifyCollectionChangedEventArgs"));
    }

    #[test]
    fn observable_collection_supports_collection_notification() {
        let known = KnownTypes::standard();
        let collection = TypeRef::new("ObservableCollection")
            .in_namespace("System.Collections.ObjectModel")
            .with_args(vec![TypeRef::new("string")]);
        assert!(known.supports_collection_notification(&collection));
        assert!(!known.supports_collection_notification(&TypeRef::new("List")));
    }

    #[test]
    fn custom_collections_inherit_the_capability() {
        let mut known = KnownTypes::standard();
        known
            .base_types
            .insert("App.Models.ItemList".into(), "ObservableCollection".into());
        let list = TypeRef::new("ItemList").in_namespace("App.Models");
        assert!(known.supports_collection_notification(&list));
    }

    #[test]
    fn ancestry_cycles_terminate() {
        let mut known = KnownTypes::default();
        known.base_types.insert("A".into(), "B".into());
        known.base_types.insert("B".into(), "A".into());
        assert!(!known.is_or_derives_from(&TypeRef::new("A"), "C"));
    }

    #[test]
    fn attribute_usage_lookup_by_simple_name() {
        let known = KnownTypes::standard();
        let targets = known
            .attribute_targets(&TypeRef::new("NonSerializedAttribute"))
            .unwrap();
        assert!(!targets.contains(AttributeTargets::PROPERTY));
        assert_eq!(known.attribute_targets(&TypeRef::new("UnknownAttribute")), None);
    }

    #[test]
    fn override_of_command_is_detected_through_base_chain() {
        let mut known = KnownTypes::default();
        known.base_types.insert("Middle".into(), "Root".into());
        known.command_methods.insert("App.Root.Save".into());
        let ty = TypeModel::new("Leaf").with_base("Middle");
        let method = MemberModel::method("Save", TypeRef::void()).into_override();
        assert!(known.overridden_has_command(&ty, &method));
        let plain = MemberModel::method("Save", TypeRef::void());
        assert!(!known.overridden_has_command(&ty, &plain));
    }
}
