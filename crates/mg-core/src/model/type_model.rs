use serde::{Deserialize, Serialize};

use super::member::{MemberKind, MemberModel};
use super::ty::TypeRef;

/// Everything the generator knows about one declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberModel>,
}

impl TypeModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            base_type: None,
            members: Vec::new(),
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn with_member(mut self, member: MemberModel) -> Self {
        self.members.push(member);
        self
    }

    /// The type as a [`TypeRef`] for symbol oracle queries.
    pub fn as_type_ref(&self) -> TypeRef {
        let ty = TypeRef::new(self.name.clone());
        match &self.namespace {
            Some(ns) => ty.in_namespace(ns.clone()),
            None => ty,
        }
    }

    pub fn qualified_name(&self) -> String {
        self.as_type_ref().qualified_name()
    }

    pub fn member(&self, name: &str) -> Option<&MemberModel> {
        self.members.iter().find(|m| m.name == name)
    }

    /// First method with the given name; overloads are not distinguished.
    pub fn method(&self, name: &str) -> Option<&MemberModel> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Method && m.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &MemberModel> {
        self.members.iter().filter(|m| m.kind == MemberKind::Field)
    }

    pub fn properties(&self) -> impl Iterator<Item = &MemberModel> {
        self.members.iter().filter(|m| m.kind == MemberKind::Property)
    }

    pub fn backing_fields(&self) -> impl Iterator<Item = &MemberModel> {
        self.members.iter().filter(|m| m.is_backing_field())
    }

    /// Whether a hand-written member (anything not produced by generation) already uses
    /// this name.
    pub fn has_declared_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| !m.is_generated && m.name == name)
    }
}
