use serde::{Deserialize, Serialize};

use super::ty::TypeRef;

/// Decoded annotation argument. Produced once when the model is built; every consumer
/// matches on the variant instead of inspecting untyped boxes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    String(String),
    Bool(bool),
    EnumTag { ty: TypeRef, tag: String },
    TypeRef(TypeRef),
    StringList(Vec<String>),
}

impl AnnotationValue {
    pub fn string(value: impl Into<String>) -> Self {
        AnnotationValue::String(value.into())
    }

    pub fn enum_tag(ty: impl Into<String>, tag: impl Into<String>) -> Self {
        AnnotationValue::EnumTag {
            ty: TypeRef::new(ty),
            tag: tag.into(),
        }
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnnotationValue::StringList(values.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_enum_tag(&self) -> Option<&str> {
        match self {
            AnnotationValue::EnumTag { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            AnnotationValue::TypeRef(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            AnnotationValue::String(_) => "string",
            AnnotationValue::Bool(_) => "bool",
            AnnotationValue::EnumTag { .. } => "enum",
            AnnotationValue::TypeRef(_) => "type",
            AnnotationValue::StringList(_) => "string list",
        }
    }
}
