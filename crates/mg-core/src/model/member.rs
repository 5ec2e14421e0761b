use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationInstance, AnnotationKind};
use super::ty::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MemberKind {
    Field,
    Property,
    Method,
    NestedType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Accessibility {
    #[display("private")]
    Private,
    #[display("protected")]
    Protected,
    #[display("internal")]
    Internal,
    #[display("protected internal")]
    ProtectedInternal,
    #[display("public")]
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One member of a declaring type. Immutable once built: analysis derives new maps from
/// it and never writes back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberModel {
    pub name: String,
    pub kind: MemberKind,
    /// Declared type for fields and properties, return type for methods.
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_override: bool,
    /// Member was produced by an earlier generation pass.
    #[serde(default)]
    pub is_generated: bool,
    /// Member was synthesized by the compiler rather than written in source.
    #[serde(default)]
    pub is_implicit: bool,
    /// Identifiers referenced by a property's body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationInstance>,
}

impl MemberModel {
    fn new(name: impl Into<String>, kind: MemberKind, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            parameters: Vec::new(),
            accessibility: Accessibility::Private,
            is_static: false,
            is_override: false,
            is_generated: false,
            is_implicit: false,
            references: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, MemberKind::Field, ty)
    }

    pub fn property(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, MemberKind::Property, ty).with_accessibility(Accessibility::Public)
    }

    pub fn method(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self::new(name, MemberKind::Method, return_type).with_accessibility(Accessibility::Public)
    }

    pub fn nested_type(name: impl Into<String>) -> Self {
        let name = name.into();
        let ty = TypeRef::new(name.clone());
        Self::new(name, MemberKind::NestedType, ty).with_accessibility(Accessibility::Public)
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references.extend(references.into_iter().map(Into::into));
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn into_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn into_generated(mut self) -> Self {
        self.is_generated = true;
        self
    }

    pub fn into_implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }

    pub fn annotation(&self, kind: AnnotationKind) -> Option<&AnnotationInstance> {
        self.annotations.iter().find(|a| a.kind == kind)
    }

    pub fn annotations_of(
        &self,
        kind: AnnotationKind,
    ) -> impl Iterator<Item = &AnnotationInstance> {
        self.annotations.iter().filter(move |a| a.kind == kind)
    }

    pub fn has_annotation(&self, kind: AnnotationKind) -> bool {
        self.annotation(kind).is_some()
    }

    pub fn is_field(&self) -> bool {
        self.kind == MemberKind::Field
    }

    pub fn is_property(&self) -> bool {
        self.kind == MemberKind::Property
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    /// A field carrying NotifyBacking, i.e. one that gets a generated property.
    pub fn is_backing_field(&self) -> bool {
        self.is_field() && self.has_annotation(AnnotationKind::NotifyBacking)
    }

    /// Parameter types in declaration order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.parameters.iter().map(|p| &p.ty)
    }
}
