use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::ty::TypeRef;
use super::value::AnnotationValue;
use crate::error::{Error, Result};

/// Namespace the generator's own annotations live in.
pub const ANNOTATION_NAMESPACE: &str = "Reactive.Generator";

/// The annotations the generator understands. Anything else attached to a member is kept
/// as [`AnnotationKind::Foreign`] so it can be carried over to generated members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AnnotationKind {
    NotifyBacking,
    DependsOn,
    CommandMethod,
    AddAttribute,
    Foreign,
}

impl AnnotationKind {
    pub fn attribute_name(self) -> &'static str {
        match self {
            AnnotationKind::NotifyBacking => "NotifyBackingAttribute",
            AnnotationKind::DependsOn => "DependsOnAttribute",
            AnnotationKind::CommandMethod => "CommandMethodAttribute",
            AnnotationKind::AddAttribute => "AddAttributeAttribute",
            AnnotationKind::Foreign => "Attribute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedArgument {
    pub name: String,
    pub value: AnnotationValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationInstance {
    pub kind: AnnotationKind,
    pub attribute: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positional: Vec<AnnotationValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub named: Vec<NamedArgument>,
}

impl AnnotationInstance {
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            attribute: TypeRef::new(kind.attribute_name()).in_namespace(ANNOTATION_NAMESPACE),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// An annotation the generator does not interpret, e.g. `[JsonIgnore]`.
    pub fn foreign(attribute: TypeRef) -> Self {
        Self {
            kind: AnnotationKind::Foreign,
            attribute,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn notify_backing() -> Self {
        Self::new(AnnotationKind::NotifyBacking)
    }

    pub fn depends_on<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AnnotationKind::DependsOn).with_positional(AnnotationValue::list(names))
    }

    pub fn command_method(guard: Option<&str>) -> Self {
        let annotation = Self::new(AnnotationKind::CommandMethod);
        match guard {
            Some(guard) => annotation.with_positional(AnnotationValue::string(guard)),
            None => annotation,
        }
    }

    pub fn add_attribute<I, S>(attribute: TypeRef, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AnnotationKind::AddAttribute)
            .with_positional(AnnotationValue::TypeRef(attribute))
            .with_positional(AnnotationValue::list(args))
    }

    pub fn with_positional(mut self, value: AnnotationValue) -> Self {
        self.positional.push(value);
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.named.push(NamedArgument {
            name: name.into(),
            value,
        });
        self
    }

    pub fn named_value(&self, name: &str) -> Option<&AnnotationValue> {
        self.named
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }

    /// Attribute name as written at a use site: `JsonIgnoreAttribute` -> `JsonIgnore`.
    pub fn short_name(&self) -> &str {
        self.attribute
            .name
            .strip_suffix("Attribute")
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.attribute.name)
    }
}

/// Accessor visibility, in increasing order of accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
pub enum Access {
    #[display("private")]
    Private,
    #[display("protected")]
    Protected,
    #[display("internal")]
    Internal,
    #[display("public")]
    Public,
}

impl Access {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Private" => Some(Access::Private),
            "Protected" => Some(Access::Protected),
            "Internal" => Some(Access::Internal),
            "Public" => Some(Access::Public),
            _ => None,
        }
    }
}

pub const GETTER_ACCESS: &str = "GetterAccess";
pub const SETTER_ACCESS: &str = "SetterAccess";
pub const IS_VIRTUAL: &str = "IsVirtual";
pub const PROPERTY_CHANGED_HANDLER: &str = "PropertyChangedHandlerName";
pub const COLLECTION_CHANGED_HANDLER: &str = "CollectionChangedHandlerName";
pub const CAN_EXECUTE_METHOD: &str = "CanExecuteMethod";

/// Typed view over a NotifyBacking annotation's named arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub getter: Access,
    pub setter: Access,
    pub is_virtual: bool,
    pub property_changed_handler: Option<String>,
    pub collection_changed_handler: Option<String>,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            getter: Access::Public,
            setter: Access::Public,
            is_virtual: false,
            property_changed_handler: None,
            collection_changed_handler: None,
        }
    }
}

impl NotifyOptions {
    pub fn decode(member: &str, annotation: &AnnotationInstance) -> Result<Self> {
        let malformed = |reason: String| {
            Error::malformed(member, AnnotationKind::NotifyBacking.to_string(), reason)
        };
        let mut options = NotifyOptions::default();
        for argument in &annotation.named {
            let value = &argument.value;
            match argument.name.as_str() {
                GETTER_ACCESS | SETTER_ACCESS => {
                    let access = value
                        .as_enum_tag()
                        .and_then(Access::parse)
                        .ok_or_else(|| {
                            malformed(format!(
                                "{} expects an Access tag, found {}",
                                argument.name,
                                value.variant_name()
                            ))
                        })?;
                    if argument.name == GETTER_ACCESS {
                        options.getter = access;
                    } else {
                        options.setter = access;
                    }
                }
                IS_VIRTUAL => {
                    options.is_virtual = value.as_bool().ok_or_else(|| {
                        malformed(format!(
                            "{} expects a bool, found {}",
                            IS_VIRTUAL,
                            value.variant_name()
                        ))
                    })?;
                }
                PROPERTY_CHANGED_HANDLER | COLLECTION_CHANGED_HANDLER => {
                    let handler = value.as_str().ok_or_else(|| {
                        malformed(format!(
                            "{} expects a string, found {}",
                            argument.name,
                            value.variant_name()
                        ))
                    })?;
                    let handler = Some(handler.to_string()).filter(|h| !h.is_empty());
                    if argument.name == PROPERTY_CHANGED_HANDLER {
                        options.property_changed_handler = handler;
                    } else {
                        options.collection_changed_handler = handler;
                    }
                }
                other => return Err(malformed(format!("unknown argument '{}'", other))),
            }
        }
        Ok(options)
    }
}

/// Typed view over a CommandMethod annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub can_execute: Option<String>,
}

impl CommandOptions {
    pub fn decode(member: &str, annotation: &AnnotationInstance) -> Result<Self> {
        let malformed = |reason: String| {
            Error::malformed(member, AnnotationKind::CommandMethod.to_string(), reason)
        };
        let value = annotation
            .positional
            .first()
            .or_else(|| annotation.named_value(CAN_EXECUTE_METHOD));
        let can_execute = match value {
            None => None,
            Some(AnnotationValue::String(name)) if name.is_empty() => None,
            Some(AnnotationValue::String(name)) => Some(name.clone()),
            Some(other) => {
                return Err(malformed(format!(
                    "guard method name must be a string, found {}",
                    other.variant_name()
                )))
            }
        };
        Ok(Self { can_execute })
    }
}

/// Names listed by a DependsOn annotation, in declaration order. Accepts either a
/// single list argument or any number of string arguments.
pub fn decode_depends_on(member: &str, annotation: &AnnotationInstance) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for value in &annotation.positional {
        match value {
            AnnotationValue::String(name) => names.push(name.clone()),
            AnnotationValue::StringList(list) => names.extend(list.iter().cloned()),
            other => {
                return Err(Error::malformed(
                    member,
                    AnnotationKind::DependsOn.to_string(),
                    format!("expected member names, found {}", other.variant_name()),
                ))
            }
        }
    }
    Ok(names)
}

/// Typed view over an AddAttribute annotation: the attribute to add to the generated
/// member and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAttributeSpec {
    pub attribute: TypeRef,
    pub args: Vec<String>,
}

impl AddAttributeSpec {
    pub fn decode(member: &str, annotation: &AnnotationInstance) -> Result<Self> {
        let malformed = |reason: &str| {
            Error::malformed(member, AnnotationKind::AddAttribute.to_string(), reason)
        };
        let attribute = annotation
            .positional
            .first()
            .and_then(AnnotationValue::as_type)
            .cloned()
            .ok_or_else(|| malformed("first argument must be an attribute type"))?;
        let args = match annotation.positional.get(1) {
            None => Vec::new(),
            Some(AnnotationValue::StringList(args)) => args.clone(),
            Some(AnnotationValue::String(arg)) => vec![arg.clone()],
            Some(_) => return Err(malformed("arguments must be strings")),
        };
        Ok(Self { attribute, args })
    }

    pub fn short_name(&self) -> &str {
        self.attribute
            .name
            .strip_suffix("Attribute")
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.attribute.name)
    }
}
