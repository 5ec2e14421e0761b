use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A reference to a type as the host's symbol layer describes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    /// Number of `[]` suffixes; 0 for non-array types.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub array_rank: u8,
    /// Enclosing type for nested types, e.g. `OtherType` for `OtherType.TestEnum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing: Option<Box<TypeRef>>,
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            args: Vec::new(),
            nullable: false,
            array_rank: 0,
            containing: None,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.array_rank += 1;
        self
    }

    pub fn nested_in(mut self, containing: TypeRef) -> Self {
        self.containing = Some(Box::new(containing));
        self
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn bool() -> Self {
        Self::new("bool")
    }

    pub fn object() -> Self {
        Self::new("object")
    }

    /// Element type of an array reference; the reference itself otherwise.
    pub fn element(&self) -> TypeRef {
        let mut element = self.clone();
        element.array_rank = 0;
        element.nullable = false;
        element
    }

    pub fn is_void(&self) -> bool {
        self.array_rank == 0 && matches!(self.keyword(), Some("void"))
    }

    pub fn is_bool(&self) -> bool {
        self.array_rank == 0 && !self.nullable && matches!(self.keyword(), Some("bool"))
    }

    pub fn is_object(&self) -> bool {
        self.array_rank == 0 && matches!(self.keyword(), Some("object"))
    }

    pub fn is_task(&self) -> bool {
        self.array_rank == 0
            && self.args.is_empty()
            && self.name == "Task"
            && self.namespace.as_deref().map_or(true, |ns| ns == "System.Threading.Tasks")
    }

    /// Fully qualified name without generic arguments, e.g. `System.EventArgs`.
    pub fn qualified_name(&self) -> String {
        let mut segments = Vec::new();
        if let Some(ns) = &self.namespace {
            segments.push(ns.clone());
        }
        let mut containers = Vec::new();
        let mut current = self.containing.as_deref();
        while let Some(container) = current {
            containers.push(container.name.clone());
            current = container.containing.as_deref();
        }
        segments.extend(containers.into_iter().rev());
        segments.push(self.name.clone());
        segments.join(".")
    }

    /// Type text usable in an `is` pattern: no nullable annotation.
    pub fn pattern_text(&self) -> String {
        let mut text = self.to_string();
        if text.ends_with('?') {
            text.pop();
        }
        text
    }

    fn keyword(&self) -> Option<&'static str> {
        let from_system = self.namespace.as_deref().map_or(true, |ns| ns == "System");
        let keyword = match self.name.as_str() {
            "bool" => "bool",
            "byte" => "byte",
            "sbyte" => "sbyte",
            "char" => "char",
            "decimal" => "decimal",
            "double" => "double",
            "float" => "float",
            "int" => "int",
            "uint" => "uint",
            "long" => "long",
            "ulong" => "ulong",
            "short" => "short",
            "ushort" => "ushort",
            "object" => "object",
            "string" => "string",
            "void" => "void",
            _ if !from_system => return None,
            "Boolean" => "bool",
            "Byte" => "byte",
            "SByte" => "sbyte",
            "Char" => "char",
            "Decimal" => "decimal",
            "Double" => "double",
            "Single" => "float",
            "Int32" => "int",
            "UInt32" => "uint",
            "Int64" => "long",
            "UInt64" => "ulong",
            "Int16" => "short",
            "UInt16" => "ushort",
            "Object" => "object",
            "String" => "string",
            "Void" => "void",
            _ => return None,
        };
        Some(keyword)
    }
}

/// Renders the type the way it is written in C# source.
impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(keyword) = self.keyword() {
            f.write_str(keyword)?;
        } else {
            if let Some(container) = &self.containing {
                write!(f, "{}.", container.element())?;
            }
            if self.name == "Nullable" && self.args.len() == 1 {
                return write!(f, "{}?", self.args[0]);
            }
            f.write_str(&self.name)?;
            if !self.args.is_empty() {
                write!(f, "<{}>", self.args.iter().join(", "))?;
            }
        }
        for _ in 0..self.array_rank {
            f.write_str("[]")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}
