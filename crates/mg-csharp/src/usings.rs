//! Import directives needed by generated members.

use mg_core::fragments::Fragments;
use mg_core::model::TypeRef;

pub const COMPONENT_MODEL: &str = "System.ComponentModel";
pub const COMPILER_SERVICES: &str = "System.Runtime.CompilerServices";
pub const COLLECTIONS_SPECIALIZED: &str = "System.Collections.Specialized";
pub const WINDOWS_INPUT: &str = "System.Windows.Input";
pub const SYSTEM: &str = "System";
pub const THREADING_TASKS: &str = "System.Threading.Tasks";

/// Add `using` directives for every namespace `ty` mentions: its own, those of its generic
/// arguments, and those of its containing types. Containing types also get a
/// `using static` directive. Types in the global namespace need nothing.
pub fn add_type_usings(fragments: &mut Fragments, ty: &TypeRef) {
    if let Some(namespace) = &ty.namespace {
        fragments.using(namespace);
    }
    for arg in &ty.args {
        add_type_usings(fragments, arg);
    }
    if let Some(container) = &ty.containing {
        add_type_usings(fragments, container);
        add_static_usings(fragments, container);
    }
}

fn add_static_usings(fragments: &mut Fragments, container: &TypeRef) {
    if container.namespace.is_some() {
        fragments
            .usings
            .push(format!("using static {};", container.qualified_name()));
    }
    if let Some(outer) = &container.containing {
        add_static_usings(fragments, outer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_nested_and_generic_namespaces() {
        let ty = TypeRef::new("Dictionary")
            .in_namespace("System.Collections.Generic")
            .with_args(vec![
                TypeRef::new("string"),
                TypeRef::new("TestEnum")
                    .in_namespace("EnumTypes")
                    .nested_in(TypeRef::new("OtherType").in_namespace("EnumTypes")),
            ]);
        let mut fragments = Fragments::new();
        add_type_usings(&mut fragments, &ty);
        assert_eq!(
            fragments.usings,
            vec![
                "using System.Collections.Generic;",
                "using EnumTypes;",
                "using EnumTypes;",
                "using static EnumTypes.OtherType;",
            ]
        );
    }

    #[test]
    fn global_types_need_no_import() {
        let mut fragments = Fragments::new();
        add_type_usings(&mut fragments, &TypeRef::new("Widget").array());
        assert!(fragments.usings.is_empty());
    }
}
