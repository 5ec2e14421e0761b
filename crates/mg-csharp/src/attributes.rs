//! Attribute reconstruction: re-declaring field attributes on generated properties, and
//! rendering AddAttribute requests.

use itertools::Itertools;
use mg_core::fragments::Fragments;
use mg_core::model::{
    AddAttributeSpec, AnnotationInstance, AnnotationKind, AnnotationValue, MemberModel,
};
use mg_core::oracle::{AttributeTargets, SymbolOracle};
use mg_core::Result;
use tracing::trace;

use crate::usings::add_type_usings;

/// C# string literal with the escapes the compiler requires.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// An annotation argument as C# source.
pub fn literal(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::String(s) => string_literal(s),
        AnnotationValue::Bool(b) => b.to_string(),
        AnnotationValue::EnumTag { ty, tag } => format!("{}.{}", ty, tag),
        AnnotationValue::TypeRef(ty) => format!("typeof({})", ty),
        AnnotationValue::StringList(items) => {
            if items.is_empty() {
                "new string[0]".to_string()
            } else {
                format!("new[] {{ {} }}", items.iter().map(|s| string_literal(s)).join(", "))
            }
        }
    }
}

/// `Name(positional..., Key = value...)`, or `Name` without arguments.
pub fn render_attribute(annotation: &AnnotationInstance) -> String {
    let args = annotation
        .positional
        .iter()
        .map(literal)
        .chain(
            annotation
                .named
                .iter()
                .map(|arg| format!("{} = {}", arg.name, literal(&arg.value))),
        )
        .collect::<Vec<_>>();
    if args.is_empty() {
        annotation.short_name().to_string()
    } else {
        format!("{}({})", annotation.short_name(), args.join(", "))
    }
}

pub fn render_added_attribute(spec: &AddAttributeSpec) -> String {
    if spec.args.is_empty() {
        spec.short_name().to_string()
    } else {
        format!(
            "{}({})",
            spec.short_name(),
            spec.args.iter().map(|a| string_literal(a)).join(", ")
        )
    }
}

/// Attributes a generated property must carry for `member`: every foreign attribute whose
/// usage allows properties, followed by every AddAttribute request. Attributes without a
/// known usage declaration are not carried. Namespaces of the carried attributes are
/// added to `fragments`.
pub fn property_attributes(
    member: &MemberModel,
    oracle: &dyn SymbolOracle,
    fragments: &mut Fragments,
) -> Result<Vec<String>> {
    let mut rendered = Vec::new();
    for annotation in member.annotations_of(AnnotationKind::Foreign) {
        let allowed = oracle
            .attribute_targets(&annotation.attribute)
            .map_or(false, |targets| targets.contains(AttributeTargets::PROPERTY));
        if !allowed {
            trace!(
                member = %member.name,
                attribute = %annotation.attribute,
                "attribute not valid on properties"
            );
            continue;
        }
        add_type_usings(fragments, &annotation.attribute);
        rendered.push(render_attribute(annotation));
    }
    rendered.extend(added_attributes(member, fragments)?);
    Ok(rendered)
}

/// The AddAttribute requests on `member`, rendered in declaration order.
pub fn added_attributes(member: &MemberModel, fragments: &mut Fragments) -> Result<Vec<String>> {
    let mut rendered = Vec::new();
    for annotation in member.annotations_of(AnnotationKind::AddAttribute) {
        let spec = AddAttributeSpec::decode(&member.name, annotation)?;
        add_type_usings(fragments, &spec.attribute);
        rendered.push(render_added_attribute(&spec));
    }
    Ok(rendered)
}

/// `[A, B(...)]`, or `None` when there is nothing to declare.
pub fn attribute_list(attributes: &[String]) -> Option<String> {
    if attributes.is_empty() {
        None
    } else {
        Some(format!("[{}]", attributes.join(", ")))
    }
}
