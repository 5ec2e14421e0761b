//! NotifyBacking fields: validation and property emission.

use std::collections::HashSet;

use mg_analysis::find_cycles;
use mg_core::diagnostics::DiagnosticKind;
use mg_core::emitter::{EmitContext, EmitterOutput, MemberEmitter};
use mg_core::fragments::Fragments;
use mg_core::member_diagnostic;
use mg_core::model::{Access, AnnotationKind, MemberModel, NotifyOptions};
use mg_core::naming::{canonical_notify_name, changed_handler_field, collection_handler_field};
use mg_core::Result;
use tracing::{debug, warn};

use crate::attributes::{attribute_list, property_attributes};
use crate::notification::{notification_fragments, RAISE_METHOD, RAISE_STATIC_METHOD};
use crate::usings::{add_type_usings, COLLECTIONS_SPECIALIZED, SYSTEM};
use crate::writer::CodeWriter;

pub const EVENT_ARGS: &str = "System.EventArgs";
pub const COLLECTION_EVENT_ARGS: &str =
    "System.Collections.Specialized.NotifyCollectionChangedEventArgs";

/// A backing field that passed validation.
struct PropertyPlan<'a> {
    field: &'a MemberModel,
    name: String,
    options: NotifyOptions,
    /// Set only when the field's type supports collection notification.
    collection_handler: Option<String>,
    attributes: Vec<String>,
    usings: Fragments,
}

/// Emits a change-notifying property for every NotifyBacking field of the type.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyPropertyEmitter;

impl NotifyPropertyEmitter {
    pub const NAME: &'static str = "notify-property";
}

impl MemberEmitter for NotifyPropertyEmitter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, ctx: &EmitContext<'_>) -> Result<EmitterOutput> {
        let mut output = EmitterOutput::new();
        let cyclic = CyclicMembers::new(ctx);

        report_dependents(ctx, &cyclic, &mut output);

        let mut accepted = HashSet::new();
        let mut plans = Vec::new();
        for field in ctx.ty.backing_fields() {
            if let Some(plan) = plan_property(ctx, field, &cyclic, &accepted, &mut output)? {
                accepted.insert(plan.name.clone());
                plans.push(plan);
            }
        }

        for plan in &plans {
            output.push(emit_property(ctx, plan, &accepted));
        }

        let instance = plans.iter().any(|p| !p.field.is_static);
        let statics = plans.iter().any(|p| p.field.is_static);
        output.push(notification_fragments(ctx, instance, statics));
        Ok(output)
    }
}

/// Members that must not get a generated property because of a dependency cycle.
struct CyclicMembers {
    /// Closers that are not backing fields; they are reported where they are declared.
    declared_closers: HashSet<String>,
    /// Canonical names of the backing fields to suppress.
    fields: HashSet<String>,
}

impl CyclicMembers {
    /// A cycle closed by a backing field is broken at that field alone. A cycle closed by
    /// any other member is broken at every backing field on it.
    fn new(ctx: &EmitContext<'_>) -> Self {
        let field_nodes: HashSet<String> = ctx
            .ty
            .backing_fields()
            .map(|f| canonical_notify_name(&f.name))
            .collect();
        let mut cyclic = Self {
            declared_closers: HashSet::new(),
            fields: HashSet::new(),
        };
        for cycle in find_cycles(ctx.dependencies) {
            if field_nodes.contains(&cycle.closer) {
                cyclic.fields.insert(cycle.closer);
                continue;
            }
            debug!(
                closer = %cycle.closer,
                nodes = ?cycle.nodes,
                "cycle closed by a declared member"
            );
            cyclic.fields.extend(
                cycle
                    .nodes
                    .iter()
                    .filter(|node| field_nodes.contains(*node))
                    .cloned(),
            );
            cyclic.declared_closers.insert(cycle.closer);
        }
        cyclic
    }
}

/// DependsOn and cycle problems on members that are not backing fields. These members
/// generate nothing themselves, so the diagnostic is all that happens.
fn report_dependents(ctx: &EmitContext<'_>, cyclic: &CyclicMembers, output: &mut EmitterOutput) {
    for member in ctx.ty.members.iter().filter(|m| !m.is_backing_field()) {
        for missing in ctx.dependencies.missing_for(&member.name) {
            output.report(member_diagnostic!(
                DiagnosticKind::DependencyNotFound,
                &member.name,
                &member.name,
                &missing.name
            ));
        }
        if cyclic.declared_closers.contains(&member.name) {
            output.report(member_diagnostic!(
                DiagnosticKind::CircularDependency,
                &member.name,
                &member.name
            ));
        }
    }
}

fn plan_property<'a>(
    ctx: &EmitContext<'_>,
    field: &'a MemberModel,
    cyclic: &CyclicMembers,
    accepted: &HashSet<String>,
    output: &mut EmitterOutput,
) -> Result<Option<PropertyPlan<'a>>> {
    let Some(annotation) = field.annotation(AnnotationKind::NotifyBacking) else {
        return Ok(None);
    };
    let options = NotifyOptions::decode(&field.name, annotation)?;
    let name = canonical_notify_name(&field.name);
    let oracle = ctx.oracle;

    if oracle.is_static_type(&field.ty) {
        warn!(field = %field.name, ty = %field.ty, "static field type");
        output.report(member_diagnostic!(
            DiagnosticKind::StaticField,
            &field.name,
            &field.name,
            &field.ty
        ));
        return Ok(None);
    }
    if oracle.is_abstract_type(&field.ty) {
        warn!(field = %field.name, ty = %field.ty, "abstract field type");
        output.report(member_diagnostic!(
            DiagnosticKind::InvalidPropertyType,
            &field.name,
            &field.name,
            &field.ty
        ));
        return Ok(None);
    }

    if ctx.ty.has_declared_member(&name) || accepted.contains(&name) {
        warn!(field = %field.name, property = %name, "property name taken");
        output.report(
            member_diagnostic!(DiagnosticKind::PropertyNamingConflict, &field.name, &name)
                .with_suggestion(format!("rename the field or the existing member '{}'", name)),
        );
        return Ok(None);
    }

    let mut missing = ctx.dependencies.missing_for(&field.name).peekable();
    if missing.peek().is_some() {
        for dependency in missing {
            output.report(member_diagnostic!(
                DiagnosticKind::DependencyNotFound,
                &field.name,
                &field.name,
                &dependency.name
            ));
        }
        warn!(field = %field.name, "skipping field with unresolved dependencies");
        return Ok(None);
    }

    if cyclic.fields.contains(&name) {
        warn!(field = %field.name, property = %name, "circular dependency");
        output.report(member_diagnostic!(
            DiagnosticKind::CircularDependency,
            &field.name,
            &name
        ));
        return Ok(None);
    }

    if let Some(handler) = &options.property_changed_handler {
        if let Err(reason) = validate_handler(ctx, field, handler, EVENT_ARGS) {
            output.report(member_diagnostic!(
                DiagnosticKind::InvalidPropertyChangedHandler,
                &field.name,
                handler,
                &field.name,
                reason
            ));
            return Ok(None);
        }
    }

    let mut collection_handler = None;
    if let Some(handler) = &options.collection_changed_handler {
        if oracle.supports_collection_notification(&field.ty) {
            if let Err(reason) = validate_handler(ctx, field, handler, COLLECTION_EVENT_ARGS) {
                output.report(member_diagnostic!(
                    DiagnosticKind::InvalidCollectionChangedHandler,
                    &field.name,
                    handler,
                    &field.name,
                    reason
                ));
                return Ok(None);
            }
            collection_handler = Some(handler.clone());
        } else {
            debug!(
                field = %field.name,
                ty = %field.ty,
                "type does not notify collection changes; handler ignored"
            );
        }
    }

    if let Err(reason) = validate_access(field, &options) {
        output.report(member_diagnostic!(
            DiagnosticKind::InvalidAccessorModifiers,
            &field.name,
            &field.name,
            reason
        ));
        return Ok(None);
    }

    let mut usings = Fragments::new();
    let attributes = property_attributes(field, oracle, &mut usings)?;
    add_type_usings(&mut usings, &field.ty);
    if options.property_changed_handler.is_some() {
        usings.using(SYSTEM);
    }
    if collection_handler.is_some() {
        usings.using(COLLECTIONS_SPECIALIZED);
    }

    debug!(field = %field.name, property = %name, "property planned");
    Ok(Some(PropertyPlan {
        field,
        name,
        options,
        collection_handler,
        attributes,
        usings,
    }))
}

/// Handler methods take `(object sender, TArgs e)` where `TArgs` is `expected_args` or
/// derives from it, and return nothing.
fn validate_handler(
    ctx: &EmitContext<'_>,
    field: &MemberModel,
    handler: &str,
    expected_args: &str,
) -> std::result::Result<(), String> {
    let Some(method) = ctx.ty.method(handler) else {
        return Err(format!("Method not found on type '{}'.", ctx.ty.name));
    };
    if !method.ty.is_void() {
        return Err(format!("Return type must be void, found {}.", method.ty));
    }
    if method.parameters.len() != 2 {
        return Err(format!(
            "Expected 2 parameters, found {}.",
            method.parameters.len()
        ));
    }
    let sender = &method.parameters[0];
    if !sender.ty.is_object() {
        return Err(format!(
            "First parameter must be object, found {}.",
            sender.ty
        ));
    }
    let args = &method.parameters[1];
    if !ctx.oracle.is_or_derives_from(&args.ty, expected_args) {
        let simple = expected_args.rsplit('.').next().unwrap_or(expected_args);
        return Err(format!(
            "Parameter '{}' must be {} or derived from it, found {}.",
            args.name, simple, args.ty
        ));
    }
    if field.is_static && !method.is_static {
        return Err("Handler for a static field must be static.".to_string());
    }
    Ok(())
}

/// The property is declared at the wider accessor level and only the narrower accessor
/// carries a modifier, so the two levels must be comparable.
fn validate_access(
    field: &MemberModel,
    options: &NotifyOptions,
) -> std::result::Result<(), String> {
    let levels = (options.getter, options.setter);
    if matches!(
        levels,
        (Access::Protected, Access::Internal) | (Access::Internal, Access::Protected)
    ) {
        return Err(format!(
            "{} getter and {} setter cannot share one property.",
            options.getter, options.setter
        ));
    }
    let access = options.getter.max(options.setter);
    if options.is_virtual && !field.is_static && access == Access::Private {
        return Err("A private property cannot be virtual.".to_string());
    }
    Ok(())
}

fn emit_property(
    ctx: &EmitContext<'_>,
    plan: &PropertyPlan<'_>,
    accepted: &HashSet<String>,
) -> Fragments {
    let field = plan.field;
    let raw = field.name.as_str();
    let options = &plan.options;
    let is_static = field.is_static;
    let mut fragments = plan.usings.clone();

    let access = options.getter.max(options.setter);
    let accessor = |level: Access| {
        if level == access {
            String::new()
        } else {
            format!("{} ", level)
        }
    };
    let mut modifiers = format!("{} ", access);
    if is_static {
        modifiers.push_str("static ");
    } else if options.is_virtual {
        modifiers.push_str("virtual ");
    }
    let static_kw = if is_static { "static " } else { "" };
    let sender = if is_static { "null" } else { "this" };
    let raise = if is_static { RAISE_STATIC_METHOD } else { RAISE_METHOD };

    let mut fields = Vec::new();
    let mut w = CodeWriter::new();
    if let Some(attributes) = attribute_list(&plan.attributes) {
        w.line(0, attributes);
    }
    w.line(0, format!("{}{} {}", modifiers, field.ty, plan.name))
        .open(0)
        .line(1, format!("{}get => {};", accessor(options.getter), raw))
        .line(1, format!("{}set", accessor(options.setter)))
        .open(1);

    let collection_field = collection_handler_field(&plan.name);
    if plan.collection_handler.is_some() {
        w.line(2, format!("if ({} != null && {} != null)", raw, collection_field))
            .open(2)
            .line(
                3,
                format!(
                    "((INotifyCollectionChanged){}).CollectionChanged -= {};",
                    raw, collection_field
                ),
            )
            .close(2);
    }

    w.line(2, format!("{} = value;", raw));

    if let Some(handler) = &plan.collection_handler {
        fields.push(format!(
            "private {}NotifyCollectionChangedEventHandler? {};",
            static_kw, collection_field
        ));
        w.line(2, format!("{} ??= {};", collection_field, handler))
            .line(2, format!("if ({} != null)", raw))
            .open(2)
            .line(
                3,
                format!(
                    "((INotifyCollectionChanged){}).CollectionChanged += {};",
                    raw, collection_field
                ),
            )
            .close(2);
    }

    if let Some(handler) = &options.property_changed_handler {
        let handler_field = changed_handler_field(&plan.name);
        fields.push(format!("private {}EventHandler? {};", static_kw, handler_field));
        w.line(2, format!("{} ??= {};", handler_field, handler))
            .line(2, format!("{}.Invoke({}, EventArgs.Empty);", handler_field, sender));
    }

    w.line(2, format!("{}();", raise));
    for consumer in ctx.dependencies.consumers(&plan.name) {
        let exists = consumer != plan.name
            && (ctx.ty.has_declared_member(consumer) || accepted.contains(consumer));
        if exists {
            w.line(2, format!("{}(nameof({}));", raise, consumer));
        } else {
            debug!(
                property = %plan.name,
                consumer,
                "dropping cascade to member that will not exist"
            );
        }
    }
    w.close(1).close(0);

    if is_static {
        fragments.static_fields.extend(fields);
        fragments.static_properties.push(w.finish());
    } else {
        fragments.fields.extend(fields);
        fragments.properties.push(w.finish());
    }
    fragments
}
