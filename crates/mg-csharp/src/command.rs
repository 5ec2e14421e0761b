//! CommandMethod methods: shape validation and command adapter emission.

use itertools::Itertools;
use mg_core::diagnostics::{Diagnostic, DiagnosticKind};
use mg_core::emitter::{EmitContext, EmitterOutput, MemberEmitter};
use mg_core::fragments::Fragments;
use mg_core::member_diagnostic;
use mg_core::model::{AnnotationKind, CommandOptions, MemberModel, TypeModel, TypeRef};
use mg_core::naming::{command_class_name, command_field_name, command_property_name};
use mg_core::Result;
use tracing::{debug, warn};

use crate::attributes::{added_attributes, attribute_list};
use crate::usings::{add_type_usings, SYSTEM, THREADING_TASKS, WINDOWS_INPUT};
use crate::writer::CodeWriter;

/// Derived view of a validated command method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub method: String,
    pub can_execute: Option<String>,
    /// Type of the single parameter, if the method takes one.
    pub parameter: Option<TypeRef>,
    pub is_static: bool,
    pub is_async: bool,
}

impl CommandDescriptor {
    pub fn arity(&self) -> usize {
        usize::from(self.parameter.is_some())
    }

    pub fn class_name(&self) -> String {
        command_class_name(&self.method)
    }

    pub fn property_name(&self) -> String {
        command_property_name(&self.method)
    }

    pub fn field_name(&self) -> String {
        command_field_name(&self.method)
    }
}

/// Validate `method` as a command, in order: accessibility, arity, return type, guard
/// method, then generated names. Stops at the first failure.
pub fn validate_command(
    ty: &TypeModel,
    method: &MemberModel,
    options: &CommandOptions,
) -> std::result::Result<CommandDescriptor, Diagnostic> {
    let name = method.name.as_str();

    if method.accessibility != mg_core::model::Accessibility::Public {
        return Err(member_diagnostic!(DiagnosticKind::NotPublic, name, name)
            .with_suggestion("declare the method public"));
    }

    if method.parameters.len() > 1 {
        return Err(member_diagnostic!(
            DiagnosticKind::TooManyParameters,
            name,
            name,
            method.parameters.len()
        ));
    }

    if !method.ty.is_void() && !method.ty.is_task() {
        return Err(member_diagnostic!(
            DiagnosticKind::InvalidCommandReturnType,
            name,
            name,
            &method.ty
        ));
    }

    if let Some(guard_name) = &options.can_execute {
        if let Err(reason) = validate_guard(ty, method, guard_name) {
            return Err(member_diagnostic!(
                DiagnosticKind::InvalidCanExecute,
                name,
                guard_name,
                name,
                reason
            ));
        }
    }

    for generated in [
        command_class_name(name),
        command_property_name(name),
        command_field_name(name),
    ] {
        if ty.has_declared_member(&generated) {
            return Err(
                member_diagnostic!(DiagnosticKind::CommandNamingConflict, name, &generated)
                    .with_suggestion(format!("rename '{}' or the method '{}'", generated, name)),
            );
        }
    }

    Ok(CommandDescriptor {
        method: method.name.clone(),
        can_execute: options.can_execute.clone(),
        parameter: method.parameters.first().map(|p| p.ty.clone()),
        is_static: method.is_static,
        is_async: method.ty.is_task(),
    })
}

fn validate_guard(
    ty: &TypeModel,
    method: &MemberModel,
    guard_name: &str,
) -> std::result::Result<(), String> {
    let Some(guard) = ty.method(guard_name) else {
        return Err(format!("Method not found on type '{}'.", ty.name));
    };
    if !guard.ty.is_bool() {
        return Err(format!("Return type must be bool, found {}.", guard.ty));
    }
    if guard.parameters.len() != method.parameters.len() {
        return Err(format!(
            "Expected {} parameter(s), found {}.",
            method.parameters.len(),
            guard.parameters.len()
        ));
    }
    let mismatch = method
        .parameter_types()
        .zip(guard.parameter_types())
        .find_position(|(expected, found)| expected.to_string() != found.to_string());
    if let Some((index, (expected, found))) = mismatch {
        return Err(format!(
            "Parameter type mismatch at position {}. Expected {}, found {}.",
            index, expected, found
        ));
    }
    if method.is_static && !guard.is_static {
        return Err("CanExecute method of a static command must be static.".to_string());
    }
    Ok(())
}

/// Emits a nested `ICommand` adapter plus a lazily created accessor for every
/// CommandMethod method on the type.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandEmitter;

impl CommandEmitter {
    pub const NAME: &'static str = "command";
}

impl MemberEmitter for CommandEmitter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, ctx: &EmitContext<'_>) -> Result<EmitterOutput> {
        let mut output = EmitterOutput::new();
        let methods = ctx
            .ty
            .members
            .iter()
            .filter(|m| m.is_method() && m.has_annotation(AnnotationKind::CommandMethod));

        for method in methods {
            let Some(annotation) = method.annotation(AnnotationKind::CommandMethod) else {
                continue;
            };
            let options = CommandOptions::decode(&method.name, annotation)?;
            let descriptor = match validate_command(ctx.ty, method, &options) {
                Ok(descriptor) => descriptor,
                Err(diagnostic) => {
                    warn!(method = %method.name, code = diagnostic.code(), "command rejected");
                    output.report(diagnostic);
                    continue;
                }
            };
            if ctx.oracle.overridden_has_command(ctx.ty, method) {
                debug!(method = %method.name, "base method already generates this command");
                continue;
            }
            output.push(emit_command(ctx, method, &descriptor)?);
        }
        Ok(output)
    }
}

fn emit_command(
    ctx: &EmitContext<'_>,
    method: &MemberModel,
    descriptor: &CommandDescriptor,
) -> Result<Fragments> {
    let mut fragments = Fragments::new();
    fragments.using(SYSTEM);
    fragments.using(WINDOWS_INPUT);
    if descriptor.is_async {
        fragments.using(THREADING_TASKS);
    }
    if let Some(parameter) = &descriptor.parameter {
        add_type_usings(&mut fragments, parameter);
    }
    let attributes = added_attributes(method, &mut fragments)?;

    fragments
        .nested_types
        .push(adapter_class(&ctx.ty.name, descriptor));

    let field = descriptor.field_name();
    fragments
        .fields
        .push(format!("private ICommand? {};", field));

    let owner = if descriptor.is_static { "" } else { "this" };
    let mut w = CodeWriter::new();
    if let Some(attributes) = attribute_list(&attributes) {
        w.line(0, attributes);
    }
    w.line(
        0,
        format!(
            "public ICommand {} => {} ??= new {}({});",
            descriptor.property_name(),
            field,
            descriptor.class_name(),
            owner
        ),
    );
    fragments.properties.push(w.finish());
    debug!(method = %method.name, class = %descriptor.class_name(), "command emitted");
    Ok(fragments)
}

fn adapter_class(owner_type: &str, descriptor: &CommandDescriptor) -> String {
    let class = descriptor.class_name();
    let target = if descriptor.is_static { owner_type } else { "_owner" };
    let call = |method: &str, arg: &str| format!("{}.{}({})", target, method, arg);

    let mut w = CodeWriter::new();
    w.line(0, format!("public class {} : ICommand", class)).open(0);

    if !descriptor.is_static {
        w.line(1, format!("private readonly {} _owner;", owner_type))
            .blank()
            .line(1, format!("public {}({} owner)", class, owner_type))
            .open(1)
            .line(2, "_owner = owner;")
            .close(1)
            .blank();
    }

    w.line(1, "public event EventHandler? CanExecuteChanged;")
        .blank()
        .line(
            1,
            "public void RaiseCanExecuteChanged() => CanExecuteChanged?.Invoke(this, EventArgs.Empty);",
        )
        .blank();

    w.line(1, "public bool CanExecute(object? parameter)").open(1);
    match (&descriptor.parameter, &descriptor.can_execute) {
        (None, None) => {
            w.line(2, "return true;");
        }
        (None, Some(guard)) => {
            w.line(2, format!("return {};", call(guard.as_str(), "")));
        }
        (Some(parameter), None) => {
            w.line(2, format!("return parameter is {};", parameter.pattern_text()));
        }
        (Some(parameter), Some(guard)) => {
            w.line(2, format!("if (parameter is not {} typedParameter)", parameter.pattern_text()))
                .open(2)
                .line(3, "return false;")
                .close(2)
                .line(2, format!("return {};", call(guard.as_str(), "typedParameter")));
        }
    }
    w.close(1).blank();

    let discard = if descriptor.is_async { "_ = " } else { "" };
    w.line(1, "public void Execute(object? parameter)").open(1);
    match &descriptor.parameter {
        None => {
            w.line(2, format!("{}{};", discard, call(descriptor.method.as_str(), "")));
        }
        Some(parameter) => {
            w.line(2, format!("if (parameter is not {} typedParameter)", parameter.pattern_text()))
                .open(2)
                .line(3, "return;")
                .close(2)
                .line(
                    2,
                    format!("{}{};", discard, call(descriptor.method.as_str(), "typedParameter")),
                );
        }
    }
    w.close(1).close(0);
    w.finish()
}
