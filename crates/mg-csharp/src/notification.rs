//! The change-notification plumbing generated properties call into.

use mg_core::emitter::EmitContext;
use mg_core::fragments::Fragments;
use tracing::debug;

use crate::usings::{COMPILER_SERVICES, COMPONENT_MODEL, SYSTEM};
use crate::writer::CodeWriter;

pub const NOTIFY_INTERFACE: &str = "INotifyPropertyChanged";
pub const RAISE_METHOD: &str = "OnPropertyChanged";
pub const RAISE_STATIC_METHOD: &str = "OnStaticPropertyChanged";

fn instance_implementation() -> String {
    let mut w = CodeWriter::new();
    w.line(0, "public event PropertyChangedEventHandler? PropertyChanged;")
        .blank()
        .line(
            0,
            format!(
                "protected virtual void {}([CallerMemberName] string? propertyName = null)",
                RAISE_METHOD
            ),
        )
        .open(0)
        .line(1, "PropertyChanged?.Invoke(this, new PropertyChangedEventArgs(propertyName));")
        .close(0);
    w.finish()
}

fn static_implementation() -> String {
    let mut w = CodeWriter::new();
    w.line(
        0,
        "public static event EventHandler<PropertyChangedEventArgs>? StaticPropertyChanged;",
    )
    .blank()
    .line(
        0,
        format!(
            "private static void {}([CallerMemberName] string? propertyName = null)",
            RAISE_STATIC_METHOD
        ),
    )
    .open(0)
    .line(1, "StaticPropertyChanged?.Invoke(null, new PropertyChangedEventArgs(propertyName));")
    .close(0);
    w.finish()
}

/// Interface and implementation fragments for a type that emits instance and/or static
/// notifying properties. The instance part is left out when an ancestor already
/// implements the interface.
pub fn notification_fragments(ctx: &EmitContext<'_>, instance: bool, statics: bool) -> Fragments {
    let mut fragments = Fragments::new();
    if instance {
        if ctx.oracle.inherits_notification(ctx.ty) {
            debug!(ty = %ctx.ty.name, "notification inherited from base type");
        } else {
            fragments.using(COMPONENT_MODEL);
            fragments.using(COMPILER_SERVICES);
            fragments.interfaces.push(NOTIFY_INTERFACE.to_string());
            fragments.implementations.push(instance_implementation());
        }
    }
    if statics {
        fragments.using(SYSTEM);
        fragments.using(COMPONENT_MODEL);
        fragments.using(COMPILER_SERVICES);
        fragments.implementations.push(static_implementation());
    }
    fragments
}
