use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Context provided to diagnostic template renderers while producing output lines.
pub struct DiagnosticRenderContext<'a> {
    pub context: &'a str,
    pub verbose_info: bool,
}

/// Trait for converting a diagnostic into human-readable output according to a template.
pub trait DiagnosticTemplateRenderer: Send + Sync {
    fn render(&self, diagnostic: &Diagnostic, ctx: &DiagnosticRenderContext<'_>)
        -> Option<Vec<String>>;
}

/// Built-in templates supported by [`DiagnosticDisplayOptions`].
#[derive(Clone)]
pub enum DiagnosticTemplate {
    Pretty,
    Plain,
    Custom(Arc<dyn DiagnosticTemplateRenderer>),
}

impl DiagnosticTemplate {
    fn render(
        &self,
        diagnostic: &Diagnostic,
        ctx: &DiagnosticRenderContext<'_>,
    ) -> Option<Vec<String>> {
        match self {
            DiagnosticTemplate::Pretty => render_pretty(diagnostic, ctx),
            DiagnosticTemplate::Plain => render_plain(diagnostic, ctx),
            DiagnosticTemplate::Custom(renderer) => renderer.render(diagnostic, ctx),
        }
    }
}

/// Runtime configuration for emitting diagnostics.
#[derive(Clone)]
pub struct DiagnosticDisplayOptions {
    pub template: DiagnosticTemplate,
    pub verbose_info: bool,
}

impl DiagnosticDisplayOptions {
    pub fn with_template(template: DiagnosticTemplate, verbose_info: bool) -> Self {
        Self {
            template,
            verbose_info,
        }
    }

    pub fn pretty(verbose_info: bool) -> Self {
        Self::with_template(DiagnosticTemplate::Pretty, verbose_info)
    }

    pub fn plain(verbose_info: bool) -> Self {
        Self::with_template(DiagnosticTemplate::Plain, verbose_info)
    }
}

impl Default for DiagnosticDisplayOptions {
    fn default() -> Self {
        DiagnosticDisplayOptions::pretty(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

/// Every failure the generator can report. All kinds are scoped to a single member; the
/// only exception is [`DiagnosticKind::GeneratorError`], which abandons the whole type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    StaticField,
    InvalidPropertyType,
    PropertyNamingConflict,
    CommandNamingConflict,
    DependencyNotFound,
    CircularDependency,
    InvalidPropertyChangedHandler,
    InvalidCollectionChangedHandler,
    InvalidAccessorModifiers,
    NotPublic,
    TooManyParameters,
    InvalidCanExecute,
    InvalidCommandReturnType,
    GeneratorError,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::CircularDependency => "MVVM001",
            DiagnosticKind::DependencyNotFound => "MVVM004",
            DiagnosticKind::StaticField => "AN001",
            DiagnosticKind::PropertyNamingConflict => "AN002",
            DiagnosticKind::InvalidPropertyChangedHandler => "AN003",
            DiagnosticKind::InvalidCollectionChangedHandler => "AN004",
            DiagnosticKind::InvalidPropertyType => "AN005",
            DiagnosticKind::InvalidAccessorModifiers => "AN006",
            DiagnosticKind::NotPublic => "AC001",
            DiagnosticKind::TooManyParameters => "AC002",
            DiagnosticKind::InvalidCanExecute => "AC003",
            DiagnosticKind::CommandNamingConflict => "AC004",
            DiagnosticKind::InvalidCommandReturnType => "AC005",
            DiagnosticKind::GeneratorError => "MG000",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DiagnosticKind::CircularDependency => "Circular property dependency detected",
            DiagnosticKind::DependencyNotFound => "Dependency not found",
            DiagnosticKind::StaticField => "Static type with NotifyBacking",
            DiagnosticKind::PropertyNamingConflict => "Property naming conflict",
            DiagnosticKind::InvalidPropertyChangedHandler => "Invalid PropertyChanged handler",
            DiagnosticKind::InvalidCollectionChangedHandler => "Invalid CollectionChanged handler",
            DiagnosticKind::InvalidPropertyType => "Invalid property type",
            DiagnosticKind::InvalidAccessorModifiers => "Invalid accessor modifiers",
            DiagnosticKind::NotPublic => "Command method must be public",
            DiagnosticKind::TooManyParameters => "Command method has too many parameters",
            DiagnosticKind::InvalidCanExecute => "Invalid CanExecute method",
            DiagnosticKind::CommandNamingConflict => "Command naming conflict",
            DiagnosticKind::InvalidCommandReturnType => "Invalid command return type",
            DiagnosticKind::GeneratorError => "Generator error",
        }
    }

    /// Positional message format; `{n}` is replaced by the n-th diagnostic argument.
    pub fn message_format(self) -> &'static str {
        match self {
            DiagnosticKind::CircularDependency => "Property '{0}' has a circular dependency",
            DiagnosticKind::DependencyNotFound => {
                "Member '{0}' depends on '{1}', which does not exist"
            }
            DiagnosticKind::StaticField => "Field '{0}' is of static type '{1}'",
            DiagnosticKind::PropertyNamingConflict => {
                "Generated property name '{0}' conflicts with existing member"
            }
            DiagnosticKind::InvalidPropertyChangedHandler => {
                "PropertyChangedHandler '{0}' for field '{1}' is invalid: {2}"
            }
            DiagnosticKind::InvalidCollectionChangedHandler => {
                "CollectionChangedHandler '{0}' for field '{1}' is invalid: {2}"
            }
            DiagnosticKind::InvalidPropertyType => {
                "Type '{1}' of field '{0}' is not supported for properties"
            }
            DiagnosticKind::InvalidAccessorModifiers => {
                "Accessor options of field '{0}' are invalid: {1}"
            }
            DiagnosticKind::NotPublic => "Method '{0}' with CommandMethod must be public",
            DiagnosticKind::TooManyParameters => {
                "Method '{0}' must have zero or one parameter, found {1}"
            }
            DiagnosticKind::InvalidCanExecute => {
                "CanExecute method '{0}' for command '{1}' is invalid: {2}"
            }
            DiagnosticKind::CommandNamingConflict => {
                "Generated command member '{0}' conflicts with existing member"
            }
            DiagnosticKind::InvalidCommandReturnType => {
                "Method '{0}' must return void or Task, found {1}"
            }
            DiagnosticKind::GeneratorError => "{0}",
        }
    }

    pub fn default_level(self) -> DiagnosticLevel {
        DiagnosticLevel::Error
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub level: DiagnosticLevel,
    /// Name of the field, property or method the diagnostic is located at.
    pub member: String,
    pub args: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, member: impl Into<String>) -> Self {
        Self {
            kind,
            level: kind.default_level(),
            member: member.into(),
            args: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn generator_error(type_name: &str, message: impl Display) -> Self {
        Self::new(DiagnosticKind::GeneratorError, type_name).with_arg(format!(
            "Error generating partial class for {}: {}",
            type_name, message
        ))
    }

    pub fn with_arg(mut self, arg: impl Display) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub fn with_level(mut self, level: DiagnosticLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }

    /// The message format with every `{n}` placeholder replaced by its argument.
    pub fn message(&self) -> String {
        let format = self.kind.message_format();
        let mut output = String::with_capacity(format.len());
        let mut rest = format;
        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let index = after
                .find('}')
                .and_then(|end| after[..end].parse::<usize>().ok().map(|i| (i, end)));
            match index {
                Some((i, end)) => {
                    output.push_str(self.args.get(i).map(String::as_str).unwrap_or(""));
                    rest = &after[end + 1..];
                }
                None => {
                    output.push('{');
                    rest = after;
                }
            }
        }
        output.push_str(rest);
        output
    }
}

impl std::fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostic")
            .field("kind", &self.kind)
            .field("level", &self.level)
            .field("member", &self.member)
            .field("message", &self.message())
            .field("suggestions", &self.suggestions)
            .finish()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.message(), self.code())?;

        if !self.suggestions.is_empty() {
            let hints = self.suggestions.join("; ");
            write!(f, " (hints: {})", hints)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport<T> {
    pub value: Option<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> DiagnosticReport<T> {
    pub fn success(value: T) -> Self {
        Self {
            value: Some(value),
            diagnostics: Vec::new(),
        }
    }

    pub fn success_with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            value: Some(value),
            diagnostics,
        }
    }

    pub fn failure(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            value: None,
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn into_result(self) -> Result<(T, Vec<Diagnostic>), Vec<Diagnostic>> {
        match self.value {
            Some(value) => Ok((value, self.diagnostics)),
            None => Err(self.diagnostics),
        }
    }
}

/// Render a batch of diagnostics into printable lines. The fallback context is used as the
/// header tag, typically the declaring type's name.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    context: &str,
    options: &DiagnosticDisplayOptions,
) -> Vec<String> {
    let render_ctx = DiagnosticRenderContext {
        context,
        verbose_info: options.verbose_info,
    };
    diagnostics
        .iter()
        .filter_map(|diagnostic| options.template.render(diagnostic, &render_ctx))
        .flatten()
        .collect()
}

fn render_pretty(
    diagnostic: &Diagnostic,
    ctx: &DiagnosticRenderContext<'_>,
) -> Option<Vec<String>> {
    if matches!(diagnostic.level, DiagnosticLevel::Info) && !ctx.verbose_info {
        return None;
    }

    let prefix = match diagnostic.level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
        DiagnosticLevel::Info => "info",
    };

    let mut lines = vec![format!(
        "{}[{}]: {} ({})",
        prefix,
        diagnostic.code(),
        diagnostic.message(),
        ctx.context
    )];
    lines.push(format!("   --> {}.{}", ctx.context, diagnostic.member));

    for suggestion in &diagnostic.suggestions {
        lines.push(format!("   = help: {}", suggestion));
    }

    Some(lines)
}

fn render_plain(diagnostic: &Diagnostic, ctx: &DiagnosticRenderContext<'_>) -> Option<Vec<String>> {
    if matches!(diagnostic.level, DiagnosticLevel::Info) && !ctx.verbose_info {
        return None;
    }

    let level = match diagnostic.level {
        DiagnosticLevel::Error => "ERROR",
        DiagnosticLevel::Warning => "WARNING",
        DiagnosticLevel::Info => "INFO",
    };

    let mut lines = vec![format!(
        "[{}] {}: {} ({})",
        ctx.context,
        level,
        diagnostic.message(),
        diagnostic.code()
    )];
    lines.push(format!("   at {}", diagnostic.member));

    for suggestion in &diagnostic.suggestions {
        lines.push(format!("   suggestion: {}", suggestion));
    }

    Some(lines)
}
