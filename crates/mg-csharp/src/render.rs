//! Rendering a [`GeneratedUnit`] into a complete C# source file.

use mg_core::fragments::GeneratedUnit;

use crate::config::PrinterConfig;
use crate::writer::split_depth;

pub const AUTO_GENERATED_HEADER: &str = "// <auto-generated/>";

struct Section<'a> {
    entries: &'a [String],
    /// Separate entries with a blank line.
    spaced: bool,
}

/// Render `unit` as a `partial class` declaration. Sections appear in a fixed order: nested
/// types, static fields, static properties, implementations, fields, properties.
pub fn render_unit(unit: &GeneratedUnit, config: &PrinterConfig) -> String {
    let mut lines: Vec<String> = Vec::new();

    if config.auto_generated_header {
        lines.push(AUTO_GENERATED_HEADER.to_string());
    }
    if config.nullable_context {
        lines.push("#nullable enable".to_string());
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    if !unit.usings.is_empty() {
        lines.extend(unit.usings.iter().cloned());
        lines.push(String::new());
    }

    let mut depth = 0;
    if let Some(namespace) = &unit.namespace {
        lines.push(format!("namespace {}", namespace));
        lines.push("{".to_string());
        depth = 1;
    }

    let mut declaration = format!("{}partial class {}", config.indent(depth), unit.type_name);
    if !unit.interfaces.is_empty() {
        declaration.push_str(" : ");
        declaration.push_str(&unit.interfaces.join(", "));
    }
    lines.push(declaration);
    lines.push(format!("{}{{", config.indent(depth)));

    let sections = [
        Section { entries: &unit.nested_types, spaced: true },
        Section { entries: &unit.static_fields, spaced: false },
        Section { entries: &unit.static_properties, spaced: true },
        Section { entries: &unit.implementations, spaced: true },
        Section { entries: &unit.fields, spaced: false },
        Section { entries: &unit.properties, spaced: true },
    ];
    let body_depth = depth + 1;
    let mut first_block = true;
    for section in sections.iter().filter(|s| !s.entries.is_empty()) {
        if !first_block {
            lines.push(String::new());
        }
        first_block = false;
        for (index, entry) in section.entries.iter().enumerate() {
            if index > 0 && section.spaced {
                lines.push(String::new());
            }
            lines.extend(reindent(entry, body_depth, config));
        }
    }

    lines.push(format!("{}}}", config.indent(depth)));
    if unit.namespace.is_some() {
        lines.push("}".to_string());
    }

    let newline = config.line_ending.as_str();
    let mut output = lines.join(newline);
    output.push_str(newline);
    output
}

fn reindent<'a>(
    fragment: &'a str,
    base: usize,
    config: &'a PrinterConfig,
) -> impl Iterator<Item = String> + 'a {
    fragment.lines().map(move |line| {
        if line.trim().is_empty() {
            return String::new();
        }
        let (depth, content) = split_depth(line);
        format!("{}{}", config.indent(base + depth), content)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEnding;
    use pretty_assertions::assert_eq;

    fn unit(namespace: Option<&str>) -> GeneratedUnit {
        GeneratedUnit {
            type_name: "Counter".into(),
            namespace: namespace.map(str::to_string),
            usings: vec!["using System.ComponentModel;".into()],
            interfaces: vec!["INotifyPropertyChanged".into()],
            nested_types: vec![],
            implementations: vec![],
            fields: vec!["private EventHandler? _countChangedHandler;".into()],
            properties: vec![
                "public int Count\n{\n    get => _count;\n}".into(),
                "public int Total => 0;".into(),
            ],
            static_fields: vec![],
            static_properties: vec![],
        }
    }

    #[test]
    fn renders_namespace_block() {
        let text = render_unit(&unit(Some("App")), &PrinterConfig::default());
        let expected = "\
// <auto-generated/>
#nullable enable

using System.ComponentModel;

namespace App
{
    partial class Counter : INotifyPropertyChanged
    {
        private EventHandler? _countChangedHandler;

        public int Count
        {
            get => _count;
        }

        public int Total => 0;
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn global_namespace_and_tabs() {
        let config = PrinterConfig {
            use_tabs: true,
            auto_generated_header: false,
            nullable_context: false,
            line_ending: LineEnding::Crlf,
            ..PrinterConfig::default()
        };
        let text = render_unit(&unit(None), &config);
        assert!(text.starts_with("using System.ComponentModel;\r\n\r\npartial class Counter"));
        assert!(text.contains("\r\n\t\tget => _count;\r\n"));
        assert!(!text.contains("namespace"));
    }
}
