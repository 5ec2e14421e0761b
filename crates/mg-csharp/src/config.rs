use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Layout of rendered units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Number of spaces to indent per nesting level.
    pub indent_size: usize,
    pub use_tabs: bool,
    pub line_ending: LineEnding,
    /// Emit the `// <auto-generated/>` marker.
    pub auto_generated_header: bool,
    /// Emit `#nullable enable`; generated code uses nullable annotations.
    pub nullable_context: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            line_ending: LineEnding::Lf,
            auto_generated_header: true,
            nullable_context: true,
        }
    }
}

impl PrinterConfig {
    /// Generate indentation string for the given level
    pub fn indent(&self, level: usize) -> String {
        if self.use_tabs {
            "\t".repeat(level)
        } else {
            " ".repeat(self.indent_size * level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_follows_configuration() {
        let spaces = PrinterConfig {
            indent_size: 2,
            ..PrinterConfig::default()
        };
        assert_eq!(spaces.indent(3), "      ");
        let tabs = PrinterConfig {
            use_tabs: true,
            ..PrinterConfig::default()
        };
        assert_eq!(tabs.indent(2), "\t\t");
    }
}
