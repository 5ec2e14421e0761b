//! Line builder for fragments. Fragments are written relative to the class body: depth 0 is
//! a member declaration, and each depth step is one [`FRAGMENT_INDENT`]. The unit renderer
//! re-indents them to their final position.

pub const FRAGMENT_INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    lines: Vec<String>,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, depth: usize, text: impl AsRef<str>) -> &mut Self {
        self.lines
            .push(format!("{}{}", FRAGMENT_INDENT.repeat(depth), text.as_ref()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn open(&mut self, depth: usize) -> &mut Self {
        self.line(depth, "{")
    }

    pub fn close(&mut self, depth: usize) -> &mut Self {
        self.line(depth, "}")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Split a fragment line into its relative depth and its content.
pub fn split_depth(line: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix(FRAGMENT_INDENT) {
        depth += 1;
        rest = stripped;
    }
    (depth, rest)
}
