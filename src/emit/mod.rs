//! Deterministic source text building shared by the generators.

/// Default indentation width in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Indented, LF-terminated source builder with brace-block discipline.
///
/// Output depends only on the sequence of calls, so the same model always
/// renders to byte-identical text.
#[derive(Debug, Clone)]
pub struct SourceWriter {
    output: String,
    indent_unit: String,
    depth: usize,
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl SourceWriter {
    #[must_use]
    pub fn new(indent_size: usize) -> Self {
        Self {
            output: String::new(),
            indent_unit: " ".repeat(indent_size),
            depth: 0,
        }
    }

    /// Emit the auto-generated banner and enable nullable annotations.
    pub fn header(&mut self, generator: &str) -> &mut Self {
        self.line("// <auto-generated>");
        self.line(&format!("//     Generated by {generator}."));
        self.line("//     Changes to this file will be lost when the code is regenerated.");
        self.line("// </auto-generated>");
        self.line("#nullable enable");
        self.blank_line()
    }

    /// Write a single line at the current depth. Empty text yields an
    /// empty line without trailing whitespace.
    pub fn line(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.output.push_str(&self.indent_unit);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Write `header` followed by an opening brace and indent.
    pub fn open_block(&mut self, header: &str) -> &mut Self {
        self.line(header);
        self.line("{");
        self.depth += 1;
        self
    }

    pub fn close_block(&mut self) -> &mut Self {
        self.close_block_with("")
    }

    /// Close the innermost block, appending `suffix` after the brace (`;`).
    pub fn close_block_with(&mut self, suffix: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("}}{suffix}"))
    }

    pub fn close_all_blocks(&mut self) -> &mut Self {
        while self.depth > 0 {
            self.close_block();
        }
        self
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Close any open blocks and return the text.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.close_all_blocks();
        self.output
    }
}

/// A named source fragment handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: String,
    pub source: String,
    /// blake3 digest of `source`, hex encoded.
    pub fingerprint: String,
}

impl Fragment {
    #[must_use]
    pub fn new(id: impl Into<String>, source: String) -> Self {
        let fingerprint = fingerprint(&source);
        Self {
            id: id.into(),
            source,
            fingerprint,
        }
    }
}

/// Content fingerprint used to detect unchanged output.
#[must_use]
pub fn fingerprint(source: &str) -> String {
    blake3::hash(source.as_bytes()).to_hex().to_string()
}

/// Turn a dotted namespace into an identifier-safe prefix (`A.B` → `A_B`).
#[must_use]
pub fn namespace_prefix(namespace: Option<&str>) -> String {
    namespace.unwrap_or_default().replace('.', "_")
}
