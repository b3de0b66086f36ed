//! Processor capability traits
//!
//! One trait per extension kind. Run-all kinds (preprocessor,
//! treeprocessor, postprocessor) execute every registered entry in
//! registration order, each seeing the previous one's output. Selected
//! kinds (include, block, block macro, inline macro) service at most one
//! match, chosen first-registered-wins.

use crate::ast::{AttributeMap, DocumentRoot, SourceBlock};
use std::fmt;

/// Failure raised by a registered processor. Never retried, never
/// swallowed; it aborts the remaining stages of the conversion.
#[derive(Debug)]
pub struct ExtensionError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExtensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtensionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

/// Where pushed include content came from, for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeOrigin {
    pub file: Option<String>,
    pub path: Option<String>,
}

/// Line-oriented reader over the raw input with support for splicing
/// replacement content in at the current cursor.
///
/// An include processor pushes its resolved content here; the pushed lines
/// are read next, so a pushed include directive is itself resolved in turn
/// (nested includes).
#[derive(Debug)]
pub struct IncludeReader {
    lines: Vec<String>,
    cursor: usize,
    origins: Vec<IncludeOrigin>,
}

impl IncludeReader {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
            cursor: 0,
            origins: Vec::new(),
        }
    }

    /// Next line, advancing the cursor
    pub fn read_line(&mut self) -> Option<String> {
        let line = self.lines.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(line)
    }

    pub fn peek_line(&self) -> Option<&str> {
        self.lines.get(self.cursor).map(String::as_str)
    }

    pub fn has_more_lines(&self) -> bool {
        self.cursor < self.lines.len()
    }

    /// Splice `data` in at the current cursor so it is read next
    pub fn push_include(&mut self, data: &str, file: Option<&str>, path: Option<&str>) {
        let spliced: Vec<String> = data.lines().map(str::to_string).collect();
        self.lines.splice(self.cursor..self.cursor, spliced);
        self.origins.push(IncludeOrigin {
            file: file.map(str::to_string),
            path: path.map(str::to_string),
        });
    }

    /// Origins of every pushed include, in push order
    pub fn origins(&self) -> &[IncludeOrigin] {
        &self.origins
    }
}

/// Rewrites the raw input before parsing. Runs once per document; each
/// preprocessor sees the output of the previous one.
pub trait Preprocessor: Send + Sync {
    fn process(&self, source: String, attributes: &AttributeMap)
        -> Result<String, ExtensionError>;
}

/// Services include directives whose target it `handles`. Selection is
/// first-registered-whose-handles-returns-true; an unhandled target falls
/// through to the engine's default include behavior.
pub trait IncludeProcessor: Send + Sync {
    fn handles(&self, target: &str) -> bool;

    fn process(
        &self,
        reader: &mut IncludeReader,
        target: &str,
        attributes: &AttributeMap,
    ) -> Result<(), ExtensionError>;
}

/// Transforms the fully parsed tree after parse and before conversion.
/// May mutate in place or return a different tree; callers must use the
/// returned value.
pub trait Treeprocessor: Send + Sync {
    fn process(&self, document: DocumentRoot) -> Result<DocumentRoot, ExtensionError>;
}

/// Produces a replacement block for a named, delimited block whose context
/// is in `contexts()`
pub trait BlockProcessor: Send + Sync {
    fn name(&self) -> &str;

    /// Contexts this processor attaches to
    fn contexts(&self) -> Vec<&str> {
        vec!["open", "paragraph"]
    }

    fn process(
        &self,
        content: &str,
        attributes: &AttributeMap,
    ) -> Result<SourceBlock, ExtensionError>;
}

/// Produces a replacement block for a block macro, matched by exact name
pub trait BlockMacroProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(
        &self,
        target: &str,
        attributes: &AttributeMap,
    ) -> Result<SourceBlock, ExtensionError>;
}

/// Produces an inline substitution for an inline macro, matched by exact name
pub trait InlineMacroProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, target: &str, attributes: &AttributeMap)
        -> Result<String, ExtensionError>;
}

/// Rewrites the fully rendered output. Runs after conversion in
/// registration order.
pub trait Postprocessor: Send + Sync {
    fn process(
        &self,
        output: String,
        document: &DocumentRoot,
    ) -> Result<String, ExtensionError>;
}
