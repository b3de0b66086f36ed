//! Engine boundary and facade
//!
//! `DocumentEngine` is the contract with the external markup engine that
//! actually parses source text and renders nodes. `Engine` is the owned
//! facade callers hold: it pairs one document engine with its own extension
//! and converter registries. Engines are plain values, never process-wide
//! singletons; independent instances are independently usable.

use crate::ast::{AttributeMap, DocumentHeader, DocumentRoot, SourceBlock, StructuredDocument};
use crate::converter::ConverterRegistry;
use crate::extensions::{ExtensionGroup, ExtensionRegistry};
use crate::pipeline::{ConversionPipeline, PipelineError};
use crate::projection::{self, RenderError};
use std::fmt;
use std::path::PathBuf;

/// External parse rejected the input. Surfaced to the caller unchanged;
/// the pipeline aborts before any later stage runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    MalformedInput(String),
    UnresolvedInclude(String),
    ParsingFailed(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            ParseError::UnresolvedInclude(target) => {
                write!(f, "Cannot resolve include target '{}'", target)
            }
            ParseError::ParsingFailed(msg) => write!(f, "Parsing failed: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Options handed across the engine boundary for one parse call
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Skip the body entirely; only header metadata is populated
    pub header_only: bool,
    /// Base directory for resolving relative include targets, scoped to
    /// this call only
    pub base_dir: Option<PathBuf>,
    pub backend: String,
    /// API-supplied attributes; they override document attributes
    pub attributes: AttributeMap,
}

/// Caller-facing conversion/projection options
#[derive(Debug, Clone)]
pub struct Options {
    /// Output backend the converter lookup uses
    pub backend: String,
    /// Maximum depth of the structured-document projection
    pub max_structure_depth: u32,
    pub header_only: bool,
    pub base_dir: Option<PathBuf>,
    /// Write the converted output here instead of returning it
    pub to_file: Option<PathBuf>,
    pub attributes: AttributeMap,
}

impl Options {
    pub fn new() -> Self {
        Self {
            backend: "html5".to_string(),
            max_structure_depth: projection::DEFAULT_MAX_DEPTH,
            header_only: false,
            base_dir: None,
            to_file: None,
            attributes: AttributeMap::new(),
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_max_structure_depth(mut self, max_structure_depth: u32) -> Self {
        self.max_structure_depth = max_structure_depth;
        self
    }

    pub fn with_header_only(mut self, header_only: bool) -> Self {
        self.header_only = header_only;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_to_file(mut self, to_file: impl Into<PathBuf>) -> Self {
        self.to_file = Some(to_file.into());
        self
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub(crate) fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            header_only: self.header_only,
            base_dir: self.base_dir.clone(),
            backend: self.backend.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

/// The external markup engine: parse, per-node rendering, and the built-in
/// whole-document conversion the pipeline falls back to when no converter
/// is registered for the requested backend.
///
/// `parse` receives the live extension registry so the engine can consult
/// include, block, and macro processors while building the tree; those
/// kinds act at parse time.
pub trait DocumentEngine: Send + Sync {
    fn parse(
        &self,
        source: &str,
        options: &ParseOptions,
        extensions: &ExtensionRegistry,
    ) -> Result<DocumentRoot, ParseError>;

    fn render_block(&self, block: &SourceBlock) -> Result<String, RenderError>;

    fn convert_document(
        &self,
        root: &DocumentRoot,
        options: &ParseOptions,
    ) -> Result<String, RenderError>;
}

/// An owned conversion engine: one external document engine plus its own
/// registries
pub struct Engine {
    document_engine: Box<dyn DocumentEngine>,
    extensions: ExtensionRegistry,
    converters: ConverterRegistry,
}

impl Engine {
    pub fn new(document_engine: Box<dyn DocumentEngine>) -> Self {
        Self {
            document_engine,
            extensions: ExtensionRegistry::new(),
            converters: ConverterRegistry::new(),
        }
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Mutating the registries between conversions is safe; mutating them
    /// during an in-flight conversion is not possible through this API
    /// (conversion borrows the engine shared).
    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.extensions
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    pub fn unregister_all_extensions(&mut self) {
        self.extensions.unregister_all();
    }

    /// New empty extension group with a generated unique name
    pub fn create_group(&self) -> ExtensionGroup {
        ExtensionGroup::unnamed()
    }

    pub fn create_group_named(&self, name: impl Into<String>) -> ExtensionGroup {
        ExtensionGroup::new(name)
    }

    pub fn register_group(&mut self, group: &ExtensionGroup) {
        group.register(&mut self.extensions);
    }

    pub fn unregister_group(&mut self, group: &ExtensionGroup) {
        group.unregister(&mut self.extensions);
    }

    fn pipeline(&self) -> ConversionPipeline<'_> {
        ConversionPipeline::new(
            self.document_engine.as_ref(),
            &self.extensions,
            &self.converters,
        )
    }

    /// Preprocess, parse, and tree-process the source into a block tree
    /// without converting it
    pub fn load(&self, source: &str, options: &Options) -> Result<DocumentRoot, PipelineError> {
        self.pipeline().load(source, options)
    }

    /// Full projection: parse (or header-only parse), then project the
    /// body into a depth-bounded structured document
    pub fn read_document_structure(
        &self,
        source: &str,
        options: &Options,
    ) -> Result<StructuredDocument, PipelineError> {
        self.pipeline().project(source, options)
    }

    /// Header metadata only; the body is never parsed and no processors run
    pub fn read_document_header(&self, source: &str) -> Result<DocumentHeader, PipelineError> {
        let options = Options::new().with_header_only(true);
        let root = self
            .document_engine
            .parse(source, &options.parse_options(), &ExtensionRegistry::new())?;
        Ok(projection::extract_header(&root))
    }

    /// Run the whole conversion pipeline. Returns `None` when the output
    /// was written to `options.to_file` instead of being returned.
    pub fn convert(&self, source: &str, options: &Options) -> Result<Option<String>, PipelineError> {
        self.pipeline().convert(source, options)
    }
}
