//! Conversion pipeline
//!
//! One conversion run is a linear pass through fixed stages:
//!
//! ```text
//! RAW_INPUT -> PREPROCESSED -> PARSED -> TREE_PROCESSED -> CONVERTED -> POST_PROCESSED
//! ```
//!
//! Each arrow is a single pass through the corresponding registry or the
//! external parse/render capability; no stage is revisited. A failure at
//! any stage aborts the run and discards partial output. Processors that
//! already ran are not rolled back, but the conversion as a whole reports
//! failure.

use crate::ast::{DocumentRoot, StructuredDocument};
use crate::converter::{ConvertError, ConverterRegistry};
use crate::engine::{DocumentEngine, Options, ParseError};
use crate::extensions::{ExtensionError, ExtensionRegistry};
use crate::projection::{self, ContentRenderer, ProjectionError, RenderError};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Pipeline stage a failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocess,
    Parse,
    TreeProcess,
    Convert,
    PostProcess,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Preprocess => "preprocess",
            Stage::Parse => "parse",
            Stage::TreeProcess => "tree-process",
            Stage::Convert => "convert",
            Stage::PostProcess => "post-process",
        };
        write!(f, "{}", name)
    }
}

/// Composite failure for one conversion or projection run. Every failure
/// is reported to the caller as a single typed value; nothing is logged
/// and swallowed.
#[derive(Debug)]
pub enum PipelineError {
    Parse(ParseError),
    Projection(ProjectionError),
    Extension { stage: Stage, source: ExtensionError },
    Convert(ConvertError),
    Render(RenderError),
    Io(io::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Parse(e) => write!(f, "Parse error: {}", e),
            PipelineError::Projection(e) => write!(f, "Projection error: {}", e),
            PipelineError::Extension { stage, source } => {
                write!(f, "Extension failed during {}: {}", stage, source)
            }
            PipelineError::Convert(e) => write!(f, "Convert error: {}", e),
            PipelineError::Render(e) => write!(f, "Render error: {}", e),
            PipelineError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Parse(e) => Some(e),
            PipelineError::Projection(e) => Some(e),
            PipelineError::Extension { source, .. } => Some(source),
            PipelineError::Convert(e) => Some(e),
            PipelineError::Render(e) => Some(e),
            PipelineError::Io(e) => Some(e),
        }
    }
}

impl From<ParseError> for PipelineError {
    fn from(err: ParseError) -> Self {
        PipelineError::Parse(err)
    }
}

impl From<ProjectionError> for PipelineError {
    fn from(err: ProjectionError) -> Self {
        PipelineError::Projection(err)
    }
}

impl From<ConvertError> for PipelineError {
    fn from(err: ConvertError) -> Self {
        PipelineError::Convert(err)
    }
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        PipelineError::Render(err)
    }
}

impl From<io::Error> for PipelineError {
    fn from(err: io::Error) -> Self {
        PipelineError::Io(err)
    }
}

struct EngineRenderer<'a>(&'a dyn DocumentEngine);

impl ContentRenderer for EngineRenderer<'_> {
    fn render(&self, block: &crate::ast::SourceBlock) -> Result<String, RenderError> {
        self.0.render_block(block)
    }
}

/// Orchestrates one conversion run over borrowed engine state. The borrow
/// is shared, so registries cannot be mutated while a run is in flight.
pub struct ConversionPipeline<'a> {
    engine: &'a dyn DocumentEngine,
    extensions: &'a ExtensionRegistry,
    converters: &'a ConverterRegistry,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(
        engine: &'a dyn DocumentEngine,
        extensions: &'a ExtensionRegistry,
        converters: &'a ConverterRegistry,
    ) -> Self {
        Self {
            engine,
            extensions,
            converters,
        }
    }

    /// RAW_INPUT through TREE_PROCESSED: preprocess, parse, run
    /// treeprocessors. The include/block/macro kinds are consulted by the
    /// engine during the parse itself.
    pub fn load(&self, source: &str, options: &Options) -> Result<DocumentRoot, PipelineError> {
        let parse_options = options.parse_options();

        let mut text = source.to_string();
        for preprocessor in self.extensions.preprocessors() {
            text = preprocessor
                .process(text, &parse_options.attributes)
                .map_err(|source| PipelineError::Extension {
                    stage: Stage::Preprocess,
                    source,
                })?;
        }

        let mut root = self.engine.parse(&text, &parse_options, self.extensions)?;

        for treeprocessor in self.extensions.treeprocessors() {
            root = treeprocessor
                .process(root)
                .map_err(|source| PipelineError::Extension {
                    stage: Stage::TreeProcess,
                    source,
                })?;
        }
        Ok(root)
    }

    /// Load, then project header and body into a structured document
    pub fn project(
        &self,
        source: &str,
        options: &Options,
    ) -> Result<StructuredDocument, PipelineError> {
        let root = self.load(source, options)?;
        let header = projection::extract_header(&root);
        let parts = projection::project(
            &root.blocks,
            options.max_structure_depth,
            &EngineRenderer(self.engine),
        )?;
        Ok(StructuredDocument::new(Some(header), parts))
    }

    /// The full run through POST_PROCESSED. Returns `None` when output was
    /// written to `options.to_file` instead of being returned.
    pub fn convert(
        &self,
        source: &str,
        options: &Options,
    ) -> Result<Option<String>, PipelineError> {
        let root = self.load(source, options)?;
        let parse_options = options.parse_options();

        let mut output = match self.converters.resolve(&options.backend) {
            Some(converter) => converter.convert_document(&root)?,
            None => self.engine.convert_document(&root, &parse_options)?,
        };

        for postprocessor in self.extensions.postprocessors() {
            output = postprocessor
                .process(output, &root)
                .map_err(|source| PipelineError::Extension {
                    stage: Stage::PostProcess,
                    source,
                })?;
        }

        match &options.to_file {
            Some(path) => {
                write_output(path, &output)?;
                Ok(None)
            }
            None => Ok(Some(output)),
        }
    }
}

/// Write through a temporary sibling and rename into place, so a failed
/// write never leaves a partial file at the requested destination
fn write_output(path: &Path, content: &str) -> io::Result<()> {
    let mut file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"))?
        .to_os_string();
    file_name.push(".tmp");
    let tmp = path.with_file_name(file_name);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}
