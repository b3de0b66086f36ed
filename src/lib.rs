//! # adoc
//!
//! Structured-document projection and extension pipeline for AsciiDoc-like
//! markup. The markup grammar itself lives behind the [`DocumentEngine`]
//! boundary; this crate provides:
//!
//! - the depth-bounded [`StructuredDocument`] projection over a parsed
//!   block tree, with id/context/role/style lookup indices
//! - header extraction (title, authors, revision info, attributes)
//! - typed extension registries (preprocessors, include processors,
//!   treeprocessors, block and macro processors, postprocessors) and
//!   named, togglable extension groups
//! - a backend-keyed converter registry
//! - the linear conversion pipeline composing all of the above into one
//!   run per document
//!
//! ```rust,ignore
//! use adoc::testing::outline_engine;
//! use adoc::Options;
//!
//! let engine = outline_engine();
//! let doc = engine
//!     .read_document_structure("= Title\n\nhello", &Options::new())
//!     .expect("projection failed");
//! assert_eq!(doc.parts().len(), 1);
//! ```

pub mod ast;
pub mod converter;
pub mod engine;
pub mod extensions;
pub mod pipeline;
pub mod projection;
pub mod testing;

pub use ast::{
    AttributeMap, Author, BlockContent, ContentNode, DocumentHeader, DocumentIndex, DocumentRoot,
    DocumentTitle, RevisionInfo, SourceBlock, StructuredDocument,
};
pub use converter::{ConvertError, Converter, ConverterRegistry};
pub use engine::{DocumentEngine, Engine, Options, ParseError, ParseOptions};
pub use extensions::{
    BlockMacroProcessor, BlockProcessor, ExtensionError, ExtensionGroup, ExtensionRegistry,
    IncludeProcessor, IncludeReader, InlineMacroProcessor, Postprocessor, Preprocessor,
    Treeprocessor,
};
pub use pipeline::{ConversionPipeline, PipelineError, Stage};
pub use projection::{extract_header, project, ContentRenderer, ProjectionError, RenderError};
