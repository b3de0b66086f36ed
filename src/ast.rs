//! AST types for the adoc document model
//!
//! Two families of types live here:
//!
//! - **Source side**: `SourceBlock` and `DocumentRoot`, the block tree the
//!   external document engine hands back from a parse. These are the input
//!   to projection and conversion.
//! - **Projected side**: `ContentNode`, `DocumentHeader`, and
//!   `StructuredDocument`, the depth-bounded, query-oriented view produced
//!   by the projector, plus the `DocumentIndex` lookup tables over it.

pub mod content_node;
pub mod header;
pub mod index;
pub mod source;
pub mod structured;

pub use content_node::ContentNode;
pub use header::{Author, DocumentHeader, DocumentTitle, RevisionInfo};
pub use index::DocumentIndex;
pub use source::{AttributeMap, BlockContent, DocumentRoot, SourceBlock};
pub use structured::StructuredDocument;
