//! Extension points for the conversion pipeline
//!
//! Each pluggable capability gets its own narrow trait (preprocessor,
//! include processor, treeprocessor, block and macro processors,
//! postprocessor), selected at registration time rather than discovered at
//! call time. The `ExtensionRegistry` keeps ordered entry lists per kind
//! and `ExtensionGroup` bundles entries for scoped register/unregister.

pub mod group;
pub mod processors;
pub mod registry;

pub use group::ExtensionGroup;
pub use processors::{
    BlockMacroProcessor, BlockProcessor, ExtensionError, IncludeProcessor, IncludeReader,
    InlineMacroProcessor, Postprocessor, Preprocessor, Treeprocessor,
};
pub use registry::ExtensionRegistry;
