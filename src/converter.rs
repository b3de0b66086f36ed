//! Converter registry
//!
//! Converters turn parsed nodes into rendered text for one output backend.
//! They are registered under a backend-name key; the pipeline looks up the
//! converter for the requested backend and falls back to the engine's
//! built-in conversion when none is registered.

use crate::ast::{DocumentRoot, SourceBlock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Errors raised by a registered converter
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    ConversionFailed(String),
    UnsupportedNode(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::ConversionFailed(msg) => write!(f, "Conversion failed: {}", msg),
            ConvertError::UnsupportedNode(context) => {
                write!(f, "Converter does not support '{}' nodes", context)
            }
        }
    }
}

impl std::error::Error for ConvertError {}

/// Produces rendered text for a node. `transform` selects a named
/// rendering rule; `None` means the node's own context.
pub trait Converter: Send + Sync {
    fn convert(&self, node: &SourceBlock, transform: Option<&str>)
        -> Result<String, ConvertError>;

    /// Convert a whole document. The default drives `convert` over the
    /// top-level blocks and joins the results.
    fn convert_document(&self, root: &DocumentRoot) -> Result<String, ConvertError> {
        let rendered: Result<Vec<String>, ConvertError> = root
            .blocks
            .iter()
            .map(|block| self.convert(block, None))
            .collect();
        Ok(rendered?.join("\n"))
    }
}

/// Backend-name-keyed converter registry
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a backend. Registering the same backend
    /// again replaces the previous converter.
    pub fn register(&mut self, backend: impl Into<String>, converter: Arc<dyn Converter>) {
        self.converters.insert(backend.into(), converter);
    }

    pub fn resolve(&self, backend: &str) -> Option<Arc<dyn Converter>> {
        self.converters.get(backend).cloned()
    }

    pub fn has(&self, backend: &str) -> bool {
        self.converters.contains_key(backend)
    }

    /// Registered backend names, sorted
    pub fn available(&self) -> Vec<String> {
        let mut backends: Vec<_> = self.converters.keys().cloned().collect();
        backends.sort();
        backends
    }

    pub fn unregister_all(&mut self) {
        self.converters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BlockContent;

    struct TagConverter {
        tag: &'static str,
    }

    impl Converter for TagConverter {
        fn convert(
            &self,
            node: &SourceBlock,
            _transform: Option<&str>,
        ) -> Result<String, ConvertError> {
            match &node.content {
                BlockContent::Text(text) => Ok(format!("<{}>{}</{}>", self.tag, text, self.tag)),
                BlockContent::Compound => Err(ConvertError::UnsupportedNode(node.context.clone())),
            }
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ConverterRegistry::new();
        assert!(registry.resolve("html5").is_none());

        registry.register("html5", Arc::new(TagConverter { tag: "p" }));
        registry.register("docbook", Arc::new(TagConverter { tag: "para" }));
        assert!(registry.has("html5"));
        assert_eq!(registry.available(), ["docbook", "html5"]);

        let converter = registry.resolve("html5").unwrap();
        let node = SourceBlock::new("paragraph").with_text("hi");
        assert_eq!(converter.convert(&node, None).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = ConverterRegistry::new();
        registry.register("html5", Arc::new(TagConverter { tag: "p" }));
        registry.register("html5", Arc::new(TagConverter { tag: "div" }));

        let node = SourceBlock::new("paragraph").with_text("hi");
        let converter = registry.resolve("html5").unwrap();
        assert_eq!(converter.convert(&node, None).unwrap(), "<div>hi</div>");
        assert_eq!(registry.available().len(), 1);
    }

    #[test]
    fn test_default_document_conversion_joins_blocks() {
        let converter = TagConverter { tag: "p" };
        let root = DocumentRoot::new().with_blocks(vec![
            SourceBlock::new("paragraph").with_text("a"),
            SourceBlock::new("paragraph").with_text("b"),
        ]);
        assert_eq!(converter.convert_document(&root).unwrap(), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_unregister_all() {
        let mut registry = ConverterRegistry::new();
        registry.register("html5", Arc::new(TagConverter { tag: "p" }));
        registry.unregister_all();
        registry.unregister_all();
        assert!(registry.available().is_empty());
    }
}
