//! Extension groups
//!
//! A group is a named, inert bundle of registry entries that can be
//! registered and unregistered as a unit without discarding its own state.
//! Registering twice does not duplicate entries; unregistering removes
//! exactly the entries this group added.

use super::processors::{
    BlockMacroProcessor, BlockProcessor, IncludeProcessor, InlineMacroProcessor, Postprocessor,
    Preprocessor, Treeprocessor,
};
use super::registry::ExtensionRegistry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static UNNAMED_GROUPS: AtomicU64 = AtomicU64::new(0);

/// A named, togglable bundle of extension-registry entries
pub struct ExtensionGroup {
    name: String,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
    include_processors: Vec<Arc<dyn IncludeProcessor>>,
    treeprocessors: Vec<Arc<dyn Treeprocessor>>,
    block_processors: Vec<Arc<dyn BlockProcessor>>,
    block_macros: Vec<Arc<dyn BlockMacroProcessor>>,
    inline_macros: Vec<Arc<dyn InlineMacroProcessor>>,
    postprocessors: Vec<Arc<dyn Postprocessor>>,
}

impl ExtensionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preprocessors: Vec::new(),
            include_processors: Vec::new(),
            treeprocessors: Vec::new(),
            block_processors: Vec::new(),
            block_macros: Vec::new(),
            inline_macros: Vec::new(),
            postprocessors: Vec::new(),
        }
    }

    /// Group with a generated unique name
    pub fn unnamed() -> Self {
        let n = UNNAMED_GROUPS.fetch_add(1, Ordering::Relaxed);
        Self::new(format!("group-{}", n))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_preprocessor(mut self, processor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessors.push(processor);
        self
    }

    pub fn with_include_processor(mut self, processor: Arc<dyn IncludeProcessor>) -> Self {
        self.include_processors.push(processor);
        self
    }

    pub fn with_treeprocessor(mut self, processor: Arc<dyn Treeprocessor>) -> Self {
        self.treeprocessors.push(processor);
        self
    }

    pub fn with_block_processor(mut self, processor: Arc<dyn BlockProcessor>) -> Self {
        self.block_processors.push(processor);
        self
    }

    pub fn with_block_macro(mut self, processor: Arc<dyn BlockMacroProcessor>) -> Self {
        self.block_macros.push(processor);
        self
    }

    pub fn with_inline_macro(mut self, processor: Arc<dyn InlineMacroProcessor>) -> Self {
        self.inline_macros.push(processor);
        self
    }

    pub fn with_postprocessor(mut self, processor: Arc<dyn Postprocessor>) -> Self {
        self.postprocessors.push(processor);
        self
    }

    /// Add all held entries to the registry. Idempotent per group: if this
    /// group's entries are already live, nothing is added.
    pub fn register(&self, registry: &mut ExtensionRegistry) {
        if registry.has_group(&self.name) {
            return;
        }
        for processor in &self.preprocessors {
            registry.register_preprocessor_owned(processor.clone(), self.name.clone());
        }
        for processor in &self.include_processors {
            registry.register_include_processor_owned(processor.clone(), self.name.clone());
        }
        for processor in &self.treeprocessors {
            registry.register_treeprocessor_owned(processor.clone(), self.name.clone());
        }
        for processor in &self.block_processors {
            registry.register_block_processor_owned(processor.clone(), self.name.clone());
        }
        for processor in &self.block_macros {
            registry.register_block_macro_owned(processor.clone(), self.name.clone());
        }
        for processor in &self.inline_macros {
            registry.register_inline_macro_owned(processor.clone(), self.name.clone());
        }
        for processor in &self.postprocessors {
            registry.register_postprocessor_owned(processor.clone(), self.name.clone());
        }
    }

    /// Remove exactly the entries this group added, leaving direct
    /// registrations and other groups untouched
    pub fn unregister(&self, registry: &mut ExtensionRegistry) {
        registry.remove_group(&self.name);
    }
}
