//! Extension registry
//!
//! Ordered collections of registered processors, one list per kind.
//! Registration never deduplicates: registering the same processor twice
//! yields two executions. Each entry optionally records the extension
//! group that added it, so a group can later remove exactly its own
//! entries without touching direct registrations or other groups.

use super::processors::{
    BlockMacroProcessor, BlockProcessor, IncludeProcessor, InlineMacroProcessor, Postprocessor,
    Preprocessor, Treeprocessor,
};
use std::sync::Arc;

struct Entry<T: ?Sized> {
    processor: Arc<T>,
    group: Option<String>,
}

// manual impl; a derive would demand T: Clone even behind the Arc
impl<T: ?Sized> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            processor: self.processor.clone(),
            group: self.group.clone(),
        }
    }
}

impl<T: ?Sized> Entry<T> {
    fn direct(processor: Arc<T>) -> Self {
        Self {
            processor,
            group: None,
        }
    }
}

/// Registries for every processor kind, empty until mutated via the
/// registration API
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    preprocessors: Vec<Entry<dyn Preprocessor>>,
    include_processors: Vec<Entry<dyn IncludeProcessor>>,
    treeprocessors: Vec<Entry<dyn Treeprocessor>>,
    block_processors: Vec<Entry<dyn BlockProcessor>>,
    block_macros: Vec<Entry<dyn BlockMacroProcessor>>,
    inline_macros: Vec<Entry<dyn InlineMacroProcessor>>,
    postprocessors: Vec<Entry<dyn Postprocessor>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_preprocessor(&mut self, processor: Arc<dyn Preprocessor>) {
        self.preprocessors.push(Entry::direct(processor));
    }

    pub fn register_include_processor(&mut self, processor: Arc<dyn IncludeProcessor>) {
        self.include_processors.push(Entry::direct(processor));
    }

    pub fn register_treeprocessor(&mut self, processor: Arc<dyn Treeprocessor>) {
        self.treeprocessors.push(Entry::direct(processor));
    }

    pub fn register_block_processor(&mut self, processor: Arc<dyn BlockProcessor>) {
        self.block_processors.push(Entry::direct(processor));
    }

    pub fn register_block_macro(&mut self, processor: Arc<dyn BlockMacroProcessor>) {
        self.block_macros.push(Entry::direct(processor));
    }

    pub fn register_inline_macro(&mut self, processor: Arc<dyn InlineMacroProcessor>) {
        self.inline_macros.push(Entry::direct(processor));
    }

    pub fn register_postprocessor(&mut self, processor: Arc<dyn Postprocessor>) {
        self.postprocessors.push(Entry::direct(processor));
    }

    /// Registered preprocessors in registration order
    pub fn preprocessors(&self) -> impl Iterator<Item = &Arc<dyn Preprocessor>> {
        self.preprocessors.iter().map(|entry| &entry.processor)
    }

    pub fn treeprocessors(&self) -> impl Iterator<Item = &Arc<dyn Treeprocessor>> {
        self.treeprocessors.iter().map(|entry| &entry.processor)
    }

    pub fn postprocessors(&self) -> impl Iterator<Item = &Arc<dyn Postprocessor>> {
        self.postprocessors.iter().map(|entry| &entry.processor)
    }

    /// First registered include processor whose `handles` accepts `target`
    pub fn include_processor_for(&self, target: &str) -> Option<&Arc<dyn IncludeProcessor>> {
        self.include_processors
            .iter()
            .map(|entry| &entry.processor)
            .find(|processor| processor.handles(target))
    }

    /// First registered block processor matching the name whose declared
    /// context set contains `context`. Overlapping registrations are a
    /// documented tie-break, not an error: first registered wins.
    pub fn block_processor_for(
        &self,
        name: &str,
        context: &str,
    ) -> Option<&Arc<dyn BlockProcessor>> {
        self.block_processors
            .iter()
            .map(|entry| &entry.processor)
            .find(|processor| processor.name() == name && processor.contexts().contains(&context))
    }

    /// First registered block macro processor with this exact name
    pub fn block_macro_for(&self, name: &str) -> Option<&Arc<dyn BlockMacroProcessor>> {
        self.block_macros
            .iter()
            .map(|entry| &entry.processor)
            .find(|processor| processor.name() == name)
    }

    /// First registered inline macro processor with this exact name
    pub fn inline_macro_for(&self, name: &str) -> Option<&Arc<dyn InlineMacroProcessor>> {
        self.inline_macros
            .iter()
            .map(|entry| &entry.processor)
            .find(|processor| processor.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.preprocessors.is_empty()
            && self.include_processors.is_empty()
            && self.treeprocessors.is_empty()
            && self.block_processors.is_empty()
            && self.block_macros.is_empty()
            && self.inline_macros.is_empty()
            && self.postprocessors.is_empty()
    }

    /// Clear every entry of every kind. Safe to call repeatedly and with
    /// nothing registered; subsequent conversions run with zero extensions.
    pub fn unregister_all(&mut self) {
        self.preprocessors.clear();
        self.include_processors.clear();
        self.treeprocessors.clear();
        self.block_processors.clear();
        self.block_macros.clear();
        self.inline_macros.clear();
        self.postprocessors.clear();
    }

    /// True when any entry is owned by the named group
    pub fn has_group(&self, group: &str) -> bool {
        let owned = |g: &Option<String>| g.as_deref() == Some(group);
        self.preprocessors.iter().any(|e| owned(&e.group))
            || self.include_processors.iter().any(|e| owned(&e.group))
            || self.treeprocessors.iter().any(|e| owned(&e.group))
            || self.block_processors.iter().any(|e| owned(&e.group))
            || self.block_macros.iter().any(|e| owned(&e.group))
            || self.inline_macros.iter().any(|e| owned(&e.group))
            || self.postprocessors.iter().any(|e| owned(&e.group))
    }

    /// Remove exactly the entries owned by the named group
    pub fn remove_group(&mut self, group: &str) {
        let keep = |g: &Option<String>| g.as_deref() != Some(group);
        self.preprocessors.retain(|e| keep(&e.group));
        self.include_processors.retain(|e| keep(&e.group));
        self.treeprocessors.retain(|e| keep(&e.group));
        self.block_processors.retain(|e| keep(&e.group));
        self.block_macros.retain(|e| keep(&e.group));
        self.inline_macros.retain(|e| keep(&e.group));
        self.postprocessors.retain(|e| keep(&e.group));
    }

    pub(crate) fn register_preprocessor_owned(
        &mut self,
        processor: Arc<dyn Preprocessor>,
        group: String,
    ) {
        self.preprocessors.push(Entry {
            processor,
            group: Some(group),
        });
    }

    pub(crate) fn register_include_processor_owned(
        &mut self,
        processor: Arc<dyn IncludeProcessor>,
        group: String,
    ) {
        self.include_processors.push(Entry {
            processor,
            group: Some(group),
        });
    }

    pub(crate) fn register_treeprocessor_owned(
        &mut self,
        processor: Arc<dyn Treeprocessor>,
        group: String,
    ) {
        self.treeprocessors.push(Entry {
            processor,
            group: Some(group),
        });
    }

    pub(crate) fn register_block_processor_owned(
        &mut self,
        processor: Arc<dyn BlockProcessor>,
        group: String,
    ) {
        self.block_processors.push(Entry {
            processor,
            group: Some(group),
        });
    }

    pub(crate) fn register_block_macro_owned(
        &mut self,
        processor: Arc<dyn BlockMacroProcessor>,
        group: String,
    ) {
        self.block_macros.push(Entry {
            processor,
            group: Some(group),
        });
    }

    pub(crate) fn register_inline_macro_owned(
        &mut self,
        processor: Arc<dyn InlineMacroProcessor>,
        group: String,
    ) {
        self.inline_macros.push(Entry {
            processor,
            group: Some(group),
        });
    }

    pub(crate) fn register_postprocessor_owned(
        &mut self,
        processor: Arc<dyn Postprocessor>,
        group: String,
    ) {
        self.postprocessors.push(Entry {
            processor,
            group: Some(group),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AttributeMap, SourceBlock};
    use crate::extensions::processors::ExtensionError;

    struct PrefixIncludes {
        prefix: &'static str,
    }

    impl IncludeProcessor for PrefixIncludes {
        fn handles(&self, target: &str) -> bool {
            target.starts_with(self.prefix)
        }

        fn process(
            &self,
            reader: &mut super::super::processors::IncludeReader,
            _target: &str,
            _attributes: &AttributeMap,
        ) -> Result<(), ExtensionError> {
            reader.push_include(self.prefix, None, None);
            Ok(())
        }
    }

    struct NamedMacro {
        name: &'static str,
    }

    impl BlockMacroProcessor for NamedMacro {
        fn name(&self) -> &str {
            self.name
        }

        fn process(
            &self,
            target: &str,
            _attributes: &AttributeMap,
        ) -> Result<SourceBlock, ExtensionError> {
            Ok(SourceBlock::new("paragraph").with_text(target))
        }
    }

    #[test]
    fn test_include_selection_is_first_match() {
        let mut registry = ExtensionRegistry::new();
        registry.register_include_processor(Arc::new(PrefixIncludes { prefix: "http://" }));
        registry.register_include_processor(Arc::new(PrefixIncludes { prefix: "https://" }));

        assert!(registry.include_processor_for("http://x").is_some());
        assert!(registry.include_processor_for("https://x").is_some());
        assert!(registry.include_processor_for("file.adoc").is_none());
    }

    #[test]
    fn test_macro_overlap_first_registered_wins() {
        struct First;
        struct Second;
        impl BlockMacroProcessor for First {
            fn name(&self) -> &str {
                "gist"
            }
            fn process(
                &self,
                _target: &str,
                _attributes: &AttributeMap,
            ) -> Result<SourceBlock, ExtensionError> {
                Ok(SourceBlock::new("paragraph").with_text("first"))
            }
        }
        impl BlockMacroProcessor for Second {
            fn name(&self) -> &str {
                "gist"
            }
            fn process(
                &self,
                _target: &str,
                _attributes: &AttributeMap,
            ) -> Result<SourceBlock, ExtensionError> {
                Ok(SourceBlock::new("paragraph").with_text("second"))
            }
        }

        let mut registry = ExtensionRegistry::new();
        registry.register_block_macro(Arc::new(First));
        registry.register_block_macro(Arc::new(Second));

        let chosen = registry.block_macro_for("gist").unwrap();
        let block = chosen.process("t", &AttributeMap::new()).unwrap();
        assert_eq!(
            block.content,
            crate::ast::BlockContent::Text("first".to_string())
        );
    }

    #[test]
    fn test_double_registration_yields_two_entries() {
        let mut registry = ExtensionRegistry::new();
        let processor: Arc<dyn BlockMacroProcessor> = Arc::new(NamedMacro { name: "m" });
        registry.register_block_macro(processor.clone());
        registry.register_block_macro(processor);
        assert_eq!(registry.block_macros.len(), 2);
    }

    #[test]
    fn test_unregister_all_is_repeatable() {
        let mut registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        registry.unregister_all();
        assert!(registry.is_empty());

        registry.register_block_macro(Arc::new(NamedMacro { name: "m" }));
        assert!(!registry.is_empty());
        registry.unregister_all();
        registry.unregister_all();
        assert!(registry.is_empty());
        assert!(registry.block_macro_for("m").is_none());
    }
}
