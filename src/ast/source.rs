//! Source block tree supplied by the document engine
//!
//! A parse produces a `DocumentRoot` owning an ordered tree of
//! `SourceBlock`s. The tree is strictly one-directional: parents own their
//! children and no block holds a reference back up. Anything that needs a
//! parent lookup goes through `DocumentIndex::parent_of` instead.

use super::header::{Author, DocumentTitle, RevisionInfo};
use serde::Serialize;
use std::collections::HashMap;

/// Attribute values are arbitrary JSON-shaped data keyed by name.
/// Equality is independent of insertion order.
pub type AttributeMap = HashMap<String, serde_json::Value>;

/// The own content of a block, not counting its sub-blocks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlockContent {
    /// Directly exposed textual content, used verbatim by the projector
    Text(String),
    /// Compound content that is only meaningful after sub-rendering;
    /// the projector asks the engine to render it to a string
    Compound,
}

/// One structural element of a parsed document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBlock {
    pub id: Option<String>,
    pub context: String,
    pub style: Option<String>,
    pub role: Option<String>,
    pub title: Option<String>,
    pub attributes: AttributeMap,
    pub content: BlockContent,
    pub blocks: Vec<SourceBlock>,
}

impl SourceBlock {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            id: None,
            context: context.into(),
            style: None,
            role: None,
            title: None,
            attributes: AttributeMap::new(),
            content: BlockContent::Compound,
            blocks: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = BlockContent::Text(text.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<SourceBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn push_block(&mut self, block: SourceBlock) {
        self.blocks.push(block);
    }

    /// Depth of the subtree rooted at this block (a leaf has depth 1)
    pub fn depth(&self) -> u32 {
        1 + self.blocks.iter().map(SourceBlock::depth).max().unwrap_or(0)
    }
}

/// The root of a parsed document: header-level metadata plus the body blocks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRoot {
    pub title: Option<DocumentTitle>,
    pub authors: Vec<Author>,
    pub revision: Option<RevisionInfo>,
    pub attributes: AttributeMap,
    pub blocks: Vec<SourceBlock>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self {
            title: None,
            authors: Vec::new(),
            revision: None,
            attributes: AttributeMap::new(),
            blocks: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: DocumentTitle) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<SourceBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Depth of the deepest block in the body (empty body has depth 0)
    pub fn depth(&self) -> u32 {
        self.blocks.iter().map(SourceBlock::depth).max().unwrap_or(0)
    }
}

impl Default for DocumentRoot {
    fn default() -> Self {
        Self::new()
    }
}
