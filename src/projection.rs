//! Structured-document projection
//!
//! Turns an arbitrary-depth source block tree into the depth-bounded
//! `ContentNode` forest and derives the `DocumentHeader` from the document
//! root. Both transforms are pure and synchronous: no partial result is
//! ever returned on failure.

use crate::ast::{
    AttributeMap, Author, BlockContent, ContentNode, DocumentHeader, DocumentRoot, DocumentTitle,
    RevisionInfo, SourceBlock,
};
use std::fmt;

/// Depth used when the caller does not specify one: only the root's direct
/// children are expanded, grandchildren are cut.
pub const DEFAULT_MAX_DEPTH: u32 = 1;

/// Errors raised by the render-to-string capability of the document engine
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    RenderFailed(String),
    UnsupportedContext(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::RenderFailed(msg) => write!(f, "Render failed: {}", msg),
            RenderError::UnsupportedContext(context) => {
                write!(f, "Cannot render block with context '{}'", context)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Projection failed while rendering a block's own content. The whole
/// projection is aborted; no partial forest is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionError {
    context: String,
    source: RenderError,
}

impl ProjectionError {
    /// Context tag of the block whose rendering failed
    pub fn block_context(&self) -> &str {
        &self.context
    }

    pub fn render_error(&self) -> &RenderError {
        &self.source
    }
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Projection failed on '{}' block: {}",
            self.context, self.source
        )
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Render-to-string capability the projector needs from the engine for
/// compound blocks whose content is only meaningful after sub-rendering
pub trait ContentRenderer {
    fn render(&self, block: &SourceBlock) -> Result<String, RenderError>;
}

/// Project a source forest into a depth-bounded `ContentNode` forest.
///
/// Depth-first, order-preserving. The root's children start at level 1; a
/// node's children are absent exactly when descending past it would exceed
/// `max_depth`. `max_depth = 0` still produces the top level, every node
/// with absent children; the cutoff is evaluated per node, never by
/// refusing the whole call.
pub fn project(
    blocks: &[SourceBlock],
    max_depth: u32,
    renderer: &dyn ContentRenderer,
) -> Result<Vec<ContentNode>, ProjectionError> {
    project_level(blocks, 1, max_depth, renderer)
}

fn project_level(
    blocks: &[SourceBlock],
    level: u32,
    max_depth: u32,
    renderer: &dyn ContentRenderer,
) -> Result<Vec<ContentNode>, ProjectionError> {
    blocks
        .iter()
        .map(|block| project_block(block, level, max_depth, renderer))
        .collect()
}

fn project_block(
    block: &SourceBlock,
    level: u32,
    max_depth: u32,
    renderer: &dyn ContentRenderer,
) -> Result<ContentNode, ProjectionError> {
    let content = match &block.content {
        BlockContent::Text(text) => text.clone(),
        BlockContent::Compound => renderer.render(block).map_err(|source| ProjectionError {
            context: block.context.clone(),
            source,
        })?,
    };
    let children = if level + 1 > max_depth {
        None
    } else {
        Some(project_level(&block.blocks, level + 1, max_depth, renderer)?)
    };
    Ok(ContentNode {
        id: block.id.clone(),
        level,
        context: block.context.clone(),
        style: block.style.clone(),
        role: block.role.clone(),
        title: block.title.clone(),
        attributes: block.attributes.clone(),
        content,
        children,
    })
}

/// Derive the document header from the root.
///
/// Pure function of the already-parsed root: no body traversal. The
/// attribute map is snapshotted here; later mutations to the source tree
/// are not reflected. Authors and revision info fall back to attribute
/// recovery (`author`/`firstname`/…, `author_N` variants, `revdate`/
/// `revnumber`/`revremark`) when the engine exposes none directly.
pub fn extract_header(root: &DocumentRoot) -> DocumentHeader {
    let authors = if root.authors.is_empty() {
        authors_from_attributes(&root.attributes)
    } else {
        root.authors.clone()
    };
    let revision = root
        .revision
        .clone()
        .or_else(|| revision_from_attributes(&root.attributes));
    let page_title = attr_str(&root.attributes, "doctitle")
        .or_else(|| root.title.as_ref().map(DocumentTitle::combined));
    DocumentHeader::new(
        root.title.clone(),
        page_title,
        authors,
        revision,
        root.attributes.clone(),
    )
}

fn attr_str(attributes: &AttributeMap, key: &str) -> Option<String> {
    attributes.get(key)?.as_str().map(str::to_string)
}

fn author_from_attributes(attributes: &AttributeMap, suffix: &str) -> Option<Author> {
    let key = |name: &str| format!("{}{}", name, suffix);
    let mut author = Author::new();
    let mut found = false;
    if let Some(full_name) = attr_str(attributes, &key("author")) {
        author.set_full_name(full_name);
        found = true;
    }
    if let Some(first_name) = attr_str(attributes, &key("firstname")) {
        author.set_first_name(first_name);
        found = true;
    }
    if let Some(middle_name) = attr_str(attributes, &key("middlename")) {
        author.set_middle_name(middle_name);
        found = true;
    }
    if let Some(last_name) = attr_str(attributes, &key("lastname")) {
        author.set_last_name(last_name);
        found = true;
    }
    if let Some(email) = attr_str(attributes, &key("email")) {
        author.set_email(email);
        found = true;
    }
    if let Some(initials) = attr_str(attributes, &key("authorinitials")) {
        author.set_initials(initials);
        found = true;
    }
    found.then_some(author)
}

fn authors_from_attributes(attributes: &AttributeMap) -> Vec<Author> {
    // multi-author documents expose author_1, author_2, ...
    let mut authors = Vec::new();
    let mut n = 1;
    while let Some(author) = author_from_attributes(attributes, &format!("_{}", n)) {
        authors.push(author);
        n += 1;
    }
    if authors.is_empty() {
        if let Some(author) = author_from_attributes(attributes, "") {
            authors.push(author);
        }
    }
    authors
}

fn revision_from_attributes(attributes: &AttributeMap) -> Option<RevisionInfo> {
    let revision = RevisionInfo {
        date: attr_str(attributes, "revdate"),
        number: attr_str(attributes, "revnumber"),
        remark: attr_str(attributes, "revremark"),
    };
    (!revision.is_empty()).then_some(revision)
}
