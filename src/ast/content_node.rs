//! Projected content node
//!
//! A `ContentNode` is the query-oriented view of one source block, produced
//! by the structured-document projector. It carries the block's identity and
//! metadata, its own rendered text, and its projected children.
//!
//! The `children` field distinguishes two cases that an empty list would
//! conflate:
//!
//! - `None`: projection stopped at this node because the depth cutoff was
//!   reached; the source block may or may not have sub-blocks.
//! - `Some(vec![])`: the source block genuinely has no sub-blocks within
//!   the allowed depth.

use super::source::AttributeMap;
use serde::Serialize;

/// One projected structural element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentNode {
    /// Author-assigned or engine-generated identifier. Uniqueness is not
    /// guaranteed, which is why id lookups are first-match.
    pub id: Option<String>,
    /// Depth from the document root; the root's direct children are level 1
    pub level: u32,
    /// Element kind tag, e.g. "paragraph", "image", "section"
    pub context: String,
    pub style: Option<String>,
    pub role: Option<String>,
    pub title: Option<String>,
    pub attributes: AttributeMap,
    /// Fully rendered text of this node's own content, not its descendants
    pub content: String,
    pub children: Option<Vec<ContentNode>>,
}

impl ContentNode {
    pub fn new(context: impl Into<String>, level: u32, content: impl Into<String>) -> Self {
        Self {
            id: None,
            level,
            context: context.into(),
            style: None,
            role: None,
            title: None,
            attributes: AttributeMap::new(),
            content: content.into(),
            children: None,
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

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// True when projection stopped here due to the depth cutoff
    pub fn is_cut_off(&self) -> bool {
        self.children.is_none()
    }
}
