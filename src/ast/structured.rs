//! Structured document aggregate
//!
//! A `StructuredDocument` is the projection artifact handed to callers: an
//! optional header plus the ordered top-level content parts. It is created
//! once per projection call and read-only afterwards; any change to the
//! source tree requires a full re-projection.

use super::content_node::ContentNode;
use super::header::DocumentHeader;
use super::index::DocumentIndex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredDocument {
    header: Option<DocumentHeader>,
    parts: Vec<ContentNode>,
}

impl StructuredDocument {
    pub fn new(header: Option<DocumentHeader>, parts: Vec<ContentNode>) -> Self {
        Self { header, parts }
    }

    pub fn header(&self) -> Option<&DocumentHeader> {
        self.header.as_ref()
    }

    pub fn parts(&self) -> &[ContentNode] {
        &self.parts
    }

    /// Build the lookup index over the parts forest. Callers doing several
    /// lookups should grab the index once; the convenience methods below
    /// rebuild it per call.
    pub fn index(&self) -> DocumentIndex<'_> {
        DocumentIndex::build(&self.parts)
    }

    /// First part (in flattened pre-order) with the given id
    pub fn part_by_id(&self, id: &str) -> Option<&ContentNode> {
        self.index().find_by_id(Some(id))
    }

    pub fn part_by_role(&self, role: &str) -> Option<&ContentNode> {
        self.index().find_first_by_role(Some(role))
    }

    pub fn part_by_style(&self, style: &str) -> Option<&ContentNode> {
        self.index().find_first_by_style(Some(style))
    }

    pub fn parts_by_context(&self, context: &str) -> Vec<&ContentNode> {
        self.index().find_all_by_context(Some(context))
    }

    pub fn parts_by_role(&self, role: &str) -> Vec<&ContentNode> {
        self.index().find_all_by_role(Some(role))
    }

    pub fn parts_by_style(&self, style: &str) -> Vec<&ContentNode> {
        self.index().find_all_by_style(Some(style))
    }
}
