//! Lookup tables over a projected forest
//!
//! `DocumentIndex` flattens a `ContentNode` forest in pre-order (forest
//! order preserved) and builds id/context/role/style tables over it.
//! Singular lookups return the first match in flattened order; plural
//! lookups return all matches in flattened order.
//!
//! All lookups are total: a missing or `None` key yields `None`/empty, and
//! a `None` key never matches a node whose own field is absent. Id
//! uniqueness is deliberately not enforced; duplicate ids simply make the
//! first-match rule observable.

use super::content_node::ContentNode;
use std::collections::HashMap;

/// Index over one `ContentNode` forest
///
/// The index borrows the forest it was built from. Parent lookups are
/// served from an explicit position table, never from back-references
/// stored in the tree.
pub struct DocumentIndex<'a> {
    flat: Vec<&'a ContentNode>,
    parents: Vec<Option<usize>>,
    by_id: HashMap<&'a str, usize>,
    by_context: HashMap<&'a str, Vec<usize>>,
    by_role: HashMap<&'a str, Vec<usize>>,
    by_style: HashMap<&'a str, Vec<usize>>,
}

impl<'a> DocumentIndex<'a> {
    pub fn build(forest: &'a [ContentNode]) -> Self {
        let mut index = Self {
            flat: Vec::new(),
            parents: Vec::new(),
            by_id: HashMap::new(),
            by_context: HashMap::new(),
            by_role: HashMap::new(),
            by_style: HashMap::new(),
        };
        for node in forest {
            index.insert(node, None);
        }
        index
    }

    fn insert(&mut self, node: &'a ContentNode, parent: Option<usize>) {
        let position = self.flat.len();
        self.flat.push(node);
        self.parents.push(parent);
        if let Some(id) = node.id.as_deref() {
            // first-match wins on duplicate ids
            self.by_id.entry(id).or_insert(position);
        }
        self.by_context.entry(&node.context).or_default().push(position);
        if let Some(role) = node.role.as_deref() {
            self.by_role.entry(role).or_default().push(position);
        }
        if let Some(style) = node.style.as_deref() {
            self.by_style.entry(style).or_default().push(position);
        }
        if let Some(children) = &node.children {
            for child in children {
                self.insert(child, Some(position));
            }
        }
    }

    /// All indexed nodes in flattened pre-order
    pub fn flattened(&self) -> impl Iterator<Item = &'a ContentNode> + '_ {
        self.flat.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn find_by_id(&self, id: Option<&str>) -> Option<&'a ContentNode> {
        let position = *self.by_id.get(id?)?;
        Some(self.flat[position])
    }

    pub fn find_first_by_role(&self, role: Option<&str>) -> Option<&'a ContentNode> {
        self.first_of(&self.by_role, role)
    }

    pub fn find_first_by_style(&self, style: Option<&str>) -> Option<&'a ContentNode> {
        self.first_of(&self.by_style, style)
    }

    pub fn find_all_by_context(&self, context: Option<&str>) -> Vec<&'a ContentNode> {
        self.all_of(&self.by_context, context)
    }

    pub fn find_all_by_role(&self, role: Option<&str>) -> Vec<&'a ContentNode> {
        self.all_of(&self.by_role, role)
    }

    pub fn find_all_by_style(&self, style: Option<&str>) -> Vec<&'a ContentNode> {
        self.all_of(&self.by_style, style)
    }

    /// Parent of the first node with the given id, or `None` for top-level
    /// nodes and unknown ids
    pub fn parent_of(&self, child_id: &str) -> Option<&'a ContentNode> {
        let position = *self.by_id.get(child_id)?;
        let parent = self.parents[position]?;
        Some(self.flat[parent])
    }

    fn first_of(
        &self,
        table: &HashMap<&'a str, Vec<usize>>,
        key: Option<&str>,
    ) -> Option<&'a ContentNode> {
        let positions = table.get(key?)?;
        positions.first().map(|&position| self.flat[position])
    }

    fn all_of(
        &self,
        table: &HashMap<&'a str, Vec<usize>>,
        key: Option<&str>,
    ) -> Vec<&'a ContentNode> {
        let Some(key) = key else {
            return Vec::new();
        };
        table
            .get(key)
            .map(|positions| positions.iter().map(|&position| self.flat[position]).collect())
            .unwrap_or_default()
    }
}
