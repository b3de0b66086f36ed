//! Document header metadata
//!
//! The header captures document-level metadata independent of the body:
//! a structured title, an ordered author list (the first author is the
//! primary one), optional revision information, and a snapshot of the
//! attribute map taken at header-parse time.

use super::source::AttributeMap;
use serde::Serialize;

/// Structured document title with an optional subtitle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentTitle {
    pub main: String,
    pub subtitle: Option<String>,
}

impl DocumentTitle {
    pub fn new(main: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Split a flat title on the last ": " into main and subtitle
    pub fn parse(raw: &str) -> Self {
        match raw.rsplit_once(": ") {
            Some((main, subtitle)) => Self::new(main).with_subtitle(subtitle),
            None => Self::new(raw),
        }
    }

    /// Main and subtitle rejoined into the flat form
    pub fn combined(&self) -> String {
        match &self.subtitle {
            Some(subtitle) => format!("{}: {}", self.main, subtitle),
            None => self.main.clone(),
        }
    }
}

/// One document author
///
/// Name parts are independently settable with no cross-field validation;
/// `full_name()` and `initials()` derive their values from the parts unless
/// an explicit override was set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Author {
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    initials: Option<String>,
}

impl Author {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = Some(first_name.into());
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }

    pub fn set_middle_name(&mut self, middle_name: impl Into<String>) {
        self.middle_name = Some(middle_name.into());
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = Some(last_name.into());
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    /// Explicitly set full name, overriding derivation from name parts
    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = Some(full_name.into());
    }

    /// Explicitly set initials, overriding derivation from name parts
    pub fn set_initials(&mut self, initials: impl Into<String>) {
        self.initials = Some(initials.into());
    }

    /// The explicit full name if set, otherwise first + middle + last
    /// space-joined with empty parts skipped. `None` when nothing is set.
    pub fn full_name(&self) -> Option<String> {
        if let Some(full_name) = &self.full_name {
            return Some(full_name.clone());
        }
        let joined = self.name_parts().collect::<Vec<_>>().join(" ");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// The explicit initials if set, otherwise the first letter of each
    /// name part in first/middle/last order. `None` when nothing is set.
    pub fn initials(&self) -> Option<String> {
        if let Some(initials) = &self.initials {
            return Some(initials.clone());
        }
        let derived: String = self
            .name_parts()
            .filter_map(|part| part.chars().next())
            .collect();
        if derived.is_empty() {
            None
        } else {
            Some(derived)
        }
    }

    fn name_parts(&self) -> impl Iterator<Item = &str> {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.set_first_name(first_name);
        self
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.set_middle_name(middle_name);
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.set_last_name(last_name);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.set_email(email);
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.set_full_name(full_name);
        self
    }

    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.set_initials(initials);
        self
    }
}

/// Revision metadata: three independent optional strings with no format
/// validation applied to any of them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevisionInfo {
    pub date: Option<String>,
    pub number: Option<String>,
    pub remark: Option<String>,
}

impl RevisionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.number.is_none() && self.remark.is_none()
    }
}

/// Document-level metadata, built once per document and immutable after
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentHeader {
    document_title: Option<DocumentTitle>,
    page_title: Option<String>,
    authors: Vec<Author>,
    revision_info: Option<RevisionInfo>,
    attributes: AttributeMap,
}

impl DocumentHeader {
    pub fn new(
        document_title: Option<DocumentTitle>,
        page_title: Option<String>,
        authors: Vec<Author>,
        revision_info: Option<RevisionInfo>,
        attributes: AttributeMap,
    ) -> Self {
        Self {
            document_title,
            page_title,
            authors,
            revision_info,
            attributes,
        }
    }

    pub fn document_title(&self) -> Option<&DocumentTitle> {
        self.document_title.as_ref()
    }

    pub fn page_title(&self) -> Option<&str> {
        self.page_title.as_deref()
    }

    /// All authors in declaration order
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// The primary author, i.e. the first declared one
    pub fn author(&self) -> Option<&Author> {
        self.authors.first()
    }

    pub fn revision_info(&self) -> Option<&RevisionInfo> {
        self.revision_info.as_ref()
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}
