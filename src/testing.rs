//! Test support: a deterministic in-process document engine
//!
//! `OutlineEngine` implements the `DocumentEngine` boundary over a tiny
//! line-oriented outline format, so pipeline, projection, and extension
//! behavior can be exercised end to end without a real markup engine or
//! any file I/O.
//!
//! The recognized format:
//!
//! ```text
//! = Document Title: Optional Subtitle
//! :attr-name: value
//!
//! == Section
//! === Nested Section
//! plain lines form paragraphs
//!
//! include::target[]
//! name::target[attrlist]        (block macro)
//! name:target[attrlist]         (inline macro, inside a paragraph)
//! [style]                       (styled block; following lines until blank)
//! ```

use crate::ast::{AttributeMap, BlockContent, DocumentRoot, DocumentTitle, SourceBlock};
use crate::engine::{DocumentEngine, Engine, ParseError, ParseOptions};
use crate::extensions::{ExtensionRegistry, IncludeReader};
use crate::projection::RenderError;
use once_cell::sync::Lazy;
use regex::Regex;

static ATTRIBUTE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([\w][\w-]*):\s*(.*)$").expect("attribute line pattern"));
static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(={2,})\s+(.+)$").expect("heading line pattern"));
static BLOCK_MACRO_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)::([^\s\[\]]*)\[([^\]]*)\]$").expect("block macro pattern"));
static STYLED_BLOCK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]*)\]$").expect("styled block pattern"));
static INLINE_MACRO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+):([^\s\[\]:]+)\[([^\]]*)\]").expect("inline macro pattern"));

/// Deterministic stand-in for the external markup engine
#[derive(Debug, Default)]
pub struct OutlineEngine;

impl OutlineEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Fresh `Engine` backed by an `OutlineEngine`
pub fn outline_engine() -> Engine {
    Engine::new(Box::new(OutlineEngine::new()))
}

fn slug(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("_{}", cleaned)
}

/// Parse a `[a,b=c]` attrlist: named entries keyed by name, positional
/// entries keyed "1", "2", ...
fn parse_attrlist(raw: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    let mut position = 0;
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('=') {
            Some((key, value)) => {
                attributes.insert(key.trim().to_string(), value.trim().into());
            }
            None => {
                position += 1;
                attributes.insert(position.to_string(), part.into());
            }
        }
    }
    attributes
}

struct BodyParser<'a> {
    extensions: &'a ExtensionRegistry,
    root_blocks: Vec<SourceBlock>,
    // open sections, outermost first
    section_stack: Vec<SourceBlock>,
    paragraph: Vec<String>,
}

impl<'a> BodyParser<'a> {
    fn new(extensions: &'a ExtensionRegistry) -> Self {
        Self {
            extensions,
            root_blocks: Vec::new(),
            section_stack: Vec::new(),
            paragraph: Vec::new(),
        }
    }

    fn parse(mut self, reader: &mut IncludeReader) -> Result<Vec<SourceBlock>, ParseError> {
        while let Some(line) = reader.read_line() {
            if line.trim().is_empty() {
                self.flush_paragraph()?;
            } else if let Some(captures) = HEADING_LINE.captures(&line) {
                self.flush_paragraph()?;
                let level = captures[1].len() - 1;
                let title = captures[2].to_string();
                self.open_section(level, title);
            } else if let Some(captures) = BLOCK_MACRO_LINE.captures(&line) {
                let name = captures[1].to_string();
                let target = captures[2].to_string();
                let attributes = parse_attrlist(&captures[3]);
                if name == "include" {
                    self.flush_paragraph()?;
                    self.handle_include(reader, &target, &attributes)?;
                } else if let Some(processor) = self.extensions.block_macro_for(&name) {
                    self.flush_paragraph()?;
                    let block = processor.process(&target, &attributes).map_err(|e| {
                        ParseError::ParsingFailed(format!("block macro '{}': {}", name, e))
                    })?;
                    self.attach(block);
                } else {
                    // unknown macro names read as plain text
                    self.paragraph.push(line);
                }
            } else if let Some(captures) = STYLED_BLOCK_LINE.captures(&line) {
                self.flush_paragraph()?;
                let style = captures[1].to_string();
                if style.is_empty() {
                    return Err(ParseError::MalformedInput(
                        "styled block with empty name".to_string(),
                    ));
                }
                self.handle_styled_block(reader, &style)?;
            } else {
                self.paragraph.push(line);
            }
        }
        self.flush_paragraph()?;
        while let Some(section) = self.section_stack.pop() {
            self.attach_to_depth(self.section_stack.len(), section);
        }
        Ok(self.root_blocks)
    }

    fn handle_include(
        &mut self,
        reader: &mut IncludeReader,
        target: &str,
        attributes: &AttributeMap,
    ) -> Result<(), ParseError> {
        match self.extensions.include_processor_for(target) {
            Some(processor) => processor
                .process(reader, target, attributes)
                .map_err(|e| ParseError::ParsingFailed(format!("include '{}': {}", target, e))),
            None => {
                // default include behavior: no file I/O here, the directive
                // is surfaced as an unresolved marker paragraph
                self.attach(SourceBlock::new("paragraph").with_text(format!(
                    "Unresolved directive in <stdin> - include::{}[]",
                    target
                )));
                Ok(())
            }
        }
    }

    fn handle_styled_block(
        &mut self,
        reader: &mut IncludeReader,
        style: &str,
    ) -> Result<(), ParseError> {
        let mut lines = Vec::new();
        while let Some(line) = reader.read_line() {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        let content = lines.join("\n");
        let attributes = AttributeMap::new();
        let block = match self.extensions.block_processor_for(style, "open") {
            Some(processor) => processor.process(&content, &attributes).map_err(|e| {
                ParseError::ParsingFailed(format!("block '{}': {}", style, e))
            })?,
            None => SourceBlock::new("open").with_style(style).with_text(content),
        };
        self.attach(block);
        Ok(())
    }

    fn substitute_inline_macros(&self, text: &str) -> Result<String, ParseError> {
        let mut result = String::new();
        let mut last = 0;
        for captures in INLINE_MACRO.captures_iter(text) {
            let whole = captures.get(0).expect("whole match");
            let name = &captures[1];
            let target = &captures[2];
            if let Some(processor) = self.extensions.inline_macro_for(name) {
                let attributes = parse_attrlist(&captures[3]);
                let replacement = processor.process(target, &attributes).map_err(|e| {
                    ParseError::ParsingFailed(format!("inline macro '{}': {}", name, e))
                })?;
                result.push_str(&text[last..whole.start()]);
                result.push_str(&replacement);
                last = whole.end();
            }
        }
        result.push_str(&text[last..]);
        Ok(result)
    }

    fn flush_paragraph(&mut self) -> Result<(), ParseError> {
        if self.paragraph.is_empty() {
            return Ok(());
        }
        let text = self.paragraph.join("\n");
        self.paragraph.clear();
        let text = self.substitute_inline_macros(&text)?;
        self.attach(SourceBlock::new("paragraph").with_text(text));
        Ok(())
    }

    fn open_section(&mut self, level: usize, title: String) {
        while self.section_stack.len() >= level {
            let section = self.section_stack.pop().expect("non-empty stack");
            self.attach_to_depth(self.section_stack.len(), section);
        }
        let section = SourceBlock::new("section")
            .with_id(slug(&title))
            .with_title(title);
        self.section_stack.push(section);
    }

    /// Attach a finished block to the innermost open section, or to the
    /// root when none is open
    fn attach(&mut self, block: SourceBlock) {
        match self.section_stack.last_mut() {
            Some(section) => section.push_block(block),
            None => self.root_blocks.push(block),
        }
    }

    fn attach_to_depth(&mut self, depth: usize, block: SourceBlock) {
        if depth == 0 {
            self.root_blocks.push(block);
        } else {
            self.section_stack[depth - 1].push_block(block);
        }
    }
}

impl DocumentEngine for OutlineEngine {
    fn parse(
        &self,
        source: &str,
        options: &ParseOptions,
        extensions: &ExtensionRegistry,
    ) -> Result<DocumentRoot, ParseError> {
        let mut reader = IncludeReader::new(source);
        let mut root = DocumentRoot::new();

        // header: optional title line, then attribute lines, up to the
        // first blank or body line
        while matches!(reader.peek_line(), Some(line) if line.trim().is_empty()) {
            reader.read_line();
        }
        if let Some(line) = reader.peek_line() {
            if let Some(title) = line.strip_prefix("= ") {
                root.title = Some(DocumentTitle::parse(title.trim()));
                reader.read_line();
            }
        }
        while let Some(line) = reader.peek_line() {
            match ATTRIBUTE_LINE.captures(line) {
                Some(captures) => {
                    root.attributes
                        .insert(captures[1].to_string(), captures[2].into());
                    reader.read_line();
                }
                None => break,
            }
        }
        // API-supplied attributes override document ones
        for (key, value) in &options.attributes {
            root.attributes.insert(key.clone(), value.clone());
        }

        if options.header_only {
            return Ok(root);
        }

        root.blocks = BodyParser::new(extensions).parse(&mut reader)?;
        Ok(root)
    }

    fn render_block(&self, block: &SourceBlock) -> Result<String, RenderError> {
        match &block.content {
            BlockContent::Text(text) => Ok(text.clone()),
            BlockContent::Compound => {
                let rendered: Result<Vec<String>, RenderError> = block
                    .blocks
                    .iter()
                    .map(|child| self.render_block(child))
                    .collect();
                Ok(rendered?.join("\n\n"))
            }
        }
    }

    fn convert_document(
        &self,
        root: &DocumentRoot,
        _options: &ParseOptions,
    ) -> Result<String, RenderError> {
        let mut rendered = Vec::new();
        if let Some(title) = &root.title {
            rendered.push(title.combined());
        }
        for block in &root.blocks {
            let body = self.render_block(block)?;
            match &block.title {
                Some(title) => rendered.push(format!("{}\n\n{}", title, body)),
                None => rendered.push(body),
            }
        }
        Ok(rendered.join("\n\n"))
    }
}
