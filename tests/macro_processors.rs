//! Block, block macro, and inline macro processors through the pipeline

use adoc::testing::outline_engine;
use adoc::{
    AttributeMap, BlockMacroProcessor, BlockProcessor, ExtensionError, InlineMacroProcessor,
    Options, SourceBlock,
};
use std::sync::Arc;

struct GistMacro;

impl BlockMacroProcessor for GistMacro {
    fn name(&self) -> &str {
        "gist"
    }

    fn process(
        &self,
        target: &str,
        _attributes: &AttributeMap,
    ) -> Result<SourceBlock, ExtensionError> {
        Ok(SourceBlock::new("embedded")
            .with_role("gist")
            .with_text(format!("gist:{}", target)))
    }
}

struct ShoutBlock;

impl BlockProcessor for ShoutBlock {
    fn name(&self) -> &str {
        "shout"
    }

    fn process(
        &self,
        content: &str,
        _attributes: &AttributeMap,
    ) -> Result<SourceBlock, ExtensionError> {
        Ok(SourceBlock::new("paragraph")
            .with_style("shout")
            .with_text(content.to_uppercase()))
    }
}

struct IssueMacro;

impl InlineMacroProcessor for IssueMacro {
    fn name(&self) -> &str {
        "issue"
    }

    fn process(&self, target: &str, _attributes: &AttributeMap) -> Result<String, ExtensionError> {
        Ok(format!("#{}", target))
    }
}

#[test]
fn block_macro_replaces_its_directive() {
    let mut engine = outline_engine();
    engine.extensions_mut().register_block_macro(Arc::new(GistMacro));

    let doc = engine
        .read_document_structure("before\n\ngist::12345[]\n\nafter", &Options::new())
        .unwrap();
    assert_eq!(doc.parts().len(), 3);
    let gist = &doc.parts()[1];
    assert_eq!(gist.context, "embedded");
    assert_eq!(gist.role.as_deref(), Some("gist"));
    assert_eq!(gist.content, "gist:12345");
}

#[test]
fn unregistered_block_macro_reads_as_text() {
    let engine = outline_engine();
    let doc = engine
        .read_document_structure("gist::12345[]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts().len(), 1);
    assert_eq!(doc.parts()[0].context, "paragraph");
    assert_eq!(doc.parts()[0].content, "gist::12345[]");
}

#[test]
fn block_processor_rewrites_styled_blocks() {
    let mut engine = outline_engine();
    engine.extensions_mut().register_block_processor(Arc::new(ShoutBlock));

    let doc = engine
        .read_document_structure("[shout]\nhello there\n\n[aside]\nquiet", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "HELLO THERE");
    assert_eq!(doc.parts()[0].style.as_deref(), Some("shout"));
    // unhandled block names keep the default open-block shape
    assert_eq!(doc.parts()[1].context, "open");
    assert_eq!(doc.parts()[1].content, "quiet");
}

#[test]
fn inline_macro_substitutes_inside_paragraphs() {
    let mut engine = outline_engine();
    engine.extensions_mut().register_inline_macro(Arc::new(IssueMacro));

    let doc = engine
        .read_document_structure("fixed in issue:123[] and issue:456[]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "fixed in #123 and #456");
}

#[test]
fn unregistered_inline_macro_is_left_verbatim() {
    let engine = outline_engine();
    let doc = engine
        .read_document_structure("see issue:123[]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "see issue:123[]");
}

#[test]
fn failing_macro_processor_aborts_the_parse() {
    struct Exploding;
    impl BlockMacroProcessor for Exploding {
        fn name(&self) -> &str {
            "boom"
        }
        fn process(
            &self,
            _target: &str,
            _attributes: &AttributeMap,
        ) -> Result<SourceBlock, ExtensionError> {
            Err(ExtensionError::new("refused"))
        }
    }

    let mut engine = outline_engine();
    engine.extensions_mut().register_block_macro(Arc::new(Exploding));
    let result = engine.read_document_structure("boom::x[]", &Options::new());
    assert!(result.is_err());
}

#[test]
fn macro_attrlist_reaches_the_processor() {
    struct CapturingMacro;
    impl BlockMacroProcessor for CapturingMacro {
        fn name(&self) -> &str {
            "cap"
        }
        fn process(
            &self,
            target: &str,
            attributes: &AttributeMap,
        ) -> Result<SourceBlock, ExtensionError> {
            let lang = attributes
                .get("lang")
                .and_then(|v| v.as_str())
                .unwrap_or("none");
            let first = attributes.get("1").and_then(|v| v.as_str()).unwrap_or("");
            Ok(SourceBlock::new("paragraph")
                .with_text(format!("{}|{}|{}", target, first, lang)))
        }
    }

    let mut engine = outline_engine();
    engine.extensions_mut().register_block_macro(Arc::new(CapturingMacro));
    let doc = engine
        .read_document_structure("cap::t[pos, lang=rust]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "t|pos|rust");
}
