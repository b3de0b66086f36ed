//! Conversion pipeline end to end over the outline stub engine

use adoc::testing::outline_engine;
use adoc::{
    AttributeMap, BlockContent, ConvertError, Converter, DocumentRoot, ExtensionError,
    IncludeProcessor, IncludeReader, Options, PipelineError, Postprocessor, Preprocessor,
    SourceBlock, Stage, Treeprocessor,
};
use std::sync::Arc;

struct AppendMarker;

impl Treeprocessor for AppendMarker {
    fn process(&self, mut document: DocumentRoot) -> Result<DocumentRoot, ExtensionError> {
        document
            .blocks
            .push(SourceBlock::new("paragraph").with_id("marker").with_text("MARKER"));
        Ok(document)
    }
}

struct SchemeInclude {
    scheme: &'static str,
    body: &'static str,
}

impl IncludeProcessor for SchemeInclude {
    fn handles(&self, target: &str) -> bool {
        target.starts_with(self.scheme)
    }

    fn process(
        &self,
        reader: &mut IncludeReader,
        target: &str,
        _attributes: &AttributeMap,
    ) -> Result<(), ExtensionError> {
        reader.push_include(self.body, Some(target), None);
        Ok(())
    }
}

struct ReplacePreprocessor {
    from: &'static str,
    to: &'static str,
}

impl Preprocessor for ReplacePreprocessor {
    fn process(
        &self,
        source: String,
        _attributes: &AttributeMap,
    ) -> Result<String, ExtensionError> {
        Ok(source.replace(self.from, self.to))
    }
}

struct FooterPostprocessor;

impl Postprocessor for FooterPostprocessor {
    fn process(
        &self,
        output: String,
        _document: &DocumentRoot,
    ) -> Result<String, ExtensionError> {
        Ok(format!("{}\n-- footer --", output))
    }
}

#[test]
fn treeprocessor_runs_then_unregister_all_removes_it() {
    let mut engine = outline_engine();
    engine
        .extensions_mut()
        .register_treeprocessor(Arc::new(AppendMarker));

    let source = "= T\n\nhello";
    let first = engine
        .read_document_structure(source, &Options::new())
        .unwrap();
    assert!(first.part_by_id("marker").is_some());

    engine.unregister_all_extensions();
    let second = engine
        .read_document_structure(source, &Options::new())
        .unwrap();
    assert!(second.part_by_id("marker").is_none());

    // repeat unregistration stays safe
    engine.unregister_all_extensions();
    assert!(engine.extensions().is_empty());
}

#[test]
fn include_selection_is_first_match_with_default_fallthrough() {
    let mut engine = outline_engine();
    engine.extensions_mut().register_include_processor(Arc::new(SchemeInclude {
        scheme: "http://",
        body: "from http",
    }));
    engine.extensions_mut().register_include_processor(Arc::new(SchemeInclude {
        scheme: "https://",
        body: "from https",
    }));

    let doc = engine
        .read_document_structure("include::http://example.com/a[]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "from http");

    let doc = engine
        .read_document_structure("include::https://example.com/a[]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "from https");

    // neither handles a plain file target; the default include behavior applies
    let doc = engine
        .read_document_structure("include::local.adoc[]", &Options::new())
        .unwrap();
    assert_eq!(
        doc.parts()[0].content,
        "Unresolved directive in <stdin> - include::local.adoc[]"
    );
}

#[test]
fn nested_includes_resolve_through_the_reader() {
    let mut engine = outline_engine();
    engine.extensions_mut().register_include_processor(Arc::new(SchemeInclude {
        scheme: "outer:",
        body: "include::inner:x[]",
    }));
    engine.extensions_mut().register_include_processor(Arc::new(SchemeInclude {
        scheme: "inner:",
        body: "innermost",
    }));

    let doc = engine
        .read_document_structure("include::outer:x[]", &Options::new())
        .unwrap();
    assert_eq!(doc.parts()[0].content, "innermost");
}

#[test]
fn preprocessors_chain_in_registration_order() {
    let mut engine = outline_engine();
    engine.extensions_mut().register_preprocessor(Arc::new(ReplacePreprocessor {
        from: "alpha",
        to: "beta",
    }));
    engine.extensions_mut().register_preprocessor(Arc::new(ReplacePreprocessor {
        from: "beta",
        to: "gamma",
    }));

    // the second preprocessor sees the first one's output
    let output = engine.convert("alpha", &Options::new()).unwrap().unwrap();
    assert_eq!(output, "gamma");
}

#[test]
fn postprocessor_rewrites_converted_output() {
    let mut engine = outline_engine();
    engine
        .extensions_mut()
        .register_postprocessor(Arc::new(FooterPostprocessor));

    let output = engine.convert("hello", &Options::new()).unwrap().unwrap();
    assert_eq!(output, "hello\n-- footer --");
}

struct BracketConverter;

impl Converter for BracketConverter {
    fn convert(&self, node: &SourceBlock, _transform: Option<&str>) -> Result<String, ConvertError> {
        match &node.content {
            BlockContent::Text(text) => Ok(format!("[{}]", text)),
            BlockContent::Compound => Ok(format!("[{}]", node.title.clone().unwrap_or_default())),
        }
    }
}

#[test]
fn registered_converter_wins_over_builtin() {
    let mut engine = outline_engine();
    engine
        .converters_mut()
        .register("bracket", Arc::new(BracketConverter));

    let output = engine
        .convert("one\n\ntwo", &Options::new().with_backend("bracket"))
        .unwrap()
        .unwrap();
    assert_eq!(output, "[one]\n[two]");

    // an unregistered backend falls back to the engine's built-in conversion
    let output = engine
        .convert("one\n\ntwo", &Options::new().with_backend("html5"))
        .unwrap()
        .unwrap();
    assert_eq!(output, "one\n\ntwo");
}

#[test]
fn convert_to_file_returns_none_and_writes_atomically() {
    let dir = std::env::temp_dir().join("adoc-pipeline-test");
    std::fs::create_dir_all(&dir).unwrap();
    let target = dir.join("out.txt");
    let _ = std::fs::remove_file(&target);

    let engine = outline_engine();
    let result = engine
        .convert("hello", &Options::new().with_to_file(&target))
        .unwrap();
    assert_eq!(result, None);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello");
    // the temporary sibling never survives a successful write
    assert!(!dir.join("out.txt.tmp").exists());

    std::fs::remove_file(&target).unwrap();
}

struct FailingTreeprocessor;

impl Treeprocessor for FailingTreeprocessor {
    fn process(&self, _document: DocumentRoot) -> Result<DocumentRoot, ExtensionError> {
        Err(ExtensionError::new("tree stage refused"))
    }
}

#[test]
fn extension_failure_aborts_and_reports_stage() {
    let mut engine = outline_engine();
    engine
        .extensions_mut()
        .register_treeprocessor(Arc::new(FailingTreeprocessor));

    let err = engine.convert("hello", &Options::new()).unwrap_err();
    match err {
        PipelineError::Extension { stage, source } => {
            assert_eq!(stage, Stage::TreeProcess);
            assert_eq!(source.message(), "tree stage refused");
        }
        other => panic!("expected extension failure, got {}", other),
    }
}

#[test]
fn failed_conversion_leaves_no_output_file() {
    let dir = std::env::temp_dir().join("adoc-pipeline-failure-test");
    std::fs::create_dir_all(&dir).unwrap();
    let target = dir.join("never.txt");
    let _ = std::fs::remove_file(&target);

    let mut engine = outline_engine();
    engine
        .extensions_mut()
        .register_treeprocessor(Arc::new(FailingTreeprocessor));

    let result = engine.convert("hello", &Options::new().with_to_file(&target));
    assert!(result.is_err());
    assert!(!target.exists());
}

#[test]
fn groups_toggle_without_touching_direct_registrations() {
    let mut engine = outline_engine();
    engine
        .extensions_mut()
        .register_postprocessor(Arc::new(FooterPostprocessor));

    let group = engine
        .create_group_named("markers")
        .with_treeprocessor(Arc::new(AppendMarker));
    engine.register_group(&group);
    engine.register_group(&group);

    let doc = engine
        .read_document_structure("hello", &Options::new())
        .unwrap();
    // registering twice added the treeprocessor once
    assert_eq!(doc.parts_by_context("paragraph").len(), 2);

    engine.unregister_group(&group);
    let doc = engine
        .read_document_structure("hello", &Options::new())
        .unwrap();
    assert!(doc.part_by_id("marker").is_none());

    // the direct postprocessor registration survived the group removal
    let output = engine.convert("hello", &Options::new()).unwrap().unwrap();
    assert_eq!(output, "hello\n-- footer --");
}
