//! Property tests for run normalization and tag visibility

mod common;

use common::*;
use doc_model::NodeType;
use proptest::prelude::*;
use template_engine::{DocxDocument, RunNormalizer, VisibilityToggler};

/// Text pieces that include fragments of marker syntax
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("{{".to_string()),
        Just("}}".to_string()),
        Just("{{A}}".to_string()),
        Just("{{/A}}".to_string()),
        Just("/".to_string()),
        "[a-z ]{1,6}",
    ]
}

/// (hidden, text) runs
fn runs() -> impl Strategy<Value = Vec<(bool, String)>> {
    prop::collection::vec((any::<bool>(), fragment()), 0..12)
}

fn paragraph_xml(runs: &[(bool, String)]) -> String {
    let content: String = runs
        .iter()
        .map(|(hidden, text)| if *hidden { hidden_run(text) } else { run(text) })
        .collect();
    format!("<w:p>{}</w:p>", content)
}

fn normalize(document: &mut DocxDocument) -> usize {
    let roots = document.content_roots();
    let tree = document.package_mut().tree_mut();
    RunNormalizer::new().normalize(tree, &roots).unwrap()
}

fn set_visibility(document: &mut DocxDocument, visible: bool) {
    let roots = document.content_roots();
    let tree = document.package_mut().tree_mut();
    VisibilityToggler::new(&roots).set_visibility(tree, "T", visible).unwrap();
}

proptest! {
    #[test]
    fn normalization_is_idempotent(paragraphs in prop::collection::vec(runs(), 1..4)) {
        let xml: String = paragraphs.iter().map(|p| paragraph_xml(p)).collect();
        let mut document = document(&xml);

        normalize(&mut document);
        let once = main_xml(&document);
        prop_assert_eq!(normalize(&mut document), 0);
        prop_assert_eq!(main_xml(&document), once);
    }

    #[test]
    fn normalization_preserves_text(paragraphs in prop::collection::vec(runs(), 1..4)) {
        let xml: String = paragraphs.iter().map(|p| paragraph_xml(p)).collect();
        let mut document = document(&xml);
        let before = body_texts(&document);
        normalize(&mut document);
        prop_assert_eq!(body_texts(&document), before);
    }

    #[test]
    fn visibility_is_idempotent(
        paragraphs in prop::collection::vec(runs(), 0..4),
        visible in any::<bool>(),
    ) {
        let inner: String = paragraphs.iter().map(|p| paragraph_xml(p)).collect();
        let mut document = document(&tag("T", &inner));

        set_visibility(&mut document, visible);
        let once = main_xml(&document);
        set_visibility(&mut document, visible);
        prop_assert_eq!(main_xml(&document), once);
    }

    #[test]
    fn showing_a_tag_keeps_placeholders_hidden(
        paragraphs in prop::collection::vec(runs(), 0..4),
    ) {
        let inner: String = paragraphs.iter().map(|p| paragraph_xml(p)).collect();
        let mut document = document(&tag("T", &inner));
        let before = hidden_markers(&document);
        set_visibility(&mut document, true);
        prop_assert_eq!(hidden_markers(&document), before);
    }
}

/// Hidden runs whose whole text is `{{...}}`
fn hidden_markers(document: &DocxDocument) -> usize {
    let tree = document.tree();
    let root = document.package().main_root().unwrap();
    tree.descendants_of_type(root, NodeType::Run)
        .into_iter()
        .filter(|&run| {
            let text = tree.inner_text(run);
            tree.is_run_hidden(run) && text.starts_with("{{") && text.ends_with("}}")
        })
        .count()
}
