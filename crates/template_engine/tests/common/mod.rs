//! Shared fixtures: small packages built from body XML

#![allow(dead_code)]

use doc_model::{NodeId, NodeType};
use store::docx::template::{document_xml, minimal_parts};
use store::docx::{namespaces, relationship_types, Relationships, TargetMode};
use store::DocxPackage;
use template_engine::DocxDocument;

pub fn run(text: &str) -> String {
    format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, text)
}

pub fn hidden_run(text: &str) -> String {
    format!(
        r#"<w:r><w:rPr><w:vanish/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        text
    )
}

pub fn paragraph(text: &str) -> String {
    format!("<w:p>{}</w:p>", run(text))
}

/// A paragraph whose mark and run are hidden, the way tag markers are authored
pub fn hidden_paragraph(text: &str) -> String {
    format!(
        "<w:p><w:pPr><w:rPr><w:vanish/></w:rPr></w:pPr>{}</w:p>",
        hidden_run(text)
    )
}

/// `{name}`, the given body XML, `{/name}`
pub fn tag(name: &str, inner: &str) -> String {
    format!(
        "{}{}{}",
        hidden_paragraph(&format!("{{{}}}", name)),
        inner,
        hidden_paragraph(&format!("{{/{}}}", name))
    )
}

/// A paragraph holding `before`, a `{{name}}` pair, and `after`
pub fn placeholder_paragraph(name: &str, before: &str, after: &str) -> String {
    format!(
        "<w:p>{}{}{}{}</w:p>",
        run(before),
        hidden_run(&format!("{{{{{}}}}}", name)),
        hidden_run(&format!("{{{{/{}}}}}", name)),
        run(after)
    )
}

/// A block content control aliased `alias`
pub fn block_field(alias: &str, inner: &str) -> String {
    format!(
        r#"<w:sdt><w:sdtPr><w:alias w:val="{alias}"/><w:tag w:val="{alias}-tag"/></w:sdtPr><w:sdtContent>{inner}</w:sdtContent></w:sdt>"#
    )
}

/// A paragraph holding an inline content control aliased `alias`
pub fn inline_field_paragraph(alias: &str, inner_runs: &str) -> String {
    format!(
        r#"<w:p><w:sdt><w:sdtPr><w:alias w:val="{alias}"/></w:sdtPr><w:sdtContent>{inner_runs}</w:sdtContent></w:sdt></w:p>"#
    )
}

pub fn package(body: &str) -> DocxPackage {
    DocxPackage::from_parts(minimal_parts(&document_xml(body))).unwrap()
}

pub fn document(body: &str) -> DocxDocument {
    DocxDocument::from_package(package(body))
}

/// A document whose main part and single header hold the given content
pub fn document_with_header(body: &str, header_content: &str) -> DocxDocument {
    let mut parts = minimal_parts(&document_xml(body));

    let mut rels = Relationships::new();
    rels.add(relationship_types::SETTINGS, "settings.xml", TargetMode::Internal);
    rels.add(relationship_types::HEADER, "header1.xml", TargetMode::Internal);
    for (name, data) in parts.iter_mut() {
        if name == "word/_rels/document.xml.rels" {
            *data = rels.to_xml().into_bytes();
        }
    }
    let header = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr xmlns:w="{}">{}</w:hdr>"#,
        namespaces::W,
        header_content
    );
    parts.push(("word/header1.xml".to_string(), header.into_bytes()));
    DocxDocument::from_package(DocxPackage::from_parts(parts).unwrap())
}

pub fn body(document: &DocxDocument) -> NodeId {
    document.package().body().unwrap()
}

/// Text of every body block, section properties excluded
pub fn body_texts(document: &DocxDocument) -> Vec<String> {
    let tree = document.tree();
    tree.children(body(document))
        .iter()
        .filter(|&&child| !tree.is(child, NodeType::SectionProperties))
        .map(|&child| tree.inner_text(child))
        .collect()
}

pub fn main_xml(document: &DocxDocument) -> String {
    document.package().main_document_xml().unwrap()
}
