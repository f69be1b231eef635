//! HTML5 parsing using html5ever.

use crate::dom::Document;
use anyhow::{Error, anyhow};
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document as html5ever_parse};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Parse a full HTML document.
///
/// # Errors
/// Returns an error if html5ever cannot read the input or the tree cannot be converted.
pub fn parse_document(html: &str) -> Result<Document, Error> {
    let dom = parse_rcdom(html)?;
    let mut document = Document::new();
    let root = document.root();
    convert_node(&mut document, &dom.document, root)?;
    log::debug!("parsed document with {} elements", document.elements().count());
    Ok(document)
}

/// Parse markup as a body fragment. The fragment's top-level nodes become direct
/// children of the document element, with no implied `<head>` or `<body>`.
///
/// # Errors
/// Returns an error if html5ever cannot read the input or the tree cannot be converted.
pub fn parse_fragment(html: &str) -> Result<Document, Error> {
    let dom = parse_rcdom(html)?;
    let body = find_element(&dom.document, "body")
        .ok_or_else(|| anyhow!("html5ever produced no <body> for fragment"))?;

    let mut document = Document::new();
    let html_element = document.create_element("html");
    let root = document.root();
    document.append_child(root, html_element)?;
    for child in body.children.borrow().iter() {
        convert_node(&mut document, child, html_element)?;
    }
    Ok(document)
}

fn parse_rcdom(html: &str) -> Result<RcDom, Error> {
    let dom = html5ever_parse(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    Ok(dom)
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(Handle::clone(handle));
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Convert an html5ever node (and its subtree) into the arena under `parent`.
fn convert_node(document: &mut Document, rc_node: &Handle, parent: NodeId) -> Result<(), Error> {
    match &rc_node.data {
        RcNodeData::Document => {
            for child in rc_node.children.borrow().iter() {
                convert_node(document, child, parent)?;
            }
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            // Whitespace-only text carries nothing the builder reads
            if !text.trim().is_empty() {
                let node = document.create_text(&text);
                document.append_child(parent, node)?;
            }
        }
        RcNodeData::Comment { contents } => {
            let node = document.create_comment(contents);
            document.append_child(parent, node)?;
        }
        RcNodeData::Element { name, attrs, .. } => {
            let node = document.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                document.set_attribute(node, &attr.name.local, &attr.value);
            }
            document.append_child(parent, node)?;
            for child in rc_node.children.borrow().iter() {
                convert_node(document, child, node)?;
            }
        }
        RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_children_sit_under_document_element() {
        let document = parse_fragment(r#"<div id="app"><ul><li>A</li></ul></div>"#).unwrap();
        let html = document.document_element().unwrap();
        let div = document.first_element_child(html).unwrap();
        assert_eq!(document.tag_name(div).as_deref(), Some("DIV"));
        assert_eq!(document.id(div), Some("app"));
        assert_eq!(document.element_children(html).count(), 1);
    }

    #[test]
    fn full_document_has_head_and_body() {
        let document = parse_document("<!DOCTYPE html><title>x</title><p class='a b'>hi</p>").unwrap();
        let html = document.document_element().unwrap();
        let tags: Vec<String> = document
            .element_children(html)
            .filter_map(|child| document.tag_name(child))
            .collect();
        assert_eq!(tags, vec!["HEAD", "BODY"]);
        let paragraph = document
            .elements()
            .find(|node| document.local_name(*node) == Some("p"))
            .unwrap();
        assert_eq!(document.class_list(paragraph), vec!["a", "b"]);
        assert_eq!(document.text_content(paragraph), "hi");
    }
}
