use core::fmt;

use super::{Document, DocumentNode, NodeKind};
use indextree::NodeId;

use serde_json::{Map, Value, json};

// -----------------------
// Module-scope helpers
// -----------------------

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

fn coalesce_children(document: &Document, id: NodeId) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in id.children(&document.arena) {
        match document.node(child).map(|entry| &entry.kind) {
            Some(NodeKind::Text { text }) => text_buf.push_str(text),
            Some(NodeKind::Comment { .. }) | None => {}
            Some(_) => {
                flush_text(&mut children, &mut text_buf);
                children.push(node_to_json(document, child));
            }
        }
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn node_to_json(document: &Document, id: NodeId) -> Value {
    let Some(DocumentNode { kind, attrs }) = document.node(id) else {
        return Value::Null;
    };
    match kind {
        NodeKind::Element { tag } => {
            // Sorted by key for determinism
            let mut pairs: Vec<&(String, String)> = attrs.iter().collect();
            pairs.sort_by(|left, right| left.0.cmp(&right.0));
            let mut attrs_obj = Map::new();
            for (key, value) in pairs {
                attrs_obj.insert(key.clone(), Value::String(value.clone()));
            }
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(document, id),
            })
        }
        NodeKind::Text { text } => json!({ "type": "text", "text": text }),
        NodeKind::Comment { text } => json!({ "type": "comment", "text": text }),
        NodeKind::Document => {
            json!({ "type": "document", "children": coalesce_children(document, id) })
        }
    }
}

/// Deterministic JSON snapshot of the document, with adjacent text merged and comments dropped.
pub fn to_json(document: &Document) -> Value {
    node_to_json(document, document.root())
}

fn write_node(document: &Document, id: NodeId, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match document.node(id).map(|entry| &entry.kind) {
        Some(NodeKind::Document) => writeln!(f, "{indent}#document")?,
        Some(NodeKind::Element { tag }) => {
            write!(f, "{indent}<{tag}")?;
            for (name, value) in document.attributes(id) {
                write!(f, " {name}=\"{value}\"")?;
            }
            writeln!(f, ">")?;
        }
        Some(NodeKind::Text { text }) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(());
            }
            writeln!(f, "{indent}\"{trimmed}\"")?;
        }
        Some(NodeKind::Comment { text }) => writeln!(f, "{indent}<!--{text}-->")?,
        None => return Ok(()),
    }
    for child in id.children(&document.arena) {
        write_node(document, child, depth + 1, f)?;
    }
    Ok(())
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Document")?;
        write_node(self, self.root, 1, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_sorts_attributes_and_merges_text() {
        let mut document = Document::new();
        let html = document.create_element("html");
        let div = document.create_element("div");
        document.set_attribute(div, "title", "t");
        document.set_attribute(div, "class", "c");
        let first = document.create_text("a");
        let second = document.create_text("b");
        document.append_child(document.root(), html).unwrap();
        document.append_child(html, div).unwrap();
        document.append_child(div, first).unwrap();
        document.append_child(div, second).unwrap();

        let snapshot = to_json(&document);
        let div_json = &snapshot["children"][0]["children"][0];
        assert_eq!(div_json["tag"], "div");
        let keys: Vec<&String> = div_json["attrs"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["class", "title"]);
        assert_eq!(div_json["children"][0]["text"], "ab");
    }

    #[test]
    fn debug_tree_is_indented() {
        let mut document = Document::new();
        let html = document.create_element("html");
        let body = document.create_element("body");
        document.append_child(document.root(), html).unwrap();
        document.append_child(html, body).unwrap();
        let printed = format!("{document:?}");
        assert!(printed.contains("\n    <html>\n      <body>\n"), "{printed}");
    }
}
