//! Turns a chain of descriptors into a CSS selector or an XPath expression.

use core::fmt;
use core::str::FromStr;

use selpath_html::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::arena::{DescriptorArena, DescriptorId};
use crate::descriptor::NodeDescriptor;

/// Output syntax of a rendered query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    #[default]
    Css,
    XPath,
}

impl fmt::Display for Grammar {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Css => "CSS",
            Self::XPath => "XPath",
        })
    }
}

impl FromStr for Grammar {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("css") {
            Ok(Self::Css)
        } else if value.eq_ignore_ascii_case("xpath") {
            Ok(Self::XPath)
        } else {
            Err(value.to_owned())
        }
    }
}

/// Where an XPath query starts: the document (`//`) or the context node (`.//`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchoring {
    Absolute,
    Relative,
}

/// Number of preceding element siblings sharing the node's tag.
pub fn positional_index(document: &Document, node: NodeId) -> usize {
    let tag = document.local_name(node);
    core::iter::successors(document.previous_element_sibling(node), |sibling| {
        document.previous_element_sibling(*sibling)
    })
    .filter(|sibling| document.local_name(*sibling) == tag)
    .count()
}

/// Whether any other element sibling shares the node's tag.
pub fn has_positional_conflict(document: &Document, node: NodeId) -> bool {
    let tag = document.local_name(node);
    positional_index(document, node) > 0
        || core::iter::successors(document.next_element_sibling(node), |sibling| {
            document.next_element_sibling(*sibling)
        })
        .any(|sibling| document.local_name(sibling) == tag)
}

/// Identifier serialized with CSS escaping rules.
struct CssIdent<'a>(&'a str);

impl fmt::Display for CssIdent<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        cssparser::serialize_identifier(self.0, formatter)
    }
}

/// Single-quoted CSS string. Control characters become hex escapes.
fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' | '\'' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\u{0}'..='\u{1f}' | '\u{7f}' => quoted.push_str(&format!("\\{:x} ", u32::from(ch))),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

fn render_css_step(document: &Document, descriptor: &NodeDescriptor) -> String {
    let node = descriptor.node();
    let mut step = document.tag_name(node).unwrap_or_default();
    let index = positional_index(document, node);
    if index > 0 {
        step.push_str(&format!(":nth-of-type({})", index + 1));
    }
    for (name, values) in descriptor.attributes() {
        if name == "class" {
            for value in values {
                step.push_str(&format!(".{}", CssIdent(value)));
            }
        } else if let Some(value) = values.first() {
            if name == "id" {
                step.push_str(&format!("#{}", CssIdent(value)));
            } else {
                step.push_str(&format!("[{}={}]", CssIdent(name), css_string(value)));
            }
        }
    }
    step
}

fn render_xpath_step(document: &Document, descriptor: &NodeDescriptor) -> String {
    let node = descriptor.node();
    let mut step = document.tag_name(node).unwrap_or_default();
    let index = positional_index(document, node);
    if index > 0 {
        step.push_str(&format!("[{}]", index + 1));
    }
    let conditions: Vec<String> = descriptor
        .attributes()
        .iter()
        .flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| format!("contains(@{name}, {})", selpath_xpath::literal(value)))
        })
        .collect();
    if !conditions.is_empty() {
        step.push_str(&format!("[{}]", conditions.join(" and ")));
    }
    step
}

/// Render `handles` top to bottom. An empty chain renders as `""`.
pub fn render(
    document: &Document,
    arena: &DescriptorArena,
    handles: &[DescriptorId],
    grammar: Grammar,
    anchoring: Anchoring,
) -> String {
    let descriptors = handles.iter().filter_map(|id| arena.get(*id));
    let steps: Vec<String> = match grammar {
        Grammar::Css => descriptors.map(|descriptor| render_css_step(document, descriptor)).collect(),
        Grammar::XPath => descriptors.map(|descriptor| render_xpath_step(document, descriptor)).collect(),
    };
    if steps.is_empty() {
        return String::new();
    }
    let query = match (grammar, anchoring) {
        (Grammar::Css, _) => steps.join(" "),
        (Grammar::XPath, Anchoring::Absolute) => format!("//{}", steps.join("/")),
        (Grammar::XPath, Anchoring::Relative) => format!(".//{}", steps.join("/")),
    };
    log::trace!(target: "selpath_builder", "rendered {grammar} query `{query}`");
    query
}
