//! Per-node refinement state.

use selpath_html::{Document, NodeId};

use crate::config::BuilderConfig;
use crate::error::BuilderError;

/// Values a whitelisted attribute offers for refinement: class tokens for
/// `class`, the full value otherwise. Empty values offer nothing.
pub fn candidate_values<'d>(document: &'d Document, node: NodeId, name: &str) -> Vec<&'d str> {
    if name.eq_ignore_ascii_case("class") {
        return document.class_list(node);
    }
    document
        .attribute(node, &name.to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .into_iter()
        .collect()
}

/// Whitelisted attributes present on `node`, with their candidate values, in source order.
pub fn available_attributes(document: &Document, node: NodeId, config: &BuilderConfig) -> Vec<(String, Vec<String>)> {
    document
        .attributes(node)
        .iter()
        .filter(|(name, _)| config.allows(name))
        .filter_map(|(name, _)| {
            let values: Vec<String> = candidate_values(document, node, name)
                .into_iter()
                .map(str::to_owned)
                .collect();
            (!values.is_empty()).then(|| (name.clone(), values))
        })
        .collect()
}

/// One picked node plus the predicates the user chose for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    node: NodeId,
    /// Name order is first-toggle order; value order is toggle order. Never holds an empty list.
    attributes: Vec<(String, Vec<String>)>,
}

impl NodeDescriptor {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            attributes: Vec::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn attributes(&self) -> &[(String, Vec<String>)] {
        &self.attributes
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    pub fn is_included(&self, name: &str, value: &str) -> bool {
        self.values(name).iter().any(|included| included == value)
    }

    pub fn is_refined(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Include or exclude one attribute value. Returns whether the state changed;
    /// repeating a toggle is a no-op.
    ///
    /// # Errors
    /// [`BuilderError::AttributeNotWhitelisted`] when `name` is not whitelisted or absent
    /// from the node, [`BuilderError::ValueNotPresent`] when `value` is not one of its values.
    /// The descriptor is unchanged on error.
    pub fn set_attribute_included(
        &mut self,
        document: &Document,
        config: &BuilderConfig,
        name: &str,
        value: &str,
        included: bool,
    ) -> Result<bool, BuilderError> {
        let name = name.to_ascii_lowercase();
        if !config.allows(&name) || !document.has_attribute(self.node, &name) {
            return Err(BuilderError::AttributeNotWhitelisted { name });
        }
        if !candidate_values(document, self.node, &name).contains(&value) {
            return Err(BuilderError::ValueNotPresent {
                name,
                value: value.to_owned(),
            });
        }

        let slot = self.attributes.iter().position(|(attr, _)| *attr == name);
        match (slot, included) {
            (Some(index), true) => {
                let values = &mut self.attributes[index].1;
                if values.iter().any(|existing| existing == value) {
                    return Ok(false);
                }
                values.push(value.to_owned());
            }
            (None, true) => self.attributes.push((name, vec![value.to_owned()])),
            (Some(index), false) => {
                let values = &mut self.attributes[index].1;
                let before = values.len();
                values.retain(|existing| existing != value);
                if values.len() == before {
                    return Ok(false);
                }
                if values.is_empty() {
                    self.attributes.remove(index);
                }
            }
            (None, false) => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selpath_html::parse_fragment;

    fn fixture() -> (Document, NodeId) {
        let document =
            parse_fragment(r#"<a id="home" class="nav link" href="/" data-x="1" title="">Home</a>"#).unwrap();
        let link = document.elements().nth(1).unwrap();
        (document, link)
    }

    #[test]
    fn include_twice_is_idempotent() {
        let (document, link) = fixture();
        let config = BuilderConfig::default();
        let mut descriptor = NodeDescriptor::new(link);
        assert!(descriptor.set_attribute_included(&document, &config, "class", "nav", true).unwrap());
        let once = descriptor.clone();
        assert!(!descriptor.set_attribute_included(&document, &config, "class", "nav", true).unwrap());
        assert_eq!(descriptor, once);
    }

    #[test]
    fn removing_last_value_drops_the_key() {
        let (document, link) = fixture();
        let config = BuilderConfig::default();
        let mut descriptor = NodeDescriptor::new(link);
        descriptor.set_attribute_included(&document, &config, "class", "link", true).unwrap();
        descriptor.set_attribute_included(&document, &config, "class", "nav", true).unwrap();
        assert_eq!(descriptor.values("class"), ["link", "nav"]);

        descriptor.set_attribute_included(&document, &config, "class", "link", false).unwrap();
        descriptor.set_attribute_included(&document, &config, "class", "nav", false).unwrap();
        assert!(!descriptor.is_refined());
        assert!(!descriptor.set_attribute_included(&document, &config, "class", "nav", false).unwrap());
    }

    #[test]
    fn rejects_unknown_names_and_values_without_mutation() {
        let (document, link) = fixture();
        let config = BuilderConfig::default();
        let mut descriptor = NodeDescriptor::new(link);
        descriptor.set_attribute_included(&document, &config, "id", "home", true).unwrap();
        let before = descriptor.clone();

        assert_eq!(
            descriptor.set_attribute_included(&document, &config, "data-x", "1", true),
            Err(BuilderError::AttributeNotWhitelisted { name: "data-x".to_owned() })
        );
        assert_eq!(
            descriptor.set_attribute_included(&document, &config, "rel", "x", true),
            Err(BuilderError::AttributeNotWhitelisted { name: "rel".to_owned() })
        );
        assert!(matches!(
            descriptor.set_attribute_included(&document, &config, "class", "nav link", true),
            Err(BuilderError::ValueNotPresent { .. })
        ));
        assert!(matches!(
            descriptor.set_attribute_included(&document, &config, "href", "/other", true),
            Err(BuilderError::ValueNotPresent { .. })
        ));
        assert_eq!(descriptor, before);
    }

    #[test]
    fn available_attributes_filter_by_whitelist_and_emptiness() {
        let (document, link) = fixture();
        let available = available_attributes(&document, link, &BuilderConfig::default());
        let names: Vec<&str> = available.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["id", "class", "href"]);
        assert_eq!(available[1].1, vec!["nav", "link"]);
    }
}
