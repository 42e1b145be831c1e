//! Minimal XML element tree

use std::fmt::Display;

/// One XML element. Attributes keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: append an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.attrs.push((key.into(), value.to_string()));
        self
    }

    /// Builder: append a child
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given name
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = Node::new("folder")
            .attr("id", 3)
            .attr("name", "head")
            .child(Node::new("file").attr("id", 0))
            .child(Node::new("file").attr("id", 1));

        assert_eq!(node.get_attr("id"), Some("3"));
        assert_eq!(node.get_attr("name"), Some("head"));
        assert_eq!(node.get_attr("missing"), None);
        assert_eq!(node.children_named("file").count(), 2);
        assert_eq!(node.find("file").and_then(|f| f.get_attr("id")), Some("0"));
    }
}
