//! XML text output matching what the editor itself writes

use std::fmt::Write;

use super::document::Node;

/// Elements always written as `<name attrs />`
pub const SELF_CLOSING: [&str; 3] = ["file", "object_ref", "object"];

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn escape(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

fn open_tag(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(&node.name);
    for (key, value) in &node.attrs {
        let _ = write!(out, " {}=\"", key);
        escape(value, out);
        out.push('"');
    }
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    out.push('\n');
    out.push_str(&"\t".repeat(depth));
    open_tag(node, out);

    if SELF_CLOSING.contains(&node.name.as_str()) {
        // Children of these elements are never emitted
        out.push_str(" />");
        return;
    }

    out.push('>');
    if node.children.is_empty() {
        let _ = write!(out, "</{}>", node.name);
        return;
    }

    for child in &node.children {
        write_node(child, depth + 1, out);
    }
    out.push('\n');
    out.push_str(&"\t".repeat(depth));
    let _ = write!(out, "</{}>", node.name);
}

/// Render a document: XML declaration, then the tree with one tab per level
/// and `\n` line endings. No trailing newline.
pub fn write_document(root: &Node) -> String {
    let mut out = String::from(DECLARATION);
    write_node(root, 0, &mut out);
    out
}
