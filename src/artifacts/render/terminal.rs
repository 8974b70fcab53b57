use crate::domain::mark::{DiffKind, DiffTag, Granularity};
use crate::domain::node::{Node, NodeType};
use colored::{ColoredString, Colorize};

/// Inserted text is green, deleted text red and struck through; word-level
/// changes are underlined on top.
pub fn paint(text: &str, tag: Option<DiffTag>) -> ColoredString {
    let Some(tag) = tag else {
        return text.normal();
    };

    let painted = match tag.kind {
        DiffKind::Inserted => text.green(),
        DiffKind::Deleted => text.red().strikethrough(),
    };

    match tag.granularity {
        Granularity::Word => painted.underline(),
        Granularity::Char => painted,
    }
}

/// Renders a document as text, one line per textblock.
pub fn render_text(node: &Node) -> String {
    let mut lines = Vec::new();
    collect_lines(node, &mut lines);
    lines.join("\n")
}

fn is_textblock(node: &Node) -> bool {
    matches!(
        node.node_type,
        NodeType::Paragraph | NodeType::Heading | NodeType::CodeBlock
    ) || node.children().iter().any(|child| child.is_text())
}

fn collect_lines(node: &Node, lines: &mut Vec<String>) {
    if node.node_type == NodeType::HorizontalRule {
        lines.push("---".to_string());
    } else if is_textblock(node) {
        lines.push(render_inline(node));
    } else {
        for child in node.children() {
            collect_lines(child, lines);
        }
    }
}

fn render_inline(node: &Node) -> String {
    node.children()
        .iter()
        .map(|child| match child.node_type {
            NodeType::Text => {
                paint(child.text_str(), child.diff_tags().first().copied()).to_string()
            }
            NodeType::HardBreak => "\n".to_string(),
            NodeType::Image => "[image]".to_string(),
            _ => child.text_content(),
        })
        .collect()
}
