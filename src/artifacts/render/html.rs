use crate::domain::mark::{DiffKind, DiffTag, Granularity, Mark};
use crate::domain::node::{Node, NodeType};
use serde_json::Value;

/// Mark types with a dedicated inline element. Anything else becomes a
/// `<span>` carrying the mark type as its class.
const MARK_ELEMENTS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "bold" => "strong",
    "strong" => "strong",
    "italic" => "em",
    "em" => "em",
    "code" => "code",
    "strike" => "s",
    "underline" => "u",
    "subscript" => "sub",
    "superscript" => "sup",
    "link" => "a",
};

struct Palette {
    background: &'static str,
    border: &'static str,
}

fn palette(kind: DiffKind) -> Palette {
    match kind {
        DiffKind::Inserted => Palette {
            background: "#bcf5bc",
            border: "#4caf50",
        },
        DiffKind::Deleted => Palette {
            background: "#ff8989",
            border: "#f44336",
        },
    }
}

/// Inline CSS for a diff-tagged span.
pub fn diff_style(tag: DiffTag) -> String {
    let palette = palette(tag.kind);
    let mut style = format!("background-color: {};", palette.background);

    match tag.granularity {
        Granularity::Word => style.push_str(&format!(
            " text-decoration: underline; text-decoration-color: {};",
            palette.border
        )),
        Granularity::Char => style.push_str(" opacity: 0.85;"),
    }

    style
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

fn attr_text(value: &Value) -> String {
    match value {
        Value::String(s) => escape(s),
        other => escape(&other.to_string()),
    }
}

/// Renders a document tree, diff-tagged or not, as an HTML fragment.
pub fn render_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    if node.is_text() {
        write_text(out, node);
        return;
    }

    let (open, close) = element(node);
    out.push_str(&open);
    for child in node.children() {
        write_node(out, child);
    }
    out.push_str(&close);
}

fn wrap(name: &str) -> (String, String) {
    (format!("<{name}>"), format!("</{name}>"))
}

fn element(node: &Node) -> (String, String) {
    match node.node_type {
        NodeType::Doc | NodeType::Text => (String::new(), String::new()),
        NodeType::Paragraph => wrap("p"),
        NodeType::Heading => {
            let level = node
                .attrs
                .get("level")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6);
            wrap(&format!("h{level}"))
        }
        NodeType::Blockquote => wrap("blockquote"),
        NodeType::BulletList => wrap("ul"),
        NodeType::OrderedList => wrap("ol"),
        NodeType::ListItem => wrap("li"),
        NodeType::CodeBlock => ("<pre><code>".to_string(), "</code></pre>".to_string()),
        NodeType::HorizontalRule => ("<hr>".to_string(), String::new()),
        NodeType::HardBreak => ("<br>".to_string(), String::new()),
        NodeType::Image => {
            let src = node.attrs.get("src").map(attr_text).unwrap_or_default();
            let alt = node.attrs.get("alt").map(attr_text).unwrap_or_default();
            (format!(r#"<img src="{src}" alt="{alt}">"#), String::new())
        }
        NodeType::Table => wrap("table"),
        NodeType::TableRow => wrap("tr"),
        NodeType::TableCell => wrap("td"),
        NodeType::TableHeader => wrap("th"),
    }
}

fn write_text(out: &mut String, leaf: &Node) {
    for mark in &leaf.marks {
        out.push_str(&open_mark(mark));
    }
    out.push_str(&escape(leaf.text_str()));
    for mark in leaf.marks.iter().rev() {
        out.push_str(&close_mark(mark));
    }
}

fn open_mark(mark: &Mark) -> String {
    if let Some(tag) = DiffTag::from_mark(mark) {
        return format!(
            r#"<span data-diff-type="{}" data-diff-level="{}" style="{}">"#,
            tag.kind,
            tag.granularity,
            diff_style(tag)
        );
    }

    match MARK_ELEMENTS.get(mark.mark_type.as_str()) {
        Some(&"a") => {
            let href = mark.attrs.get("href").map(attr_text).unwrap_or_default();
            format!(r#"<a href="{href}">"#)
        }
        Some(name) => format!("<{name}>"),
        None => format!(r#"<span class="{}">"#, escape(&mark.mark_type)),
    }
}

fn close_mark(mark: &Mark) -> String {
    if mark.is_diff_tag() {
        return "</span>".to_string();
    }

    let name = MARK_ELEMENTS
        .get(mark.mark_type.as_str())
        .copied()
        .unwrap_or("span");
    format!("</{name}>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn paragraph(children: Vec<Node>) -> Node {
        Node::container(
            NodeType::Paragraph,
            children.into_iter().map(Arc::new).collect(),
        )
    }

    #[rstest]
    #[case(
        DiffTag::new(DiffKind::Inserted, Granularity::Word),
        "background-color: #bcf5bc; text-decoration: underline; text-decoration-color: #4caf50;"
    )]
    #[case(
        DiffTag::new(DiffKind::Deleted, Granularity::Word),
        "background-color: #ff8989; text-decoration: underline; text-decoration-color: #f44336;"
    )]
    #[case(
        DiffTag::new(DiffKind::Inserted, Granularity::Char),
        "background-color: #bcf5bc; opacity: 0.85;"
    )]
    #[case(
        DiffTag::new(DiffKind::Deleted, Granularity::Char),
        "background-color: #ff8989; opacity: 0.85;"
    )]
    fn diff_styles(#[case] tag: DiffTag, #[case] expected: &str) {
        assert_eq!(diff_style(tag), expected);
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_diff_span_inside_styling_marks() {
        let leaf = Node::text("new").with_marks(vec![
            Mark::new("bold".into()),
            DiffTag::new(DiffKind::Inserted, Granularity::Char).to_mark(),
        ]);
        let doc = Node::container(
            NodeType::Doc,
            vec![Arc::new(paragraph(vec![Node::text("a "), leaf]))],
        );

        assert_eq!(
            render_html(&doc),
            concat!(
                r#"<p>a <strong><span data-diff-type="inserted" data-diff-level="char" "#,
                r#"style="background-color: #bcf5bc; opacity: 0.85;">new</span></strong></p>"#
            )
        );
    }

    #[test]
    fn renders_block_structure() {
        let heading = Node::container(NodeType::Heading, vec![Arc::new(Node::text("T"))])
            .with_attr("level", 2);
        let list = Node::container(
            NodeType::BulletList,
            vec![Arc::new(Node::container(
                NodeType::ListItem,
                vec![Arc::new(paragraph(vec![Node::text("item")]))],
            ))],
        );
        let doc = Node::container(
            NodeType::Doc,
            vec![
                Arc::new(heading),
                Arc::new(list),
                Arc::new(Node::container(NodeType::HorizontalRule, vec![])),
            ],
        );

        assert_eq!(
            render_html(&doc),
            "<h2>T</h2><ul><li><p>item</p></li></ul><hr>"
        );
    }

    #[test]
    fn renders_links_and_unknown_marks() {
        let doc = paragraph(vec![
            Node::text("site").with_marks(vec![
                Mark::new("link".into()).with_attr("href", "https://example.com/?a=1&b=2"),
            ]),
            Node::text("!").with_marks(vec![Mark::new("highlight".into())]),
        ]);

        assert_eq!(
            render_html(&doc),
            concat!(
                r#"<p><a href="https://example.com/?a=1&amp;b=2">site</a>"#,
                r#"<span class="highlight">!</span></p>"#
            )
        );
    }
}
