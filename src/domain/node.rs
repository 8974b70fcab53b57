use crate::domain::error::{DiffError, Result};
use crate::domain::mark::{DiffTag, Mark};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

/// Scalar node/mark attributes, kept sorted so equality and output are deterministic.
pub type Attrs = BTreeMap<String, Value>;

/// Canonical names plus the camelCase spellings emitted by tiptap-style editors.
const NODE_TYPE_NAMES: phf::Map<&'static str, NodeType> = phf::phf_map! {
    "doc" => NodeType::Doc,
    "paragraph" => NodeType::Paragraph,
    "heading" => NodeType::Heading,
    "blockquote" => NodeType::Blockquote,
    "bullet_list" => NodeType::BulletList,
    "bulletList" => NodeType::BulletList,
    "ordered_list" => NodeType::OrderedList,
    "orderedList" => NodeType::OrderedList,
    "list_item" => NodeType::ListItem,
    "listItem" => NodeType::ListItem,
    "code_block" => NodeType::CodeBlock,
    "codeBlock" => NodeType::CodeBlock,
    "horizontal_rule" => NodeType::HorizontalRule,
    "horizontalRule" => NodeType::HorizontalRule,
    "hard_break" => NodeType::HardBreak,
    "hardBreak" => NodeType::HardBreak,
    "image" => NodeType::Image,
    "table" => NodeType::Table,
    "table_row" => NodeType::TableRow,
    "tableRow" => NodeType::TableRow,
    "table_cell" => NodeType::TableCell,
    "tableCell" => NodeType::TableCell,
    "table_header" => NodeType::TableHeader,
    "tableHeader" => NodeType::TableHeader,
    "text" => NodeType::Text,
};

/// The closed alphabet of node types a document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    HorizontalRule,
    HardBreak,
    Image,
    Table,
    TableRow,
    TableCell,
    TableHeader,
    Text,
}

impl NodeType {
    pub fn try_parse(name: &str) -> anyhow::Result<Self> {
        NODE_TYPE_NAMES
            .get(name)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("unknown node type: {name}"))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeType::Text)
    }
}

impl From<NodeType> for &'static str {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::BulletList => "bullet_list",
            NodeType::OrderedList => "ordered_list",
            NodeType::ListItem => "list_item",
            NodeType::CodeBlock => "code_block",
            NodeType::HorizontalRule => "horizontal_rule",
            NodeType::HardBreak => "hard_break",
            NodeType::Image => "image",
            NodeType::Table => "table",
            NodeType::TableRow => "table_row",
            NodeType::TableCell => "table_cell",
            NodeType::TableHeader => "table_header",
            NodeType::Text => "text",
        }
    }
}

impl TryFrom<String> for NodeType {
    type Error = anyhow::Error;

    fn try_from(name: String) -> anyhow::Result<Self> {
        NodeType::try_parse(&name)
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = (*self).into();
        write!(f, "{name}")
    }
}

/// A document tree node: either a container of children or a text leaf.
///
/// Children are reference-counted so that subtrees the diff leaves untouched
/// are shared with the input rather than deep-copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Arc<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn container(node_type: NodeType, content: Vec<Arc<Node>>) -> Self {
        Node {
            node_type,
            attrs: Attrs::new(),
            marks: Vec::new(),
            content,
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node {
            node_type: NodeType::Text,
            attrs: Attrs::new(),
            marks: Vec::new(),
            content: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    /// Rebuilds this node with new children, keeping type, attributes and marks.
    pub fn with_content(&self, content: Vec<Arc<Node>>) -> Self {
        Node {
            node_type: self.node_type,
            attrs: self.attrs.clone(),
            marks: self.marks.clone(),
            content,
            text: None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.node_type.is_text()
    }

    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.content
    }

    /// Whether this leaf carries styling that must survive re-splitting.
    pub fn has_styling(&self) -> bool {
        !self.marks.is_empty() || !self.attrs.is_empty()
    }

    /// Checks the text-leaf exclusivity rule for this node only.
    pub fn validate(&self) -> Result<()> {
        match (self.is_text(), &self.text, self.content.is_empty()) {
            (true, None, _) => Err(DiffError::malformed(
                self.node_type,
                "text node without text content",
            )),
            (true, Some(_), false) => Err(DiffError::malformed(
                self.node_type,
                "text node with children",
            )),
            (false, Some(_), _) => Err(DiffError::malformed(
                self.node_type,
                "container node with text content",
            )),
            _ => Ok(()),
        }
    }

    /// Concatenated text of every leaf below this node, in document order.
    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self
                .content
                .iter()
                .map(|child| child.text_content())
                .collect(),
        }
    }

    /// Diff tags found anywhere in the subtree, in document order.
    pub fn diff_tags(&self) -> Vec<DiffTag> {
        let mut tags = self
            .marks
            .iter()
            .filter_map(DiffTag::from_mark)
            .collect::<Vec<_>>();
        for child in &self.content {
            tags.extend(child.diff_tags());
        }

        tags
    }

    /// Depth-first copy of the subtree, passing every text leaf through `mapper`.
    pub fn map_text_leaves<F>(self: &Arc<Self>, mapper: &F) -> Arc<Node>
    where
        F: Fn(&Node) -> Node,
    {
        if self.is_text() {
            return Arc::new(mapper(self));
        }

        let content = self
            .content
            .iter()
            .map(|child| child.map_text_leaves(mapper))
            .collect();

        Arc::new(self.with_content(content))
    }
}

/// Deep structural equality with a shortcut for shared references.
pub fn same_node(a: &Arc<Node>, b: &Arc<Node>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mark::{DiffKind, Granularity};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn paragraph(text: &str) -> Node {
        Node::container(NodeType::Paragraph, vec![Arc::new(Node::text(text))])
    }

    #[rstest]
    #[case("bullet_list", NodeType::BulletList)]
    #[case("bulletList", NodeType::BulletList)]
    #[case("hardBreak", NodeType::HardBreak)]
    #[case("text", NodeType::Text)]
    fn node_type_accepts_aliases(#[case] name: &str, #[case] expected: NodeType) {
        assert_eq!(NodeType::try_parse(name).unwrap(), expected);
    }

    #[test]
    fn node_type_rejects_unknown_names() {
        assert!(NodeType::try_parse("marquee").is_err());
    }

    #[test]
    fn deserializes_prosemirror_json() {
        let json = serde_json::json!({
            "type": "doc",
            "content": [{
                "type": "heading",
                "attrs": { "level": 2 },
                "content": [
                    { "type": "text", "text": "Hello " },
                    { "type": "text", "text": "world", "marks": [{ "type": "bold" }] }
                ]
            }]
        });

        let doc: Node = serde_json::from_value(json).unwrap();

        assert_eq!(doc.node_type, NodeType::Doc);
        let heading = &doc.children()[0];
        assert_eq!(heading.attrs.get("level"), Some(&Value::from(2)));
        assert_eq!(heading.children()[1].marks, vec![Mark::new("bold".into())]);
        assert_eq!(doc.text_content(), "Hello world");
    }

    #[test]
    fn serialization_omits_empty_fields() {
        let json = serde_json::to_value(paragraph("hi")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "paragraph",
                "content": [{ "type": "text", "text": "hi" }]
            })
        );
    }

    #[rstest]
    #[case(Node { text: None, ..Node::text("") }, "text node without text content")]
    #[case(
        Node { content: vec![Arc::new(Node::text("x"))], ..Node::text("x") },
        "text node with children"
    )]
    #[case(
        Node { text: Some("x".into()), ..Node::container(NodeType::Paragraph, vec![]) },
        "container node with text content"
    )]
    fn validate_rejects_malformed_nodes(#[case] node: Node, #[case] reason: &'static str) {
        assert_eq!(
            node.validate(),
            Err(DiffError::malformed(node.node_type, reason))
        );
    }

    #[test]
    fn empty_container_is_valid() {
        let rule = Node::container(NodeType::HorizontalRule, vec![]);

        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn map_text_leaves_keeps_structure() {
        let doc = Arc::new(Node::container(
            NodeType::Doc,
            vec![Arc::new(paragraph("a")), Arc::new(paragraph("b"))],
        ));
        let tag = DiffTag::new(DiffKind::Inserted, Granularity::Word);

        let tagged = doc.map_text_leaves(&|leaf| {
            let mut marks = leaf.marks.clone();
            marks.push(tag.to_mark());
            leaf.clone().with_marks(marks)
        });

        assert_eq!(tagged.text_content(), "ab");
        assert_eq!(tagged.diff_tags(), vec![tag, tag]);
        assert!(doc.diff_tags().is_empty());
    }

    #[test]
    fn same_node_compares_by_value() {
        let a = Arc::new(paragraph("x"));
        let b = Arc::new(paragraph("x"));

        assert!(same_node(&a, &a));
        assert!(same_node(&a, &b));
        assert!(!same_node(&a, &Arc::new(paragraph("y"))));
    }
}
