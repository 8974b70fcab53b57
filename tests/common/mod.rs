#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use prosediff::{DiffKind, Granularity, Mark, Node, NodeType};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn text(s: &str) -> Arc<Node> {
    Arc::new(Node::text(s))
}

pub fn marked(s: &str, marks: &[&str]) -> Arc<Node> {
    Arc::new(
        Node::text(s).with_marks(
            marks
                .iter()
                .map(|mark| Mark::new(mark.to_string()))
                .collect(),
        ),
    )
}

pub fn container(node_type: NodeType, children: Vec<Arc<Node>>) -> Arc<Node> {
    Arc::new(Node::container(node_type, children))
}

pub fn paragraph(s: &str) -> Arc<Node> {
    container(NodeType::Paragraph, vec![text(s)])
}

pub fn doc(children: Vec<Arc<Node>>) -> Node {
    Node::container(NodeType::Doc, children)
}

/// A text leaf flattened to `(text, diff kind, granularity)`.
pub type Leaf = (String, Option<DiffKind>, Option<Granularity>);

/// Every text leaf of the tree, in document order.
pub fn leaves(node: &Node) -> Vec<Leaf> {
    if node.is_text() {
        let tag = node.diff_tags().first().copied();
        return vec![(
            node.text_str().to_string(),
            tag.map(|tag| tag.kind),
            tag.map(|tag| tag.granularity),
        )];
    }

    node.children().iter().flat_map(|child| leaves(child)).collect()
}

pub fn unchanged(s: &str) -> Leaf {
    (s.to_string(), None, None)
}

pub fn deleted(s: &str, granularity: Granularity) -> Leaf {
    (s.to_string(), Some(DiffKind::Deleted), Some(granularity))
}

pub fn inserted(s: &str, granularity: Granularity) -> Leaf {
    (s.to_string(), Some(DiffKind::Inserted), Some(granularity))
}

/// Text of the tree as it read before the edit.
pub fn old_side(node: &Node) -> String {
    leaves(node)
        .into_iter()
        .filter(|(_, kind, _)| *kind != Some(DiffKind::Inserted))
        .map(|(text, _, _)| text)
        .collect()
}

/// Text of the tree as it reads after the edit.
pub fn new_side(node: &Node) -> String {
    leaves(node)
        .into_iter()
        .filter(|(_, kind, _)| *kind != Some(DiffKind::Deleted))
        .map(|(text, _, _)| text)
        .collect()
}

#[fixture]
pub fn workspace_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).expect("Failed to write JSON file");
    path
}

pub fn run_prosediff(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("prosediff").expect("Failed to find prosediff binary");
    cmd.env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
