use crate::artifacts::diff::char_diff::diff_chars;
use crate::artifacts::diff::edit_script::SegmentKind;
use crate::artifacts::diff::word_diff::diff_words;
use crate::domain::error::{DiffError, Result};
use crate::domain::mark::{DiffTag, Granularity, Mark};
use crate::domain::node::{Node, same_node};
use std::ops::Range;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
struct StyledSpan<'n> {
    leaf: &'n Node,
    range: Range<usize>,
}

/// The concatenated text of a run of adjacent text leaves, remembering where
/// each leaf with marks or attributes sits inside it (byte offsets).
#[derive(Debug)]
struct RunText<'n> {
    text: String,
    styled: Vec<StyledSpan<'n>>,
}

impl<'n> RunText<'n> {
    fn new(run: &'n [Arc<Node>]) -> Result<Self> {
        let mut text = String::new();
        let mut styled = Vec::new();

        for leaf in run {
            if !leaf.is_text() {
                return Err(DiffError::malformed(
                    leaf.node_type,
                    "non-text node inside a text run",
                ));
            }
            leaf.validate()?;

            let start = text.len();
            text.push_str(leaf.text_str());
            if leaf.has_styling() && text.len() > start {
                styled.push(StyledSpan {
                    leaf,
                    range: start..text.len(),
                });
            }
        }

        Ok(RunText { text, styled })
    }

    /// Turns `piece`, found at offset `base` of this run, into text leaves.
    ///
    /// The piece is cut wherever a styled leaf begins or ends inside it, and
    /// each styled part takes that leaf's attributes and marks.
    fn project(&self, piece: &str, base: usize, tag: Option<DiffTag>) -> Vec<Arc<Node>> {
        let end = base + piece.len();
        let mut leaves = Vec::new();
        let mut cursor = base;

        let overlapping = self
            .styled
            .iter()
            .filter(|span| span.range.start < end && span.range.end > base);

        for span in overlapping {
            let from = span.range.start.max(base);
            let to = span.range.end.min(end);

            if from > cursor {
                leaves.push(plain_leaf(&piece[cursor - base..from - base], tag));
            }
            leaves.push(styled_leaf(span.leaf, &piece[from - base..to - base], tag));
            cursor = to;
        }

        if cursor < end {
            leaves.push(plain_leaf(&piece[cursor - base..], tag));
        }

        leaves
    }
}

fn tagged(marks: &[Mark], tag: Option<DiffTag>) -> Vec<Mark> {
    marks
        .iter()
        .cloned()
        .chain(tag.map(DiffTag::to_mark))
        .collect()
}

fn plain_leaf(text: &str, tag: Option<DiffTag>) -> Arc<Node> {
    Arc::new(Node::text(text).with_marks(tagged(&[], tag)))
}

fn styled_leaf(original: &Node, text: &str, tag: Option<DiffTag>) -> Arc<Node> {
    Arc::new(
        Node::text(text)
            .with_attrs(original.attrs.clone())
            .with_marks(tagged(&original.marks, tag)),
    )
}

/// Diffs two runs of adjacent text leaves into one run of tagged leaves.
///
/// Unchanged and deleted text keeps the styling of the old leaves it came
/// from, inserted text the styling of the new leaves.
pub fn patch_text_run(
    old_run: &[Arc<Node>],
    new_run: &[Arc<Node>],
    granularity: Granularity,
) -> Result<Vec<Arc<Node>>> {
    let old = RunText::new(old_run)?;
    let new = RunText::new(new_run)?;

    if old_run.len() == new_run.len()
        && old_run.iter().zip(new_run).all(|(a, b)| same_node(a, b))
    {
        return Ok(old_run.to_vec());
    }

    let script = match granularity {
        Granularity::Char => diff_chars(&old.text, &new.text),
        Granularity::Word => diff_words(&old.text, &new.text),
    };
    trace!(
        old_len = old.text.len(),
        new_len = new.text.len(),
        segments = script.len(),
        %granularity,
        "patching text run"
    );

    let mut output = Vec::with_capacity(script.len());
    let (mut old_cursor, mut new_cursor) = (0, 0);

    for segment in script.iter() {
        let tag = segment.diff_tag();
        let len = segment.text.len();

        match segment.kind {
            SegmentKind::Unchanged => {
                output.extend(old.project(&segment.text, old_cursor, tag));
                old_cursor += len;
                new_cursor += len;
            }
            SegmentKind::Deleted => {
                output.extend(old.project(&segment.text, old_cursor, tag));
                old_cursor += len;
            }
            SegmentKind::Inserted => {
                output.extend(new.project(&segment.text, new_cursor, tag));
                new_cursor += len;
            }
        }
    }

    Ok(output)
}
