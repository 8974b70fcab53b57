//! Recursive tree alignment
//!
//! For every pair of same-typed containers the children are aligned in
//! three steps:
//!
//! 1. Consecutive text leaves are grouped into one text-run unit, so text is
//!    aligned as a whole and only diffed inside the run later.
//! 2. Units equal on both sides at the start and at the end are copied as is.
//! 3. In the middle, the longest block of units appearing in both sides is
//!    kept verbatim and the slices before and after it are aligned the same
//!    way. Without any shared block, units are paired position by position:
//!    same-typed pairs are patched recursively (text runs go to the text run
//!    patcher), everything else becomes a tagged deletion plus insertion.
//!
//! Units copied verbatim are reference copies of the old tree.

use crate::artifacts::patch::options::DiffOptions;
use crate::artifacts::patch::text_run::patch_text_run;
use crate::domain::error::{DiffError, Result};
use crate::domain::mark::{DiffKind, DiffTag, Granularity};
use crate::domain::node::{Node, same_node};
use derive_new::new;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

/// The unit of alignment: a non-text child, or a maximal run of text leaves.
#[derive(Debug, Clone, Copy)]
enum Unit<'n> {
    Node(&'n Arc<Node>),
    TextRun(&'n [Arc<Node>]),
}

impl<'n> Unit<'n> {
    fn nodes(&self) -> &'n [Arc<Node>] {
        match *self {
            Unit::Node(node) => std::slice::from_ref(node),
            Unit::TextRun(run) => run,
        }
    }

    fn same_as(&self, other: &Unit<'_>) -> bool {
        match (self, other) {
            (Unit::Node(a), Unit::Node(b)) => same_node(a, b),
            (Unit::TextRun(a), Unit::TextRun(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| same_node(x, y))
            }
            _ => false,
        }
    }

    fn same_type(&self, other: &Unit<'_>) -> bool {
        match (self, other) {
            (Unit::Node(a), Unit::Node(b)) => a.node_type == b.node_type,
            (Unit::TextRun(_), Unit::TextRun(_)) => true,
            _ => false,
        }
    }
}

fn normalize(children: &[Arc<Node>]) -> Vec<Unit<'_>> {
    children
        .chunk_by(|a, b| a.is_text() && b.is_text())
        .map(|chunk| {
            if chunk[0].is_text() {
                Unit::TextRun(chunk)
            } else {
                Unit::Node(&chunk[0])
            }
        })
        .collect()
}

fn flatten(units: &[Unit<'_>]) -> Vec<Arc<Node>> {
    units
        .iter()
        .flat_map(|unit| unit.nodes().iter().cloned())
        .collect()
}

/// Whole-subtree copies of a unit with every text leaf tagged as `kind`.
fn tag_subtrees(unit: Unit<'_>, kind: DiffKind) -> Vec<Arc<Node>> {
    let tag = DiffTag::new(kind, Granularity::Word).to_mark();

    unit.nodes()
        .iter()
        .map(|node| {
            node.map_text_leaves(&|leaf: &Node| {
                let mut marks = leaf.marks.clone();
                marks.push(tag.clone());
                leaf.clone().with_marks(marks)
            })
        })
        .collect()
}

/// A block of units equal on both sides, as half-open index ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockMatch {
    old_start: usize,
    new_start: usize,
    old_end: usize,
    new_end: usize,
}

impl BlockMatch {
    fn len(&self) -> usize {
        self.new_end - self.new_start
    }
}

/// Greedy block search: each old unit is anchored at the first equal new
/// unit and extended while both sides stay equal. The longest block wins;
/// on ties the one found first (lowest old index) is kept.
fn find_best_match(old: &[Unit<'_>], new: &[Unit<'_>]) -> Option<BlockMatch> {
    let mut best: Option<BlockMatch> = None;

    for (old_start, old_unit) in old.iter().enumerate() {
        let Some(new_start) = new.iter().position(|unit| unit.same_as(old_unit)) else {
            continue;
        };

        let extent = 1 + old[old_start + 1..]
            .iter()
            .zip(&new[new_start + 1..])
            .take_while(|(a, b)| a.same_as(b))
            .count();

        let candidate = BlockMatch {
            old_start,
            new_start,
            old_end: old_start + extent,
            new_end: new_start + extent,
        };
        trace!(?candidate, "candidate block");

        if best.is_none_or(|best| candidate.len() > best.len()) {
            best = Some(candidate);
        }
    }

    best
}

#[derive(Debug, Clone, new)]
pub struct TreePatcher {
    options: DiffOptions,
}

impl TreePatcher {
    /// Merges `old` and `new` into one tree with changed text tagged.
    ///
    /// Both trees are checked up front, so a malformed or over-deep input
    /// fails before any output is built.
    pub fn patch(&self, old: &Node, new: &Node) -> Result<Node> {
        self.preflight(old)?;
        self.preflight(new)?;

        if old.node_type != new.node_type {
            return Err(DiffError::type_mismatch(old.node_type, new.node_type));
        }
        if old.is_text() {
            return Err(DiffError::malformed(
                old.node_type,
                "a text node cannot be the root of a diff",
            ));
        }

        self.patch_node(old, new, 1)
    }

    fn preflight(&self, root: &Node) -> Result<()> {
        let mut pending = vec![(root, 1)];

        while let Some((node, depth)) = pending.pop() {
            if depth > self.options.max_depth {
                return Err(DiffError::DepthExceeded {
                    limit: self.options.max_depth,
                });
            }
            node.validate()?;
            pending.extend(node.children().iter().map(|child| (child.as_ref(), depth + 1)));
        }

        Ok(())
    }

    fn patch_node(&self, old: &Node, new: &Node, depth: usize) -> Result<Node> {
        if old.node_type != new.node_type {
            return Err(DiffError::type_mismatch(old.node_type, new.node_type));
        }
        if depth > self.options.max_depth {
            return Err(DiffError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        old.validate()?;
        new.validate()?;

        let old_units = normalize(old.children());
        let new_units = normalize(new.children());
        let content = self.align(&old_units, &new_units, depth)?;

        Ok(old.with_content(content))
    }

    fn align(&self, old: &[Unit<'_>], new: &[Unit<'_>], depth: usize) -> Result<Vec<Arc<Node>>> {
        let min_len = old.len().min(new.len());

        let left = old
            .iter()
            .zip(new)
            .take_while(|(a, b)| a.same_as(b))
            .count();
        // the suffix never reaches into the prefix, and leaves at least one
        // unit of the shorter side unless the prefix covered it all
        let right = old[left..]
            .iter()
            .rev()
            .zip(new[left..].iter().rev())
            .take_while(|(a, b)| a.same_as(b))
            .count()
            .min(min_len.saturating_sub(left + 1));

        debug!(
            depth,
            left,
            right,
            old_len = old.len(),
            new_len = new.len(),
            "aligned common prefix and suffix"
        );

        let old_middle = &old[left..old.len() - right];
        let new_middle = &new[left..new.len() - right];

        let mut content = flatten(&old[..left]);

        match find_best_match(old_middle, new_middle) {
            Some(block) => {
                debug!(?block, len = block.len(), "best matching block");
                content.extend(self.align(
                    &old_middle[..block.old_start],
                    &new_middle[..block.new_start],
                    depth,
                )?);
                content.extend(flatten(&old_middle[block.old_start..block.old_end]));
                content.extend(self.align(
                    &old_middle[block.old_end..],
                    &new_middle[block.new_end..],
                    depth,
                )?);
            }
            None => content.extend(self.patch_remaining(old_middle, new_middle, depth)?),
        }

        content.extend(flatten(&old[old.len() - right..]));

        Ok(content)
    }

    /// Pairs up units that share no equal block, working in from both ends.
    fn patch_remaining(
        &self,
        old: &[Unit<'_>],
        new: &[Unit<'_>],
        depth: usize,
    ) -> Result<Vec<Arc<Node>>> {
        let mut left_content = Vec::new();
        let mut right_content = VecDeque::new();
        let (mut left, mut right) = (0, 0);

        while left + right < old.len() && left + right < new.len() {
            let (old_left, new_left) = (old[left], new[left]);
            let (old_right, new_right) = (old[old.len() - right - 1], new[new.len() - right - 1]);

            // left wins whenever both ends could be updated
            let update_left = old_left.same_type(&new_left);
            let update_right = !update_left && old_right.same_type(&new_right);

            if update_left {
                left_content.extend(self.patch_pair(old_left, new_left, depth)?);
                left += 1;
            } else if update_right {
                for node in self.patch_pair(old_right, new_right, depth)?.into_iter().rev() {
                    right_content.push_front(node);
                }
                right += 1;
            } else {
                trace!(depth, index = left, "replacing unmatched pair");
                left_content.extend(tag_subtrees(old_left, DiffKind::Deleted));
                left_content.extend(tag_subtrees(new_left, DiffKind::Inserted));
                left += 1;
            }
        }

        for unit in &old[left..old.len() - right] {
            left_content.extend(tag_subtrees(*unit, DiffKind::Deleted));
        }
        for unit in &new[left..new.len() - right] {
            left_content.extend(tag_subtrees(*unit, DiffKind::Inserted));
        }
        left_content.extend(right_content);

        Ok(left_content)
    }

    fn patch_pair(&self, old: Unit<'_>, new: Unit<'_>, depth: usize) -> Result<Vec<Arc<Node>>> {
        match (old, new) {
            (Unit::TextRun(old_run), Unit::TextRun(new_run)) => {
                patch_text_run(old_run, new_run, self.options.granularity)
            }
            (Unit::Node(old_node), Unit::Node(new_node)) => Ok(vec![Arc::new(
                self.patch_node(old_node, new_node, depth + 1)?,
            )]),
            _ => {
                let mut replaced = tag_subtrees(old, DiffKind::Deleted);
                replaced.extend(tag_subtrees(new, DiffKind::Inserted));
                Ok(replaced)
            }
        }
    }
}
