use crate::artifacts::diff::edit_script::{EditScript, Segment};
use crate::artifacts::diff::myers::{Block, diff_blocks};
use crate::domain::mark::Granularity;

/// Minimal character-level edit script between two strings.
///
/// Every changed region comes out as a deleted segment immediately followed
/// by an inserted one (either may be absent). Output is deterministic.
pub fn diff_chars(old: &str, new: &str) -> EditScript {
    let mut script = EditScript::default();

    if old == new {
        script.push(Segment::unchanged(old, Granularity::Char));
        return script;
    }

    let old_chars = old.chars().collect::<Vec<_>>();
    let new_chars = new.chars().collect::<Vec<_>>();

    for block in diff_blocks(&old_chars, &new_chars) {
        match block {
            Block::Equal(chars) => {
                script.push(Segment::unchanged(String::from_iter(chars), Granularity::Char));
            }
            Block::Change { deleted, inserted } => {
                script.push(Segment::deleted(String::from_iter(deleted), Granularity::Char));
                script.push(Segment::inserted(String::from_iter(inserted), Granularity::Char));
            }
        }
    }

    script
}
