use crate::domain::mark::{DiffKind, DiffTag, Granularity};
use bitflags::bitflags;
use derive_new::new;
use serde::Serialize;
use std::ops::Deref;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiffFilter: u32 {
        const UNCHANGED = 0b0001;
        const DELETED = 0b0010;
        const INSERTED = 0b0100;
    }
}

impl DiffFilter {
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'U' => filter |= Self::UNCHANGED,
                'D' => filter |= Self::DELETED,
                'I' => filter |= Self::INSERTED,
                _ => return None,
            }
        }

        Some(filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Deleted,
    Inserted,
}

impl SegmentKind {
    pub fn diff_kind(&self) -> Option<DiffKind> {
        match self {
            SegmentKind::Unchanged => None,
            SegmentKind::Deleted => Some(DiffKind::Deleted),
            SegmentKind::Inserted => Some(DiffKind::Inserted),
        }
    }

    pub fn sign(&self) -> char {
        match self {
            SegmentKind::Unchanged => ' ',
            SegmentKind::Deleted => '-',
            SegmentKind::Inserted => '+',
        }
    }

    pub fn matches_filter(&self, filter: DiffFilter) -> bool {
        match self {
            SegmentKind::Unchanged => filter.contains(DiffFilter::UNCHANGED),
            SegmentKind::Deleted => filter.contains(DiffFilter::DELETED),
            SegmentKind::Inserted => filter.contains(DiffFilter::INSERTED),
        }
    }

    fn in_old(&self) -> bool {
        !matches!(self, SegmentKind::Inserted)
    }

    fn in_new(&self) -> bool {
        !matches!(self, SegmentKind::Deleted)
    }
}

/// One span of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
    pub granularity: Granularity,
}

impl Segment {
    pub fn unchanged(text: impl Into<String>, granularity: Granularity) -> Self {
        Segment::new(SegmentKind::Unchanged, text.into(), granularity)
    }

    pub fn deleted(text: impl Into<String>, granularity: Granularity) -> Self {
        Segment::new(SegmentKind::Deleted, text.into(), granularity)
    }

    pub fn inserted(text: impl Into<String>, granularity: Granularity) -> Self {
        Segment::new(SegmentKind::Inserted, text.into(), granularity)
    }

    /// The tag a text leaf built from this segment carries, if any.
    pub fn diff_tag(&self) -> Option<DiffTag> {
        self.kind
            .diff_kind()
            .map(|kind| DiffTag::new(kind, self.granularity))
    }
}

/// Ordered segments relating an old and a new string.
///
/// Deleted plus unchanged segments spell the old string; unchanged plus
/// inserted segments spell the new one. No segment is empty and no two
/// neighbours share both kind and granularity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditScript {
    segments: Vec<Segment>,
}

impl EditScript {
    /// Appends a segment, folding it into the previous one when kind and
    /// granularity match. Empty segments are dropped.
    pub fn push(&mut self, segment: Segment) {
        if segment.text.is_empty() {
            return;
        }

        if let Some(last) = self.segments.last_mut()
            && last.kind == segment.kind
            && last.granularity == segment.granularity
        {
            last.text.push_str(&segment.text);
            return;
        }

        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn old_text(&self) -> String {
        self.segments
            .iter()
            .filter(|segment| segment.kind.in_old())
            .map(|segment| segment.text.as_str())
            .collect()
    }

    pub fn new_text(&self) -> String {
        self.segments
            .iter()
            .filter(|segment| segment.kind.in_new())
            .map(|segment| segment.text.as_str())
            .collect()
    }

    pub fn is_unchanged(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| segment.kind == SegmentKind::Unchanged)
    }

    /// Number of deleted plus inserted characters.
    pub fn distance(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| segment.kind != SegmentKind::Unchanged)
            .map(|segment| segment.text.chars().count())
            .sum()
    }

    pub fn filtered(&self, filter: DiffFilter) -> impl Iterator<Item = &Segment> {
        self.segments
            .iter()
            .filter(move |segment| segment.kind.matches_filter(filter))
    }
}

impl Deref for EditScript {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.segments
    }
}

impl FromIterator<Segment> for EditScript {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut script = EditScript::default();
        for segment in iter {
            script.push(segment);
        }

        script
    }
}

impl Extend<Segment> for EditScript {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        for segment in iter {
            self.push(segment);
        }
    }
}

impl IntoIterator for EditScript {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn push_merges_matching_neighbours() {
        let script: EditScript = [
            Segment::unchanged("he", Granularity::Word),
            Segment::unchanged("llo", Granularity::Word),
            Segment::unchanged("", Granularity::Char),
            Segment::unchanged("!", Granularity::Char),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            script.segments(),
            &[
                Segment::unchanged("hello", Granularity::Word),
                Segment::unchanged("!", Granularity::Char),
            ]
        );
    }

    #[test]
    fn reconstructs_both_sides() {
        let script: EditScript = [
            Segment::unchanged("JSON", Granularity::Char),
            Segment::deleted("5", Granularity::Char),
            Segment::inserted("6", Granularity::Char),
        ]
        .into_iter()
        .collect();

        assert_eq!(script.old_text(), "JSON5");
        assert_eq!(script.new_text(), "JSON6");
        assert_eq!(script.distance(), 2);
        assert!(!script.is_unchanged());
    }

    #[rstest]
    #[case("U", DiffFilter::UNCHANGED)]
    #[case("DI", DiffFilter::DELETED | DiffFilter::INSERTED)]
    #[case("", DiffFilter::empty())]
    fn diff_filter_parses(#[case] input: &str, #[case] expected: DiffFilter) {
        assert_eq!(DiffFilter::try_parse(input), Some(expected));
    }

    #[test]
    fn diff_filter_rejects_unknown_letters() {
        assert_eq!(DiffFilter::try_parse("AM"), None);
    }

    #[test]
    fn filtered_keeps_selected_kinds() {
        let script: EditScript = [
            Segment::unchanged("a", Granularity::Word),
            Segment::deleted("b", Granularity::Word),
            Segment::inserted("c", Granularity::Word),
        ]
        .into_iter()
        .collect();

        let kept = script
            .filtered(DiffFilter::INSERTED)
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>();

        assert_eq!(kept, vec!["c"]);
    }
}
