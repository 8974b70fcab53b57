use crate::domain::node::Attrs;
use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

/// Mark type reserved for diff tags. Input documents never carry it.
pub const DIFF_MARK_TYPE: &str = "diffMark";

const KIND_ATTR: &str = "kind";
const GRANULARITY_ATTR: &str = "granularity";

/// A style annotation attached to a text leaf (bold, link, ...).
///
/// Marks on one leaf form an ordered list; two leaves carry the same marks
/// only if type and attributes match pairwise, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[new(default)]
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn is_diff_tag(&self) -> bool {
        self.mark_type == DIFF_MARK_TYPE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Inserted,
    Deleted,
}

impl From<&DiffKind> for &str {
    fn from(kind: &DiffKind) -> Self {
        match kind {
            DiffKind::Inserted => "inserted",
            DiffKind::Deleted => "deleted",
        }
    }
}

impl Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind: &str = self.into();
        write!(f, "{kind}")
    }
}

impl FromStr for DiffKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inserted" => Ok(DiffKind::Inserted),
            "deleted" => Ok(DiffKind::Deleted),
            _ => anyhow::bail!("invalid diff kind: {s}"),
        }
    }
}

/// Resolution at which a changed span is reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Word,
    #[default]
    Char,
}

impl From<&Granularity> for &str {
    fn from(granularity: &Granularity) -> Self {
        match granularity {
            Granularity::Word => "word",
            Granularity::Char => "char",
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let granularity: &str = self.into();
        write!(f, "{granularity}")
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Granularity::Word),
            "char" => Ok(Granularity::Char),
            _ => anyhow::bail!("invalid granularity: {s} (expected 'char' or 'word')"),
        }
    }
}

/// The synthetic mark recording that a text leaf was inserted or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct DiffTag {
    pub kind: DiffKind,
    pub granularity: Granularity,
}

impl DiffTag {
    pub fn to_mark(self) -> Mark {
        Mark::new(DIFF_MARK_TYPE.to_string())
            .with_attr(KIND_ATTR, self.kind.to_string())
            .with_attr(GRANULARITY_ATTR, self.granularity.to_string())
    }

    /// Reads a diff tag back out of a mark; `None` for ordinary marks.
    pub fn from_mark(mark: &Mark) -> Option<Self> {
        if !mark.is_diff_tag() {
            return None;
        }

        let kind = mark.attrs.get(KIND_ATTR)?.as_str()?.parse().ok()?;
        let granularity = mark.attrs.get(GRANULARITY_ATTR)?.as_str()?.parse().ok()?;

        Some(DiffTag { kind, granularity })
    }
}

impl From<DiffTag> for Mark {
    fn from(tag: DiffTag) -> Self {
        tag.to_mark()
    }
}
