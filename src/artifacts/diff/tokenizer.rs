use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::LazyLock;

/// Word characters are letters (with their combining marks), digits and `_`.
/// The three alternatives partition every possible character.
pub const TOKEN_REGEX: &str =
    r"(?P<word>[\p{L}\p{M}\p{N}_]+)|(?P<space>\s+)|(?P<punct>[^\p{L}\p{M}\p{N}_\s]+)";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_REGEX).expect("token pattern is a valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Word,
    Whitespace,
    Punctuation,
}

impl From<&TokenClass> for &str {
    fn from(class: &TokenClass) -> Self {
        match class {
            TokenClass::Word => "word",
            TokenClass::Whitespace => "space",
            TokenClass::Punctuation => "punct",
        }
    }
}

/// A maximal single-class run of the input, with its byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'s> {
    pub text: &'s str,
    pub start: usize,
    pub end: usize,
    pub class: TokenClass,
}

impl Token<'_> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `s` into word, whitespace and punctuation runs.
///
/// The tokens cover `s` exactly and in order; an empty string has no tokens.
pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    TOKEN_PATTERN
        .captures_iter(s)
        .filter_map(|captures| {
            let (class, found) = if let Some(found) = captures.name("word") {
                (TokenClass::Word, found)
            } else if let Some(found) = captures.name("space") {
                (TokenClass::Whitespace, found)
            } else {
                (TokenClass::Punctuation, captures.name("punct")?)
            };

            Some(Token {
                text: found.as_str(),
                start: found.start(),
                end: found.end(),
                class,
            })
        })
        .collect()
}
