//! Word-aware diffing
//!
//! Both strings are tokenized and every distinct token text is interned to a
//! symbol, so Myers runs over token sequences instead of characters. Changed
//! regions are then handled asymmetrically:
//!
//! - a deleted run directly followed by an inserted run is a *changed pair*
//!   and gets re-diffed character by character (granularity `char`)
//! - a lone deleted or inserted run is an *orphan* and stays one segment at
//!   granularity `word`, so inserting a word never lights up its letters

use crate::artifacts::diff::char_diff::diff_chars;
use crate::artifacts::diff::edit_script::{EditScript, Segment};
use crate::artifacts::diff::myers::{Block, diff_blocks};
use crate::artifacts::diff::tokenizer::{Token, tokenize};
use crate::domain::mark::Granularity;
use std::collections::HashMap;

/// Interns token texts in first-seen order.
#[derive(Debug, Default)]
struct SymbolTable<'s> {
    symbols: HashMap<&'s str, usize>,
    texts: Vec<&'s str>,
}

impl<'s> SymbolTable<'s> {
    fn encode(&mut self, tokens: &[Token<'s>]) -> Vec<usize> {
        let mut encoded = Vec::with_capacity(tokens.len());

        for token in tokens {
            let symbol = match self.symbols.get(token.text) {
                Some(&symbol) => symbol,
                None => {
                    let symbol = self.texts.len();
                    self.texts.push(token.text);
                    self.symbols.insert(token.text, symbol);
                    symbol
                }
            };
            encoded.push(symbol);
        }

        encoded
    }

    fn text(&self, symbol: usize) -> &'s str {
        self.texts[symbol]
    }

    fn decode(&self, symbols: &[usize]) -> String {
        symbols.iter().map(|&symbol| self.text(symbol)).collect()
    }
}

/// Edit script between two strings at mixed word/character granularity.
pub fn diff_words(old: &str, new: &str) -> EditScript {
    let mut script = EditScript::default();

    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    if old_tokens.is_empty() || new_tokens.is_empty() {
        script.push(Segment::deleted(old, Granularity::Word));
        script.push(Segment::inserted(new, Granularity::Word));
        return script;
    }

    let mut table = SymbolTable::default();
    let old_symbols = table.encode(&old_tokens);
    let new_symbols = table.encode(&new_tokens);

    for block in diff_blocks(&old_symbols, &new_symbols) {
        match block {
            Block::Equal(symbols) => {
                for symbol in symbols {
                    script.push(Segment::unchanged(table.text(symbol), Granularity::Word));
                }
            }
            Block::Change { deleted, inserted } if deleted.is_empty() => {
                script.push(Segment::inserted(table.decode(&inserted), Granularity::Word));
            }
            Block::Change { deleted, inserted } if inserted.is_empty() => {
                script.push(Segment::deleted(table.decode(&deleted), Granularity::Word));
            }
            Block::Change { deleted, inserted } => {
                let refined = diff_chars(&table.decode(&deleted), &table.decode(&inserted));
                script.extend(refined.into_iter().map(|segment| {
                    Segment::new(segment.kind, segment.text, Granularity::Char)
                }));
            }
        }
    }

    script
}
