//! Expression scanner
//!
//! Walks a query expression one character at a time, captures top-level
//! `{...}` label blocks with quote- and depth-aware brace matching, and hands
//! each flat block to [`clean_block`]. Literal text between blocks is copied
//! through untouched.

use super::lexer::{CharClass, Lexer};
use super::rebuild::clean_block;

/// Scanner position relative to label blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any block
    Text,
    /// Inside a block opened at byte offset `start`
    Block {
        start: usize,
        depth: usize,
        nested: bool,
    },
}

/// Single-use scanner over one expression
#[derive(Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    output: String,
    state: ScanState,
    /// Quote state between blocks
    text_lexer: Lexer,
    /// Quote state inside the current block
    block_lexer: Lexer,
    /// Start of literal input not yet copied to `output`
    pending: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            output: String::with_capacity(input.len()),
            state: ScanState::Text,
            text_lexer: Lexer::new(),
            block_lexer: Lexer::new(),
            pending: 0,
        }
    }

    /// Consume the scanner and return the cleaned expression
    pub fn run(mut self) -> String {
        let input = self.input;
        for (i, c) in input.char_indices() {
            let state = self.state;
            self.state = match state {
                ScanState::Text => self.on_text(i, c),
                ScanState::Block {
                    start,
                    depth,
                    nested,
                } => self.on_block(i, c, start, depth, nested),
            };
        }

        if let ScanState::Block { start, .. } = self.state {
            tracing::debug!(
                offset = start,
                "Unterminated label block, copying tail verbatim"
            );
        }
        self.output.push_str(&self.input[self.pending..]);

        normalize_brace_whitespace(&self.output)
    }

    fn on_text(&mut self, i: usize, c: char) -> ScanState {
        if self.text_lexer.feed(c) == CharClass::Structural && c == '{' {
            self.output.push_str(&self.input[self.pending..i]);
            self.pending = i;
            self.block_lexer = Lexer::new();
            return ScanState::Block {
                start: i,
                depth: 1,
                nested: false,
            };
        }
        ScanState::Text
    }

    fn on_block(
        &mut self,
        i: usize,
        c: char,
        start: usize,
        depth: usize,
        nested: bool,
    ) -> ScanState {
        if self.block_lexer.feed(c) != CharClass::Structural {
            return ScanState::Block {
                start,
                depth,
                nested,
            };
        }

        match c {
            '{' => ScanState::Block {
                start,
                depth: depth + 1,
                nested: true,
            },
            '}' if depth > 1 => ScanState::Block {
                start,
                depth: depth - 1,
                nested,
            },
            '}' => {
                self.close_block(start, i, nested);
                ScanState::Text
            }
            _ => ScanState::Block {
                start,
                depth,
                nested,
            },
        }
    }

    /// Emit the block spanning `start..=end` (both braces included)
    fn close_block(&mut self, start: usize, end: usize, nested: bool) {
        if nested {
            tracing::trace!(
                block = &self.input[start..=end],
                "Nested label block left unchanged"
            );
            self.output.push_str(&self.input[start..=end]);
        } else {
            let interior = &self.input[start + 1..end];
            self.output.push_str(clean_block(interior).as_str());
        }
        self.pending = end + 1;
    }
}

/// Drop spaces directly after an opening brace and directly before a closing
/// brace, leaving quoted text alone
pub fn normalize_brace_whitespace(s: &str) -> String {
    let mut lexer = Lexer::new();
    let mut out = String::with_capacity(s.len());
    let mut held_spaces = 0usize;
    let mut after_open = false;

    for c in s.chars() {
        let structural = lexer.feed(c) == CharClass::Structural;

        if structural && c == ' ' {
            if !after_open {
                held_spaces += 1;
            }
            continue;
        }

        if !(structural && c == '}') {
            out.extend(std::iter::repeat(' ').take(held_spaces));
        }
        held_spaces = 0;
        after_open = structural && c == '{';
        out.push(c);
    }
    out.extend(std::iter::repeat(' ').take(held_spaces));

    out
}
