//! Quote and escape tracking
//!
//! Every pass over a query expression (block scanning, comma splitting and
//! brace whitespace normalization) needs to know whether a character is
//! "structural", i.e. outside any quoted region and not escaped. This module
//! holds that state machine so all passes agree on the same rules.

/// Quote state of the character stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteState {
    /// Outside any quoted region
    #[default]
    Normal,
    /// Inside a `'...'` region
    InSingleQuote,
    /// Inside a `"..."` region
    InDoubleQuote,
}

/// Classification of a single character after it was fed to the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Unquoted, unescaped character that may carry syntax (`{`, `}`, `,`)
    Structural,
    /// Quote character that opened or closed a quoted region
    Quote,
    /// Backslash that escapes the next character
    Escape,
    /// Character consumed verbatim (inside quotes or after a backslash)
    Literal,
}

/// Character-at-a-time quote/escape state machine
///
/// A backslash escapes the next character regardless of quote state, and an
/// escaped character never changes the quote state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer {
    state: QuoteState,
    escaped: bool,
}

impl Lexer {
    /// Create a lexer in the `Normal` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current quote state
    pub fn state(&self) -> QuoteState {
        self.state
    }

    /// Whether the next character will be consumed as an escape target
    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    /// Feed one character and classify it
    pub fn feed(&mut self, c: char) -> CharClass {
        if self.escaped {
            self.escaped = false;
            return CharClass::Literal;
        }
        if c == '\\' {
            self.escaped = true;
            return CharClass::Escape;
        }

        match self.state {
            QuoteState::Normal => self.on_normal(c),
            QuoteState::InSingleQuote => self.on_quoted(c, '\''),
            QuoteState::InDoubleQuote => self.on_quoted(c, '"'),
        }
    }

    fn on_normal(&mut self, c: char) -> CharClass {
        match c {
            '\'' => {
                self.state = QuoteState::InSingleQuote;
                CharClass::Quote
            }
            '"' => {
                self.state = QuoteState::InDoubleQuote;
                CharClass::Quote
            }
            _ => CharClass::Structural,
        }
    }

    fn on_quoted(&mut self, c: char, closing: char) -> CharClass {
        if c == closing {
            self.state = QuoteState::Normal;
            CharClass::Quote
        } else {
            CharClass::Literal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(input: &str) -> Vec<CharClass> {
        let mut lexer = Lexer::new();
        input.chars().map(|c| lexer.feed(c)).collect()
    }

    #[test]
    fn test_plain_text_is_structural() {
        assert!(classes("a{b,c}")
            .iter()
            .all(|c| *c == CharClass::Structural));
    }

    #[test]
    fn test_double_quotes_hide_braces() {
        use CharClass::*;
        assert_eq!(
            classes(r#""{,}"x"#),
            vec![Quote, Literal, Literal, Literal, Quote, Structural]
        );
    }

    #[test]
    fn test_single_quote_inside_double_does_not_toggle() {
        let mut lexer = Lexer::new();
        for c in r#""it's"#.chars() {
            lexer.feed(c);
        }
        assert_eq!(lexer.state(), QuoteState::InDoubleQuote);
        lexer.feed('"');
        assert_eq!(lexer.state(), QuoteState::Normal);
    }

    #[test]
    fn test_escaped_quote_keeps_region_open() {
        let mut lexer = Lexer::new();
        for c in r#""a\"b"#.chars() {
            lexer.feed(c);
        }
        assert_eq!(lexer.state(), QuoteState::InDoubleQuote);
        assert!(!lexer.is_escaped());
    }

    #[test]
    fn test_escape_outside_quotes() {
        use CharClass::*;
        assert_eq!(classes(r"\{{"), vec![Escape, Literal, Structural]);
    }

    #[test]
    fn test_double_backslash_does_not_escape_quote() {
        let mut lexer = Lexer::new();
        for c in r#""a\\""#.chars() {
            lexer.feed(c);
        }
        assert_eq!(lexer.state(), QuoteState::Normal);
    }
}
