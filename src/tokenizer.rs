//! Turn text into a stream of typed symbols.
//!
//! A [Symbol] is a category [Tag] together with the literal text it covers. Tags are
//! open strings rather than a fixed enum, so that callers can register their own
//! lexical classes. The [tags] module lists the vocabulary used by the standard
//! readers.
//!
//! Symbols are consumed through the [SymbolReader] trait, which is implemented by a
//! live character tokenizer ([CharSymbolReader]) and by a reader over a prebuilt
//! symbol array ([ArraySymbolReader]). Every stream ends with an end-of-stream
//! symbol tagged [tags::EOF], which is returned again on every further read.

pub mod array_reader;
pub mod char_reader;

use std::fmt::{self, Display, Formatter};

use smartstring::{LazyCompact, SmartString};

pub use array_reader::ArraySymbolReader;
pub use char_reader::{CharClassifier, CharSymbolReader};

/// The category of a symbol.
pub type Tag = SmartString<LazyCompact>;

/// The tags recognized by the standard character table and the standard readers.
pub mod tags {
    pub const PLUS: &str = "plus";
    pub const MINUS: &str = "minus";
    pub const TIMES: &str = "times";
    pub const OVER: &str = "over";
    pub const HAT: &str = "hat";
    pub const MOD: &str = "mod";
    pub const LEFT_PARENTHESIS: &str = "left_parenthesis";
    pub const RIGHT_PARENTHESIS: &str = "right_parenthesis";
    pub const LEFT_BRACKET: &str = "left_bracket";
    pub const RIGHT_BRACKET: &str = "right_bracket";
    pub const LEFT_BRACE: &str = "left_brace";
    pub const RIGHT_BRACE: &str = "right_brace";
    pub const COMMA: &str = "comma";
    pub const SEMICOLON: &str = "semicolon";
    pub const POINT: &str = "point";
    pub const EQUAL: &str = "equal";
    pub const LESS_THAN: &str = "less_than";
    pub const GREATER_THAN: &str = "greater_than";
    pub const SPACE: &str = "space";
    pub const BLANCKS: &str = "blancks";
    pub const CARRIAGE_RETURN: &str = "carriage_return";
    pub const NEW_LINE: &str = "new_line";
    /// Fallback category for alphabetic characters and `_`.
    pub const ALPHA: &str = "alpha";
    /// Fallback category for decimal digits.
    pub const DIGIT: &str = "digit";
    /// Fallback category for everything else.
    pub const ANY: &str = "any";
    /// The end-of-stream marker.
    pub const EOF: &str = "eof";

    /// Tags that the standard readers skip.
    pub const WHITESPACE: [&str; 4] = [BLANCKS, SPACE, CARRIAGE_RETURN, NEW_LINE];
}

/// A position in the input text. Lines and columns start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line_number: usize,
    pub char_pos: usize,
}

impl Position {
    pub const fn new(line_number: usize, char_pos: usize) -> Position {
        Position {
            line_number,
            char_pos,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line_number, self.char_pos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub kind: Tag,
    pub text: SmartString<LazyCompact>,
    pub position: Position,
}

impl Symbol {
    pub fn new(kind: &str, text: &str, position: Position) -> Symbol {
        Symbol {
            kind: kind.into(),
            text: text.into(),
            position,
        }
    }

    pub fn eof(position: Position) -> Symbol {
        Symbol::new(tags::EOF, "", position)
    }

    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.kind == tag
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.is(tags::EOF)
    }

    /// The text of the symbol, or a readable name for the end of the stream.
    pub fn describe(&self) -> String {
        if self.is_eof() {
            "end of input".to_owned()
        } else {
            self.text.to_string()
        }
    }
}

/// The concatenated text of a run of symbols.
pub fn join_text(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.text.as_str()).collect()
}

/// A saved reading position of a [SymbolReader].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memento {
    cursor: usize,
}

/// A source of symbols with arbitrary pushback.
///
/// Reading past the end keeps returning the end-of-stream symbol.
pub trait SymbolReader {
    /// Look at the next symbol without consuming it.
    fn peek(&mut self) -> &Symbol;
    /// Consume the next symbol.
    fn get(&mut self) -> Symbol;
    /// Step back over the last consumed symbol.
    fn unget(&mut self);
    /// Save the current position, to [restore](SymbolReader::restore) it later.
    fn save(&self) -> Memento;
    fn restore(&mut self, memento: Memento);

    fn is_at_eof(&mut self) -> bool {
        self.peek().is_eof()
    }
}

/// Tokenize `text` with the standard character table, grouping runs of the same
/// category. The result ends with an end-of-stream symbol.
pub fn tokenize(text: &str) -> Vec<Symbol> {
    let mut reader = CharSymbolReader::grouped(text, CharClassifier::standard());
    let mut symbols = vec![];
    loop {
        let s = reader.get();
        let eof = s.is_eof();
        symbols.push(s);
        if eof {
            return symbols;
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{join_text, tags, tokenize, Position, Symbol};

    #[test]
    fn standard_tokens() {
        let s = tokenize("x1 +(23)\n^y");
        let kinds: Vec<_> = s.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                tags::ALPHA,
                tags::DIGIT,
                tags::SPACE,
                tags::PLUS,
                tags::LEFT_PARENTHESIS,
                tags::DIGIT,
                tags::RIGHT_PARENTHESIS,
                tags::NEW_LINE,
                tags::HAT,
                tags::ALPHA,
                tags::EOF
            ]
        );
        assert_eq!(s[5].text, "23");
        assert_eq!(s[9].position, Position::new(2, 2));
        assert_eq!(join_text(&s), "x1 +(23)\n^y");
    }

    #[test]
    fn eof_description() {
        let e = Symbol::eof(Position::default());
        assert!(e.is_eof());
        assert_eq!(e.describe(), "end of input");
    }
}
