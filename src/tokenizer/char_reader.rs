use std::str::Chars;

use ahash::AHashMap;

use super::{tags, Memento, Position, Symbol, SymbolReader, Tag};

/// Maps characters that have no explicit registration to a category.
pub type Decider = fn(char) -> &'static str;

/// The default [Decider]: alphabetic characters and `_` are [tags::ALPHA],
/// decimal digits are [tags::DIGIT] and anything else is [tags::ANY].
pub fn default_decider(c: char) -> &'static str {
    if c.is_alphabetic() || c == '_' {
        tags::ALPHA
    } else if c.is_ascii_digit() {
        tags::DIGIT
    } else {
        tags::ANY
    }
}

/// Assigns a category to every character, and bounds how many characters of
/// one category may be merged into a single symbol.
#[derive(Debug, Clone)]
pub struct CharClassifier {
    table: AHashMap<char, Tag>,
    decider: Decider,
    group_limits: AHashMap<Tag, usize>,
}

impl CharClassifier {
    /// A classifier without registrations that sends every character to `decider`.
    pub fn new(decider: Decider) -> CharClassifier {
        CharClassifier {
            table: AHashMap::new(),
            decider,
            group_limits: AHashMap::new(),
        }
    }

    /// The standard table for arithmetic text. Punctuation is never grouped,
    /// so `((` yields two symbols, while identifiers, numbers and whitespace are.
    pub fn standard() -> CharClassifier {
        let mut c = CharClassifier::new(default_decider);
        for (ch, tag) in [
            ('(', tags::LEFT_PARENTHESIS),
            (')', tags::RIGHT_PARENTHESIS),
            ('[', tags::LEFT_BRACKET),
            (']', tags::RIGHT_BRACKET),
            ('{', tags::LEFT_BRACE),
            ('}', tags::RIGHT_BRACE),
            ('+', tags::PLUS),
            ('-', tags::MINUS),
            ('*', tags::TIMES),
            ('/', tags::OVER),
            ('^', tags::HAT),
            ('%', tags::MOD),
            (',', tags::COMMA),
            (';', tags::SEMICOLON),
            ('.', tags::POINT),
            ('=', tags::EQUAL),
            ('<', tags::LESS_THAN),
            ('>', tags::GREATER_THAN),
        ] {
            c.register(ch, tag);
            c.set_group_limit(tag, 1);
        }

        c.register(' ', tags::SPACE);
        c.register('\t', tags::BLANCKS);
        c.register('\r', tags::CARRIAGE_RETURN);
        c.register('\n', tags::NEW_LINE);
        c
    }

    pub fn register(&mut self, c: char, tag: &str) {
        self.table.insert(c, tag.into());
    }

    /// Merge at most `limit` consecutive characters of category `tag`.
    pub fn set_group_limit(&mut self, tag: &str, limit: usize) {
        self.group_limits.insert(tag.into(), limit.max(1));
    }

    pub fn classify(&self, c: char) -> Tag {
        match self.table.get(&c) {
            Some(t) => t.clone(),
            None => (self.decider)(c).into(),
        }
    }

    pub fn group_limit(&self, tag: &str) -> Option<usize> {
        self.group_limits.get(tag).copied()
    }
}

impl Default for CharClassifier {
    fn default() -> Self {
        CharClassifier::standard()
    }
}

/// A live tokenizer over a string.
///
/// Symbols are produced on demand and buffered, so that any number of them can be
/// stepped back over with [unget](SymbolReader::unget) or a [Memento].
pub struct CharSymbolReader<'a> {
    chars: Chars<'a>,
    pending: Option<char>,
    classifier: CharClassifier,
    grouped: bool,
    position: Position,
    buffer: Vec<Symbol>,
    cursor: usize,
    finished: bool,
}

impl<'a> CharSymbolReader<'a> {
    /// A reader that produces one symbol per character.
    pub fn new(text: &'a str, classifier: CharClassifier) -> CharSymbolReader<'a> {
        CharSymbolReader {
            chars: text.chars(),
            pending: None,
            classifier,
            grouped: false,
            position: Position::default(),
            buffer: vec![],
            cursor: 0,
            finished: false,
        }
    }

    /// A reader that merges runs of characters of the same category into one symbol,
    /// up to the group limit of the category.
    pub fn grouped(text: &'a str, classifier: CharClassifier) -> CharSymbolReader<'a> {
        CharSymbolReader {
            grouped: true,
            ..CharSymbolReader::new(text, classifier)
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.pending.take().or_else(|| self.chars.next())
    }

    fn advance_position(&mut self, c: char) {
        if c == '\n' {
            self.position.line_number += 1;
            self.position.char_pos = 1;
        } else {
            self.position.char_pos += 1;
        }
    }

    fn produce(&mut self) -> Symbol {
        let Some(c) = self.next_char() else {
            self.finished = true;
            return Symbol::eof(self.position);
        };

        let start = self.position;
        let kind = self.classifier.classify(c);
        let mut text = String::new();
        text.push(c);
        self.advance_position(c);

        if self.grouped {
            let limit = self.classifier.group_limit(&kind).unwrap_or(usize::MAX);
            let mut count = 1;
            while count < limit {
                match self.next_char() {
                    Some(n) if self.classifier.classify(n) == kind => {
                        text.push(n);
                        self.advance_position(n);
                        count += 1;
                    }
                    Some(n) => {
                        self.pending = Some(n);
                        break;
                    }
                    None => break,
                }
            }
        }

        Symbol::new(&kind, &text, start)
    }

    /// Make sure the buffer holds the symbol at the cursor, or ends with the
    /// end-of-stream symbol.
    fn fill(&mut self) -> usize {
        while self.buffer.len() <= self.cursor && !self.finished {
            let s = self.produce();
            self.buffer.push(s);
        }
        self.cursor.min(self.buffer.len() - 1)
    }
}

impl<'a> SymbolReader for CharSymbolReader<'a> {
    fn peek(&mut self) -> &Symbol {
        let i = self.fill();
        &self.buffer[i]
    }

    fn get(&mut self) -> Symbol {
        let i = self.fill();
        self.cursor += 1;
        self.buffer[i].clone()
    }

    fn unget(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn save(&self) -> Memento {
        Memento {
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, memento: Memento) {
        self.cursor = memento.cursor;
    }
}

#[cfg(test)]
mod test {
    use crate::tokenizer::{tags, SymbolReader};

    use super::{CharClassifier, CharSymbolReader};

    #[test]
    fn single_characters() {
        let mut r = CharSymbolReader::new("ab+1", CharClassifier::standard());
        assert_eq!(r.get().text, "a");
        assert_eq!(r.get().text, "b");
        assert!(r.peek().is(tags::PLUS));
        r.get();
        assert!(r.get().is(tags::DIGIT));
        assert!(r.is_at_eof());
        assert!(r.get().is_eof());
        assert!(r.get().is_eof());
    }

    #[test]
    fn group_limits() {
        let mut r = CharSymbolReader::grouped("((  abc))", CharClassifier::standard());
        assert_eq!(r.get().text, "(");
        assert_eq!(r.get().text, "(");
        assert_eq!(r.get().text, "  ");
        assert_eq!(r.get().text, "abc");

        let mut c = CharClassifier::standard();
        c.set_group_limit(tags::ALPHA, 2);
        let mut r = CharSymbolReader::grouped("abcde", c);
        assert_eq!(r.get().text, "ab");
        assert_eq!(r.get().text, "cd");
        assert_eq!(r.get().text, "e");
    }

    #[test]
    fn custom_decider() {
        fn letters_only(c: char) -> &'static str {
            if c.is_alphabetic() {
                "letter"
            } else {
                "other"
            }
        }

        let mut c = CharClassifier::new(letters_only);
        c.register('#', "hash");
        let mut r = CharSymbolReader::grouped("ab#12", c);
        assert!(r.get().is("letter"));
        assert!(r.get().is("hash"));
        let s = r.get();
        assert!(s.is("other"));
        assert_eq!(s.text, "12");
    }

    #[test]
    fn memento() {
        let mut r = CharSymbolReader::grouped("12 + 34", CharClassifier::standard());
        r.get();
        let m = r.save();
        r.get();
        r.get();
        assert_eq!(r.peek().text, " ");
        r.restore(m);
        assert_eq!(r.get().text, " ");
        r.unget();
        r.unget();
        assert_eq!(r.get().text, "12");
    }
}
