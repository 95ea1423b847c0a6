use super::{Memento, Position, Symbol, SymbolReader};

/// A [SymbolReader] over a prebuilt list of symbols.
///
/// An end-of-stream symbol is appended when the list does not end with one, so
/// slices cut out of a larger stream can be read as a complete stream.
#[derive(Debug, Clone)]
pub struct ArraySymbolReader {
    symbols: Vec<Symbol>,
    cursor: usize,
}

impl ArraySymbolReader {
    pub fn new(mut symbols: Vec<Symbol>) -> ArraySymbolReader {
        match symbols.last() {
            Some(s) if s.is_eof() => {}
            Some(s) => {
                let mut p = s.position;
                p.char_pos += s.text.chars().count();
                symbols.push(Symbol::eof(p));
            }
            None => symbols.push(Symbol::eof(Position::default())),
        }

        ArraySymbolReader { symbols, cursor: 0 }
    }

    pub fn from_slice(symbols: &[Symbol]) -> ArraySymbolReader {
        ArraySymbolReader::new(symbols.to_vec())
    }

    /// The symbols that have not been consumed yet, excluding the end-of-stream symbol.
    pub fn remaining(&self) -> &[Symbol] {
        let end = self.symbols.len() - 1;
        &self.symbols[self.cursor.min(end)..end]
    }

    #[inline]
    fn index(&self) -> usize {
        self.cursor.min(self.symbols.len() - 1)
    }
}

impl SymbolReader for ArraySymbolReader {
    fn peek(&mut self) -> &Symbol {
        &self.symbols[self.index()]
    }

    fn get(&mut self) -> Symbol {
        let s = self.symbols[self.index()].clone();
        self.cursor += 1;
        s
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
