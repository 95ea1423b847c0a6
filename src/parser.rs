//! The operator-precedence expression reader.
//!
//! An [ExpressionReaderBuilder] collects operators, delimiters and ignorable tags
//! together with the algebraic functions they stand for. [build](ExpressionReaderBuilder::build)
//! turns it into an immutable [ExpressionReader] that parses symbol streams by
//! precedence climbing. The reader does no arithmetic of its own: every value is
//! produced by the leaf parser or by a registered function.
//!
//! ```
//! use ringparse::{
//!     domains::{integer::Z, Ring},
//!     leaf::IntegerLiteral,
//!     parser::{Associativity, ExpressionReaderBuilder},
//!     tokenizer::tags,
//! };
//!
//! let reader = ExpressionReaderBuilder::new(IntegerLiteral::new(Z))
//!     .register_binary_operator(tags::PLUS, |a, b| Ok(Z.add(&a, &b)), 0, Associativity::Left)
//!     .unwrap()
//!     .register_binary_operator(tags::TIMES, |a, b| Ok(Z.mul(&a, &b)), 1, Associativity::Left)
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(reader.try_parse_str("2+3*4").unwrap(), 14);
//! ```

use std::{fmt, sync::Arc};

use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;
use tracing::{debug, instrument, trace};

use crate::{
    error::{ConfigError, DomainError, ParseError, ParseLog, SyntaxError, SyntaxErrorKind, Arity},
    leaf::LeafParser,
    tokenizer::{tokenize, ArraySymbolReader, Symbol, SymbolReader, Tag},
};

/// The function bound to a binary operator.
pub type BinaryFunction<T> = Arc<dyn Fn(T, T) -> Result<T, DomainError> + Send + Sync>;
/// The function bound to a unary operator or to a delimiter pair.
pub type UnaryFunction<T> = Arc<dyn Fn(T) -> Result<T, DomainError> + Send + Sync>;

/// The nesting depth used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

struct BinaryOperator<T> {
    apply: BinaryFunction<T>,
    precedence: u32,
    associativity: Associativity,
}

struct UnaryOperator<T> {
    apply: UnaryFunction<T>,
    precedence: u32,
}

struct Grouping<T> {
    close: SmallVec<[Tag; 2]>,
    apply: Option<UnaryFunction<T>>,
}

type CloseTags = SmallVec<[Tag; 2]>;

const BINARY: &str = "binary operator";
const UNARY: &str = "unary operator";
const EXPRESSION: &str = "expression delimiter";
const SEQUENCE: &str = "sequence delimiter";
const EXTERNAL: &str = "external delimiter";
const CLOSE: &str = "closing delimiter";
const IGNORABLE: &str = "ignorable tag";

struct Tables<T> {
    binary: AHashMap<Tag, BinaryOperator<T>>,
    unary: AHashMap<Tag, UnaryOperator<T>>,
    expression: AHashMap<Tag, Grouping<T>>,
    sequence: AHashMap<Tag, CloseTags>,
    external: AHashMap<Tag, CloseTags>,
    closing: AHashSet<Tag>,
    ignorable: AHashSet<Tag>,
    max_depth: usize,
}

impl<T> Tables<T> {
    fn new() -> Tables<T> {
        Tables {
            binary: AHashMap::new(),
            unary: AHashMap::new(),
            expression: AHashMap::new(),
            sequence: AHashMap::new(),
            external: AHashMap::new(),
            closing: AHashSet::new(),
            ignorable: AHashSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    fn roles(&self, tag: &str) -> SmallVec<[&'static str; 4]> {
        let mut roles = SmallVec::new();
        if self.binary.contains_key(tag) {
            roles.push(BINARY);
        }
        if self.unary.contains_key(tag) {
            roles.push(UNARY);
        }
        if self.expression.contains_key(tag) {
            roles.push(EXPRESSION);
        }
        if self.sequence.contains_key(tag) {
            roles.push(SEQUENCE);
        }
        if self.external.contains_key(tag) {
            roles.push(EXTERNAL);
        }
        if self.closing.contains(tag) {
            roles.push(CLOSE);
        }
        if self.ignorable.contains(tag) {
            roles.push(IGNORABLE);
        }
        roles
    }

    /// Check that `tag` has no role other than the `allowed` ones.
    fn check_roles(&self, tag: &str, allowed: &[&'static str]) -> Result<(), ConfigError> {
        if tag.is_empty() {
            return Err(ConfigError::EmptyTag);
        }

        match self.roles(tag).into_iter().find(|r| !allowed.contains(r)) {
            Some(existing) => Err(ConfigError::TagConflict {
                tag: tag.into(),
                existing,
            }),
            None => Ok(()),
        }
    }

    fn check_delimiters(&self, open: &str, close: &str, open_roles: &[&'static str]) -> Result<(), ConfigError> {
        self.check_roles(open, open_roles)?;
        self.check_roles(close, &[CLOSE])?;
        if open == close {
            return Err(ConfigError::TagConflict {
                tag: close.into(),
                existing: open_roles[0],
            });
        }
        Ok(())
    }

    fn is_delimiter(&self, tag: &str) -> bool {
        self.expression.contains_key(tag)
            || self.sequence.contains_key(tag)
            || self.external.contains_key(tag)
            || self.closing.contains(tag)
    }
}

/// Collects the configuration of an [ExpressionReader].
///
/// Every method validates its input and returns a [ConfigError] on conflicts, so a
/// reader that was built successfully is consistent.
pub struct ExpressionReaderBuilder<T, L> {
    tables: Tables<T>,
    leaf: L,
}

impl<T, L: LeafParser<T>> ExpressionReaderBuilder<T, L> {
    pub fn new(leaf: L) -> ExpressionReaderBuilder<T, L> {
        ExpressionReaderBuilder {
            tables: Tables::new(),
            leaf,
        }
    }

    /// Register a prefix operator. Its operand is parsed with a precedence above
    /// `precedence`, so a unary minus at precedence 0 negates `2^2` as a whole in `-2^2`.
    pub fn register_unary_operator<F>(
        mut self,
        tag: &str,
        f: F,
        precedence: u32,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(T) -> Result<T, DomainError> + Send + Sync + 'static,
    {
        if self.tables.unary.contains_key(tag) {
            return Err(ConfigError::DuplicateOperator {
                tag: tag.into(),
                arity: Arity::Unary,
            });
        }
        self.tables.check_roles(tag, &[BINARY])?;
        if precedence == u32::MAX {
            return Err(ConfigError::InvalidPrecedence(precedence));
        }

        trace!("unary operator {} with precedence {}", tag, precedence);
        self.tables.unary.insert(
            tag.into(),
            UnaryOperator {
                apply: Arc::new(f),
                precedence,
            },
        );
        Ok(self)
    }

    /// Register an infix operator. Higher precedences bind stronger.
    pub fn register_binary_operator<F>(
        mut self,
        tag: &str,
        f: F,
        precedence: u32,
        associativity: Associativity,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(T, T) -> Result<T, DomainError> + Send + Sync + 'static,
    {
        if self.tables.binary.contains_key(tag) {
            return Err(ConfigError::DuplicateOperator {
                tag: tag.into(),
                arity: Arity::Binary,
            });
        }
        self.tables.check_roles(tag, &[UNARY])?;
        if precedence == u32::MAX {
            return Err(ConfigError::InvalidPrecedence(precedence));
        }

        trace!(
            "binary operator {} with precedence {} ({:?})",
            tag,
            precedence,
            associativity
        );
        self.tables.binary.insert(
            tag.into(),
            BinaryOperator {
                apply: Arc::new(f),
                precedence,
                associativity,
            },
        );
        Ok(self)
    }

    /// Register a pair of delimiters that group a sub-expression, like parentheses.
    /// An open tag may be registered with several close tags.
    pub fn register_expression_delimiters(self, open: &str, close: &str) -> Result<Self, ConfigError> {
        self.add_expression_delimiters(open, close, None)
    }

    /// Register grouping delimiters whose value is passed through `f`, for example
    /// to read `|a|` as an absolute value.
    pub fn register_expression_delimiters_with<F>(
        self,
        open: &str,
        close: &str,
        f: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(T) -> Result<T, DomainError> + Send + Sync + 'static,
    {
        self.add_expression_delimiters(open, close, Some(Arc::new(f)))
    }

    fn add_expression_delimiters(
        mut self,
        open: &str,
        close: &str,
        apply: Option<UnaryFunction<T>>,
    ) -> Result<Self, ConfigError> {
        self.tables.check_delimiters(open, close, &[EXPRESSION, SEQUENCE])?;

        trace!("expression delimiters {} {}", open, close);
        let g = self.tables.expression.entry(open.into()).or_insert(Grouping {
            close: SmallVec::new(),
            apply: None,
        });
        if !g.close.iter().any(|c| c == close) {
            g.close.push(close.into());
        }
        if apply.is_some() {
            g.apply = apply;
        }
        self.tables.closing.insert(close.into());
        Ok(self)
    }

    /// Register delimiters that enclose an argument list directly after a leaf,
    /// as in `f(a, b)`. The leaf and the complete list are handed to the leaf parser.
    pub fn register_sequence_delimiters(mut self, open: &str, close: &str) -> Result<Self, ConfigError> {
        self.tables.check_delimiters(open, close, &[EXPRESSION, SEQUENCE])?;

        trace!("sequence delimiters {} {}", open, close);
        let c = self.tables.sequence.entry(open.into()).or_default();
        if !c.iter().any(|c| c == close) {
            c.push(close.into());
        }
        self.tables.closing.insert(close.into());
        Ok(self)
    }

    /// Register delimiters whose content is not parsed by this reader: the symbols
    /// from the open tag to the matching close tag, both included, are handed to
    /// the leaf parser as one run.
    pub fn register_external_delimiters(mut self, open: &str, close: &str) -> Result<Self, ConfigError> {
        self.tables.check_delimiters(open, close, &[EXTERNAL])?;

        trace!("external delimiters {} {}", open, close);
        let c = self.tables.external.entry(open.into()).or_default();
        if !c.iter().any(|c| c == close) {
            c.push(close.into());
        }
        self.tables.closing.insert(close.into());
        Ok(self)
    }

    /// Skip symbols with this tag wherever they occur outside a leaf.
    pub fn mark_ignorable(mut self, tag: &str) -> Result<Self, ConfigError> {
        self.tables.check_roles(tag, &[IGNORABLE])?;
        self.tables.ignorable.insert(tag.into());
        Ok(self)
    }

    /// Set the maximal nesting depth of groups, unary operators and operator chains.
    pub fn max_depth(mut self, depth: usize) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        self.tables.max_depth = depth;
        Ok(self)
    }

    pub fn build(self) -> ExpressionReader<T, L> {
        ExpressionReader {
            tables: self.tables,
            leaf: self.leaf,
        }
    }
}

#[derive(Clone, Copy)]
struct Nesting {
    depth: usize,
    groups: usize,
}

impl Nesting {
    fn deeper(self) -> Nesting {
        Nesting {
            depth: self.depth + 1,
            ..self
        }
    }

    fn group(self) -> Nesting {
        Nesting {
            depth: self.depth + 1,
            groups: self.groups + 1,
        }
    }
}

fn syntax_error<V>(symbol: &Symbol, kind: SyntaxErrorKind) -> Result<V, ParseError> {
    Err(SyntaxError::new(symbol.position, kind).into())
}

/// A configured expression reader. It holds no parse state, so a single reader
/// can be shared between threads.
pub struct ExpressionReader<T, L> {
    tables: Tables<T>,
    leaf: L,
}

impl<T, L> fmt::Debug for ExpressionReader<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionReader")
            .field("binary", &self.tables.binary.keys().collect::<Vec<_>>())
            .field("unary", &self.tables.unary.keys().collect::<Vec<_>>())
            .field("max_depth", &self.tables.max_depth)
            .finish()
    }
}

impl<T, L: LeafParser<T>> ExpressionReader<T, L> {
    pub fn leaf_parser(&self) -> &L {
        &self.leaf
    }

    /// Parse a complete expression. The stream must be exhausted afterwards.
    #[instrument(level = "trace", skip_all)]
    pub fn try_parse<S: SymbolReader + ?Sized>(&self, reader: &mut S) -> Result<T, ParseError> {
        self.skip_ignorable(reader);
        if reader.is_at_eof() {
            return syntax_error(reader.peek(), SyntaxErrorKind::Empty);
        }

        let value = self.parse_expression(
            reader,
            0,
            Nesting {
                depth: 0,
                groups: 0,
            },
        )?;

        self.skip_ignorable(reader);
        let next = reader.peek();
        if next.is_eof() {
            Ok(value)
        } else if self.tables.closing.contains(&next.kind) {
            syntax_error(
                next,
                SyntaxErrorKind::UnmatchedClose {
                    found: next.describe(),
                },
            )
        } else {
            syntax_error(
                next,
                SyntaxErrorKind::UnexpectedSymbol {
                    expected: "operator",
                    found: next.describe(),
                },
            )
        }
    }

    /// Parse a complete expression, recording syntax errors in `log`.
    /// Returns `Ok(None)` when the input is malformed.
    pub fn parse<S: SymbolReader + ?Sized>(
        &self,
        reader: &mut S,
        log: &mut ParseLog,
    ) -> Result<Option<T>, DomainError> {
        match self.try_parse(reader) {
            Ok(v) => Ok(Some(v)),
            Err(ParseError::Syntax(e)) => {
                log.syntax_error(&e);
                Ok(None)
            }
            Err(ParseError::Domain(e)) => {
                debug!("parse aborted: {}", e);
                Err(e)
            }
        }
    }

    /// Tokenize `text` with the standard character table and parse it.
    pub fn try_parse_str(&self, text: &str) -> Result<T, ParseError> {
        self.try_parse(&mut ArraySymbolReader::new(tokenize(text)))
    }

    pub fn parse_str(&self, text: &str, log: &mut ParseLog) -> Result<Option<T>, DomainError> {
        self.parse(&mut ArraySymbolReader::new(tokenize(text)), log)
    }

    fn skip_ignorable<S: SymbolReader + ?Sized>(&self, reader: &mut S) {
        while self.tables.ignorable.contains(&reader.peek().kind) {
            reader.get();
        }
    }

    /// Parse operands joined by binary operators of at least `min_precedence`.
    fn parse_expression<S: SymbolReader + ?Sized>(
        &self,
        reader: &mut S,
        min_precedence: u32,
        nesting: Nesting,
    ) -> Result<T, ParseError> {
        if nesting.depth >= self.tables.max_depth {
            return syntax_error(
                reader.peek(),
                SyntaxErrorKind::NestingTooDeep {
                    limit: self.tables.max_depth,
                },
            );
        }

        let mut lhs = self.parse_primary(reader, min_precedence, nesting)?;

        loop {
            self.skip_ignorable(reader);
            let op = match self.tables.binary.get(&reader.peek().kind) {
                Some(op) if op.precedence >= min_precedence => op,
                _ => break,
            };
            reader.get();

            let next_min = match op.associativity {
                Associativity::Left => op.precedence + 1,
                Associativity::Right => op.precedence,
            };
            let rhs = self.parse_expression(reader, next_min, nesting.deeper())?;
            lhs = (op.apply)(lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_primary<S: SymbolReader + ?Sized>(
        &self,
        reader: &mut S,
        min_precedence: u32,
        nesting: Nesting,
    ) -> Result<T, ParseError> {
        self.skip_ignorable(reader);
        let s = reader.peek().clone();

        if s.is_eof() {
            return syntax_error(&s, SyntaxErrorKind::UnexpectedEnd);
        }

        if let Some(op) = self.tables.unary.get(&s.kind) {
            reader.get();
            let operand =
                self.parse_expression(reader, (op.precedence + 1).max(min_precedence), nesting.deeper())?;
            return Ok((op.apply)(operand)?);
        }

        if self.tables.binary.contains_key(&s.kind) {
            return syntax_error(&s, SyntaxErrorKind::MissingOperand { found: s.describe() });
        }

        if let Some(g) = self.tables.expression.get(&s.kind) {
            reader.get();
            let value = self.parse_expression(reader, 0, nesting.group())?;

            self.skip_ignorable(reader);
            let close = reader.peek();
            if g.close.contains(&close.kind) {
                reader.get();
                return match &g.apply {
                    Some(f) => Ok(f(value)?),
                    None => Ok(value),
                };
            }

            return if close.is_eof() {
                syntax_error(close, SyntaxErrorKind::MissingClose { open: s.kind })
            } else if self.tables.closing.contains(&close.kind) {
                syntax_error(
                    close,
                    SyntaxErrorKind::MismatchedClose {
                        open: s.kind,
                        found: close.describe(),
                    },
                )
            } else {
                syntax_error(
                    close,
                    SyntaxErrorKind::UnexpectedSymbol {
                        expected: "operator or closing delimiter",
                        found: close.describe(),
                    },
                )
            };
        }

        if self.tables.closing.contains(&s.kind) {
            return if nesting.groups == 0 {
                syntax_error(&s, SyntaxErrorKind::UnmatchedClose { found: s.describe() })
            } else {
                syntax_error(&s, SyntaxErrorKind::MissingOperand { found: s.describe() })
            };
        }

        let run = self.collect_leaf(reader)?;
        if run.is_empty() {
            return syntax_error(
                &s,
                SyntaxErrorKind::UnexpectedSymbol {
                    expected: "operand",
                    found: s.describe(),
                },
            );
        }

        self.leaf.parse_leaf(&run)
    }

    /// Collect the symbols of one leaf: everything up to the next operator,
    /// delimiter or ignorable symbol, extended by external groups and by
    /// sequence groups that directly follow a leaf.
    fn collect_leaf<S: SymbolReader + ?Sized>(&self, reader: &mut S) -> Result<Vec<Symbol>, ParseError> {
        let mut run = vec![];

        loop {
            let s = reader.peek();
            if s.is_eof()
                || self.tables.ignorable.contains(&s.kind)
                || self.tables.binary.contains_key(&s.kind)
                || self.tables.unary.contains_key(&s.kind)
            {
                break;
            }

            if let Some(close) = self.tables.external.get(&s.kind) {
                self.collect_group(reader, close, &mut run)?;
                continue;
            }

            if !run.is_empty() {
                if let Some(close) = self.tables.sequence.get(&s.kind) {
                    self.collect_group(reader, close, &mut run)?;
                    continue;
                }
            }

            if self.tables.is_delimiter(&s.kind) {
                break;
            }

            run.push(reader.get());
        }

        Ok(run)
    }

    /// Move a delimited group, including nested groups with the same open tag, into `run`.
    fn collect_group<S: SymbolReader + ?Sized>(
        &self,
        reader: &mut S,
        close: &CloseTags,
        run: &mut Vec<Symbol>,
    ) -> Result<(), ParseError> {
        let open = reader.get();
        let mut level = 1;
        run.push(open.clone());

        while level > 0 {
            let s = reader.get();
            if s.is_eof() {
                reader.unget();
                return syntax_error(&s, SyntaxErrorKind::MissingClose { open: open.kind });
            }

            if s.kind == open.kind {
                level += 1;
            } else if close.contains(&s.kind) {
                level -= 1;
            }
            run.push(s);
        }

        Ok(())
    }
}

impl<T, L: LeafParser<T>> LeafParser<T> for ExpressionReader<T, L> {
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<T, ParseError> {
        self.try_parse(&mut ArraySymbolReader::from_slice(symbols))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{
        domains::{
            integer::{Integer, Z},
            Ring,
        },
        error::{Arity, ConfigError, DomainError, ParseError, ParseLog, SyntaxErrorKind},
        leaf::{IntegerLiteral, LeafParser},
        tokenizer::{join_text, tags, tokenize, ArraySymbolReader, Symbol, SymbolReader},
    };

    use super::{Associativity, ExpressionReader, ExpressionReaderBuilder};

    fn arithmetic() -> ExpressionReaderBuilder<Integer, IntegerLiteral<Z>> {
        ExpressionReaderBuilder::new(IntegerLiteral::new(Z))
            .register_binary_operator(tags::PLUS, |a, b| Ok(Z.add(&a, &b)), 0, Associativity::Left)
            .unwrap()
            .register_binary_operator(tags::MINUS, |a, b| Ok(Z.sub(&a, &b)), 0, Associativity::Left)
            .unwrap()
            .register_unary_operator(tags::MINUS, |a| Ok(Z.neg(&a)), 0)
            .unwrap()
            .register_binary_operator(tags::TIMES, |a, b| Ok(Z.mul(&a, &b)), 1, Associativity::Left)
            .unwrap()
            .register_binary_operator(
                tags::HAT,
                |a, b: Integer| Ok(a.pow(b.to_i64().unwrap_or(0) as u64)),
                2,
                Associativity::Right,
            )
            .unwrap()
            .register_expression_delimiters(tags::LEFT_PARENTHESIS, tags::RIGHT_PARENTHESIS)
            .unwrap()
            .mark_ignorable(tags::SPACE)
            .unwrap()
    }

    fn syntax_kind<T: std::fmt::Debug>(r: Result<T, ParseError>) -> SyntaxErrorKind {
        match r {
            Err(ParseError::Syntax(e)) => e.kind,
            r => panic!("expected a syntax error, got {:?}", r),
        }
    }

    #[test]
    fn precedence() {
        let r = arithmetic().build();
        assert_eq!(r.try_parse_str("2+3*4"), Ok(14.into()));
        assert_eq!(r.try_parse_str("(2+3)*4"), Ok(20.into()));
        assert_eq!(r.try_parse_str("10-4-3"), Ok(3.into()));
        assert_eq!(r.try_parse_str("2^3^2"), Ok(512.into()));
        assert_eq!(r.try_parse_str("-2^2"), Ok((-4).into()));
        assert_eq!(r.try_parse_str("2*-3"), Ok((-6).into()));
        assert_eq!(r.try_parse_str("--2"), Ok(2.into()));
        assert_eq!(r.try_parse_str(" ( 1 + 2 ) * 3 "), Ok(9.into()));
    }

    #[test]
    fn malformed() {
        let r = arithmetic().build();
        assert_eq!(
            syntax_kind(r.try_parse_str("(1+2")),
            SyntaxErrorKind::MissingClose {
                open: tags::LEFT_PARENTHESIS.into()
            }
        );
        assert_eq!(
            syntax_kind(r.try_parse_str("1++2")),
            SyntaxErrorKind::MissingOperand { found: "+".into() }
        );
        assert_eq!(
            syntax_kind(r.try_parse_str("1+2)")),
            SyntaxErrorKind::UnmatchedClose { found: ")".into() }
        );
        assert_eq!(
            syntax_kind(r.try_parse_str("()")),
            SyntaxErrorKind::MissingOperand { found: ")".into() }
        );
        assert_eq!(syntax_kind(r.try_parse_str("1+")), SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(syntax_kind(r.try_parse_str("  ")), SyntaxErrorKind::Empty);
        assert_eq!(
            syntax_kind(r.try_parse_str("1 2")),
            SyntaxErrorKind::UnexpectedSymbol {
                expected: "operator",
                found: "2".into()
            }
        );
        assert_eq!(
            syntax_kind(r.try_parse_str("1x")),
            SyntaxErrorKind::InvalidLeaf { text: "1x".into() }
        );
    }

    #[test]
    fn mismatched_close() {
        let r = arithmetic()
            .register_expression_delimiters(tags::LEFT_BRACKET, tags::RIGHT_BRACKET)
            .unwrap()
            .build();
        assert_eq!(r.try_parse_str("[1+2]*2"), Ok(6.into()));
        assert_eq!(
            syntax_kind(r.try_parse_str("(1+2]")),
            SyntaxErrorKind::MismatchedClose {
                open: tags::LEFT_PARENTHESIS.into(),
                found: "]".into()
            }
        );
    }

    #[test]
    fn domain_errors_propagate() {
        let r = arithmetic()
            .register_binary_operator(
                tags::OVER,
                |a, b| {
                    if Z::is_zero(&b) {
                        Err(DomainError::DivisionByZero)
                    } else {
                        Z.try_div(&a, &b).ok_or(DomainError::NotDivisible)
                    }
                },
                1,
                Associativity::Left,
            )
            .unwrap()
            .build();

        assert_eq!(r.try_parse_str("6/3"), Ok(2.into()));
        assert_eq!(
            r.try_parse_str("1/0"),
            Err(ParseError::Domain(DomainError::DivisionByZero))
        );

        let mut log = ParseLog::new();
        assert_eq!(r.parse_str("1/0", &mut log), Err(DomainError::DivisionByZero));
        assert!(log.is_empty());
        assert_eq!(r.parse_str("1/", &mut log), Ok(None));
        assert!(log.has_errors());
        assert_eq!(r.parse_str("7/7", &mut log), Ok(Some(1.into())));
    }

    #[test]
    fn configuration_errors() {
        let e = arithmetic()
            .register_binary_operator(tags::PLUS, |a, _| Ok(a), 3, Associativity::Left)
            .err();
        assert_eq!(
            e,
            Some(ConfigError::DuplicateOperator {
                tag: tags::PLUS.into(),
                arity: Arity::Binary
            })
        );

        let e = arithmetic().mark_ignorable(tags::PLUS).err();
        assert_eq!(
            e,
            Some(ConfigError::TagConflict {
                tag: tags::PLUS.into(),
                existing: "binary operator"
            })
        );

        let e = arithmetic()
            .register_external_delimiters(tags::LEFT_PARENTHESIS, tags::RIGHT_BRACE)
            .err();
        assert!(matches!(e, Some(ConfigError::TagConflict { .. })));

        assert_eq!(arithmetic().max_depth(0).err(), Some(ConfigError::ZeroDepth));
        assert_eq!(
            arithmetic().register_unary_operator("", Ok, 1).err(),
            Some(ConfigError::EmptyTag)
        );
    }

    #[test]
    fn nesting_limit() {
        let r = arithmetic().max_depth(8).unwrap().build();
        assert_eq!(r.try_parse_str("((((1))))"), Ok(1.into()));
        assert_eq!(
            syntax_kind(r.try_parse_str("((((((((((1))))))))))")),
            SyntaxErrorKind::NestingTooDeep { limit: 8 }
        );
        assert_eq!(
            syntax_kind(r.try_parse_str(&"-".repeat(20))),
            SyntaxErrorKind::NestingTooDeep { limit: 8 }
        );
    }

    #[test]
    fn grouping_function() {
        let r = arithmetic()
            .register_expression_delimiters_with(tags::LEFT_BRACKET, tags::RIGHT_BRACKET, |a: Integer| {
                Ok(a.abs())
            })
            .unwrap()
            .build();
        assert_eq!(r.try_parse_str("[1-4]*2"), Ok(6.into()));
    }

    #[test]
    fn sequences_and_external_groups() {
        // a leaf parser that reports the text it was given
        let text = |s: &[Symbol]| Ok::<_, ParseError>(join_text(s));
        let r = ExpressionReaderBuilder::new(text)
            .register_binary_operator(tags::PLUS, |a, b| Ok(format!("{}|{}", a, b)), 0, Associativity::Left)
            .unwrap()
            .register_expression_delimiters(tags::LEFT_PARENTHESIS, tags::RIGHT_PARENTHESIS)
            .unwrap()
            .register_sequence_delimiters(tags::LEFT_PARENTHESIS, tags::RIGHT_PARENTHESIS)
            .unwrap()
            .register_external_delimiters(tags::LEFT_BRACE, tags::RIGHT_BRACE)
            .unwrap()
            .build();

        assert_eq!(r.try_parse_str("f(a,(b))+c"), Ok("f(a,(b))|c".to_owned()));
        assert_eq!(r.try_parse_str("(a+b)"), Ok("a|b".to_owned()));
        assert_eq!(r.try_parse_str("{a+{b}}+c"), Ok("{a+{b}}|c".to_owned()));
        assert_eq!(
            syntax_kind(r.try_parse_str("{a+b")),
            SyntaxErrorKind::MissingClose {
                open: tags::LEFT_BRACE.into()
            }
        );
    }

    #[test]
    fn stacked_readers() {
        let inner = arithmetic().build();
        let outer: ExpressionReader<Integer, _> = arithmetic_with(inner);
        assert_eq!(outer.try_parse_str("2*3"), Ok(6.into()));
        assert_eq!(outer.leaf_parser().parse_leaf(&tokenize("4")[..1]), Ok(4.into()));
    }

    fn arithmetic_with<L: LeafParser<Integer>>(leaf: L) -> ExpressionReader<Integer, L> {
        ExpressionReaderBuilder::new(leaf)
            .register_binary_operator(tags::TIMES, |a, b| Ok(Z.mul(&a, &b)), 1, Associativity::Left)
            .unwrap()
            .build()
    }

    #[test]
    fn memento_retry() {
        let r = arithmetic().build();
        let mut s = ArraySymbolReader::new(tokenize("1+2"));
        let m = s.save();
        assert_eq!(r.try_parse(&mut s), Ok(3.into()));
        assert!(s.is_at_eof());
        s.restore(m);
        assert_eq!(r.try_parse(&mut s), Ok(3.into()));
    }
}
