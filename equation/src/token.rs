//! FILENAME: equation/src/token.rs
//! PURPOSE: Token definitions for the equation lexer and parser.
//! CONTEXT: Tokens are the atomic units produced by the lexer. Unlike a
//! classic pipeline, they are also the parser's working material: words are
//! promoted to function names, numbers arrive already bound as constant
//! inputs, and each reduction step replaces a matched token run with a
//! single token referencing the bound operation's result. No expression
//! tree is ever materialized.

use crate::input::EquationInput;
use crate::symbol::EquationSymbol;

/// Byte range in the source equation string, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Span { start, len }
    }

    /// Smallest span covering both operands, used when a reduction
    /// collapses several tokens into one.
    pub fn merge(a: Span, b: Span) -> Span {
        let start = a.start.min(b.start);
        let end = (a.start + a.len).max(b.start + b.len);
        Span::new(start, end - start)
    }
}

/// What a token currently stands for.
#[derive(Debug, Clone)]
pub enum TokenKind {
    /// An identifier not yet resolved to a function or variable.
    Word(String),
    /// An identifier recognized as a built-in function name.
    Function(String),
    /// A value source: a parsed numeric constant or a resolved variable.
    Input(EquationInput),
    /// The result input of an operation bound during reduction.
    Operation(EquationInput),
    /// An operator or punctuation symbol.
    Symbol(EquationSymbol),
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn word(text: impl Into<String>, span: Span) -> Self {
        Token { kind: TokenKind::Word(text.into()), span }
    }

    pub fn function(name: impl Into<String>, span: Span) -> Self {
        Token { kind: TokenKind::Function(name.into()), span }
    }

    pub fn input(input: EquationInput, span: Span) -> Self {
        Token { kind: TokenKind::Input(input), span }
    }

    pub fn operation(result: EquationInput, span: Span) -> Self {
        Token { kind: TokenKind::Operation(result), span }
    }

    pub fn symbol(symbol: EquationSymbol, span: Span) -> Self {
        Token { kind: TokenKind::Symbol(symbol), span }
    }

    pub fn symbol_kind(&self) -> Option<EquationSymbol> {
        match self.kind {
            TokenKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn is_symbol(&self, symbol: EquationSymbol) -> bool {
        self.symbol_kind() == Some(symbol)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenKind::Word(word) => write!(f, "{}", word),
            TokenKind::Function(name) => write!(f, "{}()", name),
            TokenKind::Input(input) => write!(f, "{}", input),
            TokenKind::Operation(result) => write!(f, "<op -> {}>", result),
            TokenKind::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}
