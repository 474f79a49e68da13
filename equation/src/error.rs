//! FILENAME: equation/src/error.rs
//! PURPOSE: Error types for parsing and binding equations.
//! CONTEXT: Lexing and parsing failures share one taxonomy
//! (`EquationParseError`) carrying the equation text and, where known, the
//! byte span of the offending token so a caller can underline it. Binding
//! failures (unknown names, operand kinds no implementation accepts) are a
//! separate, non-positional error: they come from dynamic dispatch, not
//! grammar. Evaluation itself has no error channel.

use thiserror::Error;

use crate::input::InputKind;
use crate::token::Span;

/// Classification of a lex/parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    TooFewTokens,
    UnexpectedTokenType,
    ParenthesesMismatch,
    FunctionMissingInputs,
    UnsupportedSymbol,
    InvalidSymbolUse,
    InvalidNumberFormat,
    Other,
}

/// A failed lex or parse. All-or-nothing: no partial equation survives.
#[derive(Debug, Clone, Error)]
#[error("{message} (problem: {problem:?}, equation: \"{text}\")")]
pub struct EquationParseError {
    pub problem: ProblemType,
    pub message: String,
    /// The full equation text that failed to parse.
    pub text: String,
    /// Byte span of the offending token, when one is known.
    pub span: Option<Span>,
}

impl EquationParseError {
    pub fn new(problem: ProblemType, message: impl Into<String>, text: &str) -> Self {
        EquationParseError {
            problem,
            message: message.into(),
            text: text.to_string(),
            span: None,
        }
    }

    pub fn with_span(problem: ProblemType, message: impl Into<String>, text: &str, span: Span) -> Self {
        EquationParseError {
            problem,
            message: message.into(),
            text: text.to_string(),
            span: Some(span),
        }
    }

    pub fn with_offset(problem: ProblemType, message: impl Into<String>, text: &str, offset: usize) -> Self {
        Self::with_span(problem, message, text, Span::new(offset, 1))
    }
}

/// A failure while binding parsed tokens to concrete operations.
#[derive(Debug, Clone, Error)]
pub enum EquationBuildError {
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("operation '{operation}' has no implementation for operand kinds {kinds:?}")]
    UnsupportedOperandKinds {
        operation: &'static str,
        kinds: Vec<InputKind>,
    },

    #[error("operation '{operation}' expects {expected} inputs but got {actual}")]
    WrongInputCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("assignment target '{0}' is not a variable")]
    InvalidAssignmentTarget(String),

    #[error("alias already exists: {0}")]
    DuplicateAlias(String),

    #[error("no variable named '{0}' in any attached registry")]
    VariableNotFound(String),
}

/// Umbrella error for `parse`: grammar problems or binding problems.
#[derive(Debug, Clone, Error)]
pub enum EquationError {
    #[error(transparent)]
    Parse(#[from] EquationParseError),

    #[error(transparent)]
    Build(#[from] EquationBuildError),
}

impl EquationError {
    /// The parse problem type, when this is a parse error.
    pub fn problem(&self) -> Option<ProblemType> {
        match self {
            EquationError::Parse(error) => Some(error.problem),
            EquationError::Build(_) => None,
        }
    }
}
