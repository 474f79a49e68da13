//! FILENAME: equation/src/lib.rs
//! PURPOSE: Library root for the equation compiler and evaluator.
//! CONTEXT: This crate turns arithmetic strings such as
//! `out = sin(x) + 2 * y` into flat, pre-bound operation lists that are
//! cheap to re-evaluate every tick.
//!
//! PIPELINE: Equation String --> Lexer --> Tokens --> Parser --> Operation List
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /, ^ (power)
//! - Assignment: `variable = expression`
//! - Functions: abs, sin, cos, tan, asin, acos, atan, atan2, exp, log,
//!   log10, sqrt, pow, sign, max, min
//! - Parentheses for grouping, commas for function arguments
//! - Signed number literals, scientific notation
//! - Aliases: constants, free variables, registry-backed variables
//! - Live and recorded-history evaluation via `AccessMode`
//!
//! Parsing binds every name and operation up front; evaluation afterwards
//! cannot fail. Double arithmetic follows IEEE (NaN flows through), integer
//! arithmetic wraps and division by zero yields zero.

pub mod alias;
pub mod definition;
pub mod equation;
pub mod error;
pub mod input;
pub mod lexer;
pub mod library;
pub mod manager;
pub mod operation;
pub mod parser;
pub mod symbol;
pub mod token;

// Register the separate tests module
#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use alias::AliasManager;
pub use definition::{AliasDefinition, EquationDefinition};
pub use equation::Equation;
pub use error::{EquationBuildError, EquationError, EquationParseError, ProblemType};
pub use input::{EquationInput, InputKind, Scalar};
pub use library::OperationLibrary;
pub use manager::EquationManager;
pub use parser::{parse, EquationParser};
pub use registry::AccessMode;
pub use symbol::EquationSymbol;
pub use token::{Span, Token, TokenKind};
