//! FILENAME: equation/src/parser.rs
//! PURPOSE: Compiles a token list into an ordered list of bound operations.
//! CONTEXT: Second stage of the pipeline, and deliberately tree-free: the
//! parser rewrites the token sequence in place of building an AST. It first
//! resolves parentheses innermost-out (splitting function arguments on
//! commas), then reduces each parenthesis-free run one precedence level at
//! a time, replacing every matched operand/operator/operand triple with a
//! single token that references the freshly bound operation's result.
//! After the last pass exactly one token remains: the equation's result.
//!
//! PRECEDENCE (highest first, each level scanned left to right):
//!   ^   /   *   -   +

use crate::alias::AliasManager;
use crate::equation::Equation;
use crate::error::{EquationBuildError, EquationError, EquationParseError, ProblemType};
use crate::input::EquationInput;
use crate::lexer::tokenize;
use crate::library::OperationLibrary;
use crate::operation::{EquationOperation, OperationFactory};
use crate::symbol::EquationSymbol;
use crate::token::{Span, Token, TokenKind};

/// Reduction order for the binary operators.
const PRECEDENCE: [EquationSymbol; 5] = [
    EquationSymbol::Power,
    EquationSymbol::Divide,
    EquationSymbol::Times,
    EquationSymbol::Minus,
    EquationSymbol::Plus,
];

/// Parses equation strings against an alias table and operation library.
///
/// The parser itself is cheap to duplicate: factories are value types and
/// the alias table clones shallowly, so concurrent compilations each work
/// on their own copy and never share mutable state.
#[derive(Debug, Clone, Default)]
pub struct EquationParser {
    alias_manager: AliasManager,
    library: OperationLibrary,
}

impl EquationParser {
    pub fn new() -> Self {
        EquationParser {
            alias_manager: AliasManager::new(),
            library: OperationLibrary::new(),
        }
    }

    pub fn with_library(library: OperationLibrary) -> Self {
        EquationParser {
            alias_manager: AliasManager::new(),
            library,
        }
    }

    pub fn alias_manager(&self) -> &AliasManager {
        &self.alias_manager
    }

    pub fn alias_manager_mut(&mut self) -> &mut AliasManager {
        &mut self.alias_manager
    }

    pub fn library(&self) -> &OperationLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut OperationLibrary {
        &mut self.library
    }

    /// Compiles `text` into an executable equation. Accepts either a bare
    /// expression or a single `variable = expression` assignment.
    pub fn parse(&self, text: &str) -> Result<Equation, EquationError> {
        self.parse_internal(text, false)
    }

    /// Like [`parse`](Self::parse) but rejects anything that is not an
    /// assignment to a previously declared variable.
    pub fn parse_assignment(&self, text: &str) -> Result<Equation, EquationError> {
        self.parse_internal(text, true)
    }

    fn parse_internal(&self, text: &str, require_assignment: bool) -> Result<Equation, EquationError> {
        let mut tokens = tokenize(text)?;

        // A trailing binary operator can never get both its operands.
        if let Some(last) = tokens.last() {
            if let Some(symbol) = last.symbol_kind() {
                if symbol.is_binary_operator() {
                    return Err(EquationParseError::with_span(
                        ProblemType::InvalidSymbolUse,
                        format!("operator '{}' is missing its right operand", symbol),
                        text,
                        last.span,
                    )
                    .into());
                }
            }
        }

        if tokens.len() < 3 {
            return Err(EquationParseError::new(
                ProblemType::TooFewTokens,
                "an equation needs at least three tokens",
                text,
            )
            .into());
        }

        // Words matching a registered function name become function tokens;
        // the rest stay words until they are needed as operands.
        for token in &mut tokens {
            if let TokenKind::Word(word) = &token.kind {
                if self.library.is_function_name(word) {
                    token.kind = TokenKind::Function(word.clone());
                }
            }
        }

        let is_assignment = matches!(tokens[0].kind, TokenKind::Word(_))
            && tokens[1].is_symbol(EquationSymbol::Assign);

        let mut operations: Vec<EquationOperation> = Vec::new();

        if is_assignment {
            let target_token = tokens.remove(0);
            let assign_token = tokens.remove(0);
            self.reject_stray_assignments(text, &tokens)?;

            let target = self.operand_input(text, &target_token)?;
            let value_token = self.reduce(text, tokens, &mut operations)?;
            let value = self.operand_input(text, &value_token)?;

            let factory = self.operator_factory(text, EquationSymbol::Assign, assign_token.span)?;
            let operation = factory.build(vec![target, value])?;
            let result = operation.result().clone();
            operations.push(operation);

            return Ok(Equation::new(text, operations, result));
        }

        if require_assignment {
            return Err(EquationParseError::with_span(
                ProblemType::UnexpectedTokenType,
                "expected an assignment to a declared variable",
                text,
                tokens[0].span,
            )
            .into());
        }

        self.reject_stray_assignments(text, &tokens)?;
        let result_token = self.reduce(text, tokens, &mut operations)?;
        let result = self.operand_input(text, &result_token)?;
        Ok(Equation::new(text, operations, result))
    }

    /// Reduces a token run to a single operand token, resolving
    /// parentheses first and then applying the precedence passes.
    fn reduce(
        &self,
        text: &str,
        tokens: Vec<Token>,
        operations: &mut Vec<EquationOperation>,
    ) -> Result<Token, EquationError> {
        let tokens = self.resolve_parentheses(text, tokens, operations)?;
        self.reduce_flat(text, tokens, operations)
    }

    /// Scans for matching parenthesis pairs using a stack of left-paren
    /// indices, so nesting (including redundant nesting like `(((a)))`)
    /// resolves innermost-out. Each closed pair collapses to one token: a
    /// bound function call when a function name precedes the `(`, the
    /// reduced interior otherwise.
    fn resolve_parentheses(
        &self,
        text: &str,
        mut tokens: Vec<Token>,
        operations: &mut Vec<EquationOperation>,
    ) -> Result<Vec<Token>, EquationError> {
        let mut left_indices: Vec<usize> = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            match tokens[i].symbol_kind() {
                Some(EquationSymbol::ParenLeft) => {
                    left_indices.push(i);
                    i += 1;
                }
                Some(EquationSymbol::ParenRight) => {
                    let left = left_indices.pop().ok_or_else(|| {
                        EquationParseError::with_span(
                            ProblemType::ParenthesesMismatch,
                            "')' found with no matching '('",
                            text,
                            tokens[i].span,
                        )
                    })?;

                    let is_function_call =
                        left > 0 && matches!(tokens[left - 1].kind, TokenKind::Function(_));

                    if is_function_call {
                        let replacement =
                            self.bind_function_call(text, &tokens, left - 1, left, i, operations)?;
                        tokens.splice(left - 1..=i, [replacement]);
                        i = left; // one past the replacement
                    } else {
                        let interior: Vec<Token> = tokens[left + 1..i].to_vec();
                        let reduced = self.reduce_flat(text, interior, operations)?;
                        tokens.splice(left..=i, [reduced]);
                        i = left + 1;
                    }
                }
                _ => i += 1,
            }
        }

        if let Some(&dangling) = left_indices.first() {
            return Err(EquationParseError::with_span(
                ProblemType::ParenthesesMismatch,
                "dangling '(' is never closed",
                text,
                tokens[dangling].span,
            )
            .into());
        }

        Ok(tokens)
    }

    /// Binds one function call. `function` / `left` / `right` index the
    /// function token and its parenthesis pair inside `tokens`; the
    /// interior is split on commas into argument runs, each reduced to a
    /// single operand.
    fn bind_function_call(
        &self,
        text: &str,
        tokens: &[Token],
        function: usize,
        left: usize,
        right: usize,
        operations: &mut Vec<EquationOperation>,
    ) -> Result<Token, EquationError> {
        let function_token = &tokens[function];
        let name = match &function_token.kind {
            TokenKind::Function(name) => name.clone(),
            _ => {
                return Err(EquationParseError::with_span(
                    ProblemType::Other,
                    "expected a function name before '('",
                    text,
                    function_token.span,
                )
                .into())
            }
        };

        let interior = &tokens[left + 1..right];
        if interior.is_empty() {
            return Err(EquationParseError::with_span(
                ProblemType::FunctionMissingInputs,
                format!("function '{}' called with no inputs", name),
                text,
                function_token.span,
            )
            .into());
        }

        let mut inputs: Vec<EquationInput> = Vec::new();
        for argument in interior.split(|token| token.is_symbol(EquationSymbol::Comma)) {
            if argument.is_empty() {
                return Err(EquationParseError::with_span(
                    ProblemType::FunctionMissingInputs,
                    format!("function '{}' has an empty input", name),
                    text,
                    function_token.span,
                )
                .into());
            }
            let reduced = self.reduce_flat(text, argument.to_vec(), operations)?;
            inputs.push(self.operand_input(text, &reduced)?);
        }

        let factory = self.library.function(&name).ok_or_else(|| {
            EquationParseError::with_span(
                ProblemType::Other,
                format!("function '{}' disappeared from the library", name),
                text,
                function_token.span,
            )
        })?;

        let operation = factory.build(inputs)?;
        let span = Span::merge(function_token.span, tokens[right].span);
        let token = Token::operation(operation.result().clone(), span);
        operations.push(operation);
        Ok(token)
    }

    /// Reduces a parenthesis-free, comma-free token run by scanning once
    /// per precedence level. Each pass rebuilds a fresh (shorter) sequence
    /// instead of removing from the one being iterated.
    fn reduce_flat(
        &self,
        text: &str,
        tokens: Vec<Token>,
        operations: &mut Vec<EquationOperation>,
    ) -> Result<Token, EquationError> {
        if tokens.is_empty() {
            return Err(EquationParseError::new(
                ProblemType::TooFewTokens,
                "empty expression block",
                text,
            )
            .into());
        }

        if let Some(comma) = tokens.iter().find(|token| token.is_symbol(EquationSymbol::Comma)) {
            return Err(EquationParseError::with_span(
                ProblemType::InvalidSymbolUse,
                "',' outside a function call",
                text,
                comma.span,
            )
            .into());
        }

        let mut tokens = tokens;
        for symbol in PRECEDENCE {
            tokens = self.reduce_operator(text, tokens, symbol, operations)?;
        }

        if tokens.len() != 1 {
            // Adjacency-checked input cannot get here; this guards the
            // parser's own contract.
            return Err(EquationParseError::with_span(
                ProblemType::Other,
                format!("{} tokens left after reduction, expected one", tokens.len()),
                text,
                tokens[1].span,
            )
            .into());
        }

        Ok(tokens.swap_remove(0))
    }

    /// One precedence pass: every occurrence of `symbol` consumes its two
    /// neighbors and contracts to a single operation token.
    fn reduce_operator(
        &self,
        text: &str,
        tokens: Vec<Token>,
        symbol: EquationSymbol,
        operations: &mut Vec<EquationOperation>,
    ) -> Result<Vec<Token>, EquationError> {
        let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
        let mut iter = tokens.into_iter();

        while let Some(token) = iter.next() {
            if !token.is_symbol(symbol) {
                out.push(token);
                continue;
            }

            let missing_operand = |span| {
                EquationError::from(EquationParseError::with_span(
                    ProblemType::InvalidSymbolUse,
                    format!("operator '{}' is missing an operand", symbol),
                    text,
                    span,
                ))
            };

            let prev = out.pop().ok_or_else(|| missing_operand(token.span))?;
            let next = iter.next().ok_or_else(|| missing_operand(token.span))?;

            let a = self.operand_input(text, &prev)?;
            let b = self.operand_input(text, &next)?;
            let factory = self.operator_factory(text, symbol, token.span)?;
            let operation = factory.build(vec![a, b])?;

            let span = Span::merge(prev.span, Span::merge(token.span, next.span));
            out.push(Token::operation(operation.result().clone(), span));
            operations.push(operation);
        }

        Ok(out)
    }

    /// Resolves a token to the input it stands for. This is where word
    /// tokens finally hit the alias table; an unknown name is fatal here,
    /// at its first use as an operand.
    fn operand_input(&self, text: &str, token: &Token) -> Result<EquationInput, EquationError> {
        match &token.kind {
            TokenKind::Input(input) | TokenKind::Operation(input) => Ok(input.clone()),
            TokenKind::Word(word) => self
                .alias_manager
                .get(word)
                .ok_or_else(|| EquationBuildError::UnknownVariable(word.clone()).into()),
            TokenKind::Function(name) => Err(EquationParseError::with_span(
                ProblemType::UnexpectedTokenType,
                format!("function '{}' used without an argument list", name),
                text,
                token.span,
            )
            .into()),
            TokenKind::Symbol(symbol) => Err(EquationParseError::with_span(
                ProblemType::InvalidSymbolUse,
                format!("'{}' cannot be used as an operand", symbol),
                text,
                token.span,
            )
            .into()),
        }
    }

    fn operator_factory(
        &self,
        text: &str,
        symbol: EquationSymbol,
        span: Span,
    ) -> Result<OperationFactory, EquationError> {
        self.library.operator(symbol).ok_or_else(|| {
            EquationParseError::with_span(
                ProblemType::UnsupportedSymbol,
                format!("no operation registered for '{}'", symbol),
                text,
                span,
            )
            .into()
        })
    }

    /// An `=` anywhere past the assignment head is malformed.
    fn reject_stray_assignments(&self, text: &str, tokens: &[Token]) -> Result<(), EquationError> {
        if let Some(stray) = tokens.iter().find(|token| token.is_symbol(EquationSymbol::Assign)) {
            return Err(EquationParseError::with_span(
                ProblemType::InvalidSymbolUse,
                "'=' may only appear once, at the top level",
                text,
                stray.span,
            )
            .into());
        }
        Ok(())
    }
}

/// Convenience: parses with a fresh parser holding only the built-ins.
pub fn parse(text: &str) -> Result<Equation, EquationError> {
    EquationParser::new().parse(text)
}
