//! FILENAME: equation/src/lexer.rs
//! PURPOSE: Scans a raw equation string and produces the token list.
//! CONTEXT: First stage of the pipeline. It handles whitespace skipping,
//! longest-prefix symbol matching with adjacency validation, the
//! signed-number vs. binary-operator ambiguity, numbers with decimal and
//! scientific notation, and identifier words. Numeric literals come out
//! already bound as constant inputs: a literal without decimal point or
//! exponent is an integer constant, anything else a double constant.

use crate::error::{EquationParseError, ProblemType};
use crate::input::EquationInput;
use crate::symbol::EquationSymbol;
use crate::token::{Span, Token};

/// How far a number literal has progressed. A literal starts out assumed
/// integer and becomes a float on the first decimal point or exponent.
#[derive(PartialEq, Clone, Copy)]
enum NumberState {
    Integer,
    Float,
    FloatExponent,
}

/// Tokenizes an equation string.
pub fn tokenize(text: &str) -> Result<Vec<Token>, EquationParseError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if let Some(symbol) = EquationSymbol::lookup_at_start(&text[pos..]) {
            if !symbol.is_supported() {
                return Err(EquationParseError::with_offset(
                    ProblemType::UnsupportedSymbol,
                    format!("symbol '{}' is not supported", symbol),
                    text,
                    pos,
                ));
            }

            if let Some(prev) = tokens.last().and_then(Token::symbol_kind) {
                if !EquationSymbol::is_pair_valid(prev, symbol) {
                    return Err(EquationParseError::with_offset(
                        ProblemType::InvalidSymbolUse,
                        format!("invalid sequence of symbols: '{}' followed by '{}'", prev, symbol),
                        text,
                        pos,
                    ));
                }
            }

            let symbol_len = symbol.as_str().chars().count();

            // A +/- directly before a digit, in a position where no operand
            // has been produced yet, is the number's sign rather than an
            // operator.
            let is_sign = (symbol == EquationSymbol::Minus || symbol == EquationSymbol::Plus)
                && chars
                    .get(i + symbol_len)
                    .is_some_and(|&(_, next)| next.is_ascii_digit() || next == '.')
                && match tokens.last() {
                    None => true,
                    Some(token) => token.symbol_kind().is_some_and(|prev| {
                        prev.is_binary_operator()
                            || prev == EquationSymbol::ParenLeft
                            || prev == EquationSymbol::Comma
                    }),
                };

            if !is_sign {
                tokens.push(Token::symbol(symbol, Span::new(pos, symbol.as_str().len())));
                i += symbol_len;
                continue;
            }
        }

        if ch.is_ascii_digit() || ch == '.' || ch == '-' || ch == '+' {
            let (token, consumed) = scan_number(text, &chars, i)?;
            tokens.push(token);
            i += consumed;
            continue;
        }

        if is_word_char(ch) {
            while i < chars.len() && is_word_char(chars[i].1) {
                i += 1;
            }
            let end_pos = byte_end(text, &chars, i);
            tokens.push(Token::word(&text[pos..end_pos], Span::new(pos, end_pos - pos)));
            continue;
        }

        return Err(EquationParseError::with_offset(
            ProblemType::Other,
            format!("unexpected character '{}'", ch),
            text,
            pos,
        ));
    }

    Ok(tokens)
}

/// Scans a number literal starting at `chars[start]`, which may be a sign.
/// Returns the bound constant token and the number of chars consumed.
fn scan_number(
    text: &str,
    chars: &[(usize, char)],
    start: usize,
) -> Result<(Token, usize), EquationParseError> {
    let start_pos = chars[start].0;
    let mut i = start;
    let mut state = NumberState::Integer;
    let mut exponent_digits = 0usize;

    if chars[i].1 == '-' || chars[i].1 == '+' {
        i += 1;
    }

    while i < chars.len() {
        let (pos, ch) = chars[i];

        if ch.is_ascii_digit() {
            if state == NumberState::FloatExponent {
                exponent_digits += 1;
            }
            i += 1;
        } else if ch == '.' {
            match state {
                NumberState::Float => {
                    return Err(EquationParseError::with_offset(
                        ProblemType::InvalidNumberFormat,
                        "a number can only have one decimal point",
                        text,
                        pos,
                    ))
                }
                NumberState::FloatExponent => {
                    return Err(EquationParseError::with_offset(
                        ProblemType::InvalidNumberFormat,
                        "a float exponent must be an integer",
                        text,
                        pos,
                    ))
                }
                NumberState::Integer => state = NumberState::Float,
            }
            i += 1;
        } else if ch == 'e' || ch == 'E' {
            if state == NumberState::FloatExponent {
                return Err(EquationParseError::with_offset(
                    ProblemType::InvalidNumberFormat,
                    "a number can only have one exponent",
                    text,
                    pos,
                ));
            }
            state = NumberState::FloatExponent;
            i += 1;
            // The exponent itself may be signed.
            if i < chars.len() && (chars[i].1 == '-' || chars[i].1 == '+') {
                i += 1;
            }
        } else {
            break;
        }
    }

    if state == NumberState::FloatExponent && exponent_digits == 0 {
        return Err(EquationParseError::with_offset(
            ProblemType::InvalidNumberFormat,
            "a float exponent needs at least one digit",
            text,
            start_pos,
        ));
    }

    let end_pos = byte_end(text, chars, i);
    let literal = &text[start_pos..end_pos];
    let span = Span::new(start_pos, end_pos - start_pos);

    let input = match state {
        NumberState::Integer => match literal.parse::<i32>() {
            Ok(value) => EquationInput::IntegerConstant(value),
            // Out of i32 range; widen rather than fail.
            Err(_) => parse_double(literal, text, span)?,
        },
        _ => parse_double(literal, text, span)?,
    };

    Ok((Token::input(input, span), i - start))
}

fn parse_double(literal: &str, text: &str, span: Span) -> Result<EquationInput, EquationParseError> {
    literal
        .parse::<f64>()
        .map(EquationInput::DoubleConstant)
        .map_err(|_| {
            EquationParseError::with_span(
                ProblemType::InvalidNumberFormat,
                format!("not a valid number: '{}'", literal),
                text,
                span,
            )
        })
}

/// Byte offset just past `chars[i - 1]`, or the end of the text.
fn byte_end(text: &str, chars: &[(usize, char)], i: usize) -> usize {
    match chars.get(i) {
        Some(&(pos, _)) => pos,
        None => text.len(),
    }
}

/// Anything that is not whitespace, not a symbol start, and not a decimal
/// point can appear in an identifier; digits are fine ("atan2", "log10").
fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !EquationSymbol::starts_symbol(ch) && ch != '.'
}
