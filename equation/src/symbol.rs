//! FILENAME: equation/src/symbol.rs
//! PURPOSE: The fixed alphabet of operators and punctuation.
//! CONTEXT: The lexer matches symbols by longest prefix against this table,
//! then validates each symbol against the one before it. Symbols the
//! grammar recognizes but does not support (comparisons, brackets) are kept
//! in the table so the lexer can report them precisely instead of falling
//! through to a generic bad-character error.

/// Operators and punctuation recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquationSymbol {
    // Supported
    Plus,
    Minus,
    Times,
    Divide,
    Power,
    Assign,
    ParenLeft,
    ParenRight,
    Comma,

    // Recognized but unsupported; reported as UnsupportedSymbol
    BracketLeft,
    BracketRight,
    Semicolon,
    Colon,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Equivalent,
    And,
    Or,
}

/// Table ordered so that longer symbol strings are tried first,
/// which is what makes the prefix lookup "longest match".
const SYMBOL_TABLE: &[(&str, EquationSymbol)] = &[
    ("<=", EquationSymbol::LessEqual),
    (">=", EquationSymbol::GreaterEqual),
    ("==", EquationSymbol::Equivalent),
    ("&&", EquationSymbol::And),
    ("||", EquationSymbol::Or),
    ("+", EquationSymbol::Plus),
    ("-", EquationSymbol::Minus),
    ("*", EquationSymbol::Times),
    ("/", EquationSymbol::Divide),
    ("^", EquationSymbol::Power),
    ("=", EquationSymbol::Assign),
    ("(", EquationSymbol::ParenLeft),
    (")", EquationSymbol::ParenRight),
    (",", EquationSymbol::Comma),
    ("[", EquationSymbol::BracketLeft),
    ("]", EquationSymbol::BracketRight),
    (";", EquationSymbol::Semicolon),
    (":", EquationSymbol::Colon),
    ("<", EquationSymbol::LessThan),
    (">", EquationSymbol::GreaterThan),
];

impl EquationSymbol {
    /// Longest-prefix lookup at the start of `text`.
    pub fn lookup_at_start(text: &str) -> Option<EquationSymbol> {
        for (symbol_str, symbol) in SYMBOL_TABLE {
            if text.starts_with(symbol_str) {
                return Some(*symbol);
            }
        }
        None
    }

    /// The source string this symbol was lexed from.
    pub fn as_str(&self) -> &'static str {
        for (symbol_str, symbol) in SYMBOL_TABLE {
            if symbol == self {
                return symbol_str;
            }
        }
        unreachable!("every symbol appears in the table")
    }

    /// Returns true if `ch` starts any symbol in the table.
    pub fn starts_symbol(ch: char) -> bool {
        SYMBOL_TABLE
            .iter()
            .any(|(symbol_str, _)| symbol_str.starts_with(ch))
    }

    /// Symbols the parser can actually do something with.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            EquationSymbol::Plus
                | EquationSymbol::Minus
                | EquationSymbol::Times
                | EquationSymbol::Divide
                | EquationSymbol::Power
                | EquationSymbol::Assign
                | EquationSymbol::ParenLeft
                | EquationSymbol::ParenRight
                | EquationSymbol::Comma
        )
    }

    /// Operators that take an operand on each side. These establish the
    /// "binary context" in which a following +/- is a number's sign.
    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            EquationSymbol::Plus
                | EquationSymbol::Minus
                | EquationSymbol::Times
                | EquationSymbol::Divide
                | EquationSymbol::Power
                | EquationSymbol::Assign
        )
    }

    /// Adjacency validity: may `next` legally follow `prev`? Rejects
    /// malformed runs like `**` or `+ ,` during lexing, before the parser
    /// ever sees them.
    pub fn is_pair_valid(prev: EquationSymbol, next: EquationSymbol) -> bool {
        use EquationSymbol::*;

        match prev {
            // After an operand-expecting position, only a grouped
            // expression or a signed operand may start.
            Plus | Minus | Times | Divide | Power | Assign | Comma => {
                matches!(next, Plus | Minus | ParenLeft)
            }
            ParenLeft => matches!(next, Plus | Minus | ParenLeft | ParenRight),
            // A closed group behaves like an operand.
            ParenRight => matches!(next, Plus | Minus | Times | Divide | Power | ParenRight | Comma),
            // Unsupported symbols never get this far.
            _ => false,
        }
    }
}

impl std::fmt::Display for EquationSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
