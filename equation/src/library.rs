//! FILENAME: equation/src/library.rs
//! PURPOSE: Registry of built-in functions and operators.
//! CONTEXT: Maps function names ("sin", "pow", ...) and operator symbols
//! (+ - * / ^ =) to operation factories. `get` hands out a clone of the
//! stored template, so two parses never share factory state. Callers may
//! register additional factories before parsing.

use rustc_hash::FxHashMap;

use crate::operation::{
    AssignmentOperationFactory, BinaryOperationFactory, OperationFactory, UnaryOperationFactory,
};
use crate::symbol::EquationSymbol;

#[derive(Debug, Clone)]
pub struct OperationLibrary {
    functions: FxHashMap<&'static str, OperationFactory>,
    operators: FxHashMap<EquationSymbol, OperationFactory>,
}

impl OperationLibrary {
    pub fn new() -> Self {
        let mut library = OperationLibrary {
            functions: FxHashMap::default(),
            operators: FxHashMap::default(),
        };
        library.add_default_operations();
        library
    }

    /// Returns true if the string matches the name of a function.
    pub fn is_function_name(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// An independent copy of the factory registered under this name.
    pub fn function(&self, name: &str) -> Option<OperationFactory> {
        self.functions.get(name).cloned()
    }

    /// An independent copy of the factory registered for this operator.
    pub fn operator(&self, symbol: EquationSymbol) -> Option<OperationFactory> {
        self.operators.get(&symbol).cloned()
    }

    /// Register a new function under a name, replacing any previous one.
    pub fn add(&mut self, name: &'static str, factory: OperationFactory) {
        self.functions.insert(name, factory);
    }

    pub fn function_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    fn add_unary(
        &mut self,
        name: &'static str,
        description: &'static str,
        integer_op: Option<fn(i32) -> i32>,
        double_op: Option<fn(f64) -> f64>,
    ) {
        self.add(
            name,
            OperationFactory::Unary(UnaryOperationFactory::new(name, description, integer_op, double_op)),
        );
    }

    fn add_binary(
        &mut self,
        name: &'static str,
        description: &'static str,
        integer_op: Option<fn(i32, i32) -> i32>,
        double_op: Option<fn(f64, f64) -> f64>,
    ) {
        self.add(
            name,
            OperationFactory::Binary(BinaryOperationFactory::new(name, description, integer_op, double_op)),
        );
    }

    fn add_default_operations(&mut self) {
        self.add_unary(
            "abs",
            "Computes the absolute value of a value.",
            Some(i32::wrapping_abs),
            Some(f64::abs),
        );
        self.add_unary(
            "sin",
            "Computes the trigonometric sine of an angle (rad).",
            None,
            Some(f64::sin),
        );
        self.add_unary(
            "cos",
            "Computes the trigonometric cosine of an angle (rad).",
            None,
            Some(f64::cos),
        );
        self.add_unary(
            "tan",
            "Computes the trigonometric tangent of an angle (rad).",
            None,
            Some(f64::tan),
        );
        self.add_unary(
            "asin",
            "Computes the arc sine of a value; the angle is in the range -pi/2 through pi/2.",
            None,
            Some(f64::asin),
        );
        self.add_unary(
            "acos",
            "Computes the arc cosine of a value; the angle is in the range 0 through pi.",
            None,
            Some(f64::acos),
        );
        self.add_unary(
            "atan",
            "Computes the arc tangent of a value; the angle is in the range -pi/2 through pi/2.",
            None,
            Some(f64::atan),
        );
        self.add_binary(
            "atan2",
            "Computes the angle theta of the polar form of the coordinates (x, y), in the range -pi to pi.",
            None,
            Some(f64::atan2),
        );
        self.add_unary(
            "exp",
            "Computes the base-e exponential function of a value.",
            None,
            Some(f64::exp),
        );
        self.add_unary(
            "log",
            "Computes the natural logarithm (base e) of a value.",
            None,
            Some(f64::ln),
        );
        self.add_unary(
            "log10",
            "Computes the base 10 logarithm of a value.",
            None,
            Some(f64::log10),
        );
        self.add_unary(
            "sqrt",
            "Computes the square root of a value.",
            None,
            Some(f64::sqrt),
        );
        self.add_binary(
            "pow",
            "Computes the value of the first value raised to the power of the second value.",
            None,
            Some(f64::powf),
        );
        self.add_binary(
            "max",
            "Computes the maximum of two values.",
            Some(i32::max),
            Some(f64::max),
        );
        self.add_binary(
            "min",
            "Computes the minimum of two values.",
            Some(i32::min),
            Some(f64::min),
        );
        self.add_unary("sign", "Computes the sign of a value.", None, Some(f64::signum));

        self.operators.insert(
            EquationSymbol::Plus,
            OperationFactory::Binary(BinaryOperationFactory::new(
                "add",
                "Performs an addition.",
                Some(i32::wrapping_add),
                Some(|a, b| a + b),
            )),
        );
        self.operators.insert(
            EquationSymbol::Minus,
            OperationFactory::Binary(BinaryOperationFactory::new(
                "subtract",
                "Performs a subtraction.",
                Some(i32::wrapping_sub),
                Some(|a, b| a - b),
            )),
        );
        self.operators.insert(
            EquationSymbol::Times,
            OperationFactory::Binary(BinaryOperationFactory::new(
                "multiply",
                "Performs a multiplication.",
                Some(i32::wrapping_mul),
                Some(|a, b| a * b),
            )),
        );
        self.operators.insert(
            EquationSymbol::Divide,
            OperationFactory::Binary(BinaryOperationFactory::new(
                "divide",
                "Performs a division.",
                // Evaluation has no error channel; a zero divisor yields 0.
                Some(|a, b| if b == 0 { 0 } else { i32::wrapping_div(a, b) }),
                Some(|a, b| a / b),
            )),
        );
        self.operators.insert(
            EquationSymbol::Power,
            OperationFactory::Binary(BinaryOperationFactory::new(
                "pow",
                "Computes the value of the first value raised to the power of the second value.",
                None,
                Some(f64::powf),
            )),
        );
        self.operators
            .insert(EquationSymbol::Assign, OperationFactory::Assignment(AssignmentOperationFactory));
    }
}

impl Default for OperationLibrary {
    fn default() -> Self {
        OperationLibrary::new()
    }
}
