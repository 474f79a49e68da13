//! FILENAME: equation/src/operation.rs
//! PURPOSE: Bound operations and the factories that create them.
//! CONTEXT: A factory is a stateless value-type template: it carries an
//! optional integer implementation and an optional double implementation
//! (at most one absent) and, at bind time, matches the operand kinds
//! exhaustively to pick one. Binding produces an immutable
//! `EquationOperation` owning a fresh result input that only it writes.
//! "Duplicating" a factory is an ordinary `clone()`; there is no shared
//! mutable factory state to reason about.

use smallvec::{smallvec, SmallVec};

use registry::AccessMode;

use crate::error::EquationBuildError;
use crate::input::{EquationInput, InputKind};

/// The resolved implementation a bound operation runs.
#[derive(Debug, Clone, Copy)]
enum Kernel {
    UnaryInteger(fn(i32) -> i32),
    UnaryDouble(fn(f64) -> f64),
    BinaryInteger(fn(i32, i32) -> i32),
    BinaryDouble(fn(f64, f64) -> f64),
    AssignInteger,
    AssignDouble,
}

/// An already-resolved computation node: a name, the ordered inputs it
/// reads, and the one result input it writes.
#[derive(Debug, Clone)]
pub struct EquationOperation {
    name: String,
    inputs: SmallVec<[EquationInput; 2]>,
    result: EquationInput,
    kernel: Kernel,
}

impl EquationOperation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[EquationInput] {
        &self.inputs
    }

    pub fn result(&self) -> &EquationInput {
        &self.result
    }

    /// Runs the bound implementation once, writing this operation's result.
    pub fn execute(&self, mode: AccessMode) {
        match self.kernel {
            Kernel::UnaryInteger(op) => {
                let a = self.inputs[0].get_integer(mode);
                self.result.set_integer(mode, op(a));
            }
            Kernel::UnaryDouble(op) => {
                let a = self.inputs[0].get_double(mode);
                self.result.set_double(mode, op(a));
            }
            Kernel::BinaryInteger(op) => {
                let a = self.inputs[0].get_integer(mode);
                let b = self.inputs[1].get_integer(mode);
                self.result.set_integer(mode, op(a, b));
            }
            Kernel::BinaryDouble(op) => {
                let a = self.inputs[0].get_double(mode);
                let b = self.inputs[1].get_double(mode);
                self.result.set_double(mode, op(a, b));
            }
            Kernel::AssignInteger => {
                let value = self.inputs[0].get_integer(mode);
                self.result.set_integer(mode, value);
            }
            Kernel::AssignDouble => {
                let value = self.inputs[0].get_double(mode);
                self.result.set_double(mode, value);
            }
        }
    }
}

/// Template for single-input functions like `sin` or `abs`.
#[derive(Debug, Clone)]
pub struct UnaryOperationFactory {
    name: &'static str,
    description: &'static str,
    integer_op: Option<fn(i32) -> i32>,
    double_op: Option<fn(f64) -> f64>,
}

impl UnaryOperationFactory {
    pub fn new(
        name: &'static str,
        description: &'static str,
        integer_op: Option<fn(i32) -> i32>,
        double_op: Option<fn(f64) -> f64>,
    ) -> Self {
        debug_assert!(integer_op.is_some() || double_op.is_some());
        UnaryOperationFactory { name, description, integer_op, double_op }
    }

    pub fn build(&self, a: EquationInput) -> Result<EquationOperation, EquationBuildError> {
        if a.kind() == InputKind::Integer {
            if let Some(op) = self.integer_op {
                return Ok(EquationOperation {
                    name: format!("{}-i", self.name),
                    result: EquationInput::new_variable(InputKind::Integer),
                    inputs: smallvec![a],
                    kernel: Kernel::UnaryInteger(op),
                });
            }
        }

        if let Some(op) = self.double_op {
            return Ok(EquationOperation {
                name: format!("{}-d", self.name),
                result: EquationInput::new_variable(InputKind::Double),
                inputs: smallvec![a],
                kernel: Kernel::UnaryDouble(op),
            });
        }

        Err(EquationBuildError::UnsupportedOperandKinds {
            operation: self.name,
            kinds: vec![a.kind()],
        })
    }
}

/// Template for two-input functions and the arithmetic operators.
#[derive(Debug, Clone)]
pub struct BinaryOperationFactory {
    name: &'static str,
    description: &'static str,
    integer_op: Option<fn(i32, i32) -> i32>,
    double_op: Option<fn(f64, f64) -> f64>,
}

impl BinaryOperationFactory {
    pub fn new(
        name: &'static str,
        description: &'static str,
        integer_op: Option<fn(i32, i32) -> i32>,
        double_op: Option<fn(f64, f64) -> f64>,
    ) -> Self {
        debug_assert!(integer_op.is_some() || double_op.is_some());
        BinaryOperationFactory { name, description, integer_op, double_op }
    }

    /// Integer-kind operands with an integer implementation stay integer;
    /// any double operand promotes the whole operation to double.
    pub fn build(
        &self,
        a: EquationInput,
        b: EquationInput,
    ) -> Result<EquationOperation, EquationBuildError> {
        if a.kind() == InputKind::Integer && b.kind() == InputKind::Integer {
            if let Some(op) = self.integer_op {
                return Ok(EquationOperation {
                    name: format!("{}-ii", self.name),
                    result: EquationInput::new_variable(InputKind::Integer),
                    inputs: smallvec![a, b],
                    kernel: Kernel::BinaryInteger(op),
                });
            }
        }

        if let Some(op) = self.double_op {
            return Ok(EquationOperation {
                name: format!("{}-dd", self.name),
                result: EquationInput::new_variable(InputKind::Double),
                inputs: smallvec![a, b],
                kernel: Kernel::BinaryDouble(op),
            });
        }

        Err(EquationBuildError::UnsupportedOperandKinds {
            operation: self.name,
            kinds: vec![a.kind(), b.kind()],
        })
    }
}

/// Template for the `=` operation: writes the right-hand value into a
/// previously declared variable instead of a fresh result.
#[derive(Debug, Clone, Default)]
pub struct AssignmentOperationFactory;

impl AssignmentOperationFactory {
    pub fn build(
        &self,
        target: EquationInput,
        value: EquationInput,
    ) -> Result<EquationOperation, EquationBuildError> {
        if !target.is_variable() {
            return Err(EquationBuildError::InvalidAssignmentTarget(target.to_string()));
        }

        match (target.kind(), value.kind()) {
            (InputKind::Integer, InputKind::Integer) => Ok(EquationOperation {
                name: "assign-ii".to_string(),
                inputs: smallvec![value],
                result: target,
                kernel: Kernel::AssignInteger,
            }),
            (InputKind::Double, _) => Ok(EquationOperation {
                name: "assign-dd".to_string(),
                inputs: smallvec![value],
                result: target,
                kernel: Kernel::AssignDouble,
            }),
            (InputKind::Integer, InputKind::Double) => {
                Err(EquationBuildError::UnsupportedOperandKinds {
                    operation: "assign",
                    kinds: vec![InputKind::Integer, InputKind::Double],
                })
            }
        }
    }
}

/// Any of the three factory shapes, as stored in the operation library.
#[derive(Debug, Clone)]
pub enum OperationFactory {
    Unary(UnaryOperationFactory),
    Binary(BinaryOperationFactory),
    Assignment(AssignmentOperationFactory),
}

impl OperationFactory {
    pub fn name(&self) -> &'static str {
        match self {
            OperationFactory::Unary(factory) => factory.name,
            OperationFactory::Binary(factory) => factory.name,
            OperationFactory::Assignment(_) => "assign",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OperationFactory::Unary(factory) => factory.description,
            OperationFactory::Binary(factory) => factory.description,
            OperationFactory::Assignment(_) => {
                "Assigns the value of the right hand side to the left hand side."
            }
        }
    }

    pub fn input_count(&self) -> usize {
        match self {
            OperationFactory::Unary(_) => 1,
            OperationFactory::Binary(_) | OperationFactory::Assignment(_) => 2,
        }
    }

    /// Binds this template to concrete inputs, checking arity.
    pub fn build(
        &self,
        mut inputs: Vec<EquationInput>,
    ) -> Result<EquationOperation, EquationBuildError> {
        if inputs.len() != self.input_count() {
            return Err(EquationBuildError::WrongInputCount {
                operation: self.name(),
                expected: self.input_count(),
                actual: inputs.len(),
            });
        }

        match self {
            OperationFactory::Unary(factory) => {
                let a = inputs.remove(0);
                factory.build(a)
            }
            OperationFactory::Binary(factory) => {
                let b = inputs.remove(1);
                let a = inputs.remove(0);
                factory.build(a, b)
            }
            OperationFactory::Assignment(factory) => {
                let value = inputs.remove(1);
                let target = inputs.remove(0);
                factory.build(target, value)
            }
        }
    }
}
