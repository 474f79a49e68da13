//! FILENAME: equation/src/input.rs
//! PURPOSE: Typed value sources and sinks for equation operations.
//! CONTEXT: Every operand and every result of a bound operation is an
//! `EquationInput`. An input's numeric kind (integer or double) is fixed at
//! creation; only variables are mutable in value. Variables are cheap
//! handles onto shared cells, so the parser, the operations reading them,
//! and the caller holding one returned from the alias table all see the
//! same value. Registry-backed inputs own no storage of their own: they
//! forward every access to the named-variable store under an explicit
//! `AccessMode`.

use std::cell::Cell;
use std::rc::Rc;

use registry::{AccessMode, DoubleVariable, IntegerVariable};

/// The two numeric kinds the operation library dispatches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Integer,
    Double,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Integer => write!(f, "integer"),
            InputKind::Double => write!(f, "double"),
        }
    }
}

/// A computed scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Integer(i32),
    Double(f64),
}

impl Scalar {
    pub fn as_double(&self) -> f64 {
        match *self {
            Scalar::Integer(value) => value as f64,
            Scalar::Double(value) => value,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Integer(value) => write!(f, "{}", value),
            Scalar::Double(value) => write!(f, "{}", value),
        }
    }
}

/// A value source/sink usable as an operation input or output.
#[derive(Debug, Clone)]
pub enum EquationInput {
    IntegerConstant(i32),
    DoubleConstant(f64),
    IntegerVariable(Rc<Cell<i32>>),
    DoubleVariable(Rc<Cell<f64>>),
    /// Integer cell owned by the external named-variable store.
    RegistryInteger(IntegerVariable),
    /// Double cell owned by the external named-variable store.
    RegistryDouble(DoubleVariable),
}

impl EquationInput {
    /// Fresh zero-initialized variable of the given kind. Used by the
    /// alias table and as the result input of every bound operation.
    pub fn new_variable(kind: InputKind) -> Self {
        match kind {
            InputKind::Integer => EquationInput::IntegerVariable(Rc::new(Cell::new(0))),
            InputKind::Double => EquationInput::DoubleVariable(Rc::new(Cell::new(0.0))),
        }
    }

    pub fn integer_variable(initial: i32) -> Self {
        EquationInput::IntegerVariable(Rc::new(Cell::new(initial)))
    }

    pub fn double_variable(initial: f64) -> Self {
        EquationInput::DoubleVariable(Rc::new(Cell::new(initial)))
    }

    pub fn kind(&self) -> InputKind {
        match self {
            EquationInput::IntegerConstant(_)
            | EquationInput::IntegerVariable(_)
            | EquationInput::RegistryInteger(_) => InputKind::Integer,
            EquationInput::DoubleConstant(_)
            | EquationInput::DoubleVariable(_)
            | EquationInput::RegistryDouble(_) => InputKind::Double,
        }
    }

    pub fn is_variable(&self) -> bool {
        !matches!(
            self,
            EquationInput::IntegerConstant(_) | EquationInput::DoubleConstant(_)
        )
    }

    /// Reads the value as an integer. Callers go through bind-time kind
    /// resolution first, so a double-kind input is never read this way;
    /// if it were, the value truncates toward zero.
    pub fn get_integer(&self, mode: AccessMode) -> i32 {
        match self {
            EquationInput::IntegerConstant(value) => *value,
            EquationInput::IntegerVariable(cell) => cell.get(),
            EquationInput::RegistryInteger(variable) => variable.get(mode),
            EquationInput::DoubleConstant(value) => *value as i32,
            EquationInput::DoubleVariable(cell) => cell.get() as i32,
            EquationInput::RegistryDouble(variable) => variable.get(mode) as i32,
        }
    }

    /// Reads the value as a double; integer kinds widen losslessly.
    pub fn get_double(&self, mode: AccessMode) -> f64 {
        match self {
            EquationInput::IntegerConstant(value) => *value as f64,
            EquationInput::IntegerVariable(cell) => cell.get() as f64,
            EquationInput::RegistryInteger(variable) => variable.get(mode) as f64,
            EquationInput::DoubleConstant(value) => *value,
            EquationInput::DoubleVariable(cell) => cell.get(),
            EquationInput::RegistryDouble(variable) => variable.get(mode),
        }
    }

    pub fn value(&self, mode: AccessMode) -> Scalar {
        match self.kind() {
            InputKind::Integer => Scalar::Integer(self.get_integer(mode)),
            InputKind::Double => Scalar::Double(self.get_double(mode)),
        }
    }

    /// Writes an integer value. Constants are never written by
    /// construction: operations only write the variable they own.
    pub fn set_integer(&self, mode: AccessMode, value: i32) {
        match self {
            EquationInput::IntegerVariable(cell) => cell.set(value),
            EquationInput::RegistryInteger(variable) => variable.set(mode, value),
            EquationInput::DoubleVariable(cell) => cell.set(value as f64),
            EquationInput::RegistryDouble(variable) => variable.set(mode, value as f64),
            EquationInput::IntegerConstant(_) | EquationInput::DoubleConstant(_) => {
                debug_assert!(false, "write to a constant input")
            }
        }
    }

    pub fn set_double(&self, mode: AccessMode, value: f64) {
        match self {
            EquationInput::DoubleVariable(cell) => cell.set(value),
            EquationInput::RegistryDouble(variable) => variable.set(mode, value),
            EquationInput::IntegerVariable(cell) => cell.set(value as i32),
            EquationInput::RegistryInteger(variable) => variable.set(mode, value as i32),
            EquationInput::IntegerConstant(_) | EquationInput::DoubleConstant(_) => {
                debug_assert!(false, "write to a constant input")
            }
        }
    }
}

impl std::fmt::Display for EquationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquationInput::IntegerConstant(value) => write!(f, "{}", value),
            EquationInput::DoubleConstant(value) => write!(f, "{}", value),
            EquationInput::IntegerVariable(cell) => write!(f, "{}", cell.get()),
            EquationInput::DoubleVariable(cell) => write!(f, "{}", cell.get()),
            EquationInput::RegistryInteger(variable) => write!(f, "{}", variable.name()),
            EquationInput::RegistryDouble(variable) => write!(f, "{}", variable.name()),
        }
    }
}
