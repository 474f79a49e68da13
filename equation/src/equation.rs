//! FILENAME: equation/src/equation.rs
//! PURPOSE: The compiled form of an equation.
//! CONTEXT: Parsing flattens all structure into an ordered list of bound
//! operations; executing the list front-to-back always produces the result,
//! because every operation's inputs were produced by earlier operations or
//! existed before the parse. An `Equation` is immutable once built and is
//! meant to be re-evaluated every simulation/playback tick without
//! re-parsing. Evaluation has no error channel: NaN and infinities are
//! ordinary values.

use registry::AccessMode;

use crate::input::{EquationInput, Scalar};
use crate::operation::EquationOperation;

#[derive(Debug, Clone)]
pub struct Equation {
    text: String,
    operations: Vec<EquationOperation>,
    result: EquationInput,
}

impl Equation {
    pub(crate) fn new(text: &str, operations: Vec<EquationOperation>, result: EquationInput) -> Self {
        Equation {
            text: text.to_string(),
            operations,
            result,
        }
    }

    /// The original string this equation was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn operations(&self) -> &[EquationOperation] {
        &self.operations
    }

    /// Executes the operation list against live values and returns the
    /// result. Idempotent as long as no referenced variable changes.
    pub fn compute(&self) -> Scalar {
        self.execute(AccessMode::Live)
    }

    /// Executes the operation list against recorded values at the given
    /// history index. Registry-backed inputs read (and the assignment
    /// target writes) at that index; everything else behaves as live.
    pub fn compute_at(&self, index: usize) -> Scalar {
        self.execute(AccessMode::History(index))
    }

    /// Typed handle to the output; for an assignment this is the target
    /// variable itself.
    pub fn result_input(&self) -> &EquationInput {
        &self.result
    }

    fn execute(&self, mode: AccessMode) -> Scalar {
        for operation in &self.operations {
            operation.execute(mode);
        }
        self.result.value(mode)
    }
}
