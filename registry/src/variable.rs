//! FILENAME: registry/src/variable.rs
//! PURPOSE: Shared mutable numeric cells with recorded history.
//! CONTEXT: A `DoubleVariable`/`IntegerVariable` is a cheap handle onto
//! shared state; cloning a handle aliases the same cell. The live value and
//! the history buffer are addressed through `AccessMode` so a caller batch
//! recomputing over recorded data passes the index into every access
//! instead of flipping a mode flag it could forget to reset.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Selects which value a variable access targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// The current value of the cell.
    Live,
    /// The recorded value at this history index.
    History(usize),
}

struct DoubleState {
    value: Cell<f64>,
    history: RefCell<Vec<f64>>,
}

/// A named double cell. Clones share the same underlying state.
#[derive(Clone)]
pub struct DoubleVariable {
    name: String,
    state: Rc<DoubleState>,
}

impl DoubleVariable {
    pub fn new(name: impl Into<String>, initial: f64) -> Self {
        DoubleVariable {
            name: name.into(),
            state: Rc::new(DoubleState {
                value: Cell::new(initial),
                history: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Full (possibly namespaced) name of this variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the live value, or a recorded one. Out-of-range history
    /// indices yield NaN; evaluation has no error channel.
    pub fn get(&self, mode: AccessMode) -> f64 {
        match mode {
            AccessMode::Live => self.state.value.get(),
            AccessMode::History(index) => {
                self.state.history.borrow().get(index).copied().unwrap_or(f64::NAN)
            }
        }
    }

    /// Writes the live value, or overwrites a recorded one. Writing past
    /// the end of the history grows it, padding with NaN.
    pub fn set(&self, mode: AccessMode, value: f64) {
        match mode {
            AccessMode::Live => self.state.value.set(value),
            AccessMode::History(index) => {
                let mut history = self.state.history.borrow_mut();
                if index >= history.len() {
                    history.resize(index + 1, f64::NAN);
                }
                history[index] = value;
            }
        }
    }

    /// Appends the live value to the history buffer.
    pub fn record(&self) {
        let value = self.state.value.get();
        self.state.history.borrow_mut().push(value);
    }

    pub fn history_len(&self) -> usize {
        self.state.history.borrow().len()
    }

    pub fn clear_history(&self) {
        self.state.history.borrow_mut().clear();
    }
}

struct IntegerState {
    value: Cell<i32>,
    history: RefCell<Vec<i32>>,
}

/// A named integer cell. Clones share the same underlying state.
#[derive(Clone)]
pub struct IntegerVariable {
    name: String,
    state: Rc<IntegerState>,
}

impl IntegerVariable {
    pub fn new(name: impl Into<String>, initial: i32) -> Self {
        IntegerVariable {
            name: name.into(),
            state: Rc::new(IntegerState {
                value: Cell::new(initial),
                history: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the live value, or a recorded one. Out-of-range history
    /// indices yield 0.
    pub fn get(&self, mode: AccessMode) -> i32 {
        match mode {
            AccessMode::Live => self.state.value.get(),
            AccessMode::History(index) => {
                self.state.history.borrow().get(index).copied().unwrap_or(0)
            }
        }
    }

    pub fn set(&self, mode: AccessMode, value: i32) {
        match mode {
            AccessMode::Live => self.state.value.set(value),
            AccessMode::History(index) => {
                let mut history = self.state.history.borrow_mut();
                if index >= history.len() {
                    history.resize(index + 1, 0);
                }
                history[index] = value;
            }
        }
    }

    pub fn record(&self) {
        let value = self.state.value.get();
        self.state.history.borrow_mut().push(value);
    }

    pub fn history_len(&self) -> usize {
        self.state.history.borrow().len()
    }

    pub fn clear_history(&self) {
        self.state.history.borrow_mut().clear();
    }
}

impl std::fmt::Debug for DoubleVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DoubleVariable({} = {})", self.name, self.get(AccessMode::Live))
    }
}

impl std::fmt::Debug for IntegerVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IntegerVariable({} = {})", self.name, self.get(AccessMode::Live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_value_is_shared_between_clones() {
        let a = DoubleVariable::new("a", 1.0);
        let b = a.clone();
        b.set(AccessMode::Live, 2.5);
        assert_eq!(a.get(AccessMode::Live), 2.5);
    }

    #[test]
    fn record_and_read_back_history() {
        let v = DoubleVariable::new("v", 0.0);
        for i in 0..4 {
            v.set(AccessMode::Live, i as f64);
            v.record();
        }
        assert_eq!(v.history_len(), 4);
        assert_eq!(v.get(AccessMode::History(2)), 2.0);
        assert!(v.get(AccessMode::History(10)).is_nan());
    }

    #[test]
    fn history_write_grows_buffer() {
        let v = IntegerVariable::new("v", 0);
        v.set(AccessMode::History(3), 7);
        assert_eq!(v.history_len(), 4);
        assert_eq!(v.get(AccessMode::History(3)), 7);
        assert_eq!(v.get(AccessMode::History(0)), 0);
    }
}
