//! FILENAME: registry/src/registry.rs
//! PURPOSE: Name-to-variable lookup for the simulation's published signals.
//! CONTEXT: Variables live in namespaces separated by '.', e.g.
//! "robot.leftLeg.kneeAngle". Lookup is exact: a name containing a
//! separator must match the full path; a bare name matches any variable
//! with that simple name, provided it is unambiguous.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::variable::{DoubleVariable, IntegerVariable};

pub const NAMESPACE_SEPARATOR: char = '.';

/// A registered variable, double- or integer-typed.
#[derive(Clone, Debug)]
pub enum NamedVariable {
    Double(DoubleVariable),
    Integer(IntegerVariable),
}

impl NamedVariable {
    pub fn name(&self) -> &str {
        match self {
            NamedVariable::Double(v) => v.name(),
            NamedVariable::Integer(v) => v.name(),
        }
    }

    fn simple_name(&self) -> &str {
        let name = self.name();
        match name.rfind(NAMESPACE_SEPARATOR) {
            Some(at) => &name[at + 1..],
            None => name,
        }
    }
}

#[derive(Debug)]
struct RegistryState {
    variables: RefCell<FxHashMap<String, NamedVariable>>,
}

/// A cheaply cloneable handle onto a shared set of named variables.
/// Registrations through any clone are visible to all clones.
#[derive(Clone, Debug)]
pub struct VariableRegistry {
    state: Rc<RegistryState>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        VariableRegistry {
            state: Rc::new(RegistryState {
                variables: RefCell::new(FxHashMap::default()),
            }),
        }
    }

    /// Registers a new double variable under its full name and returns a
    /// handle onto it. Re-registering a name replaces the previous entry.
    pub fn register_double(&self, name: &str, initial: f64) -> DoubleVariable {
        let variable = DoubleVariable::new(name, initial);
        self.state
            .variables
            .borrow_mut()
            .insert(name.to_string(), NamedVariable::Double(variable.clone()));
        variable
    }

    /// Registers a new integer variable under its full name.
    pub fn register_integer(&self, name: &str, initial: i32) -> IntegerVariable {
        let variable = IntegerVariable::new(name, initial);
        self.state
            .variables
            .borrow_mut()
            .insert(name.to_string(), NamedVariable::Integer(variable.clone()));
        variable
    }

    /// Looks up a variable by name. A namespaced name ("a.b.c") must match
    /// the full path; a bare name matches on the simple name and returns
    /// None when two variables share it.
    pub fn find(&self, name: &str) -> Option<NamedVariable> {
        let variables = self.state.variables.borrow();

        if name.contains(NAMESPACE_SEPARATOR) {
            return variables.get(name).cloned();
        }

        let mut found: Option<NamedVariable> = None;
        for variable in variables.values() {
            if variable.simple_name() == name {
                if found.is_some() {
                    return None; // ambiguous
                }
                found = Some(variable.clone());
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.state.variables.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.variables.borrow().is_empty()
    }

    /// Appends every variable's live value to its history buffer. Called
    /// once per tick by whoever owns the recording loop.
    pub fn record_all(&self) {
        for variable in self.state.variables.borrow().values() {
            match variable {
                NamedVariable::Double(v) => v.record(),
                NamedVariable::Integer(v) => v.record(),
            }
        }
    }

    /// Number of recorded ticks, taken as the longest history present.
    pub fn history_len(&self) -> usize {
        self.state
            .variables
            .borrow()
            .values()
            .map(|variable| match variable {
                NamedVariable::Double(v) => v.history_len(),
                NamedVariable::Integer(v) => v.history_len(),
            })
            .max()
            .unwrap_or(0)
    }

    pub fn clear_history(&self) {
        for variable in self.state.variables.borrow().values() {
            match variable {
                NamedVariable::Double(v) => v.clear_history(),
                NamedVariable::Integer(v) => v.clear_history(),
            }
        }
    }
}

impl Default for VariableRegistry {
    fn default() -> Self {
        VariableRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::AccessMode;

    #[test]
    fn find_by_full_path_and_simple_name() {
        let registry = VariableRegistry::new();
        registry.register_double("robot.knee.angle", 0.5);

        assert!(registry.find("robot.knee.angle").is_some());
        assert!(registry.find("angle").is_some());
        assert!(registry.find("robot.angle").is_none());
        assert!(registry.find("hip").is_none());
    }

    #[test]
    fn ambiguous_simple_name_is_not_found() {
        let registry = VariableRegistry::new();
        registry.register_double("left.angle", 1.0);
        registry.register_double("right.angle", 2.0);

        assert!(registry.find("angle").is_none());
        assert!(registry.find("left.angle").is_some());
    }

    #[test]
    fn clones_share_registrations() {
        let registry = VariableRegistry::new();
        let alias = registry.clone();
        registry.register_integer("ticks", 3);

        match alias.find("ticks") {
            Some(NamedVariable::Integer(v)) => assert_eq!(v.get(AccessMode::Live), 3),
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn record_all_tracks_every_variable() {
        let registry = VariableRegistry::new();
        let x = registry.register_double("x", 1.0);
        let n = registry.register_integer("n", 5);

        registry.record_all();
        x.set(AccessMode::Live, 2.0);
        registry.record_all();

        assert_eq!(registry.history_len(), 2);
        assert_eq!(x.get(AccessMode::History(0)), 1.0);
        assert_eq!(x.get(AccessMode::History(1)), 2.0);
        assert_eq!(n.get(AccessMode::History(1)), 5);
    }
}
