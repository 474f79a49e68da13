//! FILENAME: equation/src/manager.rs
//! PURPOSE: Owns a named set of compiled equations over one registry.
//! CONTEXT: The manager is the tick-level entry point: definitions go in,
//! compiled equations come out, and `compute_all` re-evaluates every one of
//! them in insertion order each cycle. Insertion order is the dependency
//! order, so an equation may read what an earlier one wrote. Definitions
//! that fail to compile are skipped with a warning rather than taking the
//! whole set down.

use log::warn;

use crate::definition::EquationDefinition;
use crate::equation::Equation;
use crate::error::EquationError;
use crate::library::OperationLibrary;
use crate::parser::EquationParser;
use registry::VariableRegistry;

struct ManagedEquation {
    definition: EquationDefinition,
    equation: Equation,
}

/// Compiles and re-evaluates a set of named equations against a shared
/// variable registry.
pub struct EquationManager {
    registry: VariableRegistry,
    library: OperationLibrary,
    equations: Vec<ManagedEquation>,
}

impl EquationManager {
    pub fn new(registry: VariableRegistry) -> Self {
        EquationManager {
            registry,
            library: OperationLibrary::new(),
            equations: Vec::new(),
        }
    }

    pub fn with_library(registry: VariableRegistry, library: OperationLibrary) -> Self {
        EquationManager {
            registry,
            library,
            equations: Vec::new(),
        }
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn library_mut(&mut self) -> &mut OperationLibrary {
        &mut self.library
    }

    /// Compiles one definition and adds it to the set. A definition reusing
    /// an existing name replaces the old equation in place, keeping its
    /// evaluation slot.
    pub fn add_equation(&mut self, definition: EquationDefinition) -> Result<(), EquationError> {
        let mut parser = EquationParser::with_library(self.library.clone());
        parser.alias_manager_mut().add_registry(&self.registry);
        for alias in &definition.aliases {
            alias.apply_to(parser.alias_manager_mut())?;
        }

        let equation = parser.parse(&definition.equation)?;
        let managed = ManagedEquation { definition, equation };

        match self
            .equations
            .iter()
            .position(|existing| existing.definition.name == managed.definition.name)
        {
            Some(index) => {
                warn!(
                    "replacing equation '{}' with a new definition",
                    managed.definition.name
                );
                self.equations[index] = managed;
            }
            None => self.equations.push(managed),
        }
        Ok(())
    }

    /// Compiles a batch of definitions, skipping any that fail.
    pub fn add_equations(&mut self, definitions: impl IntoIterator<Item = EquationDefinition>) {
        for definition in definitions {
            let name = definition.name.clone();
            if let Err(error) = self.add_equation(definition) {
                warn!("skipping equation '{}': {}", name, error);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Equation> {
        self.equations
            .iter()
            .find(|managed| managed.definition.name == name)
            .map(|managed| &managed.equation)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self
            .equations
            .iter()
            .position(|managed| managed.definition.name == name)
        {
            Some(index) => {
                self.equations.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn equations(&self) -> impl Iterator<Item = (&str, &Equation)> {
        self.equations
            .iter()
            .map(|managed| (managed.definition.name.as_str(), &managed.equation))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &EquationDefinition> {
        self.equations.iter().map(|managed| &managed.definition)
    }

    /// Evaluates every equation once against the live values.
    pub fn compute_all(&self) {
        for managed in &self.equations {
            managed.equation.compute();
        }
    }

    /// Evaluates every equation against one recorded history index.
    pub fn compute_all_at(&self, index: usize) {
        for managed in &self.equations {
            managed.equation.compute_at(index);
        }
    }

    /// Recomputes every history entry the registry has recorded, so
    /// equation outputs backfill after data is loaded or edited.
    pub fn update_history(&self) {
        for index in 0..self.registry.history_len() {
            self.compute_all_at(index);
        }
    }
}
