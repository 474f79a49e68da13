//! FILENAME: equation/src/alias.rs
//! PURPOSE: Maps identifier names to equation inputs.
//! CONTEXT: The alias table is consulted when the parser needs a word
//! token as an operand. It is seeded with the built-in constants (pi, e),
//! extended by the caller with constants, free variables, or variables
//! resolved from attached registries, and duplicated cheaply per parse:
//! a duplicate shares the underlying value cells but not the table itself,
//! so later registrations never leak between compilations.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use registry::{NamedVariable, VariableRegistry};

use crate::error::EquationBuildError;
use crate::input::{EquationInput, InputKind};

/// Built-in constants, always resolvable.
static DEFAULT_ALIASES: Lazy<FxHashMap<&'static str, f64>> = Lazy::new(|| {
    let mut aliases = FxHashMap::default();
    aliases.insert("pi", std::f64::consts::PI);
    aliases.insert("e", std::f64::consts::E);
    aliases
});

#[derive(Debug, Clone, Default)]
pub struct AliasManager {
    user_aliases: FxHashMap<String, EquationInput>,
    registries: Vec<VariableRegistry>,
}

impl AliasManager {
    pub fn new() -> Self {
        AliasManager::default()
    }

    /// Attaches a named-variable registry so aliases can bind against
    /// externally owned cells.
    pub fn add_registry(&mut self, registry: &VariableRegistry) {
        self.registries.push(registry.clone());
    }

    /// An independent table with the same entries. Value cells stay
    /// shared; that is the point of handing an input out as an alias.
    pub fn duplicate(&self) -> AliasManager {
        self.clone()
    }

    /// Resolves a name: user-registered aliases shadow the built-ins.
    pub fn get(&self, name: &str) -> Option<EquationInput> {
        if let Some(input) = self.user_aliases.get(name) {
            return Some(input.clone());
        }
        DEFAULT_ALIASES
            .get(name)
            .map(|&value| EquationInput::DoubleConstant(value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn add_double_constant(&mut self, name: &str, value: f64) -> Result<EquationInput, EquationBuildError> {
        self.add_alias(name, EquationInput::DoubleConstant(value))
    }

    pub fn add_integer_constant(&mut self, name: &str, value: i32) -> Result<EquationInput, EquationBuildError> {
        self.add_alias(name, EquationInput::IntegerConstant(value))
    }

    /// Declares a fresh zero-initialized variable of the given kind and
    /// returns a handle onto it; the caller keeps the handle to read or
    /// drive the value between evaluations.
    pub fn add_variable(&mut self, name: &str, kind: InputKind) -> Result<EquationInput, EquationBuildError> {
        self.add_alias(name, EquationInput::new_variable(kind))
    }

    pub fn add_double_variable(&mut self, name: &str, initial: f64) -> Result<EquationInput, EquationBuildError> {
        self.add_alias(name, EquationInput::double_variable(initial))
    }

    pub fn add_integer_variable(&mut self, name: &str, initial: i32) -> Result<EquationInput, EquationBuildError> {
        self.add_alias(name, EquationInput::integer_variable(initial))
    }

    /// Binds `name` to the registry variable found under `path`
    /// (a full namespaced path, or a bare unambiguous simple name).
    pub fn add_registry_variable(&mut self, name: &str, path: &str) -> Result<EquationInput, EquationBuildError> {
        let found = self
            .registries
            .iter()
            .find_map(|registry| registry.find(path))
            .ok_or_else(|| EquationBuildError::VariableNotFound(path.to_string()))?;

        let input = match found {
            NamedVariable::Double(variable) => EquationInput::RegistryDouble(variable),
            NamedVariable::Integer(variable) => EquationInput::RegistryInteger(variable),
        };
        self.add_alias(name, input)
    }

    /// Registers an alias; rebinding an existing name is an error.
    pub fn add_alias(&mut self, name: &str, input: EquationInput) -> Result<EquationInput, EquationBuildError> {
        if self.user_aliases.contains_key(name) {
            return Err(EquationBuildError::DuplicateAlias(name.to_string()));
        }
        self.user_aliases.insert(name.to_string(), input.clone());
        Ok(input)
    }

    /// Names of all user-registered aliases, for definition round trips.
    pub fn user_aliases(&self) -> impl Iterator<Item = (&str, &EquationInput)> {
        self.user_aliases.iter().map(|(name, input)| (name.as_str(), input))
    }
}
