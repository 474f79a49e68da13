//! FILENAME: equation/src/definition.rs
//! PURPOSE: Serializable descriptions of equations and their aliases.
//! CONTEXT: A definition is the persisted form of an equation: the source
//! text plus the alias declarations it needs, with none of the live state
//! (cells, registries, bound operations). Definitions round-trip through
//! JSON and are replayed against a parser to obtain a runnable equation.

use serde::{Deserialize, Serialize};

use crate::alias::AliasManager;
use crate::error::EquationBuildError;

/// One alias declaration an equation depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AliasDefinition {
    DoubleConstant { name: String, value: f64 },
    IntegerConstant { name: String, value: i32 },
    DoubleVariable { name: String, initial: f64 },
    IntegerVariable { name: String, initial: i32 },
    /// Binds `name` to a registry variable found by `path` (a full
    /// namespaced path or a unique simple name).
    RegistryVariable { name: String, path: String },
}

impl AliasDefinition {
    pub fn name(&self) -> &str {
        match self {
            AliasDefinition::DoubleConstant { name, .. }
            | AliasDefinition::IntegerConstant { name, .. }
            | AliasDefinition::DoubleVariable { name, .. }
            | AliasDefinition::IntegerVariable { name, .. }
            | AliasDefinition::RegistryVariable { name, .. } => name,
        }
    }

    /// Declares this alias on a live alias table.
    pub fn apply_to(&self, aliases: &mut AliasManager) -> Result<(), EquationBuildError> {
        match self {
            AliasDefinition::DoubleConstant { name, value } => {
                aliases.add_double_constant(name, *value)?;
            }
            AliasDefinition::IntegerConstant { name, value } => {
                aliases.add_integer_constant(name, *value)?;
            }
            AliasDefinition::DoubleVariable { name, initial } => {
                aliases.add_double_variable(name, *initial)?;
            }
            AliasDefinition::IntegerVariable { name, initial } => {
                aliases.add_integer_variable(name, *initial)?;
            }
            AliasDefinition::RegistryVariable { name, path } => {
                aliases.add_registry_variable(name, path)?;
            }
        }
        Ok(())
    }
}

/// Serializable equation: source text plus alias declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationDefinition {
    pub name: String,
    pub description: Option<String>,
    pub equation: String,
    #[serde(default)]
    pub aliases: Vec<AliasDefinition>,
}

impl EquationDefinition {
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        EquationDefinition {
            name: name.into(),
            description: None,
            equation: equation.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alias(mut self, alias: AliasDefinition) -> Self {
        self.aliases.push(alias);
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}
