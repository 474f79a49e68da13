//! FILENAME: registry/src/lib.rs
//! PURPOSE: Library root for the named-variable store.
//! CONTEXT: A running simulation or log playback publishes its signals as
//! named numeric variables. This crate holds those variables: each one is a
//! mutable double or integer cell, optionally paired with a recorded-history
//! buffer so consumers can re-read (or rewrite) past values by index.
//!
//! Every read and write takes an explicit `AccessMode` selecting the live
//! cell or a recorded index. There is no stateful "history mode" toggle.

pub mod registry;
pub mod variable;

// Re-export commonly used types at the crate root
pub use registry::{NamedVariable, VariableRegistry};
pub use variable::{AccessMode, DoubleVariable, IntegerVariable};
