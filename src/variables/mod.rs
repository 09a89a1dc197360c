//! Variables module for the request engine
//!
//! This module provides `{{name}}` substitution from an environment's
//! variables and diagnostics for placeholders left unresolved.

pub mod substitution;

pub use substitution::{substitute, substitute_variables, unresolved_placeholders};
