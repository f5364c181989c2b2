//! Exhaustiveness engine for typeswitch.
//!
//! Finds enum-like interfaces (interfaces with at least two structural
//! implementors in a package or its direct imports) and reports every type
//! switch over one of them that neither lists every implementor nor has a
//! `default` clause:
//! - [`scanner`]: splits a package's type declarations into interface and concrete candidates
//! - [`classifier`]: derives implementors and builds the merged [`EnumTable`](classifier::EnumTable)
//! - [`locator`]: finds type switches and resolves the shape of their subject
//! - [`checker`]: computes the implementors no clause covers
//! - [`reporter`]: turns a non-empty missing set into a [`Diagnostic`](types::Diagnostic)
//! - [`engine`]: the [`Analyzer`](engine::Analyzer) running all of the above

pub mod types;
pub mod scanner;
pub mod classifier;
pub mod locator;
pub mod checker;
pub mod reporter;
pub mod engine;

#[cfg(test)]
mod fixtures;
