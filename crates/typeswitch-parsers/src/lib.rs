//! Go front-end for typeswitch.
//!
//! Turns Go source into the resolved [`PackageUnit`](typeswitch_core::package::PackageUnit)
//! the analysis consumes:
//! - [`treesitter`]: tree-sitter-go parsing
//! - [`queries`]: top-level declaration queries
//! - [`go`]: package loading, import resolution, and static type inference
//! - [`walker`]: package directory discovery

pub mod queries;
pub mod treesitter;
pub mod walker;

pub mod go;
