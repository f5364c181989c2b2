//! Core types and configuration for typeswitch.
//!
//! This crate provides the foundational data structures used across all typeswitch crates:
//! - [`types`]: Static Go types, method sets, and interface shapes
//! - [`package`]: The [`Package`](package::Package) model a front-end hands to the analysis
//! - [`syntax`]: Resolved syntax of one compilation unit, with static types attached
//! - [`config`]: Configuration loading from `typeswitch.json`

pub mod config;
pub mod package;
pub mod syntax;
pub mod types;
