//! Output formatters for typeswitch command results.
//!
//! Provides two output modes:
//! - **Human** (default): vet-style `file:line:col: message` lines
//! - **JSON** (`--json`): the serialized result structs

pub mod human;
pub mod json;

use typeswitch_enforce::types::{CheckResult, EnumsResult};

pub trait OutputFormatter {
    fn format_check(&self, result: &CheckResult) -> String;
    fn format_enums(&self, result: &EnumsResult) -> String;
}
