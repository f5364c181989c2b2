use serde::{Deserialize, Serialize};
use typeswitch_core::types::{Position, Type};

/// Code attached to every non-exhaustive switch diagnostic.
pub const NON_EXHAUSTIVE_CODE: &str = "TS001";

/// One non-exhaustive type switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub pos: Position,
    pub message: String,
    /// Identifier of the enum-like interface the subject resolved to.
    pub interface: String,
    /// Identifiers of the implementors no clause covers, in registration order.
    pub missing: Vec<String>,
}

/// A known implementor of an enum-like interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementor {
    /// Fully-qualified object identifier.
    pub id: String,
    /// The declared type, compared against case clause types.
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub version: String,
    pub command: String,
    pub status: String, // "ok" | "issues" | "error"
    pub packages_analyzed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<PackageError>,
}

/// A package whose analysis failed. Other packages are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageError {
    pub package: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumsResult {
    pub version: String,
    pub command: String,
    pub packages: Vec<PackageEnums>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageEnums {
    pub package: String,
    pub enums: Vec<EnumEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumEntry {
    pub interface: String,
    /// Package that declared the interface: the analyzed one or a direct import.
    pub source_package: String,
    pub shape: String,
    pub implementors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The front-end handed over a switch guard that is neither `x.(type)`
    /// nor `v := x.(type)`.
    #[error("{pos}: unsupported type switch guard: {detail}")]
    UnsupportedConstruct { pos: Position, detail: String },
}

impl CheckResult {
    pub fn status_for(diagnostics: &[Diagnostic], errors: &[PackageError]) -> &'static str {
        if !errors.is_empty() {
            "error"
        } else if !diagnostics.is_empty() {
            "issues"
        } else {
            "ok"
        }
    }
}
