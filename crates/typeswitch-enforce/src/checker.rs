use typeswitch_core::syntax::{CaseClause, TypeSwitchStmt};

use crate::classifier::EnumRegistration;
use crate::types::Implementor;

/// A `default` clause anywhere makes the switch exhaustive.
pub fn has_default(sw: &TypeSwitchStmt) -> bool {
    sw.clauses.iter().any(CaseClause::is_default)
}

/// Whether `clause` matches `implementor`: a default clause matches
/// everything, otherwise one listed type must be identical to it.
pub fn covers(clause: &CaseClause, implementor: &Implementor) -> bool {
    match &clause.list {
        None => true,
        Some(list) => list
            .iter()
            .any(|expr| expr.ty.as_ref() == Some(&implementor.ty)),
    }
}

/// Implementors of `registration` that no clause of `sw` covers, in
/// registration order.
pub fn missing_implementors<'r>(
    sw: &TypeSwitchStmt,
    registration: &'r EnumRegistration,
) -> Vec<&'r Implementor> {
    if has_default(sw) {
        return vec![];
    }
    registration
        .implementors()
        .iter()
        .filter(|imp| !sw.clauses.iter().any(|c| covers(c, imp)))
        .collect()
}
