use typeswitch_core::syntax::TypeSwitchStmt;

use crate::classifier::EnumRegistration;
use crate::types::{Diagnostic, Implementor, NON_EXHAUSTIVE_CODE};

/// One diagnostic for a switch with uncovered implementors, anchored at the
/// `switch` keyword. Nothing when every implementor is covered.
pub fn report(
    sw: &TypeSwitchStmt,
    registration: &EnumRegistration,
    missing: &[&Implementor],
) -> Option<Diagnostic> {
    if missing.is_empty() {
        return None;
    }
    let ids: Vec<String> = missing.iter().map(|i| i.id.clone()).collect();
    Some(Diagnostic {
        code: NON_EXHAUSTIVE_CODE.to_string(),
        pos: sw.pos.clone(),
        message: format!("type {} does not appear in any cases", ids.join(",")),
        interface: registration.interface().to_string(),
        missing: ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::build_enum_table;
    use crate::fixtures;

    #[test]
    fn test_message_lists_missing_in_order() {
        let table = build_enum_table(&fixtures::zoo());
        let reg = table.get(&fixtures::animal_shape()).unwrap();
        let sw = fixtures::switch_at(9, fixtures::animal_ty(), vec![]);
        let missing: Vec<&Implementor> = reg.implementors().iter().collect();

        let d = report(&sw, reg, &missing).unwrap();
        assert_eq!(d.message, "type Bird,Cat,Dog does not appear in any cases");
        assert_eq!(d.pos.line, 9);
        assert_eq!(d.code, "TS001");
        assert_eq!(d.interface, "Animal");
        assert_eq!(d.missing, vec!["Bird", "Cat", "Dog"]);
    }

    #[test]
    fn test_nothing_missing_reports_nothing() {
        let table = build_enum_table(&fixtures::zoo());
        let reg = table.get(&fixtures::animal_shape()).unwrap();
        let sw = fixtures::switch_at(9, fixtures::animal_ty(), vec![]);
        assert!(report(&sw, reg, &[]).is_none());
    }
}
