use typeswitch_core::package::{Package, TypeDecl};
use typeswitch_core::types::InterfaceShape;

/// Which declarations of a package are visible to the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every top-level name: the package under analysis.
    All,
    /// Exported names only: a directly imported package.
    Exported,
}

/// A declaration whose underlying shape is an interface.
#[derive(Debug, Clone)]
pub struct InterfaceCandidate<'a> {
    pub id: String,
    pub decl: &'a TypeDecl,
    pub shape: &'a InterfaceShape,
}

/// Any other declaration.
#[derive(Debug, Clone)]
pub struct ConcreteCandidate<'a> {
    pub id: String,
    pub decl: &'a TypeDecl,
}

#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    pub package: &'a str,
    pub interfaces: Vec<InterfaceCandidate<'a>>,
    pub concretes: Vec<ConcreteCandidate<'a>>,
}

/// Partition a package's visible type declarations, keeping declaration order.
pub fn discover_symbols(pkg: &Package, visibility: Visibility) -> Candidates<'_> {
    let mut interfaces = Vec::new();
    let mut concretes = Vec::new();

    for decl in pkg.decls() {
        if visibility == Visibility::Exported && !decl.is_exported() {
            continue;
        }
        let id = pkg.object_id(decl);
        match decl.underlying.as_interface() {
            Some(shape) => interfaces.push(InterfaceCandidate { id, decl, shape }),
            None => concretes.push(ConcreteCandidate { id, decl }),
        }
    }

    Candidates {
        package: &pkg.path,
        interfaces,
        concretes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_partitions_interfaces_and_concretes() {
        let pkg = fixtures::zoo();
        let c = discover_symbols(&pkg, Visibility::All);
        let ifaces: Vec<&str> = c.interfaces.iter().map(|i| i.id.as_str()).collect();
        let concretes: Vec<&str> = c.concretes.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ifaces, vec!["Animal"]);
        assert_eq!(concretes, vec!["Bird", "Cat", "Dog", "Rock"]);
    }

    #[test]
    fn test_exported_visibility_drops_unexported() {
        let pkg = fixtures::sealed();
        let all = discover_symbols(&pkg, Visibility::All);
        let exported = discover_symbols(&pkg, Visibility::Exported);
        assert_eq!(all.concretes.len(), 3);
        assert_eq!(exported.concretes.len(), 2);
        assert!(exported
            .concretes
            .iter()
            .all(|c| c.decl.is_exported()));
    }

    #[test]
    fn test_unexported_ids_are_qualified() {
        let pkg = fixtures::sealed();
        let c = discover_symbols(&pkg, Visibility::All);
        assert!(c
            .concretes
            .iter()
            .any(|c| c.id == format!("{}.hidden", fixtures::SEALED)));
    }

    #[test]
    fn test_empty_package() {
        let pkg = Package::new("empty", "empty", vec![]);
        let c = discover_symbols(&pkg, Visibility::All);
        assert!(c.interfaces.is_empty());
        assert!(c.concretes.is_empty());
        assert_eq!(c.package, "empty");
    }
}
