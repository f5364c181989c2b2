use serde::{Deserialize, Serialize};

use crate::syntax::SourceFile;
use crate::types::{is_exported, object_id, MethodSet, Type};

/// An immutable view of one package's top-level type declarations.
///
/// Declarations are kept in name order, the order a package scope lists
/// them in. `imports` holds the directly imported packages; an imported
/// package never carries imports of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Import path.
    pub path: String,
    /// Package clause name.
    pub name: String,
    decls: Vec<TypeDecl>,
    imports: Vec<Package>,
}

/// A loaded package together with the resolved syntax of its files: the
/// unit one analysis pass runs over.
#[derive(Debug, Clone)]
pub struct PackageUnit {
    pub package: Package,
    pub files: Vec<SourceFile>,
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// The declared type: a `Named` for defined types, the target for aliases.
    pub ty: Type,
    /// Underlying structural shape.
    pub underlying: Type,
    /// Method set of a value of this type, including promoted methods.
    pub methods: MethodSet,
}

impl TypeDecl {
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.underlying.as_interface().is_some()
    }
}

impl Package {
    pub fn new(path: &str, name: &str, mut decls: Vec<TypeDecl>) -> Self {
        decls.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            path: path.to_string(),
            name: name.to_string(),
            decls,
            imports: vec![],
        }
    }

    /// Attach directly imported packages. Their own imports are dropped.
    pub fn with_imports(mut self, imports: Vec<Package>) -> Self {
        self.imports = imports
            .into_iter()
            .map(|mut p| {
                p.imports.clear();
                p
            })
            .collect();
        self
    }

    pub fn decls(&self) -> &[TypeDecl] {
        &self.decls
    }

    pub fn imports(&self) -> &[Package] {
        &self.imports
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    /// Fully-qualified identifier of a declaration in this package.
    pub fn object_id(&self, decl: &TypeDecl) -> String {
        object_id(&self.path, &decl.name)
    }

    /// Find the declaration a named type refers to, in this package or a
    /// direct import.
    pub fn resolve_named(&self, package: &str, name: &str) -> Option<&TypeDecl> {
        if package == self.path {
            return self.lookup(name);
        }
        self.imports
            .iter()
            .find(|p| p.path == package)
            .and_then(|p| p.lookup(name))
    }

    /// Resolve a static type to its underlying shape. Named types are
    /// followed through declarations; a named type that is not visible
    /// from here resolves to `None`.
    pub fn underlying(&self, ty: &Type) -> Option<Type> {
        let mut current = ty.clone();
        // bounded: a chain longer than the number of visible decls is a cycle
        let limit = self.decls.len() + self.imports.iter().map(|p| p.decls.len()).sum::<usize>() + 1;
        for _ in 0..limit {
            let Type::Named(name) = &current else {
                return Some(current);
            };
            let decl = self.resolve_named(&name.package, &name.name)?;
            if decl.underlying == current {
                return None;
            }
            current = decl.underlying.clone();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterfaceShape, Method, Signature};

    fn iface(pkg: &str, name: &str) -> TypeDecl {
        TypeDecl {
            name: name.to_string(),
            ty: Type::named(pkg, name),
            underlying: Type::Interface(InterfaceShape::new(vec![Method::new(
                "Sound",
                pkg,
                Signature::default(),
            )])),
            methods: MethodSet::default(),
        }
    }

    fn strukt(pkg: &str, name: &str) -> TypeDecl {
        TypeDecl {
            name: name.to_string(),
            ty: Type::named(pkg, name),
            underlying: Type::Struct { fields: vec![] },
            methods: MethodSet::default(),
        }
    }

    #[test]
    fn test_decls_sorted_by_name() {
        let pkg = Package::new("zoo", "zoo", vec![strukt("zoo", "Dog"), strukt("zoo", "Cat")]);
        let names: Vec<&str> = pkg.decls().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Cat", "Dog"]);
    }

    #[test]
    fn test_underlying_follows_imports() {
        let dep = Package::new("example.com/animals", "animals", vec![iface("example.com/animals", "Animal")]);
        let pkg = Package::new("example.com/app", "app", vec![]).with_imports(vec![dep]);
        let u = pkg.underlying(&Type::named("example.com/animals", "Animal")).unwrap();
        assert!(u.as_interface().is_some());
    }

    #[test]
    fn test_underlying_of_unknown_named_is_none() {
        let pkg = Package::new("zoo", "zoo", vec![]);
        assert!(pkg.underlying(&Type::named("fmt", "Stringer")).is_none());
    }

    #[test]
    fn test_underlying_of_literal_is_itself() {
        let pkg = Package::new("zoo", "zoo", vec![]);
        let ty = Type::basic("int");
        assert_eq!(pkg.underlying(&ty), Some(ty));
    }

    #[test]
    fn test_underlying_chain_through_defined_type() {
        let mut noisy = iface("zoo", "Noisy");
        noisy.underlying = Type::named("zoo", "Animal");
        let pkg = Package::new("zoo", "zoo", vec![iface("zoo", "Animal"), noisy]);
        let u = pkg.underlying(&Type::named("zoo", "Noisy")).unwrap();
        assert!(u.as_interface().is_some());
    }

    #[test]
    fn test_imports_are_not_transitive() {
        let deep = Package::new("deep", "deep", vec![]);
        let dep = Package::new("dep", "dep", vec![]).with_imports(vec![deep]);
        let pkg = Package::new("app", "app", vec![]).with_imports(vec![dep]);
        assert_eq!(pkg.imports().len(), 1);
        assert!(pkg.imports()[0].imports().is_empty());
    }

    #[test]
    fn test_object_id() {
        let pkg = Package::new("example.com/zoo", "zoo", vec![strukt("example.com/zoo", "bird")]);
        assert_eq!(pkg.object_id(&pkg.decls()[0]), "example.com/zoo.bird");
    }
}
