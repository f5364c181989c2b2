//! Enum-like interface classification.
//!
//! An interface is enum-like when at least [`MIN_IMPLEMENTORS`] concrete
//! declarations of the same package satisfy it structurally. The table is
//! keyed by interface shape, so identically shaped interfaces share an entry
//! no matter what they are called or where they are declared.

use indexmap::IndexMap;
use typeswitch_core::package::Package;
use typeswitch_core::types::{InterfaceShape, MethodSet};

use crate::scanner::{discover_symbols, Candidates, Visibility};
use crate::types::Implementor;

/// Fewer known implementors than this give no closed set to check against.
pub const MIN_IMPLEMENTORS: usize = 2;

/// An enum-like interface and its implementors in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumRegistration {
    interface: String,
    package: String,
    shape: InterfaceShape,
    implementors: Vec<Implementor>,
}

impl EnumRegistration {
    /// Returns `None` unless there are at least [`MIN_IMPLEMENTORS`] implementors.
    pub fn new(
        interface: String,
        package: String,
        shape: InterfaceShape,
        implementors: Vec<Implementor>,
    ) -> Option<Self> {
        if implementors.len() < MIN_IMPLEMENTORS {
            return None;
        }
        Some(Self {
            interface,
            package,
            shape,
            implementors,
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Package the interface was declared in.
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn shape(&self) -> &InterfaceShape {
        &self.shape
    }

    pub fn implementors(&self) -> &[Implementor] {
        &self.implementors
    }
}

/// Lookup table from interface shape to its registration.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    entries: IndexMap<InterfaceShape, EnumRegistration>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, shape: &InterfaceShape) -> Option<&EnumRegistration> {
        self.entries.get(shape)
    }

    /// Register, replacing any entry with the same shape.
    pub fn insert(&mut self, registration: EnumRegistration) {
        self.entries
            .insert(registration.shape.clone(), registration);
    }

    /// Fold `other` into `self`. On a shape collision the entry from
    /// `other` wins, even when it comes from a different package.
    pub fn merge(&mut self, other: EnumTable) {
        for (shape, registration) in other.entries {
            if let Some(previous) = self.entries.get(&shape) {
                if previous.package != registration.package {
                    tracing::debug!(
                        replaced = %previous.interface,
                        from = %previous.package,
                        by = %registration.interface,
                        source = %registration.package,
                        "enum registration overwritten by identically shaped interface"
                    );
                }
            }
            self.entries.insert(shape, registration);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumRegistration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Structural satisfaction: `methods` provides every method of `iface`
/// with an identical signature.
pub fn implements(methods: &MethodSet, iface: &InterfaceShape) -> bool {
    iface.methods.iter().all(|m| methods.contains(m))
}

/// Compute implementors for every interface candidate and keep the enum-like ones.
pub fn classify_enums(candidates: &Candidates<'_>) -> EnumTable {
    let mut table = EnumTable::new();
    for iface in &candidates.interfaces {
        let implementors: Vec<Implementor> = candidates
            .concretes
            .iter()
            .filter(|c| implements(&c.decl.methods, iface.shape))
            .map(|c| Implementor {
                id: c.id.clone(),
                ty: c.decl.ty.clone(),
            })
            .collect();

        tracing::trace!(
            interface = %iface.id,
            implementors = implementors.len(),
            "classified interface"
        );

        if let Some(registration) = EnumRegistration::new(
            iface.id.clone(),
            candidates.package.to_string(),
            iface.shape.clone(),
            implementors,
        ) {
            table.insert(registration);
        }
    }
    table
}

/// Build the merged table for a package: the package itself first, then
/// each direct import in order.
pub fn build_enum_table(pkg: &Package) -> EnumTable {
    let mut table = classify_enums(&discover_symbols(pkg, Visibility::All));
    for import in pkg.imports() {
        table.merge(classify_enums(&discover_symbols(import, Visibility::Exported)));
    }
    table
}
