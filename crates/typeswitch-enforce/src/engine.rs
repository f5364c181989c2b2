use rayon::prelude::*;
use typeswitch_core::config::TypeswitchConfig;
use typeswitch_core::package::{Package, PackageUnit};
use typeswitch_core::syntax::SourceFile;

use crate::checker::missing_implementors;
use crate::classifier::{build_enum_table, EnumTable};
use crate::locator::{locate, resolve_subject};
use crate::reporter::report;
use crate::types::{
    AnalysisError, CheckResult, Diagnostic, EnumEntry, EnumsResult, PackageEnums, PackageError,
};

/// Runs the exhaustiveness analysis over loaded packages.
///
/// Each package gets a fresh enum table built from itself and its direct
/// imports; nothing is shared between packages or carried across runs.
#[derive(Debug, Clone)]
pub struct Analyzer {
    skip_generated: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            skip_generated: true,
        }
    }

    /// Create an analyzer configured from a `TypeswitchConfig`.
    pub fn with_config(config: &TypeswitchConfig) -> Self {
        Self {
            skip_generated: config.skip_generated,
        }
    }

    /// Analyze one package: build its enum table, then check every type
    /// switch in `files`.
    pub fn run(&self, pkg: &Package, files: &[SourceFile]) -> Result<Vec<Diagnostic>, AnalysisError> {
        let table = build_enum_table(pkg);
        tracing::debug!(package = %pkg.path, enums = table.len(), "built enum table");
        self.run_with_table(&table, pkg, files)
    }

    /// Check every type switch in `files` against a prebuilt table.
    pub fn run_with_table(
        &self,
        table: &EnumTable,
        pkg: &Package,
        files: &[SourceFile],
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut diagnostics = Vec::new();
        for file in files {
            for sw in locate(file) {
                let Some(subject) = resolve_subject(sw, pkg)? else {
                    continue;
                };
                let Some(shape) = subject.as_interface() else {
                    continue;
                };
                let Some(registration) = table.get(shape) else {
                    continue;
                };
                let missing = missing_implementors(sw, registration);
                let Some(diagnostic) = report(sw, registration, &missing) else {
                    continue;
                };
                if self.skip_generated && file.generated {
                    tracing::debug!(pos = %diagnostic.pos, "dropping diagnostic in generated file");
                    continue;
                }
                diagnostics.push(diagnostic);
            }
        }
        Ok(diagnostics)
    }

    /// Analyze many packages in parallel. A failing package is recorded in
    /// `errors` and does not affect the others.
    pub fn check(&self, units: &[PackageUnit]) -> CheckResult {
        let outcomes: Vec<(String, Result<Vec<Diagnostic>, AnalysisError>)> = units
            .par_iter()
            .map(|unit| (unit.package.path.clone(), self.run(&unit.package, &unit.files)))
            .collect();

        let mut packages_analyzed = Vec::with_capacity(outcomes.len());
        let mut diagnostics = Vec::new();
        let mut errors = Vec::new();
        for (package, outcome) in outcomes {
            match outcome {
                Ok(found) => diagnostics.extend(found),
                Err(e) => {
                    tracing::error!(package = %package, "analysis failed: {e}");
                    errors.push(PackageError {
                        package: package.clone(),
                        message: e.to_string(),
                    });
                }
            }
            packages_analyzed.push(package);
        }

        CheckResult {
            version: env!("CARGO_PKG_VERSION").to_string(),
            command: "check".to_string(),
            status: CheckResult::status_for(&diagnostics, &errors).to_string(),
            packages_analyzed,
            diagnostics,
            errors,
        }
    }

    /// The enum-like interfaces visible from one package.
    pub fn package_enums(&self, pkg: &Package) -> PackageEnums {
        let table = build_enum_table(pkg);
        PackageEnums {
            package: pkg.path.clone(),
            enums: table
                .iter()
                .map(|reg| EnumEntry {
                    interface: reg.interface().to_string(),
                    source_package: reg.package().to_string(),
                    shape: reg.shape().to_string(),
                    implementors: reg.implementors().iter().map(|i| i.id.clone()).collect(),
                })
                .collect(),
        }
    }

    pub fn enums(&self, units: &[PackageUnit]) -> EnumsResult {
        EnumsResult {
            version: env!("CARGO_PKG_VERSION").to_string(),
            command: "enums".to_string(),
            packages: units.iter().map(|u| self.package_enums(&u.package)).collect(),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
