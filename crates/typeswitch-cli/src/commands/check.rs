use typeswitch_enforce::engine::Analyzer;
use typeswitch_enforce::types::CheckResult;
use typeswitch_output::OutputFormatter;

use super::{emit, load_packages, GlobalOptions};
use crate::cli_args::PackageArgs;

/// Run `typeswitch check [PATTERNS]`.
pub fn run(formatter: &dyn OutputFormatter, global: &GlobalOptions, args: PackageArgs) -> i32 {
    let loaded = match load_packages("check", global, &args) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let analyzer = Analyzer::with_config(&loaded.config);
    let mut result = analyzer.check(&loaded.units);
    if !loaded.errors.is_empty() {
        let mut errors = loaded.errors;
        errors.append(&mut result.errors);
        result.errors = errors;
        result.status = CheckResult::status_for(&result.diagnostics, &result.errors).to_string();
    }

    if global.verbose {
        for unit in &loaded.units {
            let count = result
                .diagnostics
                .iter()
                .filter(|d| unit.files.iter().any(|f| f.path == d.pos.file))
                .count();
            eprintln!(
                "typeswitch check: {} ({} file(s)): {} non-exhaustive switch(es)",
                unit.package.path,
                unit.files.len(),
                count
            );
        }
    }

    emit(&formatter.format_check(&result));
    exit_code(&result)
}

/// 2 when any package failed, 1 when diagnostics were reported, else 0.
pub fn exit_code(result: &CheckResult) -> i32 {
    if !result.errors.is_empty() {
        2
    } else if !result.diagnostics.is_empty() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeswitch_core::types::Position;
    use typeswitch_enforce::types::{Diagnostic, PackageError};

    fn result(diagnostics: usize, errors: usize) -> CheckResult {
        let diagnostics: Vec<Diagnostic> = (0..diagnostics)
            .map(|i| Diagnostic {
                code: "TS001".into(),
                pos: Position {
                    file: "a.go".into(),
                    line: i as u32 + 1,
                    column: 1,
                },
                message: "type p.B does not appear in any cases".into(),
                interface: "p.A".into(),
                missing: vec!["p.B".into()],
            })
            .collect();
        let errors: Vec<PackageError> = (0..errors)
            .map(|_| PackageError {
                package: "p".into(),
                message: "failed".into(),
            })
            .collect();
        CheckResult {
            version: "0.1.0".into(),
            command: "check".into(),
            status: CheckResult::status_for(&diagnostics, &errors).into(),
            packages_analyzed: vec!["p".into()],
            diagnostics,
            errors,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&result(0, 0)), 0);
        assert_eq!(exit_code(&result(2, 0)), 1);
        assert_eq!(exit_code(&result(0, 1)), 2);
        assert_eq!(exit_code(&result(3, 1)), 2);
    }
}
