use crate::OutputFormatter;
use typeswitch_enforce::types::{CheckResult, EnumsResult};

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_check(&self, result: &CheckResult) -> String {
        if result.diagnostics.is_empty() && result.errors.is_empty() {
            return String::new(); // Clean check = empty stdout
        }

        let mut out = String::new();
        for d in &result.diagnostics {
            out.push_str(&format!("{}: {}\n", d.pos, d.message));
        }
        for e in &result.errors {
            out.push_str(&format!("error: {}: {}\n", e.package, e.message));
        }

        out.push_str(&format!(
            "\n{} non-exhaustive type switch(es) in {} package(s)",
            result.diagnostics.len(),
            result.packages_analyzed.len(),
        ));
        if !result.errors.is_empty() {
            out.push_str(&format!(", {} package(s) failed", result.errors.len()));
        }
        out.push('\n');
        out
    }

    fn format_enums(&self, result: &EnumsResult) -> String {
        let mut out = String::new();
        for pkg in result.packages.iter().filter(|p| !p.enums.is_empty()) {
            out.push_str(&format!("{}\n", pkg.package));
            for entry in &pkg.enums {
                out.push_str(&format!("  {} {}\n", entry.interface, entry.shape));
                if entry.source_package != pkg.package {
                    out.push_str(&format!("    (imported from {})\n", entry.source_package));
                }
                for imp in &entry.implementors {
                    out.push_str(&format!("    - {}\n", imp));
                }
            }
        }
        out
    }
}
