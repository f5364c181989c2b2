use typeswitch_enforce::engine::Analyzer;
use typeswitch_output::OutputFormatter;

use super::{emit, load_packages, GlobalOptions};
use crate::cli_args::PackageArgs;

/// Run `typeswitch enums [PATTERNS]`.
pub fn run(formatter: &dyn OutputFormatter, global: &GlobalOptions, args: PackageArgs) -> i32 {
    let loaded = match load_packages("enums", global, &args) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let result = Analyzer::with_config(&loaded.config).enums(&loaded.units);
    if global.verbose {
        for pkg in &result.packages {
            eprintln!("typeswitch enums: {}: {} enum-like interface(s)", pkg.package, pkg.enums.len());
        }
    }
    emit(&formatter.format_enums(&result));

    for e in &loaded.errors {
        eprintln!("typeswitch enums: {}: {}", e.package, e.message);
    }
    if loaded.errors.is_empty() {
        0
    } else {
        2
    }
}
