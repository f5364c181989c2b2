/// Package generators for benchmarks and large-scale tests.
use std::fmt::Write;

/// Generate a Go package declaring `Shape` with `variants` implementors and
/// `switches` functions, each switching over a `Shape` and leaving out the
/// last variant.
#[allow(dead_code)]
pub fn generate_enum_package(variants: usize, switches: usize) -> String {
    let mut source = String::new();
    writeln!(source, "package shapes\n").unwrap();
    writeln!(source, "type Shape interface {{\n\tArea() float64\n}}\n").unwrap();
    for v in 0..variants {
        writeln!(source, "type Variant{v} struct{{ size float64 }}\n").unwrap();
        writeln!(source, "func (s Variant{v}) Area() float64 {{ return s.size }}\n").unwrap();
    }
    for i in 0..switches {
        writeln!(source, "func Describe{i}(s Shape) string {{").unwrap();
        writeln!(source, "\tswitch v := s.(type) {{").unwrap();
        for v in 0..variants.saturating_sub(1) {
            writeln!(source, "\tcase Variant{v}:\n\t\t_ = v").unwrap();
        }
        writeln!(source, "\t}}\n\treturn \"\"\n}}\n").unwrap();
    }
    source
}

/// Split a generated package across `files` files sharing one package clause.
#[allow(dead_code)]
pub fn generate_enum_files(files: usize, variants: usize, switches_per_file: usize) -> Vec<(String, String)> {
    let mut out = vec![("shapes.go".to_string(), generate_enum_package(variants, 0))];
    for f in 0..files {
        let mut source = String::new();
        writeln!(source, "package shapes\n").unwrap();
        for i in 0..switches_per_file {
            writeln!(source, "func Handle{f}x{i}(s Shape) {{").unwrap();
            writeln!(source, "\tswitch s.(type) {{").unwrap();
            for v in 0..variants.saturating_sub(1) {
                writeln!(source, "\tcase Variant{v}:").unwrap();
            }
            writeln!(source, "\t}}\n}}\n").unwrap();
        }
        out.push((format!("handlers_{f}.go"), source));
    }
    out
}
