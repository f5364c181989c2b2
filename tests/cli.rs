// CLI test entry point for typeswitch command tests.
#[path = "common/mod.rs"]
mod common;

#[path = "cli/test_check.rs"]
mod test_check;
#[path = "cli/test_enums.rs"]
mod test_enums;
#[path = "cli/test_exit_codes.rs"]
mod test_exit_codes;
