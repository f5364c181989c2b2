use crate::OutputFormatter;
use typeswitch_enforce::types::{CheckResult, EnumsResult};

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, result: &CheckResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }

    fn format_enums(&self, result: &EnumsResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
}
