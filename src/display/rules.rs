//! Categorization rule formatting

use crate::models::CategoryRule;

use super::report::truncate;

/// Format rules in the order they are tried
pub fn format_rule_list(rules: &[&CategoryRule]) -> String {
    if rules.is_empty() {
        return "No categorization rules.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<4} {:<15} {:>8}  {:<24} {}\n",
        "#", "Category", "Priority", "Description", "Pattern"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for (i, rule) in rules.iter().enumerate() {
        output.push_str(&format!(
            "{:<4} {:<15} {:>8}  {:<24} {}\n",
            i + 1,
            truncate(&rule.category, 15),
            rule.priority,
            truncate(&rule.description, 24),
            rule.pattern
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_list() {
        let rule = CategoryRule::new("Pets", "petco", "Pet supplies", 12);
        let text = format_rule_list(&[&rule]);
        assert!(text.contains("Pets"));
        assert!(text.contains("12"));
        assert!(text.contains("petco"));
        assert_eq!(format_rule_list(&[]), "No categorization rules.\n");
    }
}
