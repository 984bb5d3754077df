//! Rule-based transaction categorization
//!
//! Rules are tried in descending priority; rules with equal priority keep the
//! order they were added in. Matching is case-insensitive and unanchored.
//! Patterns are compiled once when a rule enters the engine.

use std::cmp::Reverse;

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::error::{TallyError, TallyResult};
use crate::models::{default_rules, CategoryRule, UNCATEGORIZED};

/// A rule together with its compiled pattern
///
/// `matcher` is `None` for a stored rule whose pattern does not compile; such
/// a rule is listed but never matches.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: CategoryRule,
    matcher: Option<Regex>,
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Ordered set of categorization rules
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// An engine with no rules; everything is uncategorized
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine loaded with the built-in rule table
    pub fn with_default_rules() -> Self {
        Self::from_rules(default_rules())
    }

    /// Build an engine from already-stored rules
    ///
    /// A rule whose pattern fails to compile is kept but skipped when
    /// matching, so one bad stored rule cannot break categorization.
    pub fn from_rules(rules: impl IntoIterator<Item = CategoryRule>) -> Self {
        let mut engine = Self::new();
        for rule in rules {
            let matcher = match compile(&rule.pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!(category = %rule.category, pattern = %rule.pattern, error = %e,
                        "skipping rule with invalid pattern");
                    None
                }
            };
            engine.rules.push(CompiledRule { rule, matcher });
        }
        engine.sort();
        engine
    }

    fn sort(&mut self) {
        // sort_by_key is stable, so equal priorities keep insertion order
        self.rules.sort_by_key(|r| Reverse(r.rule.priority));
    }

    /// Add a rule after validating its pattern
    ///
    /// On an invalid pattern the rule set is left unchanged.
    pub fn add_rule(
        &mut self,
        category: impl Into<String>,
        pattern: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
    ) -> TallyResult<()> {
        let rule = CategoryRule::new(category, pattern, description, priority);
        self.insert(rule)
    }

    /// Add a prepared rule after validating its pattern
    pub fn insert(&mut self, rule: CategoryRule) -> TallyResult<()> {
        let matcher = compile(&rule.pattern)
            .map_err(|e| TallyError::invalid_pattern(rule.pattern.clone(), &e))?;
        self.rules.push(CompiledRule {
            rule,
            matcher: Some(matcher),
        });
        self.sort();
        Ok(())
    }

    /// The first rule (in priority order) whose pattern matches
    pub fn find_match(&self, description: &str) -> Option<&CategoryRule> {
        let description = description.trim();
        self.rules
            .iter()
            .find(|r| {
                r.matcher
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(description))
            })
            .map(|r| &r.rule)
    }

    /// Category for a description, or `Uncategorized` if no rule matches
    pub fn categorize(&self, description: &str) -> String {
        self.find_match(description)
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }

    /// Rules in the order they are tried
    pub fn rules(&self) -> Vec<&CategoryRule> {
        self.rules.iter().map(|r| &r.rule).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Fail with `InvalidPattern` if `pattern` does not compile
pub fn validate_pattern(pattern: &str) -> TallyResult<()> {
    compile(pattern)
        .map(|_| ())
        .map_err(|e| TallyError::invalid_pattern(pattern, &e))
}

/// Check a pattern against a description without adding it to an engine
pub fn test_rule(pattern: &str, description: &str) -> TallyResult<bool> {
    let regex = compile(pattern).map_err(|e| TallyError::invalid_pattern(pattern, &e))?;
    Ok(regex.is_match(description.trim()))
}
