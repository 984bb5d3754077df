//! Categorization rule model and the built-in rule table

use serde::{Deserialize, Serialize};

/// Maps descriptions matching `pattern` to `category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,

    /// Regular expression, matched anywhere in the description
    pub pattern: String,

    /// What the rule is meant to catch
    #[serde(default)]
    pub description: String,

    /// Higher priority rules are tried first
    #[serde(default)]
    pub priority: i32,
}

impl CategoryRule {
    pub fn new(
        category: impl Into<String>,
        pattern: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            category: category.into(),
            pattern: pattern.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Priority of the built-in rules
pub const DEFAULT_PRIORITY: i32 = 10;

const DEFAULT_RULES: &[(&str, &str, &str, i32)] = &[
    (
        "Groceries",
        r"(?i)(grocery|supermarket|whole foods|trader joe|safeway|walmart|kroger|costco|food market)",
        "Grocery stores",
        DEFAULT_PRIORITY,
    ),
    (
        "Restaurants",
        r"(?i)(restaurant|cafe|coffee|starbucks|mcdonald|burger|pizza|diner|bistro|bar & grill)",
        "Dining out",
        DEFAULT_PRIORITY,
    ),
    (
        "Transportation",
        r"(?i)(uber|lyft|taxi|gas station|shell|chevron|bp|exxon|mobil|parking|metro|transit)",
        "Transportation and fuel",
        DEFAULT_PRIORITY,
    ),
    (
        "Utilities",
        r"(?i)(electric|water|gas company|utility|internet|phone|wireless|at&t|verizon|comcast)",
        "Utility bills",
        DEFAULT_PRIORITY,
    ),
    (
        "Entertainment",
        r"(?i)(netflix|spotify|hulu|disney|hbo|cinema|movie|theater|concert|game|steam)",
        "Entertainment services",
        DEFAULT_PRIORITY,
    ),
    // Generic retail sits below the specific categories
    (
        "Shopping",
        r"(?i)(amazon|ebay|target|best buy|apple store|mall|clothing|fashion|retail)",
        "General shopping",
        5,
    ),
    (
        "Healthcare",
        r"(?i)(pharmacy|cvs|walgreens|hospital|clinic|doctor|dental|medical|health)",
        "Medical expenses",
        DEFAULT_PRIORITY,
    ),
    (
        "Fitness",
        r"(?i)(gym|fitness|yoga|sports|athletic)",
        "Fitness and sports",
        DEFAULT_PRIORITY,
    ),
    (
        "Salary",
        r"(?i)(salary|payroll|wages|income|direct deposit)",
        "Employment income",
        DEFAULT_PRIORITY,
    ),
    (
        "Investment",
        r"(?i)(dividend|interest|capital gain|stock|investment)",
        "Investment returns",
        DEFAULT_PRIORITY,
    ),
    (
        "Rent",
        r"(?i)(rent|lease|housing)",
        "Housing rent",
        DEFAULT_PRIORITY,
    ),
    (
        "Insurance",
        r"(?i)(insurance|premium)",
        "Insurance payments",
        DEFAULT_PRIORITY,
    ),
    (
        "Education",
        r"(?i)(tuition|school|university|course|textbook|education)",
        "Educational expenses",
        DEFAULT_PRIORITY,
    ),
    (
        "Travel",
        r"(?i)(hotel|airline|booking|airbnb|flight|vacation)",
        "Travel expenses",
        DEFAULT_PRIORITY,
    ),
];

/// The built-in rule table, in declaration order
pub fn default_rules() -> Vec<CategoryRule> {
    DEFAULT_RULES
        .iter()
        .map(|(category, pattern, description, priority)| {
            CategoryRule::new(*category, *pattern, *description, *priority)
        })
        .collect()
}
