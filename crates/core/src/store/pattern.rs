use regex::Regex;

/// Step name matcher where `*` stands for any run of characters.
///
/// `*` cannot be escaped, so a name containing it is always a wildcard.
#[derive(Debug, Clone)]
pub enum StepNamePattern {
    Exact(String),
    Wildcard(Regex),
}

impl StepNamePattern {
    pub fn new(pattern: &str) -> Self {
        if !pattern.contains('*') {
            return StepNamePattern::Exact(pattern.to_string());
        }
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        // Escaped literals joined by `.*` always form a valid expression.
        let regex = Regex::new(&format!("^{body}$")).expect("escaped wildcard pattern");
        StepNamePattern::Wildcard(regex)
    }

    pub fn matches(&self, step_name: &str) -> bool {
        match self {
            StepNamePattern::Exact(name) => name == step_name,
            StepNamePattern::Wildcard(regex) => regex.is_match(step_name),
        }
    }
}
