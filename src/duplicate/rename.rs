//! Name transform applied to the configured name fields of every duplicate

use regex::Regex;

/// `prefix + (regex ? name.replace(regex, replacement) : name) + suffix`
#[derive(Debug, Clone, Default)]
pub struct NamingRule {
    prefix: String,
    suffix: String,
    replacement: Option<(Regex, String)>,
}

impl NamingRule {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            replacement: None,
        }
    }

    /// Add a regex substitution.
    ///
    /// Only takes effect when both the pattern and the replacement are
    /// non-empty; otherwise the rule is returned unchanged.
    pub fn with_replacement(mut self, pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        if pattern.is_empty() || replacement.is_empty() {
            return Ok(self);
        }
        self.replacement = Some((Regex::new(pattern)?, replacement.to_string()));
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn pattern(&self) -> Option<&str> {
        self.replacement.as_ref().map(|(regex, _)| regex.as_str())
    }

    /// True when applying the rule never changes a name
    pub fn is_identity(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty() && self.replacement.is_none()
    }

    /// Substitutes the first match only, then wraps with prefix and suffix
    pub fn apply(&self, name: &str) -> String {
        let replaced = match &self.replacement {
            Some((regex, replacement)) => regex.replace(name, replacement.as_str()),
            None => name.into(),
        };
        format!("{}{}{}", self.prefix, replaced, self.suffix)
    }
}
