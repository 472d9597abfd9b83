//! Caller-supplied exclusion and inclusion patterns.
//!
//! `use_excludes` lists `use` targets that must stay untouched.
//! `extends_includes` is the inverse: an allow-list of namespace fragments
//! that make an `extends` clause eligible for prefixing.
//!
//! Only plain `use` statements have an exclude hook. `use const` and
//! `use function` imports cannot be excluded by configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw pattern lists as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionConfig {
    #[serde(default)]
    pub use_excludes: Vec<String>,
    #[serde(default, alias = "extendsNamespace")]
    pub extends_includes: Vec<String>,
}

impl ExclusionConfig {
    pub fn new(use_excludes: Vec<String>, extends_includes: Vec<String>) -> Self {
        Self {
            use_excludes,
            extends_includes,
        }
    }

    /// Compile both lists into matchers. Every pattern is checked on its own
    /// first so a failure names the offending entry.
    pub fn compile(&self) -> Result<CompiledExclusions> {
        let use_excludes = compile_alternation("use", &self.use_excludes, true)?;
        let extends_includes = compile_alternation("extends", &self.extends_includes, false)?;

        Ok(CompiledExclusions {
            use_excludes,
            extends_includes,
        })
    }
}

/// Compiled form of [`ExclusionConfig`]. `None` means the list was empty.
#[derive(Debug, Clone, Default)]
pub struct CompiledExclusions {
    use_excludes: Option<Regex>,
    extends_includes: Option<Regex>,
}

impl CompiledExclusions {
    /// True when `name` starts with one of the `use` exclusion patterns.
    pub fn excludes_use(&self, name: &str) -> bool {
        self.use_excludes
            .as_ref()
            .is_some_and(|re| re.is_match(name))
    }

    /// True when the `extends` rule is active at all.
    pub fn has_extends_includes(&self) -> bool {
        self.extends_includes.is_some()
    }

    /// True when `target` contains one of the `extends` fragments anywhere.
    pub fn includes_extends(&self, target: &str) -> bool {
        self.extends_includes
            .as_ref()
            .is_some_and(|re| re.is_match(target))
    }
}

fn compile_alternation(rule: &str, patterns: &[String], anchored: bool) -> Result<Option<Regex>> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .collect();

    if patterns.is_empty() {
        return Ok(None);
    }

    for pattern in &patterns {
        Regex::new(pattern).map_err(|e| Error::config_invalid_pattern(rule, *pattern, e))?;
    }

    let alternation = patterns
        .iter()
        .map(|p| format!("(?:{})", p))
        .collect::<Vec<_>>()
        .join("|");
    let combined = if anchored {
        format!("^(?:{})", alternation)
    } else {
        alternation
    };

    Regex::new(&combined)
        .map(Some)
        .map_err(|e| Error::config_invalid_pattern(rule, combined.clone(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(use_excludes: &[&str], extends_includes: &[&str]) -> ExclusionConfig {
        ExclusionConfig::new(
            use_excludes.iter().map(|s| s.to_string()).collect(),
            extends_includes.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn empty_lists_match_nothing() {
        let compiled = config(&[], &[]).compile().unwrap();
        assert!(!compiled.excludes_use("Anything\\At\\All"));
        assert!(!compiled.has_extends_includes());
        assert!(!compiled.includes_extends("Base\\Thing"));
    }

    #[test]
    fn use_excludes_are_anchored_at_name_start() {
        let compiled = config(&["Bar\\\\Baz", "WP_"], &[]).compile().unwrap();
        assert!(compiled.excludes_use("Bar\\Baz"));
        assert!(compiled.excludes_use("Bar\\Baz\\Deeper"));
        assert!(compiled.excludes_use("WP_Query\\Thing"));
        assert!(!compiled.excludes_use("Foo\\Bar\\Baz"));
    }

    #[test]
    fn extends_includes_match_anywhere() {
        let compiled = config(&[], &["Base"]).compile().unwrap();
        assert!(compiled.has_extends_includes());
        assert!(compiled.includes_extends("Base\\Thing {}"));
        assert!(compiled.includes_extends("\\Other\\Base {}"));
        assert!(!compiled.includes_extends("Other\\Thing {}"));
    }

    #[test]
    fn blank_patterns_are_ignored() {
        let compiled = config(&[""], &[""]).compile().unwrap();
        assert!(!compiled.excludes_use("Foo\\Bar"));
        assert!(!compiled.has_extends_includes());
    }

    #[test]
    fn invalid_pattern_reports_rule_and_pattern() {
        let err = config(&["Ok", "Broken("], &[]).compile().unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_pattern");
        assert_eq!(err.details["rule"], "use");
        assert_eq!(err.details["pattern"], "Broken(");

        let err = config(&[], &["[unterminated"]).compile().unwrap_err();
        assert_eq!(err.details["rule"], "extends");
    }

    #[test]
    fn deserializes_both_key_spellings() {
        let parsed: ExclusionConfig =
            serde_json::from_str(r#"{"useExcludes": ["A"], "extendsNamespace": ["B"]}"#).unwrap();
        assert_eq!(parsed, config(&["A"], &["B"]));

        let parsed: ExclusionConfig =
            serde_json::from_str(r#"{"extendsIncludes": ["C"]}"#).unwrap();
        assert_eq!(parsed, config(&[], &["C"]));
    }
}
