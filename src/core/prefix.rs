//! Namespace prefix normalization.

use std::fmt;

use crate::error::{Error, Result};

/// PHP namespace separator.
pub const SEPARATOR: char = '\\';

/// A normalized namespace prefix: segments joined by `\` with exactly one
/// trailing `\` and no leading one (`Vendor\Lib\`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacePrefix {
    value: String,
}

impl NamespacePrefix {
    /// Normalize a raw prefix. `Vendor\Lib`, `\Vendor\Lib\` and
    /// `Vendor\\Lib` all become `Vendor\Lib\`.
    pub fn new(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw
            .trim()
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(Error::config_invalid_value(
                "namespace",
                Some(raw.to_string()),
                "Namespace prefix must contain at least one segment",
            )
            .with_hint("Pass a prefix such as 'MyPlugin\\Vendor'"));
        }

        if let Some(bad) = segments.iter().find(|s| !is_identifier(s)) {
            return Err(Error::config_invalid_value(
                "namespace",
                Some(raw.to_string()),
                format!("'{}' is not a valid namespace segment", bad),
            ));
        }

        let mut value = segments.join("\\");
        value.push(SEPARATOR);
        Ok(Self { value })
    }

    /// Canonical form with trailing separator, ready to sit before a name.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Prefix without its trailing separator (`Vendor\Lib`).
    pub fn trimmed(&self) -> &str {
        self.value.trim_end_matches(SEPARATOR)
    }

    /// Fully-qualified form used in `extends` clauses (`\Vendor\Lib`).
    pub fn rooted(&self) -> String {
        format!("{}{}", SEPARATOR, self.trimmed())
    }

    /// Whether `name` is already inside this prefix, written relative
    /// (`Vendor\Lib\Foo`) or rooted (`\Vendor\Lib\Foo`).
    pub fn is_prefix_of(&self, name: &str) -> bool {
        name.strip_prefix(SEPARATOR)
            .unwrap_or(name)
            .starts_with(self.value.as_str())
    }
}

impl fmt::Display for NamespacePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// PHP label rule: letter, underscore or any byte >= 0x80, then the same
/// plus digits.
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separator_variants() {
        for raw in ["Vendor\\Lib", "\\Vendor\\Lib\\", "Vendor\\\\Lib", " Vendor\\Lib\\\\ "] {
            let prefix = NamespacePrefix::new(raw).unwrap();
            assert_eq!(prefix.as_str(), "Vendor\\Lib\\", "raw: {raw}");
        }
    }

    #[test]
    fn derives_trimmed_and_rooted_forms() {
        let prefix = NamespacePrefix::new("Vendor\\Lib").unwrap();
        assert_eq!(prefix.trimmed(), "Vendor\\Lib");
        assert_eq!(prefix.rooted(), "\\Vendor\\Lib");
        assert_eq!(prefix.to_string(), "Vendor\\Lib\\");
    }

    #[test]
    fn rejects_empty_and_separator_only() {
        for raw in ["", "   ", "\\", "\\\\\\"] {
            let err = NamespacePrefix::new(raw).unwrap_err();
            assert_eq!(err.code.as_str(), "config.invalid_value", "raw: {raw:?}");
        }
    }

    #[test]
    fn rejects_non_identifier_segments() {
        assert!(NamespacePrefix::new("Vendor\\1Lib").is_err());
        assert!(NamespacePrefix::new("Vendor Lib").is_err());
        assert!(NamespacePrefix::new("Vendor-Lib").is_err());
    }

    #[test]
    fn recognizes_already_prefixed_names() {
        let prefix = NamespacePrefix::new("Vendor\\Lib").unwrap();
        assert!(prefix.is_prefix_of("Vendor\\Lib\\Foo"));
        assert!(prefix.is_prefix_of("\\Vendor\\Lib\\Foo"));
        assert!(!prefix.is_prefix_of("Vendor\\Library\\Foo"));
        assert!(!prefix.is_prefix_of("Foo\\Vendor\\Lib\\Bar"));
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("_foo9"));
        assert!(is_identifier("Ünicode"));
        assert!(!is_identifier("9foo"));
        assert!(!is_identifier(""));
    }
}
