use std::fmt::Debug;

use regex::Regex;

use super::StatementKind;
use crate::error::{Error, Result};

/// PHP label: letter, underscore or non-ASCII, then the same plus digits.
const IDENT: &str = r"[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*";

/// A keyword occurrence with the name that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementMatch<'t> {
    pub kind: StatementKind,
    /// Keyword text as written (`use  function` keeps its inner spacing).
    pub keyword: &'t str,
    /// Target name, or for `extends` the rest of the line.
    pub name: &'t str,
    /// Byte offset of `name` in the scanned text; insertion point.
    pub name_start: usize,
}

/// Finds statements of one kind in raw text.
///
/// The regex implementation is the only one today; a lexer-backed matcher
/// can replace it without touching the rewrite policy.
pub trait StatementMatcher: Send + Sync + Debug {
    fn kind(&self) -> StatementKind;

    /// All non-overlapping occurrences, in text order.
    fn find_all<'t>(&self, text: &'t str) -> Vec<StatementMatch<'t>>;
}

#[derive(Debug, Clone)]
pub struct RegexStatementMatcher {
    kind: StatementKind,
    regex: Regex,
}

impl RegexStatementMatcher {
    pub fn for_kind(kind: StatementKind) -> Result<Self> {
        let pattern = pattern_for(kind);
        let regex = Regex::new(&pattern).map_err(|e| {
            Error::internal_unexpected(format!("statement pattern for '{}': {}", kind, e))
        })?;
        Ok(Self { kind, regex })
    }
}

impl StatementMatcher for RegexStatementMatcher {
    fn kind(&self) -> StatementKind {
        self.kind
    }

    fn find_all<'t>(&self, text: &'t str) -> Vec<StatementMatch<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let keyword = caps.name("keyword")?;
                let name = caps.name("name")?;
                Some(StatementMatch {
                    kind: self.kind,
                    keyword: keyword.as_str(),
                    name: name.as_str(),
                    name_start: name.start(),
                })
            })
            .collect()
    }
}

fn pattern_for(kind: StatementKind) -> String {
    let qualified_name = format!(r"\\?{ident}(?:\\{ident})*\\?", ident = IDENT);

    let (keyword, name) = match kind {
        StatementKind::Namespace => ("namespace", qualified_name),
        StatementKind::UseConst => (r"use\s+const", qualified_name),
        StatementKind::UseFunction => (r"use\s+function", qualified_name),
        StatementKind::Use => ("use", qualified_name),
        StatementKind::Extends => ("extends", r"[^\r\n]*".to_string()),
    };

    // The keyword must start the text or follow whitespace or a statement
    // delimiter, so `$namespace` or `reuse` never qualify.
    format!(
        r"(?:^|[\s;{{}}])(?P<keyword>{})\s+(?P<name>{})",
        keyword, name
    )
}
