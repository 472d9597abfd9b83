use std::borrow::Cow;

use serde::Serialize;

use super::matcher::{RegexStatementMatcher, StatementMatch, StatementMatcher};
use super::{StatementKind, RESERVED_NAMESPACE};
use crate::error::Result;
use crate::exclusion::CompiledExclusions;
use crate::prefix::{NamespacePrefix, SEPARATOR};

/// Why a matched statement was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Name already sits under the prefix.
    AlreadyPrefixed,
    /// Leading separator: resolved absolutely, opted out.
    FullyQualified,
    /// Single segment `use` target: a global class, function or constant.
    GlobalSymbol,
    /// Dependency manager's own namespace.
    Reserved,
    /// Matched a `use` exclusion pattern.
    Excluded,
    /// `extends` target not on the allow-list.
    NotIncluded,
    /// `const` / `function` after `use`; belongs to the dedicated rules.
    ImportModifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Insert this text right before the name.
    Insert(String),
    Skip(SkipReason),
}

/// One statement kind's matcher plus its prefixing policy.
#[derive(Debug)]
pub struct RewriteRule {
    kind: StatementKind,
    matcher: Box<dyn StatementMatcher>,
    prefix: NamespacePrefix,
    exclusions: CompiledExclusions,
}

impl RewriteRule {
    pub fn new(
        kind: StatementKind,
        prefix: &NamespacePrefix,
        exclusions: &CompiledExclusions,
    ) -> Result<Self> {
        let matcher = RegexStatementMatcher::for_kind(kind)?;
        Ok(Self::with_matcher(Box::new(matcher), prefix, exclusions))
    }

    /// Build a rule around any matcher implementation.
    pub fn with_matcher(
        matcher: Box<dyn StatementMatcher>,
        prefix: &NamespacePrefix,
        exclusions: &CompiledExclusions,
    ) -> Self {
        Self {
            kind: matcher.kind(),
            matcher,
            prefix: prefix.clone(),
            exclusions: exclusions.clone(),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// `extends` only runs when an allow-list was configured.
    pub fn is_active(&self) -> bool {
        self.kind != StatementKind::Extends || self.exclusions.has_extends_includes()
    }

    pub fn decide(&self, statement: &StatementMatch<'_>) -> Decision {
        match self.kind {
            StatementKind::Namespace => self.decide_namespace(statement.name),
            StatementKind::UseConst | StatementKind::UseFunction | StatementKind::Use => {
                self.decide_import(statement.name)
            }
            StatementKind::Extends => self.decide_extends(statement.name),
        }
    }

    /// Run one full-text pass. Returns the (possibly borrowed) content and
    /// the number of insertions made.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        if !self.is_active() {
            return (Cow::Borrowed(text), 0);
        }

        let mut output = String::new();
        let mut copied = 0;
        let mut replacements = 0;

        for statement in self.matcher.find_all(text) {
            if let Decision::Insert(insertion) = self.decide(&statement) {
                if replacements == 0 {
                    output.reserve(text.len() + 64);
                }
                output.push_str(&text[copied..statement.name_start]);
                output.push_str(&insertion);
                copied = statement.name_start;
                replacements += 1;
            }
        }

        if replacements == 0 {
            return (Cow::Borrowed(text), 0);
        }

        output.push_str(&text[copied..]);
        (Cow::Owned(output), replacements)
    }

    fn decide_namespace(&self, name: &str) -> Decision {
        if self.prefix.is_prefix_of(name) {
            return Decision::Skip(SkipReason::AlreadyPrefixed);
        }
        if name.starts_with(SEPARATOR) {
            return Decision::Skip(SkipReason::FullyQualified);
        }
        if is_reserved(name) {
            return Decision::Skip(SkipReason::Reserved);
        }
        Decision::Insert(self.prefix.as_str().to_string())
    }

    fn decide_import(&self, name: &str) -> Decision {
        if self.kind == StatementKind::Use && matches!(name, "const" | "function") {
            return Decision::Skip(SkipReason::ImportModifier);
        }
        if name.starts_with(SEPARATOR) {
            return Decision::Skip(SkipReason::FullyQualified);
        }
        if self.prefix.is_prefix_of(name) {
            return Decision::Skip(SkipReason::AlreadyPrefixed);
        }
        if !name.contains(SEPARATOR) {
            return Decision::Skip(SkipReason::GlobalSymbol);
        }
        if is_reserved(name) {
            return Decision::Skip(SkipReason::Reserved);
        }
        if self.kind == StatementKind::Use && self.exclusions.excludes_use(name) {
            return Decision::Skip(SkipReason::Excluded);
        }
        Decision::Insert(self.prefix.as_str().to_string())
    }

    /// The allow-list only gates the rewrite; the insertion always lands
    /// right after `extends` and its whitespace.
    fn decide_extends(&self, target: &str) -> Decision {
        if self.prefix.is_prefix_of(target) {
            return Decision::Skip(SkipReason::AlreadyPrefixed);
        }
        if !self.exclusions.includes_extends(target) {
            return Decision::Skip(SkipReason::NotIncluded);
        }

        let mut insertion = self.prefix.rooted();
        if !target.starts_with(SEPARATOR) {
            insertion.push(SEPARATOR);
        }
        Decision::Insert(insertion)
    }
}

fn is_reserved(name: &str) -> bool {
    let name = name.strip_prefix(SEPARATOR).unwrap_or(name);
    match name.strip_prefix(RESERVED_NAMESPACE) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}
