//! Namespace prefixing of namespace-affecting statements in PHP source.
//!
//! Recognition is pattern based (no AST). Each statement kind gets one
//! [`RewriteRule`]: a [`StatementMatcher`] that finds keyword + name
//! occurrences, and a policy that decides whether the prefix goes in.
//! [`FileRewriteEngine`] runs the five rules over one file's content.

mod engine;
mod matcher;
mod rule;

use serde::Serialize;

pub use engine::{FileRewriteEngine, Rewrite};
pub use matcher::{RegexStatementMatcher, StatementMatch, StatementMatcher};
pub use rule::{Decision, RewriteRule, SkipReason};

/// Reserved dependency-manager namespace. Never prefixed.
pub const RESERVED_NAMESPACE: &str = "Composer";

/// The five namespace-affecting statements the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Namespace,
    UseConst,
    UseFunction,
    Use,
    Extends,
}

impl StatementKind {
    /// Fixed application order.
    pub const ORDER: [StatementKind; 5] = [
        StatementKind::Namespace,
        StatementKind::UseConst,
        StatementKind::UseFunction,
        StatementKind::Use,
        StatementKind::Extends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Namespace => "namespace",
            StatementKind::UseConst => "use const",
            StatementKind::UseFunction => "use function",
            StatementKind::Use => "use",
            StatementKind::Extends => "extends",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
