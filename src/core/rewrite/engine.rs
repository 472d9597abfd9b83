use serde::Serialize;

use super::rule::RewriteRule;
use super::StatementKind;
use crate::config::TransformConfig;
use crate::error::Result;
use crate::exclusion::ExclusionConfig;
use crate::prefix::NamespacePrefix;

/// Result of rewriting one file's content.
#[derive(Debug, Clone, Serialize)]
pub struct Rewrite {
    #[serde(skip)]
    pub content: String,
    /// Insertions per statement kind, only kinds that fired.
    pub replacements: Vec<(StatementKind, usize)>,
}

impl Rewrite {
    pub fn total(&self) -> usize {
        self.replacements.iter().map(|(_, n)| n).sum()
    }

    pub fn changed(&self) -> bool {
        self.total() > 0
    }
}

/// Applies the five rules, in fixed order, to one file's content.
///
/// Immutable once built; share one instance across every file and thread.
#[derive(Debug)]
pub struct FileRewriteEngine {
    prefix: NamespacePrefix,
    rules: Vec<RewriteRule>,
}

impl FileRewriteEngine {
    /// Build the engine. Invalid patterns fail here, before any file is read.
    pub fn new(prefix: NamespacePrefix, exclusions: &ExclusionConfig) -> Result<Self> {
        let compiled = exclusions.compile()?;
        let rules = StatementKind::ORDER
            .iter()
            .map(|kind| RewriteRule::new(*kind, &prefix, &compiled))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { prefix, rules })
    }

    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        let prefix = NamespacePrefix::new(&config.namespace)?;
        Self::new(prefix, &config.exclusions)
    }

    /// Replace the built-in rules, e.g. with lexer-backed matchers.
    /// Rules run in the order given.
    pub fn with_rules(prefix: NamespacePrefix, rules: Vec<RewriteRule>) -> Self {
        Self { prefix, rules }
    }

    pub fn prefix(&self) -> &NamespacePrefix {
        &self.prefix
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn rewrite(&self, content: &str) -> String {
        self.rewrite_detailed(content).content
    }

    /// Rewrite and report how many insertions each rule made.
    pub fn rewrite_detailed(&self, content: &str) -> Rewrite {
        let mut current = content.to_string();
        let mut replacements = Vec::new();

        for rule in &self.rules {
            let (next, count) = rule.apply(&current);
            if count > 0 {
                let next = next.into_owned();
                current = next;
                replacements.push((rule.kind(), count));
            }
        }

        Rewrite {
            content: current,
            replacements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::{StatementMatch, StatementMatcher};

    fn engine(use_excludes: &[&str], extends_includes: &[&str]) -> FileRewriteEngine {
        FileRewriteEngine::new(
            NamespacePrefix::new("Vendor\\Lib").unwrap(),
            &ExclusionConfig::new(
                use_excludes.iter().map(|s| s.to_string()).collect(),
                extends_includes.iter().map(|s| s.to_string()).collect(),
            ),
        )
        .unwrap()
    }

    const SAMPLE: &str = r#"<?php

declare(strict_types=1);

namespace Acme\Widgets;

use Acme\Support\Collection;
use Bar\Baz;
use Composer\Autoload\ClassLoader;
use function Acme\Support\helper;
use const Acme\Support\VERSION;
use \Fully\Qualified\Name;
use Exception;
use function strlen;

class Widget extends Base\Model implements \JsonSerializable
{
    public function render(): string
    {
        return array_map(function ($x) use ($y) { return $x; }, []);
    }
}
"#;

    const EXPECTED: &str = r#"<?php

declare(strict_types=1);

namespace Vendor\Lib\Acme\Widgets;

use Vendor\Lib\Acme\Support\Collection;
use Bar\Baz;
use Composer\Autoload\ClassLoader;
use function Vendor\Lib\Acme\Support\helper;
use const Vendor\Lib\Acme\Support\VERSION;
use \Fully\Qualified\Name;
use Exception;
use function strlen;

class Widget extends \Vendor\Lib\Base\Model implements \JsonSerializable
{
    public function render(): string
    {
        return array_map(function ($x) use ($y) { return $x; }, []);
    }
}
"#;

    #[test]
    fn rewrites_a_whole_file() {
        let engine = engine(&["Bar\\\\Baz"], &["Base"]);
        assert_eq!(engine.rewrite(SAMPLE), EXPECTED);
    }

    #[test]
    fn rewriting_twice_changes_nothing() {
        let engine = engine(&["Bar\\\\Baz"], &["Base"]);
        let once = engine.rewrite(SAMPLE);
        let twice = engine.rewrite_detailed(&once);
        assert_eq!(twice.content, once);
        assert!(!twice.changed());
    }

    #[test]
    fn reports_counts_per_rule_in_order() {
        let engine = engine(&["Bar\\\\Baz"], &["Base"]);
        let rewrite = engine.rewrite_detailed(SAMPLE);
        assert_eq!(
            rewrite.replacements,
            vec![
                (StatementKind::Namespace, 1),
                (StatementKind::UseConst, 1),
                (StatementKind::UseFunction, 1),
                (StatementKind::Use, 1),
                (StatementKind::Extends, 1),
            ]
        );
        assert_eq!(rewrite.total(), 6);
    }

    #[test]
    fn rules_run_in_fixed_order() {
        let engine = engine(&[], &[]);
        let kinds: Vec<_> = engine.rules().iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, StatementKind::ORDER.to_vec());
    }

    #[test]
    fn documented_scenarios() {
        let plain = engine(&[], &[]);
        assert_eq!(plain.rewrite("namespace Foo;"), "namespace Vendor\\Lib\\Foo;");
        assert_eq!(
            plain.rewrite("namespace Vendor\\Lib\\Foo;"),
            "namespace Vendor\\Lib\\Foo;"
        );
        assert_eq!(plain.rewrite("use Qux\\Quux;"), "use Vendor\\Lib\\Qux\\Quux;");
        assert_eq!(
            plain.rewrite("use \\Fully\\Qualified\\Name;"),
            "use \\Fully\\Qualified\\Name;"
        );

        let excluding = engine(&["Bar\\\\Baz"], &[]);
        assert_eq!(excluding.rewrite("use Bar\\Baz;"), "use Bar\\Baz;");

        let including = engine(&[], &["Base"]);
        assert_eq!(
            including.rewrite("class A extends Base\\Thing {}"),
            "class A extends \\Vendor\\Lib\\Base\\Thing {}"
        );
    }

    #[test]
    fn extends_untouched_without_includes() {
        let engine = engine(&[], &[]);
        let text = "class A extends Base\\Thing {}";
        assert_eq!(engine.rewrite(text), text);
    }

    #[test]
    fn construction_fails_on_bad_pattern() {
        let err = FileRewriteEngine::new(
            NamespacePrefix::new("Vendor").unwrap(),
            &ExclusionConfig::new(vec!["(".to_string()], Vec::new()),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_pattern");
    }

    /// Matches `import Name;` lines by plain text search.
    #[derive(Debug)]
    struct ImportLineMatcher;

    impl StatementMatcher for ImportLineMatcher {
        fn kind(&self) -> StatementKind {
            StatementKind::Use
        }

        fn find_all<'t>(&self, text: &'t str) -> Vec<StatementMatch<'t>> {
            text.match_indices("import ")
                .filter_map(|(at, keyword)| {
                    let name_start = at + keyword.len();
                    let len = text[name_start..].find(';')?;
                    Some(StatementMatch {
                        kind: StatementKind::Use,
                        keyword: keyword.trim_end(),
                        name: &text[name_start..name_start + len],
                        name_start,
                    })
                })
                .collect()
        }
    }

    #[test]
    fn custom_matchers_plug_into_the_engine() {
        let prefix = NamespacePrefix::new("Vendor\\Lib").unwrap();
        let exclusions = ExclusionConfig::new(vec!["Psr\\\\".to_string()], Vec::new())
            .compile()
            .unwrap();
        let rule = RewriteRule::with_matcher(Box::new(ImportLineMatcher), &prefix, &exclusions);
        let engine = FileRewriteEngine::with_rules(prefix, vec![rule]);

        let rewrite = engine.rewrite_detailed(
            "import Foo\\Bar;\nimport Psr\\Log;\nimport Composer\\X;\nuse Other\\Thing;\n",
        );

        assert_eq!(
            rewrite.content,
            "import Vendor\\Lib\\Foo\\Bar;\nimport Psr\\Log;\nimport Composer\\X;\nuse Other\\Thing;\n"
        );
        assert_eq!(rewrite.replacements, vec![(StatementKind::Use, 1)]);
        assert_eq!(engine.rules().len(), 1);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileRewriteEngine>();
    }
}
