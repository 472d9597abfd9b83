//! Run configuration: the prefix plus exclusion lists, either given
//! directly or read from a project's `composer.json` (`extra.imposter`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::composer::{ComposerManifest, MANIFEST_FILE};
use crate::error::{Error, Result};
use crate::exclusion::ExclusionConfig;

/// Everything the rewrite engine needs for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    pub namespace: String,
    #[serde(flatten)]
    pub exclusions: ExclusionConfig,
}

impl TransformConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            exclusions: ExclusionConfig::default(),
        }
    }

    pub fn with_use_excludes(mut self, patterns: Vec<String>) -> Self {
        self.exclusions.use_excludes = patterns;
        self
    }

    pub fn with_extends_includes(mut self, patterns: Vec<String>) -> Self {
        self.exclusions.extends_includes = patterns;
        self
    }

    /// Layer command-line values on top: a non-empty namespace replaces,
    /// pattern lists are appended.
    pub fn merge_overrides(
        &mut self,
        namespace: Option<&str>,
        use_excludes: &[String],
        extends_includes: &[String],
    ) {
        if let Some(ns) = namespace.filter(|ns| !ns.trim().is_empty()) {
            self.namespace = ns.to_string();
        }
        self.exclusions
            .use_excludes
            .extend(use_excludes.iter().cloned());
        self.exclusions
            .extends_includes
            .extend(extends_includes.iter().cloned());
    }
}

/// A composer project configured for prefixing.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub manifest: ComposerManifest,
    pub transform: TransformConfig,
    /// Package names or globs that are never transformed.
    pub excludes: Vec<String>,
}

impl ProjectConfig {
    /// Load `composer.json` from `root` and pull the `extra.imposter` block.
    pub fn load(root: &Path) -> Result<Self> {
        let manifest = ComposerManifest::read_from_dir(root)?;
        Self::from_manifest(root, manifest)
    }

    pub fn from_manifest(root: &Path, manifest: ComposerManifest) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE).display().to_string();
        let section = manifest.extra.imposter.clone().unwrap_or_default();

        let namespace = section
            .namespace
            .filter(|ns| !ns.trim().is_empty())
            .ok_or_else(|| {
                Error::config_missing_key("extra.imposter.namespace", Some(manifest_path))
                    .with_hint("Add {\"extra\": {\"imposter\": {\"namespace\": \"My\\\\Prefix\"}}} to composer.json")
            })?;

        Ok(Self {
            root: root.to_path_buf(),
            transform: TransformConfig {
                namespace,
                exclusions: ExclusionConfig::new(section.use_excludes, section.extends_namespace),
            },
            excludes: section.excludes,
            manifest,
        })
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(self.manifest.vendor_dir())
    }

    pub fn is_excluded(&self, package: &str) -> bool {
        self.excludes
            .iter()
            .any(|pattern| pattern == package || glob_match::glob_match(pattern, package))
    }
}
