//! `composer.json` manifest reading.
//!
//! Only the parts the prefixer needs: package name, `require`, `autoload`,
//! `config.vendor-dir` and `extra.imposter`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::io;

pub const MANIFEST_FILE: &str = "composer.json";
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposerManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub require: BTreeMap<String, Value>,
    #[serde(default)]
    pub autoload: Autoload,
    #[serde(default)]
    pub config: ComposerSettings,
    #[serde(default)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposerSettings {
    #[serde(default, rename = "vendor-dir")]
    pub vendor_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Extra {
    #[serde(default)]
    pub imposter: Option<ImposterSection>,
}

/// The `extra.imposter` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImposterSection {
    #[serde(default)]
    pub namespace: Option<String>,
    /// Package names (globs allowed) never transformed.
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub use_excludes: Vec<String>,
    #[serde(default, alias = "extendsIncludes")]
    pub extends_namespace: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Autoload {
    #[serde(default, rename = "psr-4")]
    pub psr4: BTreeMap<String, Value>,
    #[serde(default, rename = "psr-0")]
    pub psr0: BTreeMap<String, Value>,
    #[serde(default)]
    pub classmap: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl Autoload {
    /// Every autoload entry resolved against `base`, in manifest order,
    /// without duplicates. Paths are not checked for existence.
    pub fn paths(&self, base: &Path) -> Vec<PathBuf> {
        let mut relative: Vec<&str> = Vec::new();

        for value in self.psr4.values().chain(self.psr0.values()) {
            match value {
                Value::String(dir) => relative.push(dir),
                Value::Array(dirs) => relative.extend(dirs.iter().filter_map(|d| d.as_str())),
                _ => {}
            }
        }
        relative.extend(self.classmap.iter().map(String::as_str));
        relative.extend(self.files.iter().map(String::as_str));

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut paths: Vec<PathBuf> = Vec::new();
        for rel in relative {
            let path = resolve_entry(base, rel);
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
        paths
    }
}

impl ComposerManifest {
    pub fn parse(content: &str, source: &Path) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::config_invalid_json(source.display().to_string(), e))
    }

    /// Read `composer.json` from a directory.
    pub fn read_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = io::read_file(&path, &format!("read {}", path.display()))?;
        Self::parse(&content, &path)
    }

    /// Read `composer.json` from a directory, `None` when there is none.
    pub fn read_optional(dir: &Path) -> Result<Option<Self>> {
        if !dir.join(MANIFEST_FILE).is_file() {
            return Ok(None);
        }
        Self::read_from_dir(dir).map(Some)
    }

    pub fn vendor_dir(&self) -> &str {
        self.config
            .vendor_dir
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_VENDOR_DIR)
    }

    /// Required package names, platform requirements filtered out.
    pub fn required_packages(&self) -> Vec<&str> {
        self.require
            .keys()
            .map(String::as_str)
            .filter(|name| !is_platform_package(name))
            .collect()
    }
}

/// `php`, extensions, libraries and composer's own API packages are not
/// installed into the vendor dir.
pub fn is_platform_package(name: &str) -> bool {
    matches!(
        name,
        "php" | "php-64bit" | "hhvm" | "composer" | "composer-plugin-api" | "composer-runtime-api"
    ) || name.starts_with("ext-")
        || name.starts_with("lib-")
        || !name.contains('/')
}

fn resolve_entry(base: &Path, entry: &str) -> PathBuf {
    let trimmed = entry.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        base.to_path_buf()
    } else {
        base.join(trimmed.trim_start_matches("./"))
    }
}
