//! Installed package discovery.
//!
//! Starting from the project's `require` map, follows each package's own
//! requirements through the vendor directory and collects the autoload
//! paths that need prefixing.

use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;

use crate::composer::ComposerManifest;
use crate::config::ProjectConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub dir: PathBuf,
    pub manifest: ComposerManifest,
}

impl Package {
    /// Autoload paths that exist on disk.
    pub fn autoload_paths(&self) -> Vec<PathBuf> {
        self.manifest
            .autoload
            .paths(&self.dir)
            .into_iter()
            .filter(|p| p.exists())
            .collect()
    }
}

/// What discovery found, kept for reporting.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    pub packages: Vec<String>,
    pub excluded: Vec<String>,
    pub missing: Vec<String>,
    pub targets: Vec<PathBuf>,
}

/// Walk required packages breadth first, root requirements first.
pub fn resolve_packages(project: &ProjectConfig) -> Result<(Vec<Package>, Discovery)> {
    let vendor_dir = project.vendor_dir();
    let mut queue: VecDeque<String> = project
        .manifest
        .required_packages()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut seen: BTreeSet<String> = queue.iter().cloned().collect();
    let mut packages = Vec::new();
    let mut discovery = Discovery::default();

    while let Some(name) = queue.pop_front() {
        if project.is_excluded(&name) {
            log_status!("project", "Skipping excluded package {}", name);
            discovery.excluded.push(name);
            continue;
        }

        let dir = vendor_dir.join(&name);
        let Some(manifest) = ComposerManifest::read_optional(&dir)? else {
            log_status!("project", "Package {} is not installed in {}", name, vendor_dir.display());
            discovery.missing.push(name);
            continue;
        };

        for dependency in manifest.required_packages() {
            if seen.insert(dependency.to_string()) {
                queue.push_back(dependency.to_string());
            }
        }

        discovery.packages.push(name.clone());
        packages.push(Package {
            name,
            dir,
            manifest,
        });
    }

    Ok((packages, discovery))
}

/// Every existing autoload path of every non-excluded installed package.
pub fn autoload_targets(project: &ProjectConfig) -> Result<Discovery> {
    let (packages, mut discovery) = resolve_packages(project)?;

    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
    let mut targets: Vec<PathBuf> = Vec::new();
    for package in &packages {
        for path in package.autoload_paths() {
            if seen.insert(path.clone()) {
                targets.push(path);
            }
        }
    }

    discovery.targets = targets;
    Ok(discovery)
}
