//! Orchestration: resolve targets to files and rewrite each one in place.
//!
//! Files are independent, so they are fanned out over the rayon pool and
//! share one read-only [`FileRewriteEngine`]. Each file is read whole,
//! rewritten in memory, and only then written back atomically.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::TransformConfig;
use crate::error::{Error, Result};
use crate::rewrite::FileRewriteEngine;
use crate::utils::{io, walk};

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub file: String,
    pub replacements: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_rule: BTreeMap<String, usize>,
    pub written: bool,
}

/// A file that could not be processed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub file: String,
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl FileFailure {
    fn from_error(file: &Path, err: &Error) -> Self {
        Self {
            file: file.display().to_string(),
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformSummary {
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub replacements: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub namespace: String,
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileFailure>,
    pub summary: TransformSummary,
}

impl TransformReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct Transformer {
    engine: FileRewriteEngine,
    dry_run: bool,
}

impl Transformer {
    /// Build the engine up front; configuration errors surface here,
    /// before any file is touched.
    pub fn new(config: &TransformConfig) -> Result<Self> {
        Ok(Self::from_engine(FileRewriteEngine::from_config(config)?))
    }

    pub fn from_engine(engine: FileRewriteEngine) -> Self {
        Self {
            engine,
            dry_run: false,
        }
    }

    /// Compute everything, write nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn engine(&self) -> &FileRewriteEngine {
        &self.engine
    }

    /// Rewrite a single file, or every PHP file under a directory.
    pub fn transform(&self, target: &Path) -> TransformReport {
        self.transform_all(&[target.to_path_buf()])
    }

    /// Rewrite all targets. Per-file failures are collected, never fatal;
    /// a target that cannot be walked is recorded as a failure too.
    pub fn transform_all(&self, targets: &[PathBuf]) -> TransformReport {
        let (files, unwalkable) = collect_files(targets);
        log_status!("transform", "Prefixing {} file(s) with {}", files.len(), self.engine.prefix());

        let mut results: Vec<(PathBuf, Result<FileOutcome>)> = files
            .into_par_iter()
            .map(|file| {
                let outcome = self.transform_file(&file);
                (file, outcome)
            })
            .collect();
        results.extend(unwalkable.into_iter().map(|(target, err)| (target, Err(err))));

        self.build_report(results)
    }

    /// Like [`transform_all`](Self::transform_all) but stops at the first
    /// target or file that fails and returns its error.
    pub fn transform_all_strict(&self, targets: &[PathBuf]) -> Result<TransformReport> {
        let (files, unwalkable) = collect_files(targets);
        if let Some((_, err)) = unwalkable.into_iter().next() {
            return Err(err);
        }

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|file| self.transform_file(file))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.build_report(
            files
                .into_iter()
                .zip(outcomes.into_iter().map(Ok))
                .collect(),
        ))
    }

    /// Read, rewrite and (unless dry-run or unchanged) persist one file.
    pub fn transform_file(&self, path: &Path) -> Result<FileOutcome> {
        let display = path.display().to_string();

        let content = io::read_file(path, &format!("read {}", display))
            .map_err(|e| Error::transform_file_failed(&display, "read", &e))?;

        let rewrite = self.engine.rewrite_detailed(&content);
        let changed = rewrite.changed() && rewrite.content != content;

        if changed && !self.dry_run {
            io::write_file_atomic(path, &rewrite.content, &format!("write {}", display))
                .map_err(|e| Error::transform_file_failed(&display, "write", &e))?;
        }

        Ok(FileOutcome {
            file: display,
            replacements: rewrite.total(),
            by_rule: rewrite
                .replacements
                .iter()
                .map(|(kind, n)| (kind.as_str().to_string(), *n))
                .collect(),
            written: changed && !self.dry_run,
        })
    }

    fn build_report(&self, results: Vec<(PathBuf, Result<FileOutcome>)>) -> TransformReport {
        let mut summary = TransformSummary {
            total: results.len(),
            ..TransformSummary::default()
        };
        let mut files = Vec::new();
        let mut failures = Vec::new();

        for (path, result) in results {
            match result {
                Ok(outcome) => {
                    if outcome.replacements > 0 {
                        summary.changed += 1;
                    } else {
                        summary.unchanged += 1;
                    }
                    summary.replacements += outcome.replacements;
                    files.push(outcome);
                }
                Err(err) => {
                    log_status!("transform", "{}", err);
                    summary.failed += 1;
                    failures.push(FileFailure::from_error(&path, &err));
                }
            }
        }

        TransformReport {
            namespace: self.engine.prefix().trimmed().to_string(),
            dry_run: self.dry_run,
            files,
            failures,
            summary,
        }
    }
}

/// Expand targets to files, dropping duplicates while keeping order.
/// Duplicates are detected on the canonical path so `a/../x.php` and
/// `x.php` are rewritten once. Targets that cannot be walked come back
/// separately with their error.
fn collect_files(targets: &[PathBuf]) -> (Vec<PathBuf>, Vec<(PathBuf, Error)>) {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files: Vec<PathBuf> = Vec::new();
    let mut unwalkable = Vec::new();

    for target in targets {
        match walk::php_files(target) {
            Ok(found) => {
                for file in found {
                    let key = std::fs::canonicalize(&file).unwrap_or_else(|_| file.clone());
                    if seen.insert(key) {
                        files.push(file);
                    }
                }
            }
            Err(err) => unwalkable.push((target.clone(), err)),
        }
    }

    (files, unwalkable)
}
