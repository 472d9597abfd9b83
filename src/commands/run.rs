use clap::Args;
use serde::Serialize;

use imposter::package::{self, Discovery};
use imposter::transform::TransformReport;
use imposter::{ProjectConfig, Transformer};

use super::{expand_path, CmdResult, GlobalArgs, RuleArgs};

#[derive(Args)]
pub struct RunArgs {
    /// Project directory containing composer.json
    #[arg(long, default_value = ".")]
    pub project: String,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first file that cannot be processed
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub project: String,
    pub discovery: Discovery,
    pub report: TransformReport,
}

pub fn run(args: RunArgs, _global: &GlobalArgs) -> CmdResult<RunOutput> {
    let root = expand_path(&args.project);
    let mut project = ProjectConfig::load(&root)?;
    args.rules.apply_to(&mut project.transform);

    // Build before discovery so a bad pattern fails before any package is read.
    let transformer = Transformer::new(&project.transform)?.dry_run(args.dry_run);
    let discovery = package::autoload_targets(&project)?;
    imposter::log_status!(
        "project",
        "{} package(s), {} autoload path(s)",
        discovery.packages.len(),
        discovery.targets.len()
    );

    let report = if args.fail_fast {
        transformer.transform_all_strict(&discovery.targets)?
    } else {
        transformer.transform_all(&discovery.targets)
    };

    let exit_code = if report.has_failures() { 1 } else { 0 };
    Ok((
        RunOutput {
            project: root.display().to_string(),
            discovery,
            report,
        },
        exit_code,
    ))
}
