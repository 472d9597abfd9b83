use clap::Args;

use imposter::transform::TransformReport;
use imposter::Transformer;

use super::{expand_path, CmdResult, GlobalArgs, RuleArgs};

#[derive(Args)]
pub struct TransformArgs {
    /// Files or directories to rewrite in place
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first file that cannot be processed
    #[arg(long)]
    pub fail_fast: bool,
}

pub fn run(args: TransformArgs, _global: &GlobalArgs) -> CmdResult<TransformReport> {
    let config = args.rules.to_config()?;
    let transformer = Transformer::new(&config)?.dry_run(args.dry_run);
    let targets: Vec<_> = args.targets.iter().map(|t| expand_path(t)).collect();

    let report = if args.fail_fast {
        transformer.transform_all_strict(&targets)?
    } else {
        transformer.transform_all(&targets)
    };

    let exit_code = if report.has_failures() { 1 } else { 0 };
    Ok((report, exit_code))
}
