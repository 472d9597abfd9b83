use clap::Args;
use std::io::Read;

use imposter::{Error, FileRewriteEngine};

use super::RuleArgs;

#[derive(Args)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub rules: RuleArgs,
}

/// Read PHP source from stdin and return the rewritten text.
pub fn run_raw(args: RewriteArgs) -> imposter::Result<String> {
    let engine = FileRewriteEngine::from_config(&args.rules.to_config()?)?;

    if crate::tty::is_stdin_tty() {
        return Err(Error::validation_invalid_argument(
            "stdin",
            "Pipe PHP source into 'imposter rewrite'",
        ));
    }

    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .map_err(|e| Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;

    Ok(engine.rewrite(&source))
}
