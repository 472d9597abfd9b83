use clap::Args;

use imposter::TransformConfig;

pub type CmdResult<T> = imposter::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Worker threads for file rewriting; 0 lets rayon decide.
    pub jobs: usize,
}

/// Prefix and pattern flags shared by every rewriting command.
#[derive(Args, Default, Debug, Clone)]
pub struct RuleArgs {
    /// Namespace prefix to insert, e.g. 'MyPlugin\Vendor'
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Regex for `use` targets that must not be prefixed (repeatable)
    #[arg(long = "use-exclude", value_name = "PATTERN")]
    pub use_excludes: Vec<String>,

    /// Regex for `extends` targets that should be prefixed (repeatable)
    #[arg(long = "extends-include", value_name = "PATTERN")]
    pub extends_includes: Vec<String>,
}

impl RuleArgs {
    /// Build a config from flags alone; the namespace is then mandatory.
    pub fn to_config(&self) -> imposter::Result<TransformConfig> {
        let namespace = self
            .namespace
            .as_deref()
            .filter(|ns| !ns.trim().is_empty())
            .ok_or_else(|| {
                imposter::Error::validation_invalid_argument(
                    "namespace",
                    "A namespace prefix is required (--namespace)",
                )
            })?;

        Ok(TransformConfig::new(namespace)
            .with_use_excludes(self.use_excludes.clone())
            .with_extends_includes(self.extends_includes.clone()))
    }

    /// Layer flags over a config loaded from a project file.
    pub fn apply_to(&self, config: &mut TransformConfig) {
        config.merge_overrides(
            self.namespace.as_deref(),
            &self.use_excludes,
            &self.extends_includes,
        );
    }
}

/// Configure the global rayon pool once at startup.
pub(crate) fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        imposter::log_status!("imposter", "Thread pool already configured: {}", e);
    }
}

/// Expand `~` and environment variables in a user-supplied path.
pub(crate) fn expand_path(raw: &str) -> std::path::PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    std::path::PathBuf::from(expanded)
}

pub mod rewrite;
pub mod run;
pub mod transform;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (imposter::Result<serde_json::Value>, i32) {
    crate::tty::status("imposter is working...");

    match command {
        crate::Commands::Transform(args) => dispatch!(args, global, transform),
        crate::Commands::Run(args) => dispatch!(args, global, run),
        crate::Commands::Rewrite(_) => {
            let err = imposter::Error::validation_invalid_argument(
                "output_mode",
                "Rewrite command uses raw output mode",
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}
