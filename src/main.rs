use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw,
}

mod commands;
mod output;
mod tty;

use commands::{rewrite, run, transform};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "imposter")]
#[command(version = VERSION)]
#[command(about = "Prefix namespaces of vendored PHP packages")]
struct Cli {
    /// Worker threads (0 = one per core)
    #[arg(long, short = 'j', global = true, default_value_t = 0)]
    jobs: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prefix namespaces in files or directories
    Transform(transform::TransformArgs),
    /// Prefix every autoload path of a composer project's dependencies
    Run(run::RunArgs),
    /// Rewrite PHP source from stdin to stdout
    Rewrite(rewrite::RewriteArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Rewrite(_) => ResponseMode::Raw,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { jobs: cli.jobs };
    commands::configure_thread_pool(global.jobs);

    if let ResponseMode::Raw = response_mode(&cli.command) {
        let Commands::Rewrite(args) = cli.command else {
            return std::process::ExitCode::from(2);
        };

        return match rewrite::run_raw(args) {
            Ok(content) => {
                print!("{}", content);
                std::process::ExitCode::SUCCESS
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_json_result(Err(err));
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        };
    }

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
