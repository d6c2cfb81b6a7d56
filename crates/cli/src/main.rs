mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// GXL workflow language toolchain.
#[derive(Parser)]
#[command(name = "gxl", version, about = "GXL workflow language toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to a gxl.toml config file (default: ./gxl.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .gxl file and print its syntax tree as JSON
    Parse {
        /// Path to the .gxl source file
        file: PathBuf,
    },

    /// Parse one or more .gxl files and report the first error in each
    Check {
        /// Paths to .gxl source files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a .gxl file in canonical form
    Fmt {
        /// Path to the .gxl source file
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(long, conflicts_with = "check")]
        write: bool,
        /// Exit 1 if the file is not already in canonical form
        #[arg(long)]
        check: bool,
    },

    /// Print the token stream of a .gxl file, comments included
    Tokens {
        /// Path to the .gxl source file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Parse { file } => {
            commands::parse::cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Check { files } => {
            commands::check::cmd_check(&files, cli.output, cli.quiet);
        }
        Commands::Fmt { file, write, check } => {
            let config = match config::load(cli.config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    report_error(&e.to_string(), cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            commands::fmt::cmd_fmt(
                &file,
                &config.fmt.print_options(),
                commands::fmt::FmtMode::from_flags(write, check),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Tokens { file } => {
            commands::tokens::cmd_tokens(&file, cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
