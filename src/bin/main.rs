//! cmdbox CLI: run one command confined to a working directory and print
//! the structured result as JSON.

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use env_logger::{Builder, Env};
use log::{error, Level};
use serde::Serialize;

use cmdbox::{ExecConfig, ExecOptions, Executor, WriteMode};

#[derive(Parser)]
#[command(name = "cmdbox")]
#[command(version, about = "Run commands confined to a working directory", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Shell command under the default root
    cmdbox shell 'echo hello | wc -c'

    # Direct execution, no shell interpretation
    cmdbox run /bin/echo -- hello world

    # Bounded output, short timeout
    cmdbox --timeout 2 --max-bytes 4096 shell 'yes | head -c 100000'

    # File helpers
    cmdbox list --recursive
    cmdbox write notes.txt 'remember this'
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Working directory root (overrides WORKING_DIR)
    #[arg(short, long, value_name = "PATH", global = true)]
    root: Option<PathBuf>,

    /// Timeout in seconds (overrides CMD_TIMEOUT)
    #[arg(short, long, value_name = "SECONDS", global = true)]
    timeout: Option<f64>,

    /// Capture budget per stream in bytes (overrides CMD_MAX_OUTPUT_BYTES)
    #[arg(long, value_name = "BYTES", global = true)]
    max_bytes: Option<usize>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a shell command line
    Shell {
        /// Command line handed to `sh -c`
        command: String,
    },

    /// Run an executable directly with literal arguments
    Run {
        /// Program to execute
        program: String,

        /// Program arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List files under the working directory
    List {
        /// Path to list, relative to the root
        path: Option<String>,

        #[arg(short = 'R', long)]
        recursive: bool,
    },

    /// Print a text file from the working directory
    Read {
        path: String,

        /// Truncate to this many characters
        #[arg(long, default_value_t = 65536)]
        max_chars: usize,
    },

    /// Write a text file under the working directory
    Write {
        path: String,
        content: String,

        /// Append instead of overwriting
        #[arg(short, long)]
        append: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> cmdbox::Result<()> {
    let mut config = ExecConfig::from_env()?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(secs) = cli.timeout {
        config.default_timeout = Duration::from_secs_f64(secs);
    }
    if let Some(bytes) = cli.max_bytes {
        config.max_output_bytes = bytes;
    }

    let executor = Executor::new(config)?;

    match cli.command {
        Commands::Shell { command } => print_json(&executor.run_shell(&command)?),
        Commands::Run { program, args } => {
            let mut argv = vec![program];
            argv.extend(args);
            print_json(&executor.run_argv(&argv, ExecOptions::default())?)
        }
        Commands::List { path, recursive } => {
            print_json(&executor.list_dir(path.as_deref(), recursive)?)
        }
        Commands::Read { path, max_chars } => print_json(&executor.read_text(&path, max_chars)),
        Commands::Write {
            path,
            content,
            append,
        } => {
            let mode = if append {
                WriteMode::Append
            } else {
                WriteMode::Overwrite
            };
            print_json(&executor.write_text(&path, &content, mode))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> cmdbox::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let env = Env::default().filter_or("RUST_LOG", if verbose { "debug" } else { "warn" });

    Builder::from_env(env)
        .format(|buf, record| {
            let tag = match record.level() {
                Level::Error => style("ERROR").red().bold(),
                Level::Warn => style("WARN ").yellow().bold(),
                Level::Info => style("INFO ").green(),
                Level::Debug => style("DEBUG").cyan(),
                Level::Trace => style("TRACE").dim(),
            };
            writeln!(buf, "{} {}", tag, record.args())
        })
        .init();
}
