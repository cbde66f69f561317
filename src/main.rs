use clap::Parser;
use git_logview::commands::{execute_log, LogArgs};
use git_logview::core::print_error;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "git-logview")]
#[command(about = "Show commit history with decorations, notes and diffs")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    log: LogArgs,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag; RUST_LOG still wins
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = execute_log(&cli.log) {
        // Reader went away (e.g. piped into head); nothing left to say
        if !e.is_broken_pipe() {
            print_error(&e);
        }
        std::process::exit(1);
    }
}
