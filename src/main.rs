//! gitscan: report the sync health of every git repository under a directory
//!
//! Each repository is probed with `git remote update` and
//! `git status --porcelain=2 --branch`; repositories behind their upstream
//! are fast-forwarded and probed again.

use anyhow::Result;
use clap::{Arg, ArgAction, Command as ClapCommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gitscan::core::{resolve_worker_count, scan, ScanOptions, StdoutSink};
use gitscan::git::GitCli;

const DEFAULT_LOG_LEVEL: &str = "warn";
const VERBOSE_LOG_LEVEL: &str = "debug";

fn cli() -> ClapCommand {
    ClapCommand::new("gitscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report the sync state of every git repository under a directory")
        .arg(
            Arg::new("dir")
                .help("Base directory")
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .help("Show all checked repositories, even the clean ones")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pull")
                .long("pull")
                .help("Pull down remote changes if behind (repositories behind upstream are always fast-forwarded)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("par")
                .long("par")
                .value_name("N")
                .help("Parallel instances of git status to run [default: number of CPUs]")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Give up on any single git command after SECS seconds")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug diagnostics to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    init_logging(matches.get_flag("verbose"));

    let base = matches
        .get_one::<PathBuf>("dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let options = ScanOptions {
        show_all: matches.get_flag("all"),
        pull: matches.get_flag("pull"),
        workers: resolve_worker_count(matches.get_one::<usize>("par").copied()),
        timeout: matches
            .get_one::<u64>("timeout")
            .map(|secs| Duration::from_secs(*secs)),
    };
    tracing::debug!(?options, base = %base.display(), "starting scan");

    let vcs = Arc::new(GitCli::with_timeout(options.timeout));
    scan(&base, &options, vcs, Arc::new(StdoutSink)).await?;

    Ok(())
}
