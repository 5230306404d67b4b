mod cli;
mod commands;
mod config;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config: config::Config,
}

impl Context {
    /// Whether API clients should log raw response bodies
    pub fn raw_bodies(&self) -> bool {
        self.verbose >= 2
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: config::Config::from_env(),
    };

    match cli.command {
        Command::Suma(args) => commands::suma::run(&ctx, args),
        Command::Mesh(args) => commands::mesh::run(&ctx, args),
        Command::Net(cmd) => commands::net::run(&ctx, cmd),
        Command::Config => commands::config::run(&ctx),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "appctl", &mut io::stdout());
            Ok(())
        }
    }
}
