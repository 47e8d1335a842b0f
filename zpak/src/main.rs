mod cli;
mod commands;
mod error;
mod util;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use cli::{CliOpts, Commands};

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if opts.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match opts.cmd {
        Commands::Create {
            path,
            compression,
            selected_files,
        } => commands::create(path, selected_files, compression)?,
        Commands::List {
            path,
            selected_files,
        } => commands::list(path, selected_files)?,
        Commands::Extract {
            path,
            output,
            selected_files,
        } => commands::extract(path, output, selected_files)?,
    };

    Ok(())
}
