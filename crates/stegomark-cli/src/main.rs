use clap::Parser;
use stegomark_core::Registry;

mod cli;
mod commands;

use cli::{CliArgs, Commands};

pub type CliResult<T> = stegomark_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let registry = Registry::with_defaults();
    let algorithm = args.algorithm.as_deref();

    match args.command {
        Commands::Embed(embed) => embed.run(&registry, algorithm),
        Commands::Extract(extract) => extract.run(&registry, algorithm),
        Commands::Gensig(gensig) => gensig.run(&registry, algorithm),
        Commands::Embedmark(embed_mark) => embed_mark.run(&registry, algorithm),
        Commands::Checkmark(check_mark) => check_mark.run(&registry, algorithm),
        Commands::Diff(diff) => diff.run(),
        Commands::Algorithms => commands::info::algorithms(&registry),
        Commands::Readformats => commands::info::read_formats(),
        Commands::Writeformats => commands::info::write_formats(),
    }
}
