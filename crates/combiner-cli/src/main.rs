mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("xmlcombine=info,combiner_core=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match args.command {
        Command::Combine {
            trim,
            condense,
            coerce,
            title,
            output,
            files,
        } => commands::combine::run(&files, trim, condense, coerce, title.as_deref(), output),
        Command::Project {
            file,
            output_dir,
            condense,
            no_coerce,
            no_track_names,
        } => commands::project::run(&file, &output_dir, condense, no_coerce, no_track_names),
        Command::Audio {
            project,
            output,
            sox,
        } => commands::audio::run(&project, &output, &sox),
    }
}
