//! CLI argument definitions for xmlcombine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xmlcombine")]
#[command(about = "Rocksmith 2014 XML arrangement combiner", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Combine instrumental arrangement files in order
    Combine {
        /// Seconds trimmed from the start of each file after the first
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        trim: f64,
        /// Condense each file into a single phrase (allows difficulty levels)
        #[arg(long)]
        condense: bool,
        /// Reduce phrases and sections to the game limit
        #[arg(long)]
        coerce: bool,
        /// Title of the combined arrangement
        #[arg(long)]
        title: Option<String>,
        /// Output file (default: Combined_<arrangement>_RS2.xml)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Arrangement files in performance order
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,
    },
    /// Run every combination described by a project file
    Project {
        /// Project file (JSON)
        file: PathBuf,
        /// Target directory for the combined files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Condense instrumental arrangements (overrides the project)
        #[arg(long)]
        condense: bool,
        /// Do not reduce phrases and sections (overrides the project)
        #[arg(long)]
        no_coerce: bool,
        /// Do not add track titles to the lyrics (overrides the project)
        #[arg(long)]
        no_track_names: bool,
    },
    /// Join the audio files of a project with sox
    Audio {
        /// Project file (JSON)
        project: PathBuf,
        /// Target audio file
        #[arg(short, long)]
        output: PathBuf,
        /// Path to the sox executable
        #[arg(long, env = "XMLCOMBINE_SOX", default_value = "sox")]
        sox: PathBuf,
    },
}
