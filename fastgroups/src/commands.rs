use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fastgroups", version, about = "Remote fast groups controller CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the group inputs each controller exposes
    Slots {
        graph: PathBuf,
        /// Override every controller's variant (muter or bypasser)
        #[arg(long)]
        variant: Option<String>,
        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Run one queue submission and print the resulting group modes
    Simulate {
        graph: PathBuf,
        #[arg(long)]
        variant: Option<String>,
        /// Write the graph with applied modes to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
