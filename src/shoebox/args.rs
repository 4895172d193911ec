use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shoebox")]
#[command(about = "A photo library with a trash", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add image files
    #[command(alias = "a")]
    Add {
        /// Image files to add
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Record the photos as camera captures instead of uploads
        #[arg(long)]
        camera: bool,
    },

    /// List photos (active ones by default)
    #[command(alias = "ls")]
    List {
        /// Show the trash
        #[arg(long, conflicts_with_all = ["uploads", "camera", "all"])]
        deleted: bool,

        /// Show uploaded photos only
        #[arg(long, conflicts_with_all = ["camera", "all"])]
        uploads: bool,

        /// Show camera captures only
        #[arg(long, conflicts_with = "all")]
        camera: bool,

        /// Show everything, trash included
        #[arg(long)]
        all: bool,
    },

    /// Show details of one or more photos
    #[command(alias = "v")]
    View {
        /// Indexes or id prefixes (e.g. 1 d2 3f9a)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Move photos to the trash
    #[command(alias = "rm")]
    Delete {
        /// Indexes or id prefixes (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Bring photos back from the trash
    Restore {
        /// Indexes or id prefixes (e.g. d1 d2)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Permanently remove photos; empties the trash when none are given
    Purge {
        /// Indexes or id prefixes
        selectors: Vec<String>,

        /// Actually remove (otherwise only lists what would go)
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove trashed photos older than the retention window
    Cleanup,

    /// Push photos that were kept locally to the backing store
    Sync,

    /// Run the trash cleanup on its schedule until interrupted
    Watch,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., retention-days)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
