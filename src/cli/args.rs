//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build, generate, export and share a life-story biography.
#[derive(Parser, Debug)]
#[command(name = "biography", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// User whose biography the command acts on.
    #[arg(long, short, global = true, env = "BIOGRAPHY_USER")]
    pub user: Option<String>,

    /// Directory for biography records (overrides configuration).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the normalized biography as JSON.
    Show,

    /// Print the fallback narrative composed from the sections.
    Compose,

    /// Print the generation prompt for a voice.
    Prompt {
        /// Narrative voice (emotional, professional, simple, poetic).
        #[arg(long, default_value = "emotional")]
        voice: String,
    },

    /// Generate and store a narrative draft.
    Generate {
        /// Narrative voice (emotional, professional, simple, poetic).
        #[arg(long, default_value = "emotional")]
        voice: String,
    },

    /// Render the biography to a PDF or DOCX file.
    Export(ExportArgs),

    /// Publish or hide the biography.
    Publish {
        /// `true` to publish, `false` to hide.
        #[arg(long, action = clap::ArgAction::Set)]
        public: bool,
    },

    /// Print the public view behind a share token.
    Share {
        /// Share token printed by `publish`.
        public_id: String,
    },

    /// Print the sections, voices and fonts on offer as JSON.
    Catalog,

    /// Apply a JSON patch file (fields and/or a `timeline` array).
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },
}

/// Arguments for `export`.
#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output format: pdf or docx.
    #[arg(long, default_value = "pdf")]
    pub format: String,

    /// Output directory (overrides configuration).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Render this markup file instead of the stored narrative.
    #[arg(long)]
    pub story: Option<PathBuf>,

    /// Title to use instead of the stored one.
    #[arg(long)]
    pub title: Option<String>,
}
