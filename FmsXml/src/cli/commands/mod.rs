use clap::Subcommand;
use std::path::PathBuf;

use crate::converter::fms_xml::DEFAULT_INDENT_SIZE;

pub mod convert;
pub mod info;
pub mod verify;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a .fms file to XML
    ToXml {
        /// Source .fms file
        source: PathBuf,

        /// Output XML file (defaults to the source path with an .xml extension)
        destination: Option<PathBuf>,

        /// Write every empty string as its own entry instead of collapsing runs
        #[arg(long)]
        no_collapse: bool,

        /// Spaces per indentation level
        #[arg(long, default_value_t = DEFAULT_INDENT_SIZE)]
        indent: usize,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert an XML file back to .fms
    ToFms {
        /// Source XML file
        source: PathBuf,

        /// Output .fms file (defaults to the source path with an .fms extension)
        destination: Option<PathBuf>,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert between .fms and XML, detecting the direction from file extensions
    Convert {
        /// Source file
        #[arg(short, long)]
        source: PathBuf,

        /// Output file
        #[arg(short, long)]
        destination: PathBuf,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check that .fms files survive FMS → XML → FMS byte-for-byte
    Verify {
        /// .fms files to check
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Keep the intermediate .xml and regenerated .fms files in this directory
        #[arg(long)]
        keep: Option<PathBuf>,
    },

    /// Show header, footer and string statistics of a .fms file
    Info {
        /// .fms file to inspect
        path: PathBuf,

        /// Print the whole decoded document as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::ToXml {
                source,
                destination,
                no_collapse,
                indent,
                quiet,
            } => {
                let destination = destination
                    .clone()
                    .unwrap_or_else(|| source.with_extension("xml"));
                convert::to_xml(
                    source,
                    &destination,
                    &convert::xml_options(*no_collapse, *indent),
                    !*quiet,
                )
            }
            Commands::ToFms {
                source,
                destination,
                quiet,
            } => {
                let destination = destination
                    .clone()
                    .unwrap_or_else(|| source.with_extension("fms"));
                convert::to_fms(source, &destination, !*quiet)
            }
            Commands::Convert {
                source,
                destination,
                quiet,
            } => convert::execute(source, destination, !*quiet),
            Commands::Verify { sources, keep } => verify::execute(sources, keep.as_deref()),
            Commands::Info { path, json } => info::execute(path, *json),
        }
    }
}
