use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Extract titled outlines from PDFs and rank document sections for a persona.
#[derive(Debug, Parser)]
#[command(name = "pdfoutline", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a `<name>.json` outline for every PDF in a directory
    Outline {
        /// Directory containing the PDF files
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory receiving the JSON outlines (created if missing)
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// JSON Schema each outline must satisfy. Default: built-in schema
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,

        /// JSON configuration file overriding pipeline defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Maximum number of documents processed concurrently
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Rank the sections of a PDF collection for a persona and task
    Rank {
        /// Request file with persona, job_to_be_done and documents
        #[arg(value_name = "INPUT_JSON")]
        input_json: PathBuf,

        /// Directory containing the requested PDFs
        #[arg(value_name = "PDF_DIR")]
        pdf_dir: PathBuf,

        /// Where to write the report
        #[arg(value_name = "OUTPUT_JSON")]
        output_json: PathBuf,

        /// Sentences kept in each refined section
        #[arg(long, value_name = "N")]
        max_sentences: Option<usize>,

        /// JSON configuration file overriding pipeline defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show extracted lines with their layout features and heading scores
    Lines {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// JSON configuration file overriding pipeline defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Output format for the lines subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output, one object per line
    Json,
}
