//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "nyayarag")]
#[command(about = "NyayaRAG: citation-grounded answers to Indian legal questions")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, overlaid with NYAYA__* env vars)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a legal question
    Ask {
        /// The question
        query: String,
        /// PDF or DOCX whose text is used as primary evidence
        #[arg(short, long)]
        evidence: Option<PathBuf>,
        /// Number of index results to retrieve (default from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Print the raw response envelope as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a document into key clauses, risks and a verdict
    Analyze {
        /// PDF or DOCX file
        file: PathBuf,
    },
    /// Check every clause of a contract against legal provisions
    Verify {
        /// PDF or DOCX contract
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the HTTP API server
    Serve {
        /// Host to bind (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS (default from config)
        #[arg(long)]
        cors: Option<bool>,
    },
    /// Show current configuration
    Config,
}
