pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::infrastructure::config::ClientConfig;

#[derive(Debug, Parser)]
#[command(
    name = "promptindex",
    version,
    about = "Build LLM prompt indexes for BI databases and generate SQL from questions"
)]
pub struct Cli {
    /// Base URL of the BI application (defaults to METABASE_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Session token sent as X-Metabase-Session (defaults to METABASE_SESSION)
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Per-request timeout in seconds (defaults to METABASE_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment settings with command-line flags layered on top.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.url.clone())
            .with_session_token(self.session.clone())
            .with_timeout_secs(self.timeout_secs)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List databases known to the BI application
    Databases,
    /// List the tables of a database
    Tables {
        #[arg(long)]
        database: i64,
    },
    /// Create an index for a database and generate a prompt per table
    Build {
        #[arg(long)]
        database: i64,
        /// Free-text description of the database
        #[arg(long)]
        description: String,
        /// Only index these tables (comma separated); defaults to all tables
        #[arg(long, value_delimiter = ',')]
        tables: Option<Vec<i64>>,
        /// Leave these tables out (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<i64>,
        /// Stop after generating prompts
        #[arg(long)]
        skip_processing: bool,
    },
    /// Show generated prompts and their processing status
    Prompts {
        #[arg(long)]
        index: Option<i64>,
    },
    /// Process the prompts of an index that have not completed yet
    Process {
        #[arg(long)]
        index: i64,
    },
    /// Turn a natural-language question into SQL
    Ask {
        #[arg(long)]
        database: Option<i64>,
        #[arg(long)]
        question: String,
        #[arg(long, value_delimiter = ',')]
        tables: Vec<i64>,
    },
}
