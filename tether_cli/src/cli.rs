use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tether_core::Target;

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Tether - connect cloud storage to labeling projects")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  tether providers                        List supported storage providers
  tether connect --project 1              Interactive connection wizard
  tether connect --project 1 --provider s3
  tether edit --project 1 storage.json    Reconfigure an existing connection

\x1b[1;36mValidation:\x1b[0m
  tether check s3 values.json             Validate settings without a server
  tether check s3 values.json --edit      Validate with edit-mode relaxations

\x1b[1;36mMore Info:\x1b[0m
  tether <command> --help                 Get help for any command")]
#[command(long_about = "
\x1b[1mTether\x1b[0m - Storage connection wizard

Walks you through connecting a cloud storage bucket to a labeling project:
  • Providers: Amazon S3, Google Cloud Storage, Azure Blob, Redis, Local files
  • Test the connection and preview files before anything is saved
  • Edit existing connections without ever re-typing credentials

Settings are validated step by step and submitted to the platform API only
when the full form is complete.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Platform API base URL
    #[arg(
        long,
        global = true,
        env = "TETHER_BASE_URL",
        default_value = "http://localhost:8080"
    )]
    pub base_url: String,

    /// API token used for the Authorization header
    #[arg(long, global = true, env = "TETHER_TOKEN")]
    pub token: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported storage providers
    ///
    /// Shows a table of providers with their descriptions and field counts.
    #[command(alias = "ls")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tether providers              Show all providers
  tether providers --output json")]
    Providers,

    /// Interactive wizard to connect a new storage
    ///
    /// Walks through provider selection, connection settings, import
    /// settings with a file preview, and a final review before saving.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tether connect --project 1
  tether connect --project 1 --provider gcs
  tether connect --project 1 --target export")]
    Connect {
        /// Project the storage belongs to
        #[arg(long)]
        project: i64,

        /// Provider to preselect (skips the provider prompt)
        #[arg(long)]
        provider: Option<String>,

        /// Direction of the connection
        #[arg(long, value_enum, default_value_t = TargetArg::Import)]
        target: TargetArg,
    },

    /// Interactive wizard to reconfigure an existing storage
    ///
    /// Loads the storage record from a JSON file; the provider is fixed
    /// and saved credentials show up masked until you replace them.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tether edit --project 1 storage.json
  tether edit --project 1 storage.json --target export")]
    Edit {
        /// Project the storage belongs to
        #[arg(long)]
        project: i64,

        /// Path to the storage record (JSON, as returned by the API)
        storage: PathBuf,

        /// Direction of the connection
        #[arg(long, value_enum, default_value_t = TargetArg::Import)]
        target: TargetArg,
    },

    /// Validate storage settings from a file without contacting a server
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tether check s3 values.json
  tether check redis values.json --edit
  tether check azure values.json --output json")]
    Check {
        /// Provider name (e.g. s3, gcs, azure, redis, localfiles)
        provider: String,

        /// Path to a JSON object of field values
        values: PathBuf,

        /// Relax credential requirements as the edit wizard does
        #[arg(long)]
        edit: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    /// Source storage for task import
    Import,
    /// Target storage for annotation export
    Export,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Import => Target::Import,
            TargetArg::Export => Target::Export,
        }
    }
}
