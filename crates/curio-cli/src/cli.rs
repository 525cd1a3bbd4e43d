use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use curio_core::api::{SortField, SortOrder};

#[derive(Parser)]
#[command(name = "curio")]
#[command(about = "Administer a curated quote collection from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for API configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List quotes page by page
    List {
        /// Quotes per page
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Sort field
        #[arg(long, value_enum, default_value_t = SortArg::Created)]
        sort: SortArg,
        /// Sort direction
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
        /// Follow the cursor until the collection is exhausted
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search quotes (one page of results; search does not paginate)
    Search {
        /// Search query, matched against text and author
        query: String,
        /// Maximum results
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Sort field
        #[arg(long, value_enum, default_value_t = SortArg::Created)]
        sort: SortArg,
        /// Sort direction
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new quote
    Add {
        /// Quote text
        text: String,
        /// Author attribution
        #[arg(short, long)]
        author: String,
        /// Comma-separated tags
        #[arg(short, long, value_name = "TAGS")]
        tags: Option<String>,
    },
    /// Edit an existing quote
    Edit {
        /// Quote ID or unique ID prefix
        id: String,
        /// Replacement text
        #[arg(long)]
        text: Option<String>,
        /// Replacement author
        #[arg(long)]
        author: Option<String>,
        /// Replacement comma-separated tags
        #[arg(long, value_name = "TAGS")]
        tags: Option<String>,
    },
    /// Delete a quote
    Delete {
        /// Quote ID or unique ID prefix
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Bulk import quotes from a JSON file
    Import {
        /// JSON array of {"quote", "author", "tags"} objects
        file: PathBuf,
        /// Items per confirmation batch
        #[arg(long, default_value = "5")]
        batch_size: usize,
        /// Delay between create calls in milliseconds
        #[arg(long, default_value = "300")]
        delay_ms: u64,
        /// Run to completion without pausing between batches
        #[arg(short = 'y', long)]
        yes: bool,
        /// Write failed items to a file for correction and retry
        #[arg(long, value_name = "PATH")]
        retry_file: Option<PathBuf>,
        /// Include backend-detected duplicates in the retry file
        #[arg(long)]
        include_duplicates: bool,
    },
    /// Tag maintenance
    Tags {
        #[command(subcommand)]
        command: TagsCommands,
    },
    /// Duplicate detection and cleanup
    Dedup {
        #[command(subcommand)]
        command: DedupCommands,
    },
    /// Export the whole collection
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the stored API token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
pub enum TagsCommands {
    /// List all tags with usage counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove tags no quote uses
    Cleanup {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// AI-generate tags for quotes that have none
    Fill {
        /// Maximum quotes to tag in one run
        #[arg(long, default_value = "25")]
        limit: usize,
        /// Items per confirmation batch
        #[arg(long, default_value = "5")]
        batch_size: usize,
        /// Run to completion without pausing between batches
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DedupCommands {
    /// Scan the collection for duplicate clusters
    Scan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete duplicates, keeping one member of each cluster
    Clean {
        /// Keep the newest member instead of the oldest
        #[arg(long)]
        keep_newest: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// API base URL (e.g. <https://api.example.com>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Make this the active profile
        #[arg(long)]
        activate: bool,
    },
    /// Show the resolved configuration
    Show,
    /// Switch the active profile
    Use {
        /// Profile name to activate
        profile: String,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an API bearer token for the profile
    Login {
        /// Token value (prompted on stdin when omitted)
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Remove the stored token
    Logout,
    /// Show whether a token is available
    Status,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Text,
    Author,
    Created,
    Updated,
}

impl SortArg {
    #[must_use]
    pub const fn to_field(self) -> SortField {
        match self {
            Self::Text => SortField::Text,
            Self::Author => SortField::Author,
            Self::Created => SortField::CreatedAt,
            Self::Updated => SortField::UpdatedAt,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl OrderArg {
    #[must_use]
    pub const fn to_order(self) -> SortOrder {
        match self {
            Self::Asc => SortOrder::Asc,
            Self::Desc => SortOrder::Desc,
        }
    }

    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Asc)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
