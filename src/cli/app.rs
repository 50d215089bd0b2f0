use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Librarian: a shared book catalog driven by chat style commands
#[derive(Parser, Debug)]
#[command(name = "librarian")]
#[command(version)]
#[command(about = "Shared book catalog with a chat style command interface")]
#[command(
    long_about = "Librarian keeps a catalog of books, who finished them and how they rated them. Run a single command, or use `shell` to read prefixed chat lines from stdin."
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Configuration file (defaults to ./librarian.yaml, then the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog document to use instead of the configured one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Who is issuing commands
    #[arg(short, long, global = true, env = "LIBRARIAN_USER", default_value = "local")]
    pub user: String,

    /// Command prefix for shell input
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Log level written to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// Positionals are optional so that missing input gets the same replies as in chat.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Add a book to the library
    Add {
        /// Book title
        title: Option<String>,
        /// Author's name
        author: Option<String>,
        /// 10 or 13 digit ISBN
        isbn: Option<String>,
        /// Comma separated tags
        tags: Option<String>,
    },

    /// Overview of the library's data
    #[command(visible_alias = "data")]
    Stats,

    /// Mark a book as finished, optionally rating it
    #[command(visible_aliases = ["done", "complete"])]
    Finish {
        /// ISBN or exact title
        id: Option<String>,
        /// Rating from 1 to 10
        #[arg(allow_hyphen_values = true)]
        rating: Option<String>,
    },

    /// Update your rating of a finished book
    Rate {
        /// ISBN or exact title
        id: Option<String>,
        /// Rating from 1 to 10
        #[arg(allow_hyphen_values = true)]
        rating: Option<String>,
    },

    /// Add tags to a book
    Tag {
        /// 10 or 13 digit ISBN
        isbn: Option<String>,
        /// Comma separated tags
        tags: Option<String>,
    },

    /// Pick a random book, optionally filtered by tags
    #[command(visible_aliases = ["rec", "recme"])]
    Random {
        /// Comma separated tags
        tags: Option<String>,
        /// `loose` (any tag) or `strict` (all tags)
        mode: Option<String>,
    },

    /// Details on one book
    #[command(visible_alias = "book")]
    View {
        /// 10 or 13 digit ISBN
        isbn: Option<String>,
    },

    /// Version, uptime and catalog location
    Meta,

    /// Command help, or `isbn` for help with ISBNs
    Help {
        /// Command name or `isbn`
        topic: Option<String>,
    },

    /// Read prefixed commands from stdin until it closes
    Shell,
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::Stats => "stats",
            Commands::Finish { .. } => "finish",
            Commands::Rate { .. } => "rate",
            Commands::Tag { .. } => "tag",
            Commands::Random { .. } => "random",
            Commands::View { .. } => "view",
            Commands::Meta => "meta",
            Commands::Help { .. } => "help",
            Commands::Shell => "shell",
        }
    }

    /// Check if this command writes to the catalog
    pub fn modifies_catalog(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. }
                | Commands::Finish { .. }
                | Commands::Rate { .. }
                | Commands::Tag { .. }
        )
    }

    /// Catalog command name and positional arguments; `None` for `shell`
    pub fn into_invocation(self) -> Option<(&'static str, Vec<String>)> {
        let name = self.name();
        let args = match self {
            Commands::Add {
                title,
                author,
                isbn,
                tags,
            } => vec![title, author, isbn, tags],
            Commands::Finish { id, rating } | Commands::Rate { id, rating } => vec![id, rating],
            Commands::Tag { isbn, tags } => vec![isbn, tags],
            Commands::Random { tags, mode } => vec![tags, mode],
            Commands::View { isbn } => vec![isbn],
            Commands::Help { topic } => vec![topic],
            Commands::Stats | Commands::Meta => Vec::new(),
            Commands::Shell => return None,
        };

        Some((name, args.into_iter().map(Option::unwrap_or_default).collect()))
    }
}
