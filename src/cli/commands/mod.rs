pub mod add;
pub mod finish;
pub mod help;
pub mod meta;
pub mod random;
pub mod rate;
pub mod stats;
pub mod tag;
pub mod view;

use crate::catalog::{Book, CatalogBackend, CatalogStore};
use crate::cli::reply::{format_average, Reply, Tone};
use crate::config::Settings;
use crate::Result;
use chrono::{DateTime, Utc};
use rand::RngCore;

pub const ARG_TITLE: &str = "title";
pub const ARG_AUTHOR: &str = "author";
pub const ARG_ISBN: &str = "ISBN";
pub const ARG_ID: &str = "title / ISBN";
pub const ARG_RATING: &str = "rating";

/// Everything a handler may touch while it runs
pub struct CommandContext<'a, B: CatalogBackend> {
    pub store: &'a mut CatalogStore<B>,
    /// Identity of whoever sent the command
    pub user: &'a str,
    pub settings: &'a Settings,
    pub rng: &'a mut dyn RngCore,
    pub started_at: DateTime<Utc>,
}

/// Common trait for all command handlers
pub trait CommandHandler {
    /// Execute the command
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply>;

    /// Get command name for logging
    fn name(&self) -> &'static str;

    /// Whether a successful run writes to the catalog
    fn modifies_catalog(&self) -> bool {
        false
    }
}

/// Static description of a command, shared by alias resolution and help
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Example invocation without the prefix
    pub usage: &'static str,
    /// Argument synopsis for the overview
    pub synopsis: &'static str,
    pub brief: &'static str,
    pub help: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        aliases: &[],
        usage: "help isbn",
        synopsis: "[command / isbn]",
        brief: "View bot and command help!",
        help: "View general help or detailed information on each command.",
    },
    CommandSpec {
        name: "add",
        aliases: &[],
        usage: "add \"Girls can kiss now : essays\" \"Jill Gutowitz\" 9781982158507 \"nonfiction,essays,queer\"",
        synopsis: "<\"Book Title\"> <\"Author's Name\"> <10 / 13 digit ISBN> [\"comma,separated,tags\"]",
        brief: "Add a book to the library!",
        help: "Adds a book to the library with a \"Title\", \"Author\", ISBN, and, optionally, \"comma,separated,tags\".",
    },
    CommandSpec {
        name: "stats",
        aliases: &["data"],
        usage: "stats",
        synopsis: "",
        brief: "View an overview of the library's data!",
        help: "Shows the total number of books, the favorite book (highest average rating) and the most popular book (most completions).",
    },
    CommandSpec {
        name: "view",
        aliases: &["book"],
        usage: "view 9781982158507",
        synopsis: "<isbn>",
        brief: "Stats on a specific book",
        help: "View information on a specific book!",
    },
    CommandSpec {
        name: "finish",
        aliases: &["done", "complete"],
        usage: "finish 9781982158507 10",
        synopsis: "<ISBN / exact title> [1-10]",
        brief: "Complete a book and give it a rating!",
        help: "Mark a book as complete and optionally give it a rating. You can only mark a book as complete once, but can update your rating at any time with `rate`.",
    },
    CommandSpec {
        name: "rate",
        aliases: &[],
        usage: "rate 9781982158507 10",
        synopsis: "<ISBN / exact title> <1-10>",
        brief: "Update your rating of a book!",
        help: "Update or add a rating to any book you've marked as complete.",
    },
    CommandSpec {
        name: "tag",
        aliases: &[],
        usage: "tag 9781982158507 \"heartwrenching at times, but still nonfiction\"",
        synopsis: "<isbn> [\"comma,separated,tags\"]",
        brief: "Add new tags to a book!",
        help: "Add new tags to a book after it's been added to the library! Skips over existing tags and preserves the order tags are added in.",
    },
    CommandSpec {
        name: "random",
        aliases: &["rec", "recme"],
        usage: "random \"scifi,fantasy\" strict",
        synopsis: "[\"comma,separated,tags\"] [strict / loose]",
        brief: "Picks a random book for you to read!",
        help: "Picks a random book from the library with the specified tags. Loose matching returns books with any of the tags, strict matching only books with all of them. Defaults to loose matching.",
    },
    CommandSpec {
        name: "meta",
        aliases: &[],
        usage: "meta",
        synopsis: "",
        brief: "Version and uptime",
        help: "Display the current version, uptime and catalog location.",
    },
];

/// Find a command by name or alias, ignoring case
pub fn resolve(name: &str) -> Option<&'static CommandSpec> {
    let name = name.to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|spec| spec.name == name || spec.aliases.iter().any(|alias| *alias == name))
}

/// Positional argument `index`, empty when absent
pub(crate) fn arg(args: &[String], index: usize) -> String {
    args.get(index).cloned().unwrap_or_default()
}

/// Detail card shared by `view` and `random`
pub(crate) fn book_card(book: &Book, tone: Tone) -> Reply {
    let rating = book
        .average_rating()
        .map(|average| format!("{}/10", format_average(average)))
        .unwrap_or_else(|| "N/A".to_string());

    Reply::new(tone, format!("\"{}\"", book.title))
        .field("Author", &book.author)
        .field("Rating", rating)
        .field("Completions", book.completion_count())
        .field("Tags", book.tag_list())
        .field("WorldCat", format!("https://worldcat.org/search?q={}", book.isbn))
        .field("B&N", format!("https://www.barnesandnoble.com/s/{}", book.isbn))
}
