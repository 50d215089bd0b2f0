use crate::catalog::{CatalogBackend, CatalogStore, JsonFileBackend};
use crate::cli::commands::{
    add::AddCommand, finish::FinishCommand, help::HelpCommand, meta::MetaCommand,
    random::RandomCommand, rate::RateCommand, resolve, stats::StatsCommand, tag::TagCommand,
    view::ViewCommand, CommandContext, CommandHandler, ARG_AUTHOR, ARG_ID, ARG_ISBN, ARG_RATING,
    ARG_TITLE,
};
use crate::cli::reply::{Reply, ReplySink};
use crate::config::Settings;
use crate::{LibrarianError, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

/// Routes commands to their handlers and turns every outcome into a [`Reply`]
pub struct Dispatcher<B: CatalogBackend = JsonFileBackend> {
    store: CatalogStore<B>,
    settings: Settings,
    rng: StdRng,
    started_at: DateTime<Utc>,
}

impl<B: CatalogBackend> Dispatcher<B> {
    pub fn new(store: CatalogStore<B>, settings: Settings) -> Self {
        Self::with_rng(store, settings, StdRng::from_entropy())
    }

    /// Use a fixed random source, for reproducible recommendations
    pub fn with_rng(store: CatalogStore<B>, settings: Settings, rng: StdRng) -> Self {
        Self {
            store,
            settings,
            rng,
            started_at: Utc::now(),
        }
    }

    pub fn store(&self) -> &CatalogStore<B> {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one command. Failures come back as error or warning replies.
    pub fn dispatch(&mut self, name: &str, args: &[String], user: &str) -> Reply {
        match self.execute(name, args, user) {
            Ok(reply) => reply,
            Err(e) => error_reply(&e, &self.settings),
        }
    }

    /// Dispatch a chat line. Lines without the command prefix are ignored.
    pub fn dispatch_line(&mut self, line: &str, user: &str) -> Option<Reply> {
        let body = line.trim_start().strip_prefix(self.settings.prefix.as_str())?;

        let words = match shell_words::split(body) {
            Ok(words) => words,
            Err(e) => {
                debug!("Unparseable command line {:?}: {}", line, e);
                return Some(
                    Reply::error("That command couldn't be read!")
                        .description(format!("Check your quotes: {}", e)),
                );
            }
        };

        let reply = match words.split_first() {
            Some((name, args)) => self.dispatch(name, args, user),
            None => self.dispatch("help", &[], user),
        };
        Some(reply)
    }

    /// Dispatch and hand the reply to `sink`
    pub fn deliver(
        &mut self,
        name: &str,
        args: &[String],
        user: &str,
        sink: &mut dyn ReplySink,
    ) -> Result<()> {
        let reply = self.dispatch(name, args, user);
        sink.send(reply)
    }

    fn execute(&mut self, name: &str, args: &[String], user: &str) -> Result<Reply> {
        let spec = resolve(name).ok_or_else(|| LibrarianError::UnknownCommand(name.to_string()))?;
        debug!(command = spec.name, user, ?args, "Dispatching command");

        match spec.name {
            "add" => self.run(&AddCommand::from_args(args), user),
            "stats" => self.run(&StatsCommand, user),
            "view" => self.run(&ViewCommand::from_args(args), user),
            "finish" => self.run(&FinishCommand::from_args(args), user),
            "rate" => self.run(&RateCommand::from_args(args), user),
            "tag" => self.run(&TagCommand::from_args(args), user),
            "random" => self.run(&RandomCommand::from_args(args), user),
            "meta" => self.run(&MetaCommand, user),
            "help" => self.run(&HelpCommand::from_args(args), user),
            other => Err(LibrarianError::UnknownCommand(other.to_string())),
        }
    }

    fn run<H: CommandHandler>(&mut self, handler: &H, user: &str) -> Result<Reply> {
        let mut ctx = CommandContext {
            store: &mut self.store,
            user,
            settings: &self.settings,
            rng: &mut self.rng,
            started_at: self.started_at,
        };

        let reply = handler.execute(&mut ctx)?;
        if handler.modifies_catalog() {
            info!(command = handler.name(), user, "Catalog updated");
        }
        Ok(reply)
    }
}

/// Translate a failed command into the reply its sender sees
pub fn error_reply(error: &LibrarianError, settings: &Settings) -> Reply {
    let prefix = &settings.prefix;
    if error.is_user_facing() {
        debug!("Command rejected: {}", error);
    }

    match error {
        LibrarianError::Isbn(e) => Reply::error("That ISBN doesn't look quite right!")
            .description(format!("Invalid ISBN: {}", e)),
        LibrarianError::InvalidChecksum(isbn) => {
            Reply::error("That ISBN doesn't look quite right!").description(format!(
                "Invalid ISBN: {} fails its checksum. Use `{}help isbn` for help finding it.",
                isbn, prefix
            ))
        }
        LibrarianError::DuplicateIsbn(_) => Reply::error("A book with that ISBN already exists!"),
        LibrarianError::NotFound(_) => Reply::error("That book couldn't be found!"),
        LibrarianError::RatingRange(e) => Reply::error(e.to_string()),
        LibrarianError::NoMatch(_) => Reply::error(
            "No books with those tags were found! Maybe try loose matching or fewer tags.",
        ),
        LibrarianError::UnknownMatchMode(mode) => {
            Reply::error(format!("`{}` isn't a matching mode!", mode))
                .description("Use `loose` to match any tag or `strict` to match all of them.")
        }
        LibrarianError::EmptyCatalog => Reply::warning("The library is empty!")
            .description(format!("Add the first book with `{}add`.", prefix)),
        LibrarianError::NotCompleted { .. } => Reply::warning(format!(
            "You haven't completed this book yet, use `{}finish` to mark a book as complete.",
            prefix
        )),
        LibrarianError::MissingArgument(arg) => Reply::error(missing_argument_title(arg)),
        LibrarianError::UnknownCommand(name) => Reply::error(format!(
            "Command `{}` not found! Use `{}help` to see all available commands.",
            name, prefix
        )),
        _ => {
            error!("Unhandled error: {}", error);
            Reply::error("Unhandled error!")
                .description(&settings.unhandled_error)
                .field("Error", error)
        }
    }
}

fn missing_argument_title(arg: &str) -> String {
    match arg {
        ARG_TITLE => "What's the name of the book?".to_string(),
        ARG_AUTHOR => "Who's the author?".to_string(),
        ARG_ISBN => "What's the ISBN?".to_string(),
        ARG_ID => "What book is it?".to_string(),
        ARG_RATING => "What's your rating?".to_string(),
        other => format!("Missing argument: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryBackend;
    use crate::cli::commands::test_support::{args, seeded_store, AUSTERLITZ};
    use crate::cli::reply::Tone;
    use pretty_assertions::assert_eq;

    fn dispatcher() -> Dispatcher<InMemoryBackend> {
        Dispatcher::with_rng(seeded_store(), Settings::default(), StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_dispatch_resolves_aliases() {
        let mut dispatcher = dispatcher();

        let reply = dispatcher.dispatch("DONE", &args(&[AUSTERLITZ, "8"]), "alice");
        assert_eq!(reply.tone, Tone::Success);
        assert_eq!(reply.field_value("New Rating"), Some("8/10"));

        let reply = dispatcher.dispatch("data", &[], "alice");
        assert_eq!(reply.title, "Current library statistics!");
    }

    #[test]
    fn test_dispatch_line_splits_quoted_arguments() {
        let mut dispatcher = dispatcher();

        let reply = dispatcher
            .dispatch_line(
                "lib!add \"Blood Meridian\" \"Cormac McCarthy\" 0-679-72875-9 \"western, fiction\"",
                "alice",
            )
            .unwrap();
        assert_eq!(
            reply.title,
            "Successfully added \"Blood Meridian\" to the library"
        );
        assert_eq!(reply.field_value("Tags"), Some("western, fiction"));
        assert_eq!(dispatcher.store().len(), 4);
    }

    #[test]
    fn test_dispatch_line_ignores_chatter() {
        let mut dispatcher = dispatcher();
        assert!(dispatcher.dispatch_line("has anyone read austerlitz?", "bob").is_none());
    }

    #[test]
    fn test_bare_prefix_shows_help() {
        let mut dispatcher = dispatcher();
        let reply = dispatcher.dispatch_line("lib!", "bob").unwrap();
        assert_eq!(reply.title, "Librarian help");
    }

    #[test]
    fn test_unbalanced_quotes() {
        let mut dispatcher = dispatcher();
        let reply = dispatcher.dispatch_line("lib!finish \"The Road", "bob").unwrap();
        assert!(reply.is_error());
        assert!(!dispatcher.store().get("9780307387899").unwrap().has_completed("bob"));
    }

    #[test]
    fn test_user_facing_errors() {
        let mut dispatcher = dispatcher();

        let reply = dispatcher.dispatch("remove", &[], "bob");
        assert_eq!(
            reply.title,
            "Command `remove` not found! Use `lib!help` to see all available commands."
        );
        assert_eq!(reply.exit_code(), 1);

        let reply = dispatcher.dispatch("rate", &args(&[AUSTERLITZ]), "bob");
        assert_eq!(reply.title, "What's your rating?");

        let reply = dispatcher.dispatch("rate", &args(&[AUSTERLITZ, "9"]), "bob");
        assert_eq!(reply.tone, Tone::Warning);
        assert!(reply.title.contains("`lib!finish`"));

        let reply = dispatcher.dispatch("view", &args(&["978-0-375-42052-9"]), "bob");
        assert_eq!(reply.title, "That ISBN doesn't look quite right!");

        let reply = dispatcher.dispatch("add", &args(&["T", "A", AUSTERLITZ]), "bob");
        assert_eq!(reply.title, "A book with that ISBN already exists!");
    }

    #[test]
    fn test_unhandled_errors_use_configured_message() {
        let settings = Settings {
            unhandled_error: "Ping @maintainer".to_string(),
            ..Settings::default()
        };
        let error = LibrarianError::Persistence {
            target: "catalog.json".to_string(),
            reason: "disk full".to_string(),
        };

        let reply = error_reply(&error, &settings);
        assert_eq!(reply.title, "Unhandled error!");
        assert_eq!(reply.description.as_deref(), Some("Ping @maintainer"));
        assert!(reply.field_value("Error").unwrap().contains("disk full"));
    }

    #[test]
    fn test_custom_prefix() {
        let settings = Settings {
            prefix: "!".to_string(),
            ..Settings::default()
        };
        let mut dispatcher = Dispatcher::with_rng(seeded_store(), settings, StdRng::seed_from_u64(1));

        assert!(dispatcher.dispatch_line("lib!stats", "a").is_none());
        let reply = dispatcher.dispatch_line("!random essays", "a").unwrap();
        assert_eq!(reply.field_value("ISBN"), Some("9781982158507"));
    }

    #[test]
    fn test_deliver_to_sink() {
        let mut dispatcher = dispatcher();
        let mut sink: Vec<Reply> = Vec::new();

        dispatcher.deliver("meta", &[], "a", &mut sink).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].field_value("Books"), Some("3"));
    }
}
