use super::{arg, CommandContext, CommandHandler, ARG_ID};
use crate::catalog::{parse_rating, CatalogBackend, CompletionOutcome};
use crate::cli::reply::{format_average, Reply};
use crate::{LibrarianError, Result};

/// Handler for the `finish` command
pub struct FinishCommand {
    /// ISBN or exact title
    pub id: String,
    pub rating: String,
}

impl FinishCommand {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            id: arg(args, 0),
            rating: arg(args, 1),
        }
    }
}

impl CommandHandler for FinishCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        if self.id.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_ID));
        }

        // A bad rating must not leave a half-applied completion behind
        let rating = parse_rating(&self.rating)?;
        let isbn = ctx.store.lookup(&self.id)?.isbn.clone();

        if ctx.store.finish(&isbn, ctx.user, rating)? == CompletionOutcome::AlreadyCompleted {
            return Ok(Reply::warning(format!(
                "You've already finished this book! Use `{}rate` to update your rating.",
                ctx.settings.prefix
            )));
        }

        let book = ctx.store.find(&isbn)?;
        let mut reply = Reply::success(format!("Congrats on finishing \"{}\"!", book.title))
            .field("Current Completions", book.completion_count());
        if let Some(rating) = rating {
            reply = reply.field("New Rating", rating);
        }
        if let Some(average) = book.average_rating() {
            reply = reply.field("Average Rating", format!("{}/10", format_average(average)));
        }
        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "finish"
    }

    fn modifies_catalog(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, CatalogStore, RatingError};
    use crate::cli::commands::test_support::{
        args, run, seeded_store, FailingBackend, AUSTERLITZ, ROAD,
    };
    use crate::cli::reply::Tone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_finish_by_isbn_with_rating() {
        let mut store = seeded_store();

        let reply = run(&FinishCommand::from_args(&args(&[AUSTERLITZ, "7"])), &mut store, "alice").unwrap();
        assert_eq!(reply.title, "Congrats on finishing \"Austerlitz\"!");
        assert_eq!(reply.field_value("Current Completions"), Some("1"));
        assert_eq!(reply.field_value("New Rating"), Some("7/10"));

        let book = store.get(AUSTERLITZ).unwrap();
        assert_eq!(book.rating_for("alice").map(|r| r.value()), Some(7));
    }

    #[test]
    fn test_finish_reports_average_rating() {
        let mut store = seeded_store();
        run(&FinishCommand::from_args(&args(&[AUSTERLITZ, "10"])), &mut store, "bob").unwrap();

        let reply = run(&FinishCommand::from_args(&args(&[AUSTERLITZ, "7"])), &mut store, "alice").unwrap();
        assert_eq!(reply.field_value("New Rating"), Some("7/10"));
        assert_eq!(reply.field_value("Average Rating"), Some("8.5/10"));
    }

    #[test]
    fn test_failed_write_keeps_finish_retryable() {
        let mut store = CatalogStore::load(FailingBackend::default()).unwrap();
        store
            .add(Book::new("Austerlitz", "W. G. Sebald", AUSTERLITZ))
            .unwrap();
        store.backend_mut().failing = true;

        let command = FinishCommand::from_args(&args(&[AUSTERLITZ, "7"]));
        let result = run(&command, &mut store, "alice");
        assert!(matches!(result, Err(LibrarianError::Persistence { .. })));
        assert_eq!(store.get(AUSTERLITZ).unwrap().completion_count(), 0);
        assert_eq!(store.backend().inner.document().books[AUSTERLITZ].completion_count(), 0);

        store.backend_mut().failing = false;
        let reply = run(&command, &mut store, "alice").unwrap();
        assert_eq!(reply.title, "Congrats on finishing \"Austerlitz\"!");
        assert_eq!(reply.field_value("New Rating"), Some("7/10"));
    }

    #[test]
    fn test_finish_by_title_without_rating() {
        let mut store = seeded_store();

        let reply = run(&FinishCommand::from_args(&args(&["The Road"])), &mut store, "bob").unwrap();
        assert_eq!(reply.field_value("New Rating"), None);
        assert!(store.get(ROAD).unwrap().has_completed("bob"));
        assert!(store.get(ROAD).unwrap().ratings.is_empty());
    }

    #[test]
    fn test_finishing_twice_warns_and_keeps_rating() {
        let mut store = seeded_store();
        run(&FinishCommand::from_args(&args(&[ROAD, "5"])), &mut store, "alice").unwrap();

        let reply = run(&FinishCommand::from_args(&args(&[ROAD, "9"])), &mut store, "alice").unwrap();
        assert_eq!(reply.tone, Tone::Warning);
        assert!(reply.title.contains("`lib!rate`"));

        let book = store.get(ROAD).unwrap();
        assert_eq!(book.completion_count(), 1);
        assert_eq!(book.rating_for("alice").map(|r| r.value()), Some(5));
    }

    #[test]
    fn test_bad_rating_leaves_book_untouched() {
        let mut store = seeded_store();

        let result = run(&FinishCommand::from_args(&args(&[ROAD, "11"])), &mut store, "alice");
        assert!(matches!(
            result,
            Err(LibrarianError::RatingRange(RatingError::OutOfRange(11)))
        ));
        assert_eq!(store.get(ROAD).unwrap().completion_count(), 0);
    }

    #[test]
    fn test_finish_errors() {
        let mut store = seeded_store();

        assert!(matches!(
            run(&FinishCommand::from_args(&[]), &mut store, "alice"),
            Err(LibrarianError::MissingArgument(ARG_ID))
        ));
        assert!(matches!(
            run(&FinishCommand::from_args(&args(&["Blood Meridian"])), &mut store, "alice"),
            Err(LibrarianError::NotFound(_))
        ));
    }
}
