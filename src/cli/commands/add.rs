use super::{arg, CommandContext, CommandHandler, ARG_AUTHOR, ARG_ISBN, ARG_TITLE};
use crate::catalog::{split_tags, Book, CatalogBackend};
use crate::cli::reply::Reply;
use crate::{LibrarianError, Result};

/// Handler for the `add` command
pub struct AddCommand {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub tags: String,
}

impl AddCommand {
    pub fn new(title: String, author: String, isbn: String, tags: String) -> Self {
        Self {
            title,
            author,
            isbn,
            tags,
        }
    }

    pub fn from_args(args: &[String]) -> Self {
        Self::new(arg(args, 0), arg(args, 1), arg(args, 2), arg(args, 3))
    }
}

impl CommandHandler for AddCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        if self.title.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_TITLE));
        }
        if self.author.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_AUTHOR));
        }
        if self.isbn.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_ISBN));
        }

        let book = Book::new(&self.title, &self.author, &self.isbn)
            .with_tags(split_tags(&self.tags));
        let book = ctx.store.add(book)?;

        Ok(
            Reply::success(format!("Successfully added \"{}\" to the library", book.title))
                .field("Title", &book.title)
                .field("Author", &book.author)
                .field("ISBN", &book.isbn)
                .field("Tags", book.tag_list()),
        )
    }

    fn name(&self) -> &'static str {
        "add"
    }

    fn modifies_catalog(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::cli::commands::test_support::{args, run, KISS};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_book() {
        let mut store = CatalogStore::in_memory();
        let command = AddCommand::from_args(&args(&[
            "Girls can kiss now : essays",
            "Jill Gutowitz",
            "978-1-9821-5850-7",
            "nonfiction, essays,queer",
        ]));

        let reply = run(&command, &mut store, "alice").unwrap();
        assert_eq!(
            reply.title,
            "Successfully added \"Girls can kiss now : essays\" to the library"
        );
        assert_eq!(reply.field_value("ISBN"), Some(KISS));
        assert_eq!(reply.field_value("Tags"), Some("nonfiction, essays, queer"));
        assert_eq!(store.get(KISS).unwrap().author, "Jill Gutowitz");
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn test_add_without_tags() {
        let mut store = CatalogStore::in_memory();
        let command = AddCommand::from_args(&args(&["Austerlitz", "W. G. Sebald", "9780375420528"]));

        let reply = run(&command, &mut store, "alice").unwrap();
        assert_eq!(reply.field_value("Tags"), Some("N/A"));
    }

    #[test]
    fn test_missing_arguments_in_order() {
        let mut store = CatalogStore::in_memory();

        for (given, missing) in [
            (vec![], ARG_TITLE),
            (vec!["T"], ARG_AUTHOR),
            (vec!["T", "A"], ARG_ISBN),
        ] {
            let result = run(&AddCommand::from_args(&args(&given)), &mut store, "alice");
            assert!(
                matches!(result, Err(LibrarianError::MissingArgument(arg)) if arg == missing),
                "expected missing {}",
                missing
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_and_invalid_isbn() {
        let mut store = CatalogStore::in_memory();
        let command = AddCommand::from_args(&args(&["T", "A", KISS]));
        run(&command, &mut store, "alice").unwrap();

        let duplicate = run(&command, &mut store, "alice");
        assert!(matches!(duplicate, Err(LibrarianError::DuplicateIsbn(_))));

        let bad_checksum = AddCommand::from_args(&args(&["T", "A", "9781982158508"]));
        assert!(matches!(
            run(&bad_checksum, &mut store, "alice"),
            Err(LibrarianError::InvalidChecksum(_))
        ));

        let too_short = AddCommand::from_args(&args(&["T", "A", "12345"]));
        assert!(matches!(
            run(&too_short, &mut store, "alice"),
            Err(LibrarianError::Isbn(_))
        ));
        assert_eq!(store.len(), 1);
    }
}
