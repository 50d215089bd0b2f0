use super::{arg, book_card, CommandContext, CommandHandler, ARG_ISBN};
use crate::catalog::validation::{self, IsbnKind};
use crate::catalog::CatalogBackend;
use crate::cli::reply::{Reply, Tone};
use crate::{LibrarianError, Result};

/// Handler for the `view` command
pub struct ViewCommand {
    pub isbn: String,
}

impl ViewCommand {
    pub fn from_args(args: &[String]) -> Self {
        Self { isbn: arg(args, 0) }
    }
}

impl CommandHandler for ViewCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        if self.isbn.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_ISBN));
        }

        let book = ctx.store.find(&self.isbn)?;
        let mut card = book_card(book, Tone::Info).field("ISBN", &book.isbn);

        if validation::classify(&book.isbn)? == IsbnKind::Isbn10 {
            if let Some(converted) = validation::to_isbn13(&book.isbn)? {
                card = card.field("ISBN-13", converted);
            }
        }

        Ok(card)
    }

    fn name(&self) -> &'static str {
        "view"
    }
}
