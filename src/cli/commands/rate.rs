use super::{arg, CommandContext, CommandHandler, ARG_ID, ARG_RATING};
use crate::catalog::{parse_rating, CatalogBackend};
use crate::cli::reply::{format_average, Reply};
use crate::{LibrarianError, Result};

/// Handler for the `rate` command
pub struct RateCommand {
    pub id: String,
    pub rating: String,
}

impl RateCommand {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            id: arg(args, 0),
            rating: arg(args, 1),
        }
    }
}

impl CommandHandler for RateCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        if self.id.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_ID));
        }
        let rating =
            parse_rating(&self.rating)?.ok_or(LibrarianError::MissingArgument(ARG_RATING))?;

        let isbn = ctx.store.lookup(&self.id)?.isbn.clone();
        let book = ctx.store.set_rating(&isbn, ctx.user, rating)?;

        let mut reply = Reply::success(format!("Updating your rating on \"{}\"!", book.title))
            .field("New Rating", rating);
        if let Some(average) = book.average_rating() {
            reply = reply.field("Average Rating", format!("{}/10", format_average(average)));
        }
        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "rate"
    }

    fn modifies_catalog(&self) -> bool {
        true
    }
}
