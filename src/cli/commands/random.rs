use super::{arg, book_card, CommandContext, CommandHandler};
use crate::catalog::{split_tags, CatalogBackend, TagMatch};
use crate::cli::reply::{Reply, Tone};
use crate::Result;

/// Handler for the `random` command
pub struct RandomCommand {
    pub tags: String,
    /// `loose` (default) or `strict`
    pub mode: String,
}

impl RandomCommand {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            tags: arg(args, 0),
            mode: arg(args, 1),
        }
    }
}

impl CommandHandler for RandomCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        let mode: TagMatch = self.mode.parse()?;
        let tags = split_tags(&self.tags);

        let book = ctx.store.query().random_book(&tags, mode, &mut *ctx.rng)?;
        Ok(book_card(book, Tone::Info).field("ISBN", &book.isbn))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
