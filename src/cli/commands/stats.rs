use super::{CommandContext, CommandHandler};
use crate::catalog::CatalogBackend;
use crate::cli::reply::{format_average, Reply};
use crate::Result;

/// Handler for the `stats` command
pub struct StatsCommand;

impl CommandHandler for StatsCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        let summary = ctx.store.query().summary()?;

        let popular = summary.most_popular;
        let favorite = summary.favorite;
        let favorite_rating = match favorite.average_rating() {
            Some(average) => format!("a rating of {}/10", format_average(average)),
            None => "no ratings yet".to_string(),
        };

        Ok(Reply::info("Current library statistics!")
            .field("Total books", summary.total_books)
            .field(
                "Most popular book",
                format!(
                    "\"{}\" with {} completions",
                    popular.title,
                    popular.completion_count()
                ),
            )
            .field(
                "Favorite book",
                format!("\"{}\" with {}", favorite.title, favorite_rating),
            ))
    }

    fn name(&self) -> &'static str {
        "stats"
    }
}
