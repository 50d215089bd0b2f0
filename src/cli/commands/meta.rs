use super::{CommandContext, CommandHandler};
use crate::catalog::CatalogBackend;
use crate::cli::reply::Reply;
use crate::Result;
use chrono::{Duration, Utc};

/// Handler for the `meta` command
pub struct MetaCommand;

impl CommandHandler for MetaCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        let uptime = Utc::now().signed_duration_since(ctx.started_at);

        Ok(Reply::info("Librarian")
            .field("Version", env!("CARGO_PKG_VERSION"))
            .field("Uptime", format_uptime(uptime))
            .field("Books", ctx.store.len())
            .field("Catalog", ctx.store.backend().describe()))
    }

    fn name(&self) -> &'static str {
        "meta"
    }
}

/// `1d 2h 3m 4s`, leaving out leading zero units
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        total % 86_400 / 3_600,
        total % 3_600 / 60,
        total % 60,
    );

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ")
}
