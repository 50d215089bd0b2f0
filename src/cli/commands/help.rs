use super::{arg, resolve, CommandContext, CommandHandler, COMMANDS};
use crate::catalog::CatalogBackend;
use crate::cli::reply::Reply;
use crate::{LibrarianError, Result};

const ISBN_TOPIC: &str = "isbn";

/// Handler for the `help` command
pub struct HelpCommand {
    /// Command name, alias or `isbn`; empty for the overview
    pub topic: String,
}

impl HelpCommand {
    pub fn from_args(args: &[String]) -> Self {
        Self { topic: arg(args, 0) }
    }

    fn overview(prefix: &str) -> Reply {
        COMMANDS.iter().fold(
            Reply::info("Librarian help").description(format!(
                "Commands start with `{0}`. Use `{0}help <command>` for details on one command, \
                 or `{0}help isbn` to learn about ISBNs.",
                prefix
            )),
            |reply, spec| {
                let usage = format!("{}{} {}", prefix, spec.name, spec.synopsis);
                reply.field(usage.trim_end(), spec.brief)
            },
        )
    }

    fn isbn(prefix: &str) -> Reply {
        Reply::info("What's an ISBN?").description(format!(
            "An ISBN (International Standard Book Number) identifies one edition of a book. \
             It has 10 or 13 digits, hyphens optional, and the last digit is a checksum \
             (a 10-digit ISBN may end in X). Look for it on the back cover above the barcode \
             or on the copyright page, or search the title on WorldCat. \
             Use it with `{0}add`, `{0}view` and `{0}tag`.",
            prefix
        ))
    }
}

impl CommandHandler for HelpCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        let prefix = &ctx.settings.prefix;
        if self.topic.is_empty() {
            return Ok(Self::overview(prefix));
        }
        if self.topic.eq_ignore_ascii_case(ISBN_TOPIC) {
            return Ok(Self::isbn(prefix));
        }

        let spec =
            resolve(&self.topic).ok_or_else(|| LibrarianError::UnknownCommand(self.topic.clone()))?;

        let mut reply = Reply::info(format!("{}{}", prefix, spec.name))
            .description(format!("{}\n{}", spec.brief, spec.help))
            .field("Example", format!("`{}{}`", prefix, spec.usage));
        if !spec.aliases.is_empty() {
            reply = reply.field("Aliases", spec.aliases.join(", "));
        }
        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "help"
    }
}
