use super::{arg, CommandContext, CommandHandler, ARG_ISBN};
use crate::catalog::{split_tags, CatalogBackend};
use crate::cli::reply::Reply;
use crate::{LibrarianError, Result};

/// Handler for the `tag` command
pub struct TagCommand {
    pub isbn: String,
    pub tags: String,
}

impl TagCommand {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            isbn: arg(args, 0),
            tags: arg(args, 1),
        }
    }
}

impl CommandHandler for TagCommand {
    fn execute<B: CatalogBackend>(&self, ctx: &mut CommandContext<'_, B>) -> Result<Reply> {
        if self.isbn.is_empty() {
            return Err(LibrarianError::MissingArgument(ARG_ISBN));
        }

        let book = ctx.store.append_tags(&self.isbn, &split_tags(&self.tags))?;

        Ok(
            Reply::success(format!("Successfully updated \"{}\"!", book.title))
                .field("New Tags", book.tag_list()),
        )
    }

    fn name(&self) -> &'static str {
        "tag"
    }

    fn modifies_catalog(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{args, run, seeded_store, KISS};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tags_are_appended_once() {
        let mut store = seeded_store();

        let reply = run(&TagCommand::from_args(&args(&[KISS, "queer,essays,queer"])), &mut store, "a").unwrap();
        assert_eq!(reply.title, "Successfully updated \"Girls can kiss now : essays\"!");
        assert_eq!(reply.field_value("New Tags"), Some("nonfiction, essays, queer"));

        let reply = run(&TagCommand::from_args(&args(&[KISS, "memoir"])), &mut store, "a").unwrap();
        assert_eq!(
            reply.field_value("New Tags"),
            Some("nonfiction, essays, queer, memoir")
        );
    }

    #[test]
    fn test_tag_requires_isbn() {
        let mut store = seeded_store();
        assert!(matches!(
            run(&TagCommand::from_args(&[]), &mut store, "a"),
            Err(LibrarianError::MissingArgument(ARG_ISBN))
        ));
    }
}
