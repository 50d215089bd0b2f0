use crate::catalog::CatalogBackend;
use crate::cli::dispatch::Dispatcher;
use crate::cli::reply::ReplySink;
use crate::Result;
use std::io::BufRead;
use tracing::{info, trace};

/// Feed chat lines from `input` through the dispatcher until it runs dry.
///
/// Returns the number of commands handled. Lines without the prefix are skipped.
pub fn run_shell<B: CatalogBackend, R: BufRead>(
    dispatcher: &mut Dispatcher<B>,
    input: R,
    user: &str,
    sink: &mut dyn ReplySink,
) -> Result<usize> {
    info!(
        prefix = %dispatcher.settings().prefix,
        user,
        "Reading commands from input"
    );

    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        match dispatcher.dispatch_line(&line, user) {
            Some(reply) => {
                handled += 1;
                sink.send(reply)?;
            }
            None => trace!("Skipping line without prefix"),
        }
    }

    info!(handled, "Input closed");
    Ok(handled)
}
