pub mod app;
pub mod commands;
pub mod dispatch;
pub mod reply;
pub mod shell;

pub use app::{Cli, Commands, LogLevel};
pub use dispatch::Dispatcher;
pub use reply::{Reply, ReplySink, Tone, WriterSink};
