//! Librarian keeps a shared book catalog: books, who finished them, how they
//! rated them and how they are tagged. Commands arrive as chat style lines and
//! every change is written through to a JSON document.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;

pub use error::{LibrarianError, Result};
