pub mod paths;

pub use paths::LibrarianPaths;
