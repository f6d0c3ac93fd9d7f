//! Core traits defined in `chatrelay-core` and implemented by other crates.

pub mod directory;

pub use directory::Directory;
