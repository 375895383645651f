//! Storage layer for SaveBackup
//!
//! Plain-text file primitives: atomic replace, create-if-absent, and append.

pub mod file_io;

pub use file_io::{append_text, create_text_new, ensure_dir, write_text_atomic};
