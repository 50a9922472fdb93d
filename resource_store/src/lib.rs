#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod adaptor;
pub mod field_path;
pub mod filter;
pub mod memory;

pub use adaptor::{Error, Pagination, ResourceStore, Result};
pub use field_path::FieldPath;
pub use filter::{Filter, TextMode};
pub use memory::MemoryStore;
