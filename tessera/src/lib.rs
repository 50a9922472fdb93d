#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod auth;
pub mod config;
pub mod errors;
pub mod facade;
pub mod identity;
pub mod resolver;
pub mod template;
pub mod util;
pub mod workspace;

pub use errors::{Error, Result};
