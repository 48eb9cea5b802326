//! A client library and automation CLI for the Karakeep bookmarking service.

/// The typed endpoint wrappers.
mod api;
/// Available arguments.
mod args;
/// The HTTP client for the Karakeep API.
mod client;
/// Available commands.
pub mod cmd;
/// The configuration used in the CLI.
mod config;
/// The errors which can occur when talking to the API.
mod errors;
/// Readers for exports of other bookmarking services.
pub mod exports;
/// Helper function to work with JSON.
pub mod json;
/// The logger of the CLI.
mod logger;
/// Heuristics to match articles and locate highlights.
pub mod matcher;
/// The typed records of the API.
pub mod models;
/// Cursor pagination over the list endpoints.
pub mod pagination;
/// The settings used in the CLI.
mod settings;
/// The local bookmark snapshot.
mod snapshot;
/// Utilities to work with files.
pub mod utils;

pub use api::BookmarkFilter;
pub use args::{Args, Subcommands};
pub use client::{ClientConfig, KarakeepClient, Throttler};
pub use config::Config;
pub use errors::KarakeepError;
pub use logger::Logger;
pub use settings::Settings;
pub use snapshot::{Snapshot, SnapshotContents};
