//! Readers for data exports of other bookmarking services.

mod omnivore;
mod pocket;

pub use omnivore::{ContentKind, OmnivoreArticle, OmnivoreExport};
pub use pocket::PocketExport;

/// An article from an export which should be matched against existing
/// bookmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedArticle {
    pub url: String,
    pub title: Option<String>,
}
