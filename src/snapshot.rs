//! A local snapshot of all bookmarks.
//!
//! Fetching every bookmark with content is slow and puts load on the
//! instance, so commands which scan the whole collection store the fetched
//! bookmarks on disk. A snapshot left behind by an aborted run is reused to
//! resume; completed runs remove it. The snapshot records whether it was
//! fetched with content, as a content-less snapshot can't serve commands
//! which need the bookmark content.

use crate::{json, models::Bookmark, utils};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The stored bookmarks together with the fetch mode they were fetched in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotContents {
    pub with_content: bool,
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord<'a> {
    with_content: bool,
    bookmarks: &'a [Bookmark],
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<SnapshotContents, anyhow::Error> {
        debug!("Reading snapshot at {}", self.path.display());
        json::read_json(&self.path)
    }

    pub fn store(&self, bookmarks: &[Bookmark], with_content: bool) -> Result<(), anyhow::Error> {
        debug!(
            "Writing {} bookmarks to snapshot at {}",
            bookmarks.len(),
            self.path.display()
        );
        json::write_json(
            &self.path,
            &SnapshotRecord {
                with_content,
                bookmarks,
            },
        )
    }

    pub fn remove(&self) -> Result<(), anyhow::Error> {
        utils::remove_file(&self.path)
    }
}
