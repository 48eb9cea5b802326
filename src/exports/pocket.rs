//! Reader for Pocket CSV exports.

use super::ArchivedArticle;
use anyhow::{anyhow, Context};
use log::debug;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// One row of a Pocket `part_*.csv` export file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct PocketRecord {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    time_added: Option<i64>,
    #[serde(default)]
    tags: Option<String>,
    status: String,
}

/// A Pocket export, given as a CSV file or as a directory containing one.
#[derive(Debug, Clone)]
pub struct PocketExport {
    csv_path: PathBuf,
}

impl PocketExport {
    pub fn open(path: &Path) -> Result<Self, anyhow::Error> {
        let csv_path = if path.is_file() {
            path.to_owned()
        } else if path.is_dir() {
            find_csv_file(path)?
        } else {
            return Err(anyhow!("Pocket export not found at {}", path.display()));
        };

        Ok(Self { csv_path })
    }

    /// The archived articles of the export.
    pub fn archived_articles(&self) -> Result<Vec<ArchivedArticle>, anyhow::Error> {
        debug!("Reading Pocket export at {}", self.csv_path.display());
        let mut reader = csv::Reader::from_path(&self.csv_path).context(format!(
            "Can't read Pocket export at {}",
            self.csv_path.display()
        ))?;

        let mut articles = Vec::new();
        for record in reader.deserialize() {
            let record: PocketRecord = record.context("Invalid record in Pocket export")?;
            if record.status == "archive" {
                let title = record.title.filter(|title| !title.trim().is_empty());
                articles.push(ArchivedArticle {
                    url: record.url,
                    title,
                });
            }
        }

        Ok(articles)
    }
}

fn find_csv_file(dir: &Path) -> Result<PathBuf, anyhow::Error> {
    let mut csv_paths = Vec::new();
    for entry in
        fs::read_dir(dir).context(format!("Can't read export directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|extension| extension == "csv") {
            csv_paths.push(path);
        }
    }
    csv_paths.sort();

    csv_paths
        .into_iter()
        .next()
        .ok_or(anyhow!("No CSV file in export directory {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CSV: &str = "\
title,url,time_added,tags,status
An archived article,https://example.com/archived,1711282976,rust|cli,archive
,https://example.com/untitled,1711282976,,archive
An unread article,https://example.com/unread,1711282976,,unread
";

    #[test]
    fn test_archived_articles() {
        let temp_dir = tempdir().unwrap();
        let csv_path = temp_dir.path().join("part_000000.csv");
        fs::write(&csv_path, CSV).unwrap();

        let export = PocketExport::open(&csv_path).unwrap();
        let articles = export.archived_articles().unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, "https://example.com/archived");
        assert_eq!(articles[0].title.as_deref(), Some("An archived article"));
        assert_eq!(articles[1].title, None);
    }

    #[test]
    fn test_open_directory() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("part_000000.csv"), CSV).unwrap();

        let export = PocketExport::open(temp_dir.path()).unwrap();
        assert_eq!(export.archived_articles().unwrap().len(), 2);
    }

    #[test]
    fn test_open_missing() {
        let temp_dir = tempdir().unwrap();
        assert!(PocketExport::open(&temp_dir.path().join("missing.csv")).is_err());
        assert!(PocketExport::open(temp_dir.path()).is_err());
    }
}
