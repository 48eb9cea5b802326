//! Reader for Omnivore data exports.
//!
//! An export directory contains `metadata_<from>_to_<to>.json` files with
//! the article records, a `highlights/` directory with one markdown file per
//! annotated article, and a `content/` directory with the archived pages.

use super::ArchivedArticle;
use anyhow::{anyhow, Context};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The default reading progress in percent above which an article counts as
/// read.
pub const READ_PROGRESS_THRESHOLD: f64 = 80.0;

const HIGHLIGHTS_DIR: &str = "highlights";
const CONTENT_DIR: &str = "content";

/// An article record from the export's metadata files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmnivoreArticle {
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    pub state: String,
    #[serde(default)]
    pub reading_progress: Option<f64>,
}

impl OmnivoreArticle {
    /// Whether the article was archived, optionally counting articles read
    /// past the progress threshold as archived.
    pub fn is_archived(&self, read_threshold: Option<f64>) -> bool {
        if self.state.eq_ignore_ascii_case("archived") {
            return true;
        }

        match (read_threshold, self.reading_progress) {
            (Some(threshold), Some(progress)) => progress >= threshold,
            _ => false,
        }
    }
}

impl From<&OmnivoreArticle> for ArchivedArticle {
    fn from(article: &OmnivoreArticle) -> Self {
        Self {
            url: article.url.clone(),
            title: article.title.clone(),
        }
    }
}

/// The format of an article's archived content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
}

/// An unpacked Omnivore export directory.
#[derive(Debug, Clone)]
pub struct OmnivoreExport {
    root: PathBuf,
}

impl OmnivoreExport {
    pub fn open(root: &Path) -> Result<Self, anyhow::Error> {
        if !root.is_dir() {
            return Err(anyhow!(
                "Omnivore export directory not found at {}",
                root.display()
            ));
        }
        Ok(Self {
            root: root.to_owned(),
        })
    }

    /// Read all articles from the `metadata_*_to_*.json` files, in file
    /// order.
    pub fn articles(&self) -> Result<Vec<OmnivoreArticle>, anyhow::Error> {
        let metadata_file = Regex::new(r"^metadata_.*_to_.*\.json$")?;

        let mut metadata_paths = Vec::new();
        for entry in fs::read_dir(&self.root)
            .context(format!("Can't read export directory {}", self.root.display()))?
        {
            let path = entry?.path();
            let file_name = path
                .file_name()
                .and_then(|file_name| file_name.to_str())
                .unwrap_or_default();
            if metadata_file.is_match(file_name) {
                metadata_paths.push(path);
            }
        }
        metadata_paths.sort();

        if metadata_paths.is_empty() {
            return Err(anyhow!(
                "No metadata files in export directory {}",
                self.root.display()
            ));
        }

        let mut articles = Vec::new();
        for path in metadata_paths {
            debug!("Reading metadata file at {}", path.display());
            let batch: Vec<OmnivoreArticle> = crate::json::read_json(&path)?;
            articles.extend(batch);
        }

        Ok(articles)
    }

    /// The articles to archive: archived ones, plus articles read past the
    /// threshold when `treat_read_as_archived` is set.
    pub fn archived_articles(
        &self,
        treat_read_as_archived: bool,
    ) -> Result<Vec<ArchivedArticle>, anyhow::Error> {
        let read_threshold = treat_read_as_archived.then_some(READ_PROGRESS_THRESHOLD);
        let archived = self
            .articles()?
            .iter()
            .filter(|article| article.is_archived(read_threshold))
            .map(ArchivedArticle::from)
            .collect();
        Ok(archived)
    }

    /// The highlights of an article, parsed from its markdown file. Articles
    /// without annotations have no file.
    pub fn highlights(&self, slug: &str) -> Result<Vec<String>, anyhow::Error> {
        let path = self.root.join(HIGHLIGHTS_DIR).join(format!("{slug}.md"));
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .context(format!("Can't read highlights file at {}", path.display()))?;
        Ok(parse_highlights(&content))
    }

    /// The format of the archived content of an article, if any.
    pub fn content_kind(&self, slug: &str) -> Option<ContentKind> {
        let content_dir = self.root.join(CONTENT_DIR);
        if content_dir.join(format!("{slug}.html")).exists() {
            Some(ContentKind::Html)
        } else if content_dir.join(format!("{slug}.pdf")).exists() {
            Some(ContentKind::Pdf)
        } else {
            None
        }
    }
}

/// Parse the highlights of a markdown file. Every `"\n> "` boundary starts a
/// new highlight, so consecutive blockquote lines are separate highlights,
/// while unquoted lines continue the preceding one.
fn parse_highlights(content: &str) -> Vec<String> {
    content
        .trim()
        .split("\n> ")
        .map(clean_highlight)
        .filter(|highlight| !highlight.is_empty())
        .collect()
}

/// Strip the blockquote markers and surrounding whitespace from a highlight
/// and join its lines.
fn clean_highlight(block: &str) -> String {
    block
        .lines()
        .map(|line| {
            line.strip_prefix("> ")
                .or_else(|| line.strip_prefix('>'))
                .unwrap_or(line)
                .trim()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const METADATA: &str = r#"[
        {
            "slug": "first-article",
            "title": "First article",
            "url": "https://example.com/first",
            "state": "Archived",
            "readingProgress": 100
        },
        {
            "slug": "second-article",
            "title": "Second article",
            "url": "https://example.com/second",
            "state": "Active",
            "readingProgress": 85
        },
        {
            "slug": "third-article",
            "title": "Third article",
            "url": "https://example.com/third",
            "state": "Active",
            "readingProgress": 10
        }
    ]"#;

    fn write_export(root: &Path) {
        fs::write(root.join("metadata_0_to_3.json"), METADATA).unwrap();
        fs::create_dir(root.join("highlights")).unwrap();
        fs::write(
            root.join("highlights/first-article.md"),
            "> A first highlight\n> spanning two lines\n\n> A second highlight\n",
        )
        .unwrap();
        fs::create_dir(root.join("content")).unwrap();
        fs::write(root.join("content/first-article.html"), "<p>hi</p>").unwrap();
        fs::write(root.join("content/second-article.pdf"), "%PDF").unwrap();
    }

    #[test]
    fn test_archived_articles() {
        let temp_dir = tempdir().unwrap();
        write_export(temp_dir.path());
        let export = OmnivoreExport::open(temp_dir.path()).unwrap();

        let archived = export.archived_articles(false).unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].url, "https://example.com/first");

        let archived = export.archived_articles(true).unwrap();
        assert_eq!(archived.len(), 2);
        assert_eq!(archived[1].url, "https://example.com/second");
    }

    #[test]
    fn test_articles_missing_metadata() {
        let temp_dir = tempdir().unwrap();
        let export = OmnivoreExport::open(temp_dir.path()).unwrap();
        assert!(export.articles().is_err());
    }

    #[test]
    fn test_highlights() {
        let temp_dir = tempdir().unwrap();
        write_export(temp_dir.path());
        let export = OmnivoreExport::open(temp_dir.path()).unwrap();

        let highlights = export.highlights("first-article").unwrap();
        assert_eq!(
            highlights,
            vec![
                "A first highlight".to_owned(),
                "spanning two lines".to_owned(),
                "A second highlight".to_owned()
            ]
        );

        let highlights = export.highlights("second-article").unwrap();
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_content_kind() {
        let temp_dir = tempdir().unwrap();
        write_export(temp_dir.path());
        let export = OmnivoreExport::open(temp_dir.path()).unwrap();

        assert_eq!(export.content_kind("first-article"), Some(ContentKind::Html));
        assert_eq!(export.content_kind("second-article"), Some(ContentKind::Pdf));
        assert_eq!(export.content_kind("third-article"), None);
    }

    #[test]
    fn test_parse_highlights_consecutive_blockquote_lines() {
        let highlights =
            parse_highlights("> A first highlight\n> spanning two lines\n\n> A second highlight\n");
        assert_eq!(
            highlights,
            vec!["A first highlight", "spanning two lines", "A second highlight"]
        );
    }

    #[test]
    fn test_parse_highlights_continuation_lines() {
        let highlights = parse_highlights("> Quoted start\nunquoted continuation\n\n> Next one");
        assert_eq!(
            highlights,
            vec!["Quoted start unquoted continuation", "Next one"]
        );
    }

    #[test]
    fn test_parse_highlights_empty_quotes() {
        assert!(parse_highlights(">\n>\n").is_empty());
        assert!(parse_highlights("").is_empty());
    }
}
