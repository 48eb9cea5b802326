//! Available commands.

mod archive_before;
mod import_highlights;
mod list_to_tag;
mod omnivore_archived;
mod pocket_archived;
mod remove_ai_tags;
mod stats;
mod time_to_read;

pub use archive_before::archive_before;
pub use import_highlights::import_highlights;
pub use list_to_tag::list_to_tag;
pub use omnivore_archived::omnivore_archived;
pub use pocket_archived::pocket_archived;
pub use remove_ai_tags::remove_ai_tags;
pub use stats::stats;
pub use time_to_read::time_to_read;

use crate::{
    api::BookmarkFilter,
    client::KarakeepClient,
    errors::KarakeepError,
    exports::ArchivedArticle,
    matcher::find_best_match,
    models::{Bookmark, UpdateBookmark},
    pagination::{collect_all, Page, MAX_PAGE_SIZE},
    snapshot::Snapshot,
    utils, Config,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

/// Create the API client from the resolved configuration and verify the
/// connection.
pub(crate) async fn init_client(config: &Config) -> Result<KarakeepClient, anyhow::Error> {
    let client_config = config.client_config()?;
    let client = KarakeepClient::new(&client_config)?;
    let user_info = client.check_connection().await?;
    info!(
        "Connected to {} as user {}",
        client.base_url(),
        user_info.id
    );
    Ok(client)
}

/// Fetch all bookmarks of the user, reusing the local snapshot unless a
/// refresh is requested. A snapshot fetched without content is not reused
/// when content is required.
///
/// The fetched count is verified against the instance's bookmark count, so a
/// silently truncated listing doesn't lead to bookmarks being treated as
/// missing.
pub(crate) async fn fetch_all_bookmarks(
    client: &KarakeepClient,
    config: &Config,
    include_content: bool,
    refresh: bool,
) -> Result<Vec<Bookmark>, anyhow::Error> {
    let snapshot = Snapshot::new(&config.snapshot_path);

    if !refresh && snapshot.exists() {
        let contents = snapshot.load()?;
        if contents.with_content || !include_content {
            info!(
                "Using {} bookmarks from snapshot at {}",
                contents.bookmarks.len(),
                snapshot.path().display()
            );
            return Ok(contents.bookmarks);
        }
        info!(
            "Snapshot at {} was fetched without content, fetching again",
            snapshot.path().display()
        );
    }

    let expected = client.user_stats().await?.num_bookmarks;
    let limit = config.settings.page_size.min(MAX_PAGE_SIZE);
    let filter = BookmarkFilter::default();

    info!("Fetching {expected} bookmarks");
    let progress_bar = ProgressBar::new(expected);
    progress_bar.set_style(
        ProgressStyle::with_template("{wide_bar} {pos}/{len} bookmarks ({elapsed})")?,
    );

    let bookmarks = collect_all(
        |cursor| {
            let progress_bar = progress_bar.clone();
            async move {
                let page = client
                    .list_bookmarks(&filter, Some(limit), cursor.as_deref(), include_content)
                    .await?;
                let page = Page::from(page);
                progress_bar.inc(page.items.len() as u64);
                Ok(page)
            }
        },
        |_| {},
    )
    .await?;
    progress_bar.finish_and_clear();

    let actual = bookmarks.len() as u64;
    if actual != expected {
        return Err(KarakeepError::IncompleteFetch { expected, actual }.into());
    }

    snapshot.store(&bookmarks, include_content)?;

    Ok(bookmarks)
}

/// Remove the snapshot after a successful run, so the next run fetches
/// fresh data. A snapshot left behind by an aborted run is reused instead.
pub(crate) fn clear_snapshot(config: &Config) -> Result<(), anyhow::Error> {
    Snapshot::new(&config.snapshot_path).remove()
}

/// Archive the bookmarks matching the given articles.
///
/// The archived state is re-checked with a fresh request before updating, as
/// the snapshot can be stale. Articles without a matching bookmark are
/// recorded in the failed matches file.
pub(crate) async fn archive_matched_articles(
    client: &KarakeepClient,
    config: &Config,
    bookmarks: &[Bookmark],
    articles: &[ArchivedArticle],
    dry_run: bool,
) -> Result<(), anyhow::Error> {
    let mut archived = 0;
    let mut already_archived = 0;
    let mut unmatched = 0;

    for article in articles {
        let best_match = find_best_match(&article.url, article.title.as_deref(), bookmarks);

        let Some((bookmark, score)) = best_match else {
            unmatched += 1;
            record_failed_match(config, article)?;
            continue;
        };
        debug!(
            "Matched {} to bookmark {} (score {score:.3})",
            article.url, bookmark.id
        );

        if dry_run {
            if bookmark.archived {
                already_archived += 1;
            } else {
                println!(
                    "Would archive {} ({})",
                    bookmark.title.as_deref().unwrap_or("untitled").blue(),
                    bookmark.id
                );
                archived += 1;
            }
            continue;
        }

        let current = client.get_bookmark(&bookmark.id, false).await?;
        if current.archived {
            already_archived += 1;
            continue;
        }

        client
            .update_bookmark(&bookmark.id, &UpdateBookmark::archived(true))
            .await?;
        archived += 1;
    }

    println!(
        "Archived {} bookmarks ({} already archived, {} articles without a match)",
        archived.to_string().green(),
        already_archived,
        unmatched.to_string().yellow()
    );
    if unmatched > 0 {
        println!(
            "Unmatched articles recorded at {}",
            config.failed_matches_path.display()
        );
    }

    Ok(())
}

/// Record an article for which no matching bookmark was found.
pub(crate) fn record_failed_match(
    config: &Config,
    article: &ArchivedArticle,
) -> Result<(), anyhow::Error> {
    warn!("No matching bookmark for {}", article.url);
    let line = serde_json::json!({
        "url": article.url,
        "title": article.title,
    });
    utils::append_line(&config.failed_matches_path, &line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::ClientConfig, models::BookmarkContent};
    use assert_matches::assert_matches;
    use chrono::Utc;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_client(mock_server: &MockServer) -> KarakeepClient {
        let mut client_config = ClientConfig::new(mock_server.uri(), "ak1_test_key");
        client_config.request_throttling = 0;
        client_config.max_retries = 0;
        KarakeepClient::new(&client_config).unwrap()
    }

    fn test_config(temp_path: &Path) -> Config {
        Config {
            snapshot_path: temp_path.join("snapshot.json"),
            failed_matches_path: temp_path.join("failed-matches.json"),
            ..Default::default()
        }
    }

    fn link_bookmark(id: &str, html_content: Option<&str>) -> Bookmark {
        Bookmark {
            id: id.to_owned(),
            created_at: Utc::now(),
            modified_at: None,
            title: None,
            archived: false,
            favourited: false,
            tagging_status: None,
            note: None,
            summary: None,
            tags: vec![],
            content: BookmarkContent::Link {
                url: format!("https://example.com/{id}"),
                title: None,
                description: None,
                image_url: None,
                html_content: html_content.map(|content| content.to_owned()),
                crawled_at: None,
            },
            assets: vec![],
        }
    }

    async fn mock_stats(mock_server: &MockServer, num_bookmarks: u64) {
        Mock::given(method("GET"))
            .and(path("/v1/users/me/stats"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"numBookmarks": num_bookmarks})),
            )
            .expect(1)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_all_bookmarks_reuses_snapshot() {
        let mock_server = MockServer::start().await;
        let temp_dir = tempdir().unwrap();
        let config = test_config(temp_dir.path());
        Snapshot::new(&config.snapshot_path)
            .store(&[link_bookmark("bm_1", None)], false)
            .unwrap();
        let client = test_client(&mock_server);

        let bookmarks = fetch_all_bookmarks(&client, &config, false, false)
            .await
            .unwrap();

        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].id, "bm_1");
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_bookmarks_refetches_snapshot_without_content() {
        let mock_server = MockServer::start().await;
        mock_stats(&mock_server, 1).await;
        Mock::given(method("GET"))
            .and(path("/v1/bookmarks"))
            .and(query_param("includeContent", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bookmarks": [link_bookmark("bm_1", Some("<p>Some content</p>"))],
                "nextCursor": null,
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp_dir = tempdir().unwrap();
        let config = test_config(temp_dir.path());
        Snapshot::new(&config.snapshot_path)
            .store(&[link_bookmark("bm_1", None)], false)
            .unwrap();
        let client = test_client(&mock_server);

        let bookmarks = fetch_all_bookmarks(&client, &config, true, false)
            .await
            .unwrap();

        assert_eq!(bookmarks.len(), 1);
        assert!(bookmarks[0].content.html_content().is_some());
        let contents = Snapshot::new(&config.snapshot_path).load().unwrap();
        assert!(contents.with_content);
    }

    #[tokio::test]
    async fn test_fetch_all_bookmarks_incomplete_fetch() {
        let mock_server = MockServer::start().await;
        mock_stats(&mock_server, 2).await;
        Mock::given(method("GET"))
            .and(path("/v1/bookmarks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bookmarks": [link_bookmark("bm_1", None)],
                "nextCursor": null,
            })))
            .mount(&mock_server)
            .await;

        let temp_dir = tempdir().unwrap();
        let config = test_config(temp_dir.path());
        let client = test_client(&mock_server);

        let err = fetch_all_bookmarks(&client, &config, false, false)
            .await
            .unwrap_err();

        assert_matches!(
            err.downcast_ref::<KarakeepError>(),
            Some(KarakeepError::IncompleteFetch {
                expected: 2,
                actual: 1
            })
        );
        assert!(!Snapshot::new(&config.snapshot_path).exists());
    }
}
