use crate::{
    args::TimeToReadArgs,
    cmd::{clear_snapshot, fetch_all_bookmarks, init_client},
    matcher::html_to_text,
    models::{Bookmark, TagRef},
    pagination::{collect_all, Page, MAX_PAGE_SIZE},
    Config,
};
use colored::Colorize;
use log::{debug, info};

/// The reading time buckets, in ascending order.
const TIME_TAGS: [&str; 5] = ["0-5m", "5-10m", "10-15m", "15-30m", "30m+"];

/// Tag bookmarks with their estimated reading time.
pub async fn time_to_read(config: &Config, args: &TimeToReadArgs) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let client = init_client(config).await?;

    let bookmarks = if args.reset_all {
        fetch_all_bookmarks(&client, config, true, args.refresh).await?
    } else {
        // Only the bookmarks which carry none of the reading time tags yet.
        let search_query = TIME_TAGS
            .iter()
            .map(|tag| format!("-#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        let limit = config.settings.page_size.min(MAX_PAGE_SIZE);
        let client = &client;
        let search_query = &search_query;

        collect_all(
            |cursor| async move {
                let page = client
                    .search_bookmarks(search_query, Some(limit), cursor.as_deref(), true)
                    .await?;
                Ok(Page::from(page))
            },
            |len| debug!("Fetched {len} bookmarks"),
        )
        .await?
    };
    info!("Estimating reading time for {} bookmarks", bookmarks.len());

    let mut tagged = 0;
    let mut unchanged = 0;
    let mut skipped = 0;

    for bookmark in &bookmarks {
        let Some(words) = word_count(bookmark) else {
            debug!("Skipping bookmark {} without text content", bookmark.id);
            skipped += 1;
            continue;
        };

        let target_tag = time_tag(words, args.words_per_minute);
        let existing_tags: Vec<&str> = bookmark
            .tags
            .iter()
            .filter(|tag| TIME_TAGS.contains(&tag.name.as_str()))
            .map(|tag| tag.name.as_str())
            .collect();

        if existing_tags == [target_tag] {
            unchanged += 1;
            continue;
        }

        if args.dry_run {
            println!(
                "Would tag {} ({} words) with {}",
                bookmark.title.as_deref().unwrap_or("untitled").blue(),
                words,
                target_tag.green()
            );
            tagged += 1;
            continue;
        }

        let stale_tags: Vec<TagRef> = existing_tags
            .iter()
            .filter(|tag| **tag != target_tag)
            .map(|tag| TagRef::Name((*tag).to_owned()))
            .collect();
        if !stale_tags.is_empty() {
            client.detach_tags(&bookmark.id, &stale_tags).await?;
        }

        if !existing_tags.contains(&target_tag) {
            client
                .attach_tags(&bookmark.id, &[TagRef::Name(target_tag.to_owned())])
                .await?;
        }

        debug!("Tagged bookmark {} with {target_tag}", bookmark.id);
        tagged += 1;
    }

    println!(
        "Tagged {} bookmarks ({} unchanged, {} without text content)",
        tagged.to_string().green(),
        unchanged,
        skipped
    );

    if args.reset_all && !args.dry_run {
        clear_snapshot(config)?;
    }

    Ok(())
}

/// The number of words of a bookmark's content, or `None` for bookmarks
/// without text content.
fn word_count(bookmark: &Bookmark) -> Option<usize> {
    if let Some(html) = bookmark.content.html_content() {
        Some(html_to_text(html).split_whitespace().count())
    } else {
        bookmark
            .content
            .text()
            .map(|text| text.split_whitespace().count())
    }
}

/// The reading time tag for a word count at the given reading speed.
fn time_tag(words: usize, words_per_minute: u64) -> &'static str {
    let minutes = words as u64 / words_per_minute.max(1);
    match minutes {
        0..=5 => TIME_TAGS[0],
        6..=10 => TIME_TAGS[1],
        11..=15 => TIME_TAGS[2],
        16..=30 => TIME_TAGS[3],
        _ => TIME_TAGS[4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_tag() {
        assert_eq!(time_tag(0, 200), "0-5m");
        assert_eq!(time_tag(1000, 200), "0-5m");
        assert_eq!(time_tag(1201, 200), "5-10m");
        assert_eq!(time_tag(2500, 200), "10-15m");
        assert_eq!(time_tag(5000, 200), "15-30m");
        assert_eq!(time_tag(12_000, 200), "30m+");
    }
}
