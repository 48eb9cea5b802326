use crate::{
    api::BookmarkFilter,
    args::ArchiveBeforeArgs,
    cmd::init_client,
    models::UpdateBookmark,
    pagination::{collect_all, Page, MAX_PAGE_SIZE},
    Config,
};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use log::{debug, info};

/// Archive all unarchived bookmarks created before the given date.
pub async fn archive_before(config: &Config, args: &ArchiveBeforeArgs) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .context(format!("Invalid date: {} (expected YYYY-MM-DD)", args.date))?;
    let cutoff: DateTime<Utc> = date
        .and_hms_opt(0, 0, 0)
        .context(format!("Invalid date: {}", args.date))?
        .and_utc();

    let client = init_client(config).await?;
    let filter = BookmarkFilter {
        archived: Some(false),
        ..Default::default()
    };
    let limit = config.settings.page_size.min(MAX_PAGE_SIZE);
    let client = &client;

    let bookmarks = collect_all(
        |cursor| async move {
            let page = client
                .list_bookmarks(&filter, Some(limit), cursor.as_deref(), false)
                .await?;
            Ok(Page::from(page))
        },
        |len| debug!("Fetched {len} bookmarks"),
    )
    .await?;

    let outdated: Vec<_> = bookmarks
        .iter()
        .filter(|bookmark| bookmark.created_at < cutoff)
        .collect();
    info!(
        "{} of {} unarchived bookmarks created before {cutoff}",
        outdated.len(),
        bookmarks.len()
    );

    if args.dry_run {
        for bookmark in &outdated {
            println!(
                "Would archive {} ({}, created {})",
                bookmark.title.as_deref().unwrap_or("untitled").blue(),
                bookmark.id,
                bookmark.created_at.date_naive()
            );
        }
        return Ok(());
    }

    let mut archived = 0;
    for bookmark in &outdated {
        client
            .update_bookmark(&bookmark.id, &UpdateBookmark::archived(true))
            .await?;
        archived += 1;
        debug!("Archived bookmark {}", bookmark.id);
    }

    println!("Archived {} bookmarks", archived.to_string().green());

    Ok(())
}
