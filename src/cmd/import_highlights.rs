use crate::{
    args::ImportHighlightsArgs,
    cmd::{clear_snapshot, fetch_all_bookmarks, init_client, record_failed_match},
    exports::{ArchivedArticle, ContentKind, OmnivoreExport},
    matcher::{find_best_match, locate_highlight, BookmarkCorpus},
    models::{HighlightColor, NewHighlight},
    Config,
};
use colored::Colorize;
use log::{debug, info, warn};

/// The note attached to imported highlights, marking their provenance.
const IMPORT_NOTE: &str = "Imported from Omnivore";

/// Import the highlights of an Omnivore export, anchoring each highlight to
/// the content of the matching bookmark.
pub async fn import_highlights(
    config: &Config,
    args: &ImportHighlightsArgs,
) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let export = OmnivoreExport::open(&args.export_dir)?;
    let articles = export.articles()?;
    info!("{} articles in export", articles.len());

    let client = init_client(config).await?;
    let bookmarks = fetch_all_bookmarks(&client, config, true, args.refresh).await?;

    let mut created = 0;
    let mut duplicates = 0;
    let mut unlocated = 0;
    let mut unmatched = 0;
    let mut pdf_skipped = 0;

    for article in &articles {
        let highlights = export.highlights(&article.slug)?;
        if highlights.is_empty() {
            continue;
        }

        if export.content_kind(&article.slug) == Some(ContentKind::Pdf) {
            warn!(
                "Skipping {} highlights of PDF article {}",
                highlights.len(),
                article.slug
            );
            pdf_skipped += highlights.len();
            continue;
        }

        let best_match = find_best_match(&article.url, article.title.as_deref(), &bookmarks);
        let Some((bookmark, score)) = best_match else {
            unmatched += 1;
            record_failed_match(config, &ArchivedArticle::from(article))?;
            continue;
        };
        debug!(
            "Matched {} to bookmark {} (score {score:.3})",
            article.url, bookmark.id
        );

        let corpus = if let Some(html) = bookmark.content.html_content() {
            BookmarkCorpus::from_html(html)
        } else if let Some(text) = bookmark.content.text() {
            BookmarkCorpus::from_text(text)
        } else {
            warn!("Bookmark {} has no searchable content", bookmark.id);
            unlocated += highlights.len();
            continue;
        };

        let existing = client.bookmark_highlights(&bookmark.id).await?;

        for highlight in &highlights {
            if existing
                .iter()
                .any(|existing| existing.text.as_deref() == Some(highlight.as_str()))
            {
                duplicates += 1;
                continue;
            }

            let Some(position) = locate_highlight(highlight, &corpus) else {
                warn!(
                    "Can't locate highlight in bookmark {}: {highlight}",
                    bookmark.id
                );
                unlocated += 1;
                continue;
            };
            debug!(
                "Located highlight at {}..{} via {:?} (ratio {:.3})",
                position.start, position.end, position.method, position.ratio
            );

            if args.dry_run {
                println!(
                    "Would create highlight at {}..{} in {} ({})",
                    position.start,
                    position.end,
                    bookmark.title.as_deref().unwrap_or("untitled").blue(),
                    bookmark.id
                );
                created += 1;
                continue;
            }

            let new_highlight = NewHighlight {
                bookmark_id: bookmark.id.clone(),
                start_offset: position.start,
                end_offset: position.end,
                color: Some(HighlightColor::Yellow),
                text: Some(highlight.clone()),
                note: Some(IMPORT_NOTE.to_owned()),
            };
            client.create_highlight(&new_highlight).await?;
            created += 1;
        }
    }

    println!(
        "Created {} highlights ({} already present, {} not located, {} in PDFs, {} articles without a match)",
        created.to_string().green(),
        duplicates,
        unlocated.to_string().yellow(),
        pdf_skipped,
        unmatched
    );

    if !args.dry_run {
        clear_snapshot(config)?;
    }

    Ok(())
}
