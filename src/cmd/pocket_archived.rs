use crate::{
    args::PocketArchivedArgs,
    cmd::{archive_matched_articles, clear_snapshot, fetch_all_bookmarks, init_client},
    exports::PocketExport,
    Config,
};
use log::{debug, info};

/// Archive the bookmarks which are archived in a Pocket export.
pub async fn pocket_archived(
    config: &Config,
    args: &PocketArchivedArgs,
) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let export = PocketExport::open(&args.export)?;
    let articles = export.archived_articles()?;
    info!("{} archived articles in export", articles.len());

    let client = init_client(config).await?;
    let bookmarks = fetch_all_bookmarks(&client, config, false, args.refresh).await?;

    archive_matched_articles(&client, config, &bookmarks, &articles, args.dry_run).await?;

    if !args.dry_run {
        clear_snapshot(config)?;
    }

    Ok(())
}
