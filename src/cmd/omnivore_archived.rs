use crate::{
    args::OmnivoreArchivedArgs,
    cmd::{archive_matched_articles, clear_snapshot, fetch_all_bookmarks, init_client},
    exports::OmnivoreExport,
    Config,
};
use log::{debug, info};

/// Archive the bookmarks which are archived in an Omnivore export.
pub async fn omnivore_archived(
    config: &Config,
    args: &OmnivoreArchivedArgs,
) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let export = OmnivoreExport::open(&args.export_dir)?;
    let articles = export.archived_articles(args.treat_read_as_archived)?;
    info!("{} archived articles in export", articles.len());

    let client = init_client(config).await?;
    let bookmarks = fetch_all_bookmarks(&client, config, false, args.refresh).await?;

    archive_matched_articles(&client, config, &bookmarks, &articles, args.dry_run).await?;

    if !args.dry_run {
        clear_snapshot(config)?;
    }

    Ok(())
}
