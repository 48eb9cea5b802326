use crate::{
    args::ListToTagArgs,
    cmd::init_client,
    models::TagRef,
    pagination::{collect_all, Page, MAX_PAGE_SIZE},
    Config,
};
use anyhow::anyhow;
use colored::Colorize;
use log::{debug, info};

/// Tag all bookmarks of a list.
pub async fn list_to_tag(config: &Config, args: &ListToTagArgs) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let client = init_client(config).await?;

    let lists = client.list_lists().await?;
    let list = lists
        .iter()
        .find(|list| list.name == args.list_name)
        .ok_or(anyhow!("No list named {}", args.list_name))?;
    let tag_name = args.tag_name.as_deref().unwrap_or(&args.list_name);
    info!("Tagging bookmarks of list {} ({}) with {tag_name}", list.name, list.id);

    let limit = config.settings.page_size.min(MAX_PAGE_SIZE);
    let client_ref = &client;
    let bookmarks = collect_all(
        |cursor| async move {
            let page = client_ref
                .list_bookmarks_in_list(&list.id, Some(limit), cursor.as_deref(), false)
                .await?;
            Ok(Page::from(page))
        },
        |len| debug!("Fetched {len} bookmarks"),
    )
    .await?;

    let mut tagged = 0;
    let mut already_tagged = 0;

    for bookmark in &bookmarks {
        if bookmark.has_tag(tag_name) {
            already_tagged += 1;
            continue;
        }

        if args.dry_run {
            println!(
                "Would tag {} ({})",
                bookmark.title.as_deref().unwrap_or("untitled").blue(),
                bookmark.id
            );
            tagged += 1;
            continue;
        }

        client
            .attach_tags(&bookmark.id, &[TagRef::Name(tag_name.to_owned())])
            .await?;
        debug!("Tagged bookmark {} with {tag_name}", bookmark.id);
        tagged += 1;
    }

    println!(
        "Tagged {} of {} bookmarks ({} already tagged)",
        tagged.to_string().green(),
        bookmarks.len(),
        already_tagged
    );

    Ok(())
}
