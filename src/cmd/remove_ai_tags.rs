use crate::{args::RemoveAiTagsArgs, cmd::init_client, Config};
use colored::Colorize;
use log::debug;
use std::io::{self, BufRead, Write};

/// Delete the tags which were attached by AI only.
pub async fn remove_ai_tags(config: &Config, args: &RemoveAiTagsArgs) -> Result<(), anyhow::Error> {
    debug!("{args:?}");

    let client = init_client(config).await?;
    let tags = client.list_tags().await?;
    let ai_tags: Vec<_> = tags.iter().filter(|tag| tag.is_ai_only()).collect();

    if ai_tags.is_empty() {
        println!("No AI-only tags found");
        return Ok(());
    }

    println!("{} of {} tags are attached by AI only:", ai_tags.len(), tags.len());
    for tag in &ai_tags {
        println!(
            "  {} ({} bookmarks)",
            tag.name.blue(),
            tag.num_bookmarks.unwrap_or(0)
        );
    }

    if args.dry_run {
        return Ok(());
    }

    if !args.yes && !confirm(&format!("Delete {} tags?", ai_tags.len()))? {
        println!("Aborted");
        return Ok(());
    }

    for tag in &ai_tags {
        client.delete_tag(&tag.id).await?;
        debug!("Deleted tag {} ({})", tag.name, tag.id);
    }

    println!("Deleted {} tags", ai_tags.len().to_string().green());

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, anyhow::Error> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
