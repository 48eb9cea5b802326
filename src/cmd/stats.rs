use crate::{cmd::init_client, Config};
use colored::Colorize;

/// Show user and collection statistics of the instance.
pub async fn stats(config: &Config) -> Result<(), anyhow::Error> {
    let client = init_client(config).await?;

    let user_info = client.user_info().await?;
    let user_stats = client.user_stats().await?;

    println!("Instance: {}", client.base_url().as_str().blue());
    println!(
        "User: {} ({})",
        user_info.name.as_deref().unwrap_or("unknown"),
        user_info.id
    );
    if let Some(email) = &user_info.email {
        println!("Email: {email}");
    }

    println!("Bookmarks: {}", user_stats.num_bookmarks.to_string().green());
    if let Some(num_archived) = user_stats.num_archived {
        println!("Archived: {num_archived}");
    }
    if let Some(num_favorites) = user_stats.num_favorites {
        println!("Favorites: {num_favorites}");
    }
    if let Some(num_tags) = user_stats.num_tags {
        println!("Tags: {num_tags}");
    }
    if let Some(num_lists) = user_stats.num_lists {
        println!("Lists: {num_lists}");
    }
    if let Some(num_highlights) = user_stats.num_highlights {
        println!("Highlights: {num_highlights}");
    }

    Ok(())
}
