use clap::Parser;
use karakeep_api::{cmd, Args, Config, Logger, Subcommands};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    Logger::init(args.verbose);
    let config = Config::init()?;

    run_app(args, config).await?;

    Ok(())
}

async fn run_app(args: Args, config: Config) -> Result<(), anyhow::Error> {
    match args.subcommands {
        Subcommands::Stats => cmd::stats(&config).await?,
        Subcommands::ArchiveBefore(args) => cmd::archive_before(&config, &args).await?,
        Subcommands::OmnivoreArchived(args) => cmd::omnivore_archived(&config, &args).await?,
        Subcommands::PocketArchived(args) => cmd::pocket_archived(&config, &args).await?,
        Subcommands::RemoveAiTags(args) => cmd::remove_ai_tags(&config, &args).await?,
        Subcommands::TimeToRead(args) => cmd::time_to_read(&config, &args).await?,
        Subcommands::ListToTag(args) => cmd::list_to_tag(&config, &args).await?,
        Subcommands::ImportHighlights(args) => cmd::import_highlights(&config, &args).await?,
    }

    Ok(())
}
