use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Describes the available arguments in the CLI.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub subcommands: Subcommands,
}

/// Describes the available subcommands in the CLI.
#[derive(Subcommand, Debug)]
pub enum Subcommands {
    /// Show user and collection statistics of the instance.
    Stats,
    /// Archive all bookmarks created before a given date.
    ArchiveBefore(ArchiveBeforeArgs),
    /// Archive the bookmarks which are archived in an Omnivore export.
    OmnivoreArchived(OmnivoreArchivedArgs),
    /// Archive the bookmarks which are archived in a Pocket export.
    PocketArchived(PocketArchivedArgs),
    /// Delete the tags attached by AI only.
    RemoveAiTags(RemoveAiTagsArgs),
    /// Tag bookmarks with their estimated reading time.
    TimeToRead(TimeToReadArgs),
    /// Tag all bookmarks of a list.
    ListToTag(ListToTagArgs),
    /// Import the highlights of an Omnivore export.
    ImportHighlights(ImportHighlightsArgs),
}

/// Describes the arguments for the `archive-before` subcommand.
#[derive(ClapArgs, Debug)]
pub struct ArchiveBeforeArgs {
    /// The cutoff date in `YYYY-MM-DD` format.
    pub date: String,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Describes the arguments for the `omnivore-archived` subcommand.
#[derive(ClapArgs, Debug)]
pub struct OmnivoreArchivedArgs {
    /// The path of the unpacked Omnivore export.
    pub export_dir: PathBuf,
    /// Treat articles read past the progress threshold as archived.
    #[arg(long)]
    pub treat_read_as_archived: bool,
    /// Fetch all bookmarks again instead of using the local snapshot.
    #[arg(long)]
    pub refresh: bool,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Describes the arguments for the `pocket-archived` subcommand.
#[derive(ClapArgs, Debug)]
pub struct PocketArchivedArgs {
    /// The path of the Pocket export, a CSV file or a directory containing one.
    pub export: PathBuf,
    /// Fetch all bookmarks again instead of using the local snapshot.
    #[arg(long)]
    pub refresh: bool,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Describes the arguments for the `remove-ai-tags` subcommand.
#[derive(ClapArgs, Debug)]
pub struct RemoveAiTagsArgs {
    /// Delete the tags without asking for confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Describes the arguments for the `time-to-read` subcommand.
#[derive(ClapArgs, Debug)]
pub struct TimeToReadArgs {
    /// The assumed reading speed in words per minute.
    #[arg(long, default_value_t = 200)]
    pub words_per_minute: u64,
    /// Recompute the reading time tags of all bookmarks instead of only the
    /// untagged ones.
    #[arg(long)]
    pub reset_all: bool,
    /// Fetch all bookmarks again instead of using the local snapshot.
    #[arg(long)]
    pub refresh: bool,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Describes the arguments for the `list-to-tag` subcommand.
#[derive(ClapArgs, Debug)]
pub struct ListToTagArgs {
    /// The name of the list.
    pub list_name: String,
    /// The name of the tag to attach. Defaults to the list name.
    pub tag_name: Option<String>,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Describes the arguments for the `import-highlights` subcommand.
#[derive(ClapArgs, Debug)]
pub struct ImportHighlightsArgs {
    /// The path of the unpacked Omnivore export.
    pub export_dir: PathBuf,
    /// Fetch all bookmarks again instead of using the local snapshot.
    #[arg(long)]
    pub refresh: bool,
    /// Run command in dry mode.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}
