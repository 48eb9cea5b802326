//! The typed records exchanged with the Karakeep API.
//!
//! The shapes follow the Karakeep OpenAPI specification and are treated as
//! fixed: wire names are camelCase, optional fields deserialize to `None`
//! instead of failing, and unknown content types fall back to
//! [`BookmarkContent::Unknown`] so a single exotic bookmark can't poison a
//! whole page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bookmark with its tags, content, and attached assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    pub archived: bool,
    pub favourited: bool,
    #[serde(default)]
    pub tagging_status: Option<TaggingStatus>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub content: BookmarkContent,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Bookmark {
    /// Whether the bookmark carries a tag with the given name.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggingStatus {
    Success,
    Failure,
    Pending,
}

/// The type-discriminated content of a bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkContent {
    #[serde(rename_all = "camelCase")]
    Link {
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        image_url: Option<String>,
        #[serde(default)]
        html_content: Option<String>,
        #[serde(default)]
        crawled_at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        #[serde(default)]
        source_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Asset {
        asset_type: AssetKind,
        asset_id: String,
        #[serde(default)]
        file_name: Option<String>,
        #[serde(default)]
        source_url: Option<String>,
        #[serde(default)]
        size: Option<u64>,
    },
    /// Content types this client doesn't know about yet.
    #[serde(other)]
    Unknown,
}

impl BookmarkContent {
    /// The url the content points to: the link url, or the source url for
    /// text and asset content.
    pub fn url(&self) -> Option<&str> {
        match self {
            BookmarkContent::Link { url, .. } => Some(url),
            BookmarkContent::Text { source_url, .. } => source_url.as_deref(),
            BookmarkContent::Asset { source_url, .. } => source_url.as_deref(),
            BookmarkContent::Unknown => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            BookmarkContent::Link { title, .. } => title.as_deref(),
            _ => None,
        }
    }

    /// The crawled HTML of a link bookmark.
    pub fn html_content(&self) -> Option<&str> {
        match self {
            BookmarkContent::Link { html_content, .. } => html_content.as_deref(),
            _ => None,
        }
    }

    /// The raw text of a text bookmark.
    pub fn text(&self) -> Option<&str> {
        match self {
            BookmarkContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// The asset flavor of an asset bookmark's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Pdf,
}

/// An asset attached to a bookmark, like a screenshot or an archived page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub asset_type: AssetType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
    Screenshot,
    AssetScreenshot,
    BannerImage,
    FullPageArchive,
    Video,
    BookmarkAsset,
    PrecrawledArchive,
    #[serde(other)]
    Unknown,
}

/// A tag, with per-attachment-type bookmark counts when listed via the tag
/// endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attached_by: Option<AttachedBy>,
    #[serde(default)]
    pub num_bookmarks: Option<u64>,
    #[serde(default)]
    pub num_bookmarks_by_attached_type: Option<AttachedTypeCounts>,
}

impl Tag {
    /// Whether the tag was attached by AI only, with no human attachments.
    pub fn is_ai_only(&self) -> bool {
        match &self.num_bookmarks_by_attached_type {
            Some(counts) => counts.ai.unwrap_or(0) > 0 && counts.human.unwrap_or(0) == 0,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachedBy {
    Ai,
    Human,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachedTypeCounts {
    #[serde(default)]
    pub ai: Option<u64>,
    #[serde(default)]
    pub human: Option<u64>,
}

/// A reference to a tag by id or by name, used when attaching and detaching
/// tags. Serializes to `{"tagId": …}` or `{"tagName": …}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagRef {
    #[serde(rename = "tagId")]
    Id(String),
    #[serde(rename = "tagName")]
    Name(String),
}

/// A manual or smart list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ListKind>,
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Manual,
    Smart,
}

/// A highlight anchored to a character range of a bookmark's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    pub bookmark_id: String,
    pub start_offset: i64,
    pub end_offset: i64,
    #[serde(default)]
    pub color: Option<HighlightColor>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Yellow,
    Red,
    Green,
    Blue,
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Red => "red",
            HighlightColor::Green => "green",
            HighlightColor::Blue => "blue",
        };
        write!(f, "{color}")
    }
}

/// Information about the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Statistics about the authenticated user's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub num_bookmarks: u64,
    #[serde(default)]
    pub num_favorites: Option<u64>,
    #[serde(default)]
    pub num_archived: Option<u64>,
    #[serde(default)]
    pub num_tags: Option<u64>,
    #[serde(default)]
    pub num_lists: Option<u64>,
    #[serde(default)]
    pub num_highlights: Option<u64>,
}

/// One page of bookmarks with an opaque cursor to the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedBookmarks {
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One page of highlights with an opaque cursor to the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedHighlights {
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The request body for creating a bookmark: a type-specific part plus the
/// fields shared by all bookmark types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBookmark {
    #[serde(flatten)]
    pub kind: NewBookmarkKind,
    #[serde(flatten)]
    pub common: NewBookmarkCommon,
}

impl NewBookmark {
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            kind: NewBookmarkKind::Link {
                url: url.into(),
                precrawled_archive_id: None,
            },
            common: NewBookmarkCommon::default(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NewBookmarkKind::Text {
                text: text.into(),
                source_url: None,
            },
            common: NewBookmarkCommon::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NewBookmarkKind {
    #[serde(rename_all = "camelCase")]
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        precrawled_archive_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Asset {
        asset_type: AssetKind,
        asset_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_url: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmarkCommon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The PATCH body for updating a bookmark. `None` fields are left untouched
/// on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UpdateBookmark {
    pub fn archived(archived: bool) -> Self {
        Self {
            archived: Some(archived),
            ..Default::default()
        }
    }
}

/// The partial bookmark record returned by PATCH and summarize endpoints,
/// without content, tags, and assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatchResult {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    pub archived: bool,
    pub favourited: bool,
    #[serde(default)]
    pub tagging_status: Option<TaggingStatus>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// The request body for creating a highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHighlight {
    pub bookmark_id: String,
    pub start_offset: i64,
    pub end_offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<HighlightColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The request body for creating a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub name: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ListKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl NewList {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            description: None,
            parent_id: None,
            kind: None,
            query: None,
        }
    }
}

/// The PATCH body for updating a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}
