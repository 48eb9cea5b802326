//! The typed endpoint wrappers of [`KarakeepClient`].

use crate::{
    client::{page_query, KarakeepClient},
    errors::KarakeepError,
    models::{
        Asset, Bookmark, BookmarkPatchResult, Highlight, HighlightColor, List, NewBookmark,
        NewHighlight, NewList, PaginatedBookmarks, PaginatedHighlights, Tag, TagRef,
        UpdateBookmark, UpdateList, UserInfo, UserStats,
    },
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

/// Filter criteria for listing bookmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookmarkFilter {
    pub archived: Option<bool>,
    pub favourited: Option<bool>,
}

impl BookmarkFilter {
    fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(archived) = self.archived {
            query.push(("archived", archived.to_string()));
        }
        if let Some(favourited) = self.favourited {
            query.push(("favourited", favourited.to_string()));
        }
        query
    }
}

#[derive(Debug, Deserialize)]
struct ListsEnvelope {
    lists: Vec<List>,
}

#[derive(Debug, Deserialize)]
struct TagsEnvelope {
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct HighlightsEnvelope {
    highlights: Vec<Highlight>,
}

#[derive(Debug, Deserialize)]
struct AttachedTags {
    attached: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetachedTags {
    detached: Vec<String>,
}

impl KarakeepClient {
    /// Verify that the instance is reachable and the API key is accepted.
    pub async fn check_connection(&self) -> Result<UserInfo, KarakeepError> {
        self.user_info().await
    }

    // Bookmarks

    pub async fn list_bookmarks(
        &self,
        filter: &BookmarkFilter,
        limit: Option<u32>,
        cursor: Option<&str>,
        include_content: bool,
    ) -> Result<PaginatedBookmarks, KarakeepError> {
        let mut query = filter.to_query();
        query.extend(page_query(limit, cursor));
        query.push(("includeContent", include_content.to_string()));
        self.request_json(Method::GET, "bookmarks", &query, None)
            .await
    }

    pub async fn search_bookmarks(
        &self,
        search_query: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
        include_content: bool,
    ) -> Result<PaginatedBookmarks, KarakeepError> {
        let mut query = vec![("q", search_query.to_owned())];
        query.extend(page_query(limit, cursor));
        query.push(("includeContent", include_content.to_string()));
        self.request_json(Method::GET, "bookmarks/search", &query, None)
            .await
    }

    pub async fn create_bookmark(
        &self,
        new_bookmark: &NewBookmark,
    ) -> Result<Bookmark, KarakeepError> {
        let body = serde_json::to_value(new_bookmark).map_err(KarakeepError::SerializeJson)?;
        self.request_json(Method::POST, "bookmarks", &[], Some(body))
            .await
    }

    pub async fn get_bookmark(
        &self,
        bookmark_id: &str,
        include_content: bool,
    ) -> Result<Bookmark, KarakeepError> {
        let query = [("includeContent", include_content.to_string())];
        self.request_json(
            Method::GET,
            &format!("bookmarks/{bookmark_id}"),
            &query,
            None,
        )
        .await
    }

    pub async fn update_bookmark(
        &self,
        bookmark_id: &str,
        update: &UpdateBookmark,
    ) -> Result<BookmarkPatchResult, KarakeepError> {
        let body = serde_json::to_value(update).map_err(KarakeepError::SerializeJson)?;
        self.request_json(
            Method::PATCH,
            &format!("bookmarks/{bookmark_id}"),
            &[],
            Some(body),
        )
        .await
    }

    pub async fn delete_bookmark(&self, bookmark_id: &str) -> Result<(), KarakeepError> {
        self.request_no_content(Method::DELETE, &format!("bookmarks/{bookmark_id}"), None)
            .await
    }

    /// Trigger summarization of a bookmark by the instance's AI backend.
    pub async fn summarize_bookmark(
        &self,
        bookmark_id: &str,
    ) -> Result<BookmarkPatchResult, KarakeepError> {
        self.request_json(
            Method::POST,
            &format!("bookmarks/{bookmark_id}/summarize"),
            &[],
            None,
        )
        .await
    }

    /// Attach tags to a bookmark and return the ids of the attached tags.
    pub async fn attach_tags(
        &self,
        bookmark_id: &str,
        tags: &[TagRef],
    ) -> Result<Vec<String>, KarakeepError> {
        let body = json!({ "tags": tags });
        let attached: AttachedTags = self
            .request_json(
                Method::POST,
                &format!("bookmarks/{bookmark_id}/tags"),
                &[],
                Some(body),
            )
            .await?;
        Ok(attached.attached)
    }

    /// Detach tags from a bookmark and return the ids of the detached tags.
    pub async fn detach_tags(
        &self,
        bookmark_id: &str,
        tags: &[TagRef],
    ) -> Result<Vec<String>, KarakeepError> {
        let body = json!({ "tags": tags });
        let detached: DetachedTags = self
            .request_json(
                Method::DELETE,
                &format!("bookmarks/{bookmark_id}/tags"),
                &[],
                Some(body),
            )
            .await?;
        Ok(detached.detached)
    }

    pub async fn bookmark_highlights(
        &self,
        bookmark_id: &str,
    ) -> Result<Vec<Highlight>, KarakeepError> {
        let envelope: HighlightsEnvelope = self
            .request_json(
                Method::GET,
                &format!("bookmarks/{bookmark_id}/highlights"),
                &[],
                None,
            )
            .await?;
        Ok(envelope.highlights)
    }

    pub async fn attach_asset(
        &self,
        bookmark_id: &str,
        asset: &Asset,
    ) -> Result<Asset, KarakeepError> {
        let body = serde_json::to_value(asset).map_err(KarakeepError::SerializeJson)?;
        self.request_json(
            Method::POST,
            &format!("bookmarks/{bookmark_id}/assets"),
            &[],
            Some(body),
        )
        .await
    }

    pub async fn replace_asset(
        &self,
        bookmark_id: &str,
        asset_id: &str,
        new_asset_id: &str,
    ) -> Result<(), KarakeepError> {
        let body = json!({ "assetId": new_asset_id });
        self.request_no_content(
            Method::PUT,
            &format!("bookmarks/{bookmark_id}/assets/{asset_id}"),
            Some(body),
        )
        .await
    }

    pub async fn detach_asset(
        &self,
        bookmark_id: &str,
        asset_id: &str,
    ) -> Result<(), KarakeepError> {
        self.request_no_content(
            Method::DELETE,
            &format!("bookmarks/{bookmark_id}/assets/{asset_id}"),
            None,
        )
        .await
    }

    // Lists

    pub async fn list_lists(&self) -> Result<Vec<List>, KarakeepError> {
        let envelope: ListsEnvelope = self.request_json(Method::GET, "lists", &[], None).await?;
        Ok(envelope.lists)
    }

    pub async fn create_list(&self, new_list: &NewList) -> Result<List, KarakeepError> {
        let body = serde_json::to_value(new_list).map_err(KarakeepError::SerializeJson)?;
        self.request_json(Method::POST, "lists", &[], Some(body))
            .await
    }

    pub async fn get_list(&self, list_id: &str) -> Result<List, KarakeepError> {
        self.request_json(Method::GET, &format!("lists/{list_id}"), &[], None)
            .await
    }

    pub async fn update_list(
        &self,
        list_id: &str,
        update: &UpdateList,
    ) -> Result<List, KarakeepError> {
        let body = serde_json::to_value(update).map_err(KarakeepError::SerializeJson)?;
        self.request_json(Method::PATCH, &format!("lists/{list_id}"), &[], Some(body))
            .await
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<(), KarakeepError> {
        self.request_no_content(Method::DELETE, &format!("lists/{list_id}"), None)
            .await
    }

    pub async fn list_bookmarks_in_list(
        &self,
        list_id: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
        include_content: bool,
    ) -> Result<PaginatedBookmarks, KarakeepError> {
        let mut query = page_query(limit, cursor);
        query.push(("includeContent", include_content.to_string()));
        self.request_json(
            Method::GET,
            &format!("lists/{list_id}/bookmarks"),
            &query,
            None,
        )
        .await
    }

    pub async fn add_bookmark_to_list(
        &self,
        list_id: &str,
        bookmark_id: &str,
    ) -> Result<(), KarakeepError> {
        self.request_no_content(
            Method::PUT,
            &format!("lists/{list_id}/bookmarks/{bookmark_id}"),
            None,
        )
        .await
    }

    pub async fn remove_bookmark_from_list(
        &self,
        list_id: &str,
        bookmark_id: &str,
    ) -> Result<(), KarakeepError> {
        self.request_no_content(
            Method::DELETE,
            &format!("lists/{list_id}/bookmarks/{bookmark_id}"),
            None,
        )
        .await
    }

    // Tags

    pub async fn list_tags(&self) -> Result<Vec<Tag>, KarakeepError> {
        let envelope: TagsEnvelope = self.request_json(Method::GET, "tags", &[], None).await?;
        Ok(envelope.tags)
    }

    pub async fn get_tag(&self, tag_id: &str) -> Result<Tag, KarakeepError> {
        self.request_json(Method::GET, &format!("tags/{tag_id}"), &[], None)
            .await
    }

    pub async fn rename_tag(&self, tag_id: &str, name: &str) -> Result<Tag, KarakeepError> {
        let body = json!({ "name": name });
        self.request_json(Method::PATCH, &format!("tags/{tag_id}"), &[], Some(body))
            .await
    }

    pub async fn delete_tag(&self, tag_id: &str) -> Result<(), KarakeepError> {
        self.request_no_content(Method::DELETE, &format!("tags/{tag_id}"), None)
            .await
    }

    pub async fn list_bookmarks_with_tag(
        &self,
        tag_id: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
        include_content: bool,
    ) -> Result<PaginatedBookmarks, KarakeepError> {
        let mut query = page_query(limit, cursor);
        query.push(("includeContent", include_content.to_string()));
        self.request_json(
            Method::GET,
            &format!("tags/{tag_id}/bookmarks"),
            &query,
            None,
        )
        .await
    }

    // Highlights

    pub async fn list_highlights(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<PaginatedHighlights, KarakeepError> {
        let query = page_query(limit, cursor);
        self.request_json(Method::GET, "highlights", &query, None)
            .await
    }

    pub async fn create_highlight(
        &self,
        new_highlight: &NewHighlight,
    ) -> Result<Highlight, KarakeepError> {
        let body = serde_json::to_value(new_highlight).map_err(KarakeepError::SerializeJson)?;
        self.request_json(Method::POST, "highlights", &[], Some(body))
            .await
    }

    pub async fn get_highlight(&self, highlight_id: &str) -> Result<Highlight, KarakeepError> {
        self.request_json(Method::GET, &format!("highlights/{highlight_id}"), &[], None)
            .await
    }

    pub async fn update_highlight(
        &self,
        highlight_id: &str,
        color: HighlightColor,
    ) -> Result<Highlight, KarakeepError> {
        let body = json!({ "color": color });
        self.request_json(
            Method::PATCH,
            &format!("highlights/{highlight_id}"),
            &[],
            Some(body),
        )
        .await
    }

    /// Delete a highlight. The API answers with the deleted highlight.
    pub async fn delete_highlight(&self, highlight_id: &str) -> Result<Highlight, KarakeepError> {
        self.request_json(
            Method::DELETE,
            &format!("highlights/{highlight_id}"),
            &[],
            None,
        )
        .await
    }

    // Users

    pub async fn user_info(&self) -> Result<UserInfo, KarakeepError> {
        self.request_json(Method::GET, "users/me", &[], None).await
    }

    pub async fn user_stats(&self) -> Result<UserStats, KarakeepError> {
        self.request_json(Method::GET, "users/me/stats", &[], None)
            .await
    }
}
