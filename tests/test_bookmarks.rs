mod common;

use karakeep_api::{
    models::{TagRef, UpdateBookmark},
    pagination::{collect_all, Page},
    BookmarkFilter,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_list_bookmarks_pagination() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/bookmarks"))
        .and(query_param("limit", "100"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookmarks": [
                common::bookmark_json("bm_1", "https://example.com/1", false),
                common::bookmark_json("bm_2", "https://example.com/2", false),
            ],
            "nextCursor": "c2",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/bookmarks"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookmarks": [
                common::bookmark_json("bm_3", "https://example.com/3", true),
            ],
            "nextCursor": null,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let client = common::test_client(&mock_server);
    let client = &client;
    let filter = BookmarkFilter::default();

    let bookmarks = collect_all(
        |cursor| async move {
            let page = client
                .list_bookmarks(&filter, Some(100), cursor.as_deref(), false)
                .await?;
            Ok(Page::from(page))
        },
        |_| {},
    )
    .await
    .unwrap();

    assert_eq!(bookmarks.len(), 3);
    assert_eq!(bookmarks[0].id, "bm_1");
    assert_eq!(bookmarks[2].id, "bm_3");
    assert!(bookmarks[2].archived);
}

#[tokio::test]
async fn test_list_bookmarks_filter_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/bookmarks"))
        .and(query_param("archived", "false"))
        .and(query_param("includeContent", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookmarks": [],
            "nextCursor": null,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let client = common::test_client(&mock_server);
    let filter = BookmarkFilter {
        archived: Some(false),
        ..Default::default()
    };

    let page = client
        .list_bookmarks(&filter, None, None, true)
        .await
        .unwrap();

    assert!(page.bookmarks.is_empty());
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_update_bookmark() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/bookmarks/bm_1"))
        .and(body_json(json!({"archived": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "bm_1",
            "archived": true,
            "favourited": false,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let client = common::test_client(&mock_server);

    let patched = client
        .update_bookmark("bm_1", &UpdateBookmark::archived(true))
        .await
        .unwrap();

    assert_eq!(patched.id, "bm_1");
    assert!(patched.archived);
}

#[tokio::test]
async fn test_attach_and_detach_tags() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/bookmarks/bm_1/tags"))
        .and(body_json(json!({"tags": [{"tagName": "rust"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"attached": ["t_1"]})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/bookmarks/bm_1/tags"))
        .and(body_json(json!({"tags": [{"tagId": "t_1"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detached": ["t_1"]})))
        .expect(1)
        .mount(&mock_server)
        .await;
    let client = common::test_client(&mock_server);

    let attached = client
        .attach_tags("bm_1", &[TagRef::Name("rust".to_owned())])
        .await
        .unwrap();
    assert_eq!(attached, vec!["t_1".to_owned()]);

    let detached = client
        .detach_tags("bm_1", &[TagRef::Id("t_1".to_owned())])
        .await
        .unwrap();
    assert_eq!(detached, vec!["t_1".to_owned()]);
}

#[tokio::test]
async fn test_delete_highlight_returns_highlight() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/highlights/h_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "h_1",
            "bookmarkId": "bm_1",
            "startOffset": 10,
            "endOffset": 25,
            "color": "yellow",
            "text": "a highlight",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let client = common::test_client(&mock_server);

    let highlight = client.delete_highlight("h_1").await.unwrap();

    assert_eq!(highlight.id, "h_1");
    assert_eq!(highlight.start_offset, 10);
    assert_eq!(highlight.text.as_deref(), Some("a highlight"));
}

#[tokio::test]
async fn test_list_tags_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tags": [
                {
                    "id": "t_1",
                    "name": "rust",
                    "numBookmarks": 3,
                    "numBookmarksByAttachedType": {"ai": 3, "human": 0},
                },
            ],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let client = common::test_client(&mock_server);

    let tags = client.list_tags().await.unwrap();

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "rust");
    assert!(tags[0].is_ai_only());
}
