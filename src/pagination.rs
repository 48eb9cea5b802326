//! Cursor pagination over the list endpoints.

use crate::{
    errors::KarakeepError,
    models::{Bookmark, Highlight, PaginatedBookmarks, PaginatedHighlights},
};
use futures::{pin_mut, stream, Stream, TryStreamExt};
use std::future::Future;

/// The maximum page size accepted by the API. Larger pages can overload an
/// instance.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of items with the cursor to the next page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl From<PaginatedBookmarks> for Page<Bookmark> {
    fn from(page: PaginatedBookmarks) -> Self {
        Self {
            items: page.bookmarks,
            next_cursor: page.next_cursor,
        }
    }
}

impl From<PaginatedHighlights> for Page<Highlight> {
    fn from(page: PaginatedHighlights) -> Self {
        Self {
            items: page.highlights,
            next_cursor: page.next_cursor,
        }
    }
}

/// Turn a page-fetching closure into a stream of batches, following the
/// cursor until the last page.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>, KarakeepError>>
where
    F: Fn(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, KarakeepError>>,
{
    stream::try_unfold(Some(None::<String>), move |state| {
        let page_future = state.map(|cursor| fetch(cursor));
        async move {
            match page_future {
                Some(page_future) => {
                    let page = page_future.await?;
                    let next_state = page.next_cursor.map(Some);
                    Ok(Some((page.items, next_state)))
                }
                None => Ok(None),
            }
        }
    })
}

/// Fetch all pages and collect the items, reporting each batch size to the
/// given callback.
pub async fn collect_all<T, F, Fut>(
    fetch: F,
    mut on_batch: impl FnMut(usize),
) -> Result<Vec<T>, KarakeepError>
where
    F: Fn(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, KarakeepError>>,
{
    let batches = paginate(fetch);
    pin_mut!(batches);

    let mut items = Vec::new();
    while let Some(batch) = batches.try_next().await? {
        on_batch(batch.len());
        items.extend(batch);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fetch_page(cursor: Option<String>) -> Result<Page<u32>, KarakeepError> {
        match cursor.as_deref() {
            None => Ok(Page {
                items: vec![1, 2],
                next_cursor: Some("c2".to_owned()),
            }),
            Some("c2") => Ok(Page {
                items: vec![3],
                next_cursor: Some("c3".to_owned()),
            }),
            Some("c3") => Ok(Page {
                items: vec![4, 5],
                next_cursor: None,
            }),
            Some(cursor) => Err(KarakeepError::EmptyResponse(cursor.to_owned())),
        }
    }

    #[tokio::test]
    async fn test_collect_all() {
        let mut batch_sizes = Vec::new();
        let items = collect_all(fetch_page, |len| batch_sizes.push(len))
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(batch_sizes, vec![2, 1, 2]);
    }

    #[tokio::test]
    async fn test_collect_all_single_page() {
        let items = collect_all(
            |_cursor| async {
                Ok(Page::<u32> {
                    items: vec![7],
                    next_cursor: None,
                })
            },
            |_| {},
        )
        .await
        .unwrap();
        assert_eq!(items, vec![7]);
    }

    #[tokio::test]
    async fn test_collect_all_propagates_errors() {
        let result = collect_all(
            |_cursor| async {
                Err::<Page<u32>, _>(KarakeepError::EmptyResponse("bookmarks".to_owned()))
            },
            |_| {},
        )
        .await;
        assert!(result.is_err());
    }
}
