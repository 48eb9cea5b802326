//! Heuristics to match imported articles against existing bookmarks and to
//! locate quoted passages within a bookmark's content.
//!
//! All offsets are character offsets, as used by the highlight endpoints.

use crate::models::Bookmark;
use log::trace;
use scraper::Html;
use similar::TextDiff;

/// The minimum similarity for a fuzzy title match.
pub const TITLE_MATCH_THRESHOLD: f32 = 0.95;

/// The minimum similarity for a fuzzy passage match.
pub const PASSAGE_MATCH_THRESHOLD: f32 = 0.8;

/// The url prefix of article pages synthesized by Omnivore. Those urls don't
/// identify the original article and are excluded from url matching.
const SYNTHETIC_URL_PREFIX: &str = "https://omnivore.app";

/// The character-level similarity of two strings in `0.0..=1.0`.
pub fn similarity(left: &str, right: &str) -> f32 {
    TextDiff::from_chars(left, right).ratio()
}

/// Score how well a bookmark matches an imported article by url and title.
///
/// A url match and an exact case-insensitive title match score `1.0`. Titles
/// within [`TITLE_MATCH_THRESHOLD`] score their similarity. Returns `None`
/// when neither matches.
pub fn match_bookmark(url: &str, title: Option<&str>, bookmark: &Bookmark) -> Option<f32> {
    if !url.starts_with(SYNTHETIC_URL_PREFIX) && bookmark.content.url() == Some(url) {
        return Some(1.0);
    }

    let title = title?.trim();
    if title.is_empty() {
        return None;
    }
    let title_lowercase = title.to_lowercase();

    let candidates = [bookmark.content.title(), bookmark.title.as_deref()];
    let mut best_score = None;

    for candidate in candidates.into_iter().flatten() {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        let candidate_lowercase = candidate.to_lowercase();

        if candidate_lowercase == title_lowercase {
            return Some(1.0);
        }

        let score = similarity(&title_lowercase, &candidate_lowercase);
        if score >= TITLE_MATCH_THRESHOLD && best_score.map_or(true, |best| score > best) {
            best_score = Some(score);
        }
    }

    best_score
}

/// Find the bookmark which best matches an imported article.
pub fn find_best_match<'a>(
    url: &str,
    title: Option<&str>,
    bookmarks: &'a [Bookmark],
) -> Option<(&'a Bookmark, f32)> {
    let mut best_match = None;

    for bookmark in bookmarks {
        if let Some(score) = match_bookmark(url, title, bookmark) {
            match best_match {
                Some((_, best_score)) if best_score >= score => {}
                _ => best_match = Some((bookmark, score)),
            }
        }
    }

    best_match
}

/// Extract the visible text of an HTML document with normalized whitespace.
pub fn html_to_text(html: &str) -> String {
    let html = Html::parse_document(html);
    html.root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The text and markdown renditions of a bookmark's content, searched when
/// anchoring highlights.
#[derive(Debug, Clone)]
pub struct BookmarkCorpus {
    pub text: String,
    pub markdown: String,
}

impl BookmarkCorpus {
    pub fn from_html(html: &str) -> Self {
        Self {
            text: html_to_text(html),
            markdown: html2md::parse_html(html),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            markdown: text.to_owned(),
        }
    }
}

/// How the position of a passage was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    /// The passage occurs verbatim in the text.
    ExactText,
    /// The passage occurs verbatim in the markdown, the offset is mapped
    /// proportionally into the text.
    MarkdownMapped,
    /// The best fuzzy window within the text.
    Fuzzy,
}

/// The located character range of a passage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightPosition {
    pub start: i64,
    pub end: i64,
    pub ratio: f32,
    pub method: MatchMethod,
}

/// Locate a quoted passage within a bookmark's content.
///
/// Tries an exact substring match in the text, then an exact match in the
/// markdown with a proportional offset mapping, then a fuzzy window scan
/// over the text. Returns `None` when no window reaches
/// [`PASSAGE_MATCH_THRESHOLD`].
pub fn locate_highlight(query: &str, corpus: &BookmarkCorpus) -> Option<HighlightPosition> {
    let query = query.trim();
    if query.is_empty() || corpus.text.is_empty() {
        return None;
    }
    let query_len = query.chars().count() as i64;

    if let Some(byte_index) = corpus.text.find(query) {
        let start = corpus.text[..byte_index].chars().count() as i64;
        return Some(HighlightPosition {
            start,
            end: start + query_len,
            ratio: 1.0,
            method: MatchMethod::ExactText,
        });
    }

    if let Some(byte_index) = corpus.markdown.find(query) {
        let markdown_index = corpus.markdown[..byte_index].chars().count() as i64;
        let markdown_len = corpus.markdown.chars().count() as i64;
        let text_len = corpus.text.chars().count() as i64;
        if markdown_len > 0 {
            let start = (markdown_index * text_len / markdown_len).min(text_len);
            let end = (start + query_len).min(text_len);
            trace!("Mapped markdown offset {markdown_index} to text offset {start}");
            return Some(HighlightPosition {
                start,
                end,
                ratio: 1.0,
                method: MatchMethod::MarkdownMapped,
            });
        }
    }

    best_window_match(query, &corpus.text)
}

/// Scan the text for the window most similar to the query.
///
/// A coarse pass steps by half the query length, then a fine pass with a
/// step of one character refines around the best coarse window.
fn best_window_match(query: &str, text: &str) -> Option<HighlightPosition> {
    let text_chars: Vec<char> = text.chars().collect();
    let query_len = query.chars().count();
    if query_len == 0 || text_chars.len() < query_len {
        return None;
    }

    let last_start = text_chars.len() - query_len;
    let coarse_step = (query_len / 2).max(1);

    let (coarse_start, _) = best_window_in_range(query, &text_chars, 0, last_start, coarse_step)?;

    let fine_from = coarse_start.saturating_sub(coarse_step);
    let fine_to = (coarse_start + coarse_step).min(last_start);
    let (start, ratio) = best_window_in_range(query, &text_chars, fine_from, fine_to, 1)?;

    if ratio < PASSAGE_MATCH_THRESHOLD {
        return None;
    }

    Some(HighlightPosition {
        start: start as i64,
        end: (start + query_len) as i64,
        ratio,
        method: MatchMethod::Fuzzy,
    })
}

fn best_window_in_range(
    query: &str,
    text_chars: &[char],
    from: usize,
    to: usize,
    step: usize,
) -> Option<(usize, f32)> {
    let query_len = query.chars().count();
    let mut best = None;

    let mut start = from;
    while start <= to {
        let window: String = text_chars[start..start + query_len].iter().collect();
        let ratio = similarity(query, &window);

        match best {
            Some((_, best_ratio)) if best_ratio >= ratio => {}
            _ => best = Some((start, ratio)),
        }

        start += step;
    }

    best
}
