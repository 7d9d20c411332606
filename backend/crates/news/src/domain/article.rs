//! Articles
//!
//! [`RawArticle`] is the wire shape returned by the remote service; every
//! field may be missing. [`Article`] is the decorated form the pages work
//! with: defaults filled in, plus synthetic engagement numbers.
//!
//! The synthetic numbers (views, content class) come from a SHA-256 over
//! the article's identifying fields, so reloading the same article yields
//! the same values and the same payout totals.

use chrono::NaiveDate;
use derive_more::Display;
use platform::crypto::{digest_prefix_u64, stable_digest};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled Article";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_CONTENT: &str = "No content available";

/// Characters of content per minute of reading
pub const CHARS_PER_MINUTE: usize = 500;

/// Synthetic views are drawn from `0..MAX_SYNTHETIC_VIEWS`
pub const MAX_SYNTHETIC_VIEWS: u64 = 20_000;

/// Source block of a remote article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Article as returned by the remote service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub source: Option<RawSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

impl RawArticle {
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }
}

/// Content class used for payouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum ContentClass {
    #[display("news")]
    News,
    #[display("blog")]
    Blog,
}

impl std::str::FromStr for ContentClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(ContentClass::News),
            "blog" => Ok(ContentClass::Blog),
            other => Err(format!("unknown content class: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[display("published")]
    Published,
}

/// Decorated article
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Position within the result page, 1-based. Not stable across fetches.
    pub id: usize,
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub source: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub read_time_minutes: u32,
    pub views: u32,
    pub content_class: ContentClass,
    pub status: ArticleStatus,
    /// Length of the raw content in characters (500 when absent)
    #[serde(skip)]
    pub content_length: usize,
}

impl Article {
    /// Decorate a raw article found at `index` of its result page
    ///
    /// `today` is used when the publish timestamp is missing or unreadable.
    pub fn from_raw(index: usize, raw: &RawArticle, today: NaiveDate) -> Self {
        let excerpt = non_blank(raw.description.as_deref())
            .unwrap_or(NO_DESCRIPTION)
            .to_string();
        let content = non_blank(raw.content.as_deref())
            .or_else(|| non_blank(raw.description.as_deref()))
            .unwrap_or(NO_CONTENT)
            .to_string();

        let content_length = raw
            .content
            .as_deref()
            .map(|c| c.chars().count())
            .unwrap_or(CHARS_PER_MINUTE);

        let synthetic = SyntheticMetrics::derive(raw);

        Self {
            id: index + 1,
            title: non_blank(raw.title.as_deref()).unwrap_or(UNTITLED).to_string(),
            author: non_blank(raw.author.as_deref())
                .unwrap_or(UNKNOWN_AUTHOR)
                .to_string(),
            published_date: raw
                .published_at
                .as_deref()
                .and_then(publication_day)
                .unwrap_or(today),
            source: non_blank(raw.source_name())
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string(),
            excerpt,
            content,
            image_url: raw.url_to_image.clone(),
            url: raw.url.clone(),
            read_time_minutes: read_time_minutes(content_length),
            views: synthetic.views,
            content_class: synthetic.content_class,
            status: ArticleStatus::Published,
            content_length,
        }
    }

    /// Whether the author field names a real person
    pub fn has_known_author(&self) -> bool {
        let author = self.author.trim();
        !author.is_empty() && author != UNKNOWN_AUTHOR
    }
}

/// Decorate a whole result page
pub fn decorate_all(raws: &[RawArticle], today: NaiveDate) -> Vec<Article> {
    raws.iter()
        .enumerate()
        .map(|(index, raw)| Article::from_raw(index, raw, today))
        .collect()
}

/// `max(1, content_length / 500)`
pub fn read_time_minutes(content_length: usize) -> u32 {
    (content_length / CHARS_PER_MINUTE).max(1) as u32
}

/// Calendar day of a publish timestamp
///
/// The remote service sends ISO-8601 (`2024-01-15T10:00:00Z`); the day is
/// taken as written, before the `T`.
pub fn publication_day(published_at: &str) -> Option<NaiveDate> {
    let day = published_at.trim().split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Values derived from the article hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticMetrics {
    pub views: u32,
    pub content_class: ContentClass,
}

impl SyntheticMetrics {
    pub fn derive(raw: &RawArticle) -> Self {
        let digest = stable_digest(&[
            raw.url.as_deref().unwrap_or_default(),
            raw.title.as_deref().unwrap_or_default(),
            raw.published_at.as_deref().unwrap_or_default(),
        ]);

        let views = (digest_prefix_u64(&digest) % MAX_SYNTHETIC_VIEWS) as u32;
        // Roughly one in three articles is a blog post
        let content_class = if digest[8] % 3 == 0 {
            ContentClass::Blog
        } else {
            ContentClass::News
        };

        Self {
            views,
            content_class,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
