//! Derived Metrics
//!
//! Pure functions from decorated articles to the aggregates shown on the
//! dashboard and analytics pages.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::article::Article;

/// Longest source name shown before truncation
pub const SOURCE_LABEL_MAX_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceShare {
    pub source: String,
    pub count: usize,
    /// Share of all articles, rounded to the nearest integer
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    pub date: NaiveDate,
    pub articles: usize,
    pub engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub author: String,
    pub articles: usize,
    pub engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_articles: usize,
    pub total_engagement: u64,
    pub top_performing_content: Option<String>,
    pub active_authors: usize,
}

/// Article counts per source, largest first, at most `limit` entries
pub fn sources_breakdown(articles: &[Article], limit: usize) -> Vec<SourceShare> {
    let total = articles.len();
    if total == 0 {
        return Vec::new();
    }

    let mut tally: HashMap<&str, usize> = HashMap::new();
    for article in articles {
        *tally.entry(article.source.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(source, count)| SourceShare {
            source: source_label(source),
            count,
            percentage: ((count as f64 / total as f64) * 100.0).round() as u32,
        })
        .collect()
}

/// Dense daily series of `days` buckets ending at `end_day`, oldest first
///
/// Days without articles are emitted with zero counts. Articles outside the
/// window are ignored.
pub fn publication_trends(articles: &[Article], end_day: NaiveDate, days: u32) -> Vec<TrendBucket> {
    let mut buckets: Vec<TrendBucket> = (0..days)
        .rev()
        .filter_map(|offset| end_day.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| TrendBucket {
            date,
            articles: 0,
            engagement: 0,
        })
        .collect();

    for article in articles {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|bucket| bucket.date == article.published_date)
        {
            bucket.articles += 1;
            bucket.engagement += u64::from(article.views);
        }
    }

    buckets
}

/// Most prolific named authors, at most `limit`
///
/// Ties are broken by name so the order is stable.
pub fn author_ranking(articles: &[Article], limit: usize) -> Vec<AuthorStats> {
    let mut stats: HashMap<&str, (usize, u64)> = HashMap::new();
    for article in articles.iter().filter(|a| a.has_known_author()) {
        let entry = stats.entry(article.author.trim()).or_default();
        entry.0 += 1;
        entry.1 += u64::from(article.views);
    }

    let mut ranked: Vec<AuthorStats> = stats
        .into_iter()
        .map(|(author, (articles, engagement))| AuthorStats {
            author: author.to_string(),
            articles,
            engagement,
        })
        .collect();
    ranked.sort_by(|a, b| b.articles.cmp(&a.articles).then_with(|| a.author.cmp(&b.author)));
    ranked.truncate(limit);
    ranked
}

pub fn kpis(articles: &[Article]) -> Kpis {
    let active_authors = articles
        .iter()
        .filter(|a| a.has_known_author())
        .map(|a| a.author.trim())
        .collect::<std::collections::HashSet<_>>()
        .len();

    Kpis {
        total_articles: articles.len(),
        total_engagement: articles.iter().map(|a| u64::from(a.views)).sum(),
        // Strictly greater wins, so the earliest of equally viewed articles stays
        top_performing_content: articles
            .iter()
            .reduce(|best, a| if a.views > best.views { a } else { best })
            .map(|a| a.title.clone()),
        active_authors,
    }
}

fn source_label(source: &str) -> String {
    if source.chars().count() > SOURCE_LABEL_MAX_CHARS {
        let head: String = source.chars().take(SOURCE_LABEL_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        source.to_string()
    }
}
