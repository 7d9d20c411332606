//! Article Browsing
//!
//! Search, filter, sort and paginate the decorated catalog.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::article::{Article, ContentClass};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Title,
    Author,
    #[default]
    Date,
    Views,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "author" => Ok(SortField::Author),
            "date" => Ok(SortField::Date),
            "views" => Ok(SortField::Views),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Article filter; empty fields do not restrict
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Case-insensitive match on title, author or excerpt
    pub search: Option<String>,
    pub authors: Vec<String>,
    pub content_classes: Vec<ContentClass>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&article.title, &article.author, &article.excerpt]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if !self.authors.is_empty() && !self.authors.iter().any(|a| a == &article.author) {
            return false;
        }

        if !self.content_classes.is_empty() && !self.content_classes.contains(&article.content_class)
        {
            return false;
        }

        if self.from.is_some_and(|from| article.published_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| article.published_date > to) {
            return false;
        }

        true
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Filter then sort; ties keep catalog order
pub fn query_articles<'a>(
    articles: &'a [Article],
    filter: &ArticleFilter,
    field: SortField,
    order: SortOrder,
) -> Vec<&'a Article> {
    let mut selected: Vec<&Article> = articles.iter().filter(|a| filter.matches(a)).collect();
    selected.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    selected
}

fn compare(a: &Article, b: &Article, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
        SortField::Date => a.published_date.cmp(&b.published_date),
        SortField::Views => a.views.cmp(&b.views),
    }
}

/// Slice out page `page` (1-based; 0 is treated as 1)
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len();

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total_items,
        total_pages: total_items.div_ceil(per_page),
    }
}

/// Distinct author names in first-seen order
pub fn available_authors(articles: &[Article]) -> Vec<String> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .filter(|a| seen.insert(a.author.as_str()))
        .map(|a| a.author.clone())
        .collect()
}

/// Lookup by positional id
pub fn find_article(articles: &[Article], id: usize) -> Option<&Article> {
    articles.iter().find(|a| a.id == id)
}

/// Articles suggested under a detail view
pub const RELATED_ARTICLES: usize = 3;

/// The first `limit` articles other than `id`, in catalog order
pub fn related_articles(articles: &[Article], id: usize, limit: usize) -> Vec<&Article> {
    articles.iter().filter(|a| a.id != id).take(limit).collect()
}
