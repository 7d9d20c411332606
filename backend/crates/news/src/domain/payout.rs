//! Payout Domain
//!
//! Every article belongs to exactly one (class, tier) cell. An author's
//! total is the dot product of their cell counts with the rate table.

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::article::{Article, ContentClass};

pub const FEATURED_MIN_VIEWS: u32 = 15_000;
pub const PREMIUM_MIN_VIEWS: u32 = 7_500;
pub const PREMIUM_MIN_CONTENT_LENGTH: usize = 1_500;

/// Payout tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[display("basic")]
    Basic,
    #[display("premium")]
    Premium,
    #[display("featured")]
    Featured,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Premium, Tier::Featured];

    /// Tier from engagement and length
    pub fn for_metrics(views: u32, content_length: usize) -> Self {
        if views >= FEATURED_MIN_VIEWS {
            Tier::Featured
        } else if views >= PREMIUM_MIN_VIEWS || content_length >= PREMIUM_MIN_CONTENT_LENGTH {
            Tier::Premium
        } else {
            Tier::Basic
        }
    }
}

/// (class, tier) cell of an article
pub fn classify(article: &Article) -> (ContentClass, Tier) {
    (
        article.content_class,
        Tier::for_metrics(article.views, article.content_length),
    )
}

/// Article counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub basic: u32,
    pub premium: u32,
    pub featured: u32,
}

impl TierCounts {
    pub fn new(basic: u32, premium: u32, featured: u32) -> Self {
        Self {
            basic,
            premium,
            featured,
        }
    }

    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Basic => self.basic,
            Tier::Premium => self.premium,
            Tier::Featured => self.featured,
        }
    }

    pub fn increment(&mut self, tier: Tier) {
        match tier {
            Tier::Basic => self.basic += 1,
            Tier::Premium => self.premium += 1,
            Tier::Featured => self.featured += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.basic + self.premium + self.featured
    }

    /// `B:1 P:2 F:0`
    pub fn compact(&self) -> String {
        format!("B:{} P:{} F:{}", self.basic, self.premium, self.featured)
    }
}

/// Amount paid per article, per tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRates {
    pub basic: f64,
    pub premium: f64,
    pub featured: f64,
}

impl TierRates {
    pub fn new(basic: f64, premium: f64, featured: f64) -> Self {
        Self {
            basic,
            premium,
            featured,
        }
    }

    pub fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Basic => self.basic,
            Tier::Premium => self.premium,
            Tier::Featured => self.featured,
        }
    }

    /// `Σ counts[tier] × rate[tier]`
    pub fn amount_for(&self, counts: &TierCounts) -> f64 {
        Tier::ALL
            .iter()
            .map(|&tier| f64::from(counts.get(tier)) * self.get(tier))
            .sum()
    }

    fn validate(&self, class: ContentClass) -> Result<(), String> {
        for tier in Tier::ALL {
            let rate = self.get(tier);
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!("{class} {tier} rate must be a non-negative amount, got {rate}"));
            }
        }
        Ok(())
    }
}

/// Rate table for both content classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRates {
    pub news_article: TierRates,
    pub blog_post: TierRates,
}

impl Default for PayoutRates {
    fn default() -> Self {
        Self {
            news_article: TierRates::new(50.0, 75.0, 100.0),
            blog_post: TierRates::new(40.0, 60.0, 80.0),
        }
    }
}

impl PayoutRates {
    pub fn for_class(&self, class: ContentClass) -> &TierRates {
        match class {
            ContentClass::News => &self.news_article,
            ContentClass::Blog => &self.blog_post,
        }
    }

    /// Every rate must be finite and non-negative
    pub fn validate(&self) -> Result<(), String> {
        self.news_article.validate(ContentClass::News)?;
        self.blog_post.validate(ContentClass::Blog)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("processing")]
    Processing,
    #[display("paid")]
    Paid,
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "processing" => Ok(PaymentStatus::Processing),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// One author's payout line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    pub author_name: String,
    pub email: String,
    pub news_articles: TierCounts,
    pub blog_posts: TierCounts,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub last_payment: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayoutRecord {
    pub fn new(author_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let author_name = author_name.into();
        Self {
            email: author_email(&author_name),
            author_name,
            news_articles: TierCounts::default(),
            blog_posts: TierCounts::default(),
            total_amount: 0.0,
            payment_status: PaymentStatus::Pending,
            last_payment: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn counts(&self, class: ContentClass) -> &TierCounts {
        match class {
            ContentClass::News => &self.news_articles,
            ContentClass::Blog => &self.blog_posts,
        }
    }

    pub fn counts_mut(&mut self, class: ContentClass) -> &mut TierCounts {
        match class {
            ContentClass::News => &mut self.news_articles,
            ContentClass::Blog => &mut self.blog_posts,
        }
    }

    pub fn article_count(&self) -> u32 {
        self.news_articles.total() + self.blog_posts.total()
    }

    pub fn compute_total(&self, rates: &PayoutRates) -> f64 {
        rates.news_article.amount_for(&self.news_articles)
            + rates.blog_post.amount_for(&self.blog_posts)
    }
}

/// Mailbox synthesized from an author's name
///
/// `"Dr. Michael Chen"` becomes `dr.michael.chen@newshub.com`.
pub fn author_email(author_name: &str) -> String {
    let local: Vec<String> = author_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if local.is_empty() {
        "author@newshub.com".to_string()
    } else {
        format!("{}@newshub.com", local.join("."))
    }
}
