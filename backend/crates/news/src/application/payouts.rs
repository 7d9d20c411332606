//! Payout Ledger
//!
//! Per-author payout lines derived from the article catalog, plus the
//! admin operations on them: rate changes, bulk status updates, filtering,
//! totals, and the downloads (CSV export, plain-text report, invoices).

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::article::Article;
use crate::domain::payout::{PaymentStatus, PayoutRates, PayoutRecord, TierRates, classify};

/// Payout lines keyed by author name
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutLedger {
    rates: PayoutRates,
    records: BTreeMap<String, PayoutRecord>,
}

impl PayoutLedger {
    /// One record per distinct named author, counts per (class, tier) cell
    pub fn build(articles: &[Article], rates: PayoutRates, now: DateTime<Utc>) -> Self {
        let mut records: BTreeMap<String, PayoutRecord> = BTreeMap::new();

        for article in articles.iter().filter(|a| a.has_known_author()) {
            let author = article.author.trim();
            let record = records
                .entry(author.to_string())
                .or_insert_with(|| PayoutRecord::new(author, now));
            let (class, tier) = classify(article);
            record.counts_mut(class).increment(tier);
        }

        for record in records.values_mut() {
            record.total_amount = record.compute_total(&rates);
        }

        Self { rates, records }
    }

    /// Rebuild counts from a new catalog, keeping payment history
    ///
    /// Authors missing from the new catalog are dropped.
    pub fn refresh(&mut self, articles: &[Article], now: DateTime<Utc>) {
        let mut next = Self::build(articles, self.rates, now);
        for (author, record) in next.records.iter_mut() {
            if let Some(previous) = self.records.get(author) {
                record.payment_status = previous.payment_status;
                record.last_payment = previous.last_payment;
                record.created_at = previous.created_at;
                if record.news_articles == previous.news_articles
                    && record.blog_posts == previous.blog_posts
                {
                    record.updated_at = previous.updated_at;
                }
            }
        }
        *self = next;
    }

    pub fn rates(&self) -> &PayoutRates {
        &self.rates
    }

    pub fn records(&self) -> impl Iterator<Item = &PayoutRecord> {
        self.records.values()
    }

    pub fn record(&self, author: &str) -> Option<&PayoutRecord> {
        self.records.get(author)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the rate table and recompute every total; counts are untouched
    pub fn apply_rates(&mut self, rates: PayoutRates, now: DateTime<Utc>) {
        self.rates = rates;
        for record in self.records.values_mut() {
            record.total_amount = record.compute_total(&self.rates);
            record.updated_at = now;
        }
    }

    /// Set `status` on the named authors and stamp `today` as their last payment
    ///
    /// Returns how many records changed. Unknown names are ignored.
    pub fn update_status(
        &mut self,
        authors: &[String],
        status: PaymentStatus,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> usize {
        let mut updated = 0;
        for author in authors {
            if let Some(record) = self.records.get_mut(author.trim()) {
                record.payment_status = status;
                record.last_payment = Some(today);
                record.updated_at = now;
                updated += 1;
            }
        }
        updated
    }

    pub fn filter(&self, filter: &PayoutFilter) -> Vec<&PayoutRecord> {
        self.records.values().filter(|r| filter.matches(r)).collect()
    }
}

/// Payout filter; empty fields do not restrict
#[derive(Debug, Clone, Default)]
pub struct PayoutFilter {
    /// Case-insensitive match on author name or email
    pub search: Option<String>,
    pub status: Option<PaymentStatus>,
    /// Last-payment range; only applied when both ends are set
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl PayoutFilter {
    pub fn matches(&self, record: &PayoutRecord) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !record.author_name.to_lowercase().contains(&needle)
                && !record.email.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if self.status.is_some_and(|status| record.payment_status != status) {
            return false;
        }

        if let (Some(from), Some(to)) = (self.from, self.to) {
            match record.last_payment {
                Some(paid) if paid >= from && paid <= to => {}
                _ => return false,
            }
        }

        true
    }
}

/// Totals over a set of records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSummary {
    pub total_pending: f64,
    pub total_paid: f64,
    pub total_authors: usize,
    pub pending_authors: usize,
}

pub fn summarize<'a>(records: impl IntoIterator<Item = &'a PayoutRecord>) -> PayoutSummary {
    let mut summary = PayoutSummary {
        total_pending: 0.0,
        total_paid: 0.0,
        total_authors: 0,
        pending_authors: 0,
    };

    for record in records {
        summary.total_authors += 1;
        match record.payment_status {
            PaymentStatus::Pending => {
                summary.total_pending += record.total_amount;
                summary.pending_authors += 1;
            }
            PaymentStatus::Paid => summary.total_paid += record.total_amount,
            PaymentStatus::Processing => {}
        }
    }

    summary
}

/// Column of the CSV export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportField {
    AuthorName,
    Email,
    NewsArticles,
    BlogPosts,
    TotalAmount,
    PaymentStatus,
    LastPayment,
    JoinDate,
}

/// Columns exported when none are requested
pub const DEFAULT_EXPORT_FIELDS: [ExportField; 5] = [
    ExportField::AuthorName,
    ExportField::Email,
    ExportField::TotalAmount,
    ExportField::PaymentStatus,
    ExportField::LastPayment,
];

impl ExportField {
    pub fn label(&self) -> &'static str {
        match self {
            ExportField::AuthorName => "Author Name",
            ExportField::Email => "Email",
            ExportField::NewsArticles => "News Articles Count",
            ExportField::BlogPosts => "Blog Posts Count",
            ExportField::TotalAmount => "Total Amount",
            ExportField::PaymentStatus => "Payment Status",
            ExportField::LastPayment => "Last Payment Date",
            ExportField::JoinDate => "Join Date",
        }
    }

    fn cell(&self, record: &PayoutRecord) -> String {
        match self {
            ExportField::AuthorName => record.author_name.clone(),
            ExportField::Email => record.email.clone(),
            ExportField::NewsArticles => record.news_articles.compact(),
            ExportField::BlogPosts => record.blog_posts.compact(),
            ExportField::TotalAmount => format!("${}", record.total_amount),
            ExportField::PaymentStatus => record.payment_status.to_string(),
            ExportField::LastPayment => record
                .last_payment
                .map(|d| d.to_string())
                .unwrap_or_default(),
            ExportField::JoinDate => record.created_at.date_naive().to_string(),
        }
    }
}

impl FromStr for ExportField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "authorName" => Ok(ExportField::AuthorName),
            "email" => Ok(ExportField::Email),
            "newsArticles" => Ok(ExportField::NewsArticles),
            "blogPosts" => Ok(ExportField::BlogPosts),
            "totalAmount" => Ok(ExportField::TotalAmount),
            "paymentStatus" => Ok(ExportField::PaymentStatus),
            "lastPayment" => Ok(ExportField::LastPayment),
            "joinDate" => Ok(ExportField::JoinDate),
            other => Err(format!("unknown export field: {other}")),
        }
    }
}

/// CSV with a header row; every cell quoted
pub fn export_csv<'a>(
    records: impl IntoIterator<Item = &'a PayoutRecord>,
    fields: &[ExportField],
) -> String {
    let header = fields.iter().map(|f| quote(f.label()));
    let mut lines = vec![header.collect::<Vec<_>>().join(",")];

    for record in records {
        let row: Vec<String> = fields.iter().map(|f| quote(&f.cell(record))).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Plain-text payout report: totals, the rate table, then one block per author
pub fn report_text<'a>(
    records: impl IntoIterator<Item = &'a PayoutRecord>,
    rates: &PayoutRates,
    today: NaiveDate,
) -> String {
    let records: Vec<&PayoutRecord> = records.into_iter().collect();
    let summary = summarize(records.iter().copied());

    let mut lines = vec![
        "PAYOUT REPORT".to_string(),
        format!("Generated: {today}"),
        String::new(),
        "SUMMARY:".to_string(),
        format!("Total Authors: {}", summary.total_authors),
        format!("Total Pending: {}", grouped_amount(summary.total_pending)),
        format!("Total Paid: {}", grouped_amount(summary.total_paid)),
        String::new(),
        "PAYOUT RATES:".to_string(),
        format!("News Articles - {}", rate_line(&rates.news_article)),
        format!("Blog Posts - {}", rate_line(&rates.blog_post)),
        String::new(),
        "AUTHOR DETAILS:".to_string(),
    ];

    for record in records {
        lines.push(String::new());
        lines.push(format!("{} ({})", record.author_name, record.email));
        lines.push(format!("News Articles: {}", record.news_articles.compact()));
        lines.push(format!("Blog Posts: {}", record.blog_posts.compact()));
        lines.push(format!("Total Amount: ${}", record.total_amount));
        lines.push(format!("Status: {}", record.payment_status));
        lines.push(format!(
            "Last Payment: {}",
            record
                .last_payment
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string())
        ));
    }

    lines.join("\n")
}

fn rate_line(rates: &TierRates) -> String {
    format!(
        "Basic: ${}, Premium: ${}, Featured: ${}",
        rates.basic, rates.premium, rates.featured
    )
}

/// `$1,234.5` style: thousands grouped, at most two decimals, no trailing zeros
fn grouped_amount(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match cents % 100 {
        0 => format!("${grouped}"),
        frac if frac % 10 == 0 => format!("${grouped}.{}", frac / 10),
        frac => format!("${grouped}.{frac:02}"),
    }
}

/// Days between invoice date and due date
pub const INVOICE_TERM_DAYS: u64 = 30;

/// Amount owed to one pending author
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub author_name: String,
    pub email: String,
    pub amount_due: f64,
    pub due_date: NaiveDate,
    pub news_articles: u32,
    pub blog_posts: u32,
}

impl Invoice {
    pub fn render(&self) -> String {
        [
            format!("INVOICE - {}", self.author_name),
            format!("Email: {}", self.email),
            format!("Amount Due: ${}", self.amount_due),
            format!("Due Date: {}", self.due_date),
            String::new(),
            "Breakdown:".to_string(),
            format!("News Articles: {} articles", self.news_articles),
            format!("Blog Posts: {} posts", self.blog_posts),
            String::new(),
            "Payment Instructions:".to_string(),
            format!(
                "Please process payment within {INVOICE_TERM_DAYS} days of invoice date."
            ),
        ]
        .join("\n")
    }
}

/// One invoice per pending record, due [`INVOICE_TERM_DAYS`] after `today`
pub fn invoices<'a>(
    records: impl IntoIterator<Item = &'a PayoutRecord>,
    today: NaiveDate,
) -> Vec<Invoice> {
    let due_date = today + Days::new(INVOICE_TERM_DAYS);

    records
        .into_iter()
        .filter(|r| r.payment_status == PaymentStatus::Pending)
        .map(|r| Invoice {
            author_name: r.author_name.clone(),
            email: r.email.clone(),
            amount_due: r.total_amount,
            due_date,
            news_articles: r.news_articles.total(),
            blog_posts: r.blog_posts.total(),
        })
        .collect()
}

/// All invoices in one document, separated by `---`
pub fn render_invoices(invoices: &[Invoice]) -> String {
    invoices
        .iter()
        .map(Invoice::render)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
