//! Pantry filter screen
//!
//! Same shape as the catalog query (search, category, sort) plus an
//! expiration-window filter and a chronological sort. Dates are ISO
//! `YYYY-MM-DD` strings compared against an explicit reference day.
//!
//! Differences from the catalog search:
//! - the text filter matches the name only and is not trimmed
//! - category runs after text
//! - a row with an unparseable date fails every window except `All` and
//!   sorts after dated rows when ascending

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::catalog::locale_cmp;
use crate::interface::{
    CategoryFilter, ExpirationStatus, ExpirationWindow, PantryItem, PantryQuery, PantrySortField,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days left at which a row is flagged as expiring soon
pub const SOON_DAYS: i64 = 3;
const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

/// Category chips on the pantry screen, in display order
pub const PANTRY_CATEGORIES: &[&str] = &[
    "All",
    "Dairy",
    "Bakery",
    "Fruits",
    "Vegetables",
    "Meat",
    "Grains",
    "Canned",
    "Frozen",
];

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Whole days from `today` to `expiration_date`; negative once expired.
/// `None` if either date does not parse.
pub fn days_until_expiration(expiration_date: &str, today: &str) -> Option<i64> {
    let expires = parse_date(expiration_date)?;
    let today = parse_date(today)?;
    Some((expires - today).num_days())
}

impl ExpirationWindow {
    pub fn label(&self) -> &'static str {
        match self {
            ExpirationWindow::All => "All",
            ExpirationWindow::Soon => "Expiring Soon (3 days)",
            ExpirationWindow::Week => "This Week",
            ExpirationWindow::Month => "This Month",
            ExpirationWindow::Expired => "Expired",
        }
    }

    pub fn ordered() -> [ExpirationWindow; 5] {
        [
            ExpirationWindow::All,
            ExpirationWindow::Soon,
            ExpirationWindow::Week,
            ExpirationWindow::Month,
            ExpirationWindow::Expired,
        ]
    }

    /// Whether a row `days` away from expiring belongs in this window
    pub fn contains(&self, days: Option<i64>) -> bool {
        match (self, days) {
            (ExpirationWindow::All, _) => true,
            (_, None) => false,
            (ExpirationWindow::Expired, Some(d)) => d < 0,
            (ExpirationWindow::Soon, Some(d)) => (0..=SOON_DAYS).contains(&d),
            (ExpirationWindow::Week, Some(d)) => (0..=WEEK_DAYS).contains(&d),
            (ExpirationWindow::Month, Some(d)) => (0..=MONTH_DAYS).contains(&d),
        }
    }
}

impl PantrySortField {
    /// Next field for the cycling sort button: name, expiration, category
    pub fn next(self) -> Self {
        match self {
            PantrySortField::Name => PantrySortField::Expiration,
            PantrySortField::Expiration => PantrySortField::Category,
            PantrySortField::Category => PantrySortField::Name,
        }
    }
}

impl PantryQuery {
    /// Number of filters narrowing the list (sort order does not count)
    pub fn active_filter_count(&self) -> u32 {
        [
            self.category != CategoryFilter::All,
            self.expiration != ExpirationWindow::All,
            !self.search_text.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count() as u32
    }

    /// Reset every filter and the sort field
    pub fn cleared() -> Self {
        Self::default()
    }
}

/// Badge for a row relative to `today`
pub fn expiration_status(item: &PantryItem, today: &str) -> ExpirationStatus {
    match days_until_expiration(&item.expiration_date, today) {
        None => ExpirationStatus::Unknown,
        Some(d) if d < 0 => ExpirationStatus::Expired { days_ago: d.unsigned_abs() as u32 },
        Some(d) if d <= SOON_DAYS => ExpirationStatus::ExpiringSoon { days_left: d as u32 },
        Some(d) => ExpirationStatus::Fresh { days_left: d.min(u32::MAX as i64) as u32 },
    }
}

fn compare_expiration(a: &PantryItem, b: &PantryItem) -> Ordering {
    // Undated rows sort last
    match (parse_date(&a.expiration_date), parse_date(&b.expiration_date)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by(field: PantrySortField, a: &PantryItem, b: &PantryItem) -> Ordering {
    match field {
        PantrySortField::Name => locale_cmp(&a.name, &b.name),
        PantrySortField::Expiration => compare_expiration(a, b),
        PantrySortField::Category => locale_cmp(&a.category, &b.category),
    }
}

/// Apply search, category, expiration window and sort, in that order.
pub fn filter_pantry(items: &[PantryItem], query: &PantryQuery, today: &str) -> Vec<PantryItem> {
    let needle = query.search_text.to_lowercase();

    let mut filtered: Vec<PantryItem> = items
        .iter()
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .filter(|item| query.category.matches(&item.category))
        .filter(|item| {
            query
                .expiration
                .contains(days_until_expiration(&item.expiration_date, today))
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let cmp = compare_by(query.sort_field, a, b);
        if query.sort_ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });

    filtered
}
