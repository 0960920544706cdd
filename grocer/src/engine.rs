//! CatalogEngine - FFI entry point for the search and pantry screens
//!
//! Owns the static catalog and memoizes the most recent query and
//! autocomplete input, so re-rendering with unchanged parameters (every
//! keystroke re-renders the whole screen) skips the filter/sort pass.
//!
//! The free functions below expose the pure transitions that operate on
//! caller-held state (recent searches, cart, pantry filters).

use parking_lot::Mutex;
use std::sync::Arc;

use crate::catalog;
use crate::interface::{
    CatalogItem, CatalogView, CategoryFilter, ExpirationStatus, ExpirationWindow, ItemDetails,
    PantryItem, PantryQuery, PantrySortField, QueryParameters,
};
use crate::pantry;
use crate::selection;

/// Single-entry memo keyed on the exact input
struct Memo<K, V> {
    slot: Mutex<Option<(K, V)>>,
}

impl<K: PartialEq + Clone, V: Clone> Memo<K, V> {
    fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    fn get_or_compute(&self, key: &K, compute: impl FnOnce() -> V) -> V {
        let mut slot = self.slot.lock();
        if let Some((cached_key, value)) = slot.as_ref() {
            if cached_key == key {
                return value.clone();
            }
        }
        let value = compute();
        *slot = Some((key.clone(), value.clone()));
        value
    }
}

/// Catalog plus memoized query results
#[derive(uniffi::Object)]
pub struct CatalogEngine {
    catalog: Arc<Vec<CatalogItem>>,
    last_query: Memo<QueryParameters, Arc<Vec<CatalogItem>>>,
    last_suggest: Memo<String, Arc<Vec<CatalogItem>>>,
}

// Internal implementation (not exported via FFI)
impl CatalogEngine {
    pub fn items(&self) -> &[CatalogItem] {
        &self.catalog
    }

    fn query_shared(&self, params: &QueryParameters) -> Arc<Vec<CatalogItem>> {
        self.last_query
            .get_or_compute(params, || Arc::new(catalog::query(&self.catalog, params)))
    }

    fn suggest_shared(&self, search_text: &str) -> Arc<Vec<CatalogItem>> {
        self.last_suggest.get_or_compute(&search_text.to_string(), || {
            Arc::new(catalog::suggest(&self.catalog, search_text))
        })
    }
}

#[uniffi::export]
impl CatalogEngine {
    /// Engine over a caller-supplied catalog, kept in the given order
    #[uniffi::constructor]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            catalog: Arc::new(items),
            last_query: Memo::new(),
            last_suggest: Memo::new(),
        }
    }

    /// Engine over the bundled demo catalog
    #[uniffi::constructor]
    pub fn bundled() -> Self {
        Self::new(demo_data::catalog().iter().map(CatalogItem::from).collect())
    }

    pub fn total_count(&self) -> u64 {
        self.catalog.len() as u64
    }

    pub fn query(&self, params: QueryParameters) -> Vec<CatalogItem> {
        self.query_shared(&params).as_ref().clone()
    }

    pub fn suggest(&self, search_text: String) -> Vec<CatalogItem> {
        self.suggest_shared(&search_text).as_ref().clone()
    }

    /// Listing, suggestions and counts for one render of the search screen
    pub fn view(&self, params: QueryParameters) -> CatalogView {
        let suggestions = self.suggest(params.search_text.clone());
        CatalogView {
            items: self.query(params),
            suggestions,
            total_count: self.total_count(),
        }
    }

    pub fn categories(&self) -> Vec<String> {
        catalog::categories(&self.catalog)
    }

    pub fn details(&self, cart: Vec<String>, item_id: String) -> Option<ItemDetails> {
        catalog::details(&self.catalog, &cart, &item_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Caller-held state transitions
// ─────────────────────────────────────────────────────────────────────────────

/// See [`selection::push_recent`]
#[uniffi::export]
pub fn push_recent(recent: Vec<String>, text: String) -> Vec<String> {
    selection::push_recent(&recent, &text)
}

/// See [`selection::toggle_membership`]
#[uniffi::export]
pub fn toggle_membership(cart: Vec<String>, item_id: String) -> Vec<String> {
    selection::toggle_membership(&cart, &item_id)
}

/// Filter for a tapped chip label; "All" maps to the sentinel
#[uniffi::export]
pub fn category_filter_from_label(label: String) -> CategoryFilter {
    CategoryFilter::from_label(&label)
}

#[uniffi::export]
pub fn category_filter_label(filter: CategoryFilter) -> String {
    filter.label().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Pantry screen
// ─────────────────────────────────────────────────────────────────────────────

#[uniffi::export]
pub fn bundled_pantry_items() -> Vec<PantryItem> {
    demo_data::pantry().iter().map(PantryItem::from).collect()
}

/// Today's date (UTC) in the `YYYY-MM-DD` form the pantry functions take
#[uniffi::export]
pub fn today_iso() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[uniffi::export]
pub fn filter_pantry(items: Vec<PantryItem>, query: PantryQuery, today: String) -> Vec<PantryItem> {
    pantry::filter_pantry(&items, &query, &today)
}

#[uniffi::export]
pub fn pantry_active_filter_count(query: PantryQuery) -> u32 {
    query.active_filter_count()
}

#[uniffi::export]
pub fn pantry_expiration_status(item: PantryItem, today: String) -> ExpirationStatus {
    pantry::expiration_status(&item, &today)
}

#[uniffi::export]
pub fn pantry_categories() -> Vec<String> {
    pantry::PANTRY_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Expiration chips in display order
#[uniffi::export]
pub fn expiration_windows() -> Vec<ExpirationWindow> {
    ExpirationWindow::ordered().to_vec()
}

#[uniffi::export]
pub fn expiration_window_label(window: ExpirationWindow) -> String {
    window.label().to_string()
}

/// Field selected after tapping the sort button once more
#[uniffi::export]
pub fn pantry_next_sort_field(field: PantrySortField) -> PantrySortField {
    field.next()
}

/// Query state after "Clear filters"
#[uniffi::export]
pub fn pantry_cleared_query() -> PantryQuery {
    PantryQuery::cleared()
}
