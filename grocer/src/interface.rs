//! Grocer FFI Interface Definition
//!
//! This file defines the public interface exposed to the mobile shells via UniFFI.
//! It acts as the source of truth for shared types.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Category chip selection. `All` is the sentinel chip shown first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum CategoryFilter {
    #[default]
    All,
    Named { category: String },
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "All";

    /// Build a filter from a chip label. The label "All" maps to the sentinel.
    pub fn from_label(label: &str) -> Self {
        if label == Self::ALL_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Named { category: label.to_string() }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => Self::ALL_LABEL,
            CategoryFilter::Named { category } => category,
        }
    }

    /// Exact, case-sensitive category match
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named { category: wanted } => wanted == category,
        }
    }
}

/// Sort key for the search screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum CatalogSortField {
    Name,
    Category,
}

/// Sort key for the pantry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum PantrySortField {
    Name,
    Expiration,
    Category,
}

/// Expiration window chips on the pantry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum ExpirationWindow {
    All,
    /// 0..=3 days left
    Soon,
    /// 0..=7 days left
    Week,
    /// 0..=30 days left
    Month,
    Expired,
}

/// Badge state for a pantry row
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ExpirationStatus {
    Expired { days_ago: u32 },
    ExpiringSoon { days_left: u32 },
    Fresh { days_left: u32 },
    /// The stored date could not be parsed
    Unknown,
}

/// Session lifecycle as seen by the login screen
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum SessionState {
    /// Startup, before `restore_session` has run
    Unknown,
    SignedOut,
    SignedIn { email: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// One purchasable catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub category: String,
}

/// Search screen query, rebuilt on every interaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct QueryParameters {
    pub search_text: String,
    pub category: CategoryFilter,
    pub sort_field: CatalogSortField,
    pub sort_ascending: bool,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: CategoryFilter::All,
            sort_field: CatalogSortField::Name,
            sort_ascending: true,
        }
    }
}

/// Everything the search screen renders for one set of parameters
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct CatalogView {
    pub items: Vec<CatalogItem>,
    pub suggestions: Vec<CatalogItem>,
    /// Size of the unfiltered catalog ("Showing N / total")
    pub total_count: u64,
}

/// Details screen payload
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct ItemDetails {
    pub item: CatalogItem,
    pub in_cart: bool,
    pub cart_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    /// ISO `YYYY-MM-DD`
    pub expiration_date: String,
    pub quantity: u32,
}

/// Pantry screen filter state
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PantryQuery {
    pub search_text: String,
    pub category: CategoryFilter,
    pub expiration: ExpirationWindow,
    pub sort_field: PantrySortField,
    pub sort_ascending: bool,
}

impl Default for PantryQuery {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: CategoryFilter::All,
            expiration: ExpirationWindow::All,
            sort_field: PantrySortField::Name,
            sort_ascending: true,
        }
    }
}

/// An authenticated account identifier
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct Session {
    pub email: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Error raised by a key-value backend
#[derive(Debug, Error, uniffi::Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Unexpected storage callback error: {0}")]
    Unexpected(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        StorageError::Unexpected(e.reason)
    }
}

/// User-facing failures of the login flow
#[derive(Debug, Error, PartialEq, Eq, uniffi::Error)]
pub enum AccountError {
    #[error("Please enter email and password")]
    MissingFields,
    #[error("An account with this email already exists")]
    DuplicateAccount,
    #[error("Email or password is incorrect")]
    InvalidCredentials,
    #[error("Could not save account data: {0}")]
    StorageWriteFailure(String),
}

impl From<StorageError> for AccountError {
    fn from(e: StorageError) -> Self {
        AccountError::StorageWriteFailure(e.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Persistent key-value namespace backing the account store.
///
/// Implemented in Rust (`MemoryKeyValueStore`, `SqliteKeyValueStore`) or by the
/// host app on top of its platform storage. Each call is atomic for its own
/// key; there is no cross-key transaction.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value for `key`, or `None` when absent
    async fn get(&self, key: String) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite `key`
    async fn set(&self, key: String, value: String) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    async fn remove(&self, key: String) -> Result<(), StorageError>;
}

impl From<crate::storage::DatabaseError> for StorageError {
    fn from(e: crate::storage::DatabaseError) -> Self {
        StorageError::Backend(e.to_string())
    }
}
