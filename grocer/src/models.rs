//! Persisted account shapes
//!
//! Not exposed via FFI. The directory serializes to the JSON object stored
//! under `demo_users_v1`: `{"<email>": {"password": "<secret>"}}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::interface::{CatalogItem, PantryItem};

// ─────────────────────────────────────────────────────────────────────────────
// ACCOUNTS
// ─────────────────────────────────────────────────────────────────────────────

/// Credential for one account. Stored in plaintext; demo only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub password: String,
}

/// Every known account, keyed by the exact (case-sensitive) email
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountDirectory {
    accounts: BTreeMap<String, AccountRecord>,
}

impl AccountDirectory {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    pub fn get(&self, email: &str) -> Option<&AccountRecord> {
        self.accounts.get(email)
    }

    /// Insert a new account. Returns false, leaving the directory untouched,
    /// when the email is already taken.
    pub fn insert(&mut self, email: &str, password: &str) -> bool {
        if self.contains(email) {
            return false;
        }
        self.accounts.insert(
            email.to_string(),
            AccountRecord { password: password.to_string() },
        );
        true
    }

    /// Exact email lookup plus exact password comparison
    pub fn verify(&self, email: &str, password: &str) -> bool {
        self.get(email).is_some_and(|record| record.password == password)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BUNDLED DATA
// ─────────────────────────────────────────────────────────────────────────────

impl From<&demo_data::CatalogRow> for CatalogItem {
    fn from(row: &demo_data::CatalogRow) -> Self {
        CatalogItem {
            id: row.id.clone(),
            name: row.name.clone(),
            category: row.category.clone(),
        }
    }
}

impl From<&demo_data::PantryRow> for PantryItem {
    fn from(row: &demo_data::PantryRow) -> Self {
        PantryItem {
            id: row.id.clone(),
            name: row.name.clone(),
            category: row.category.clone(),
            expiration_date: row.expiration_date.clone(),
            quantity: row.quantity,
        }
    }
}
