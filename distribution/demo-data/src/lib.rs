//! Bundled demo data for the grocery screens.
//!
//! Both tables ship as CSV inside the binary and are parsed once on first
//! access. Rows that fail to parse are skipped.

use once_cell::sync::Lazy;

const CATALOG_CSV: &str = include_str!("../data/catalog.csv");
const PANTRY_CSV: &str = include_str!("../data/pantry.csv");

/// Date the pantry sample was authored against. Expiration windows in the
/// sample only make sense relative to this day.
pub const PANTRY_REFERENCE_DATE: &str = "2026-01-14";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryRow {
    pub id: String,
    pub name: String,
    pub category: String,
    /// ISO `YYYY-MM-DD`
    pub expiration_date: String,
    pub quantity: u32,
}

static CATALOG: Lazy<Vec<CatalogRow>> = Lazy::new(|| {
    records(CATALOG_CSV)
        .filter_map(|record| {
            Some(CatalogRow {
                id: record.get(0)?.to_string(),
                name: record.get(1)?.to_string(),
                category: record.get(2)?.to_string(),
            })
        })
        .collect()
});

static PANTRY: Lazy<Vec<PantryRow>> = Lazy::new(|| {
    records(PANTRY_CSV)
        .filter_map(|record| {
            Some(PantryRow {
                id: record.get(0)?.to_string(),
                name: record.get(1)?.to_string(),
                category: record.get(2)?.to_string(),
                expiration_date: record.get(3)?.to_string(),
                quantity: record.get(4)?.parse().ok()?,
            })
        })
        .collect()
});

fn records(source: &'static str) -> impl Iterator<Item = csv::StringRecord> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source.as_bytes())
        .into_records()
        .filter_map(Result::ok)
}

/// The grocery catalog shown on the search screen, in display order.
pub fn catalog() -> &'static [CatalogRow] {
    &CATALOG
}

/// Sample pantry contents for the filter screen.
pub fn pantry() -> &'static [PantryRow] {
    &PANTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads_every_row() {
        assert_eq!(catalog().len(), 15);
        assert_eq!(catalog()[0].name, "Milk");
        assert_eq!(catalog()[14].category, "Meat");
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<&str> = catalog().iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_pantry_parses_quantities() {
        assert_eq!(pantry().len(), 7);
        let apples = pantry().iter().find(|r| r.name == "Apples").unwrap();
        assert_eq!(apples.quantity, 5);
        assert_eq!(apples.expiration_date, "2026-01-25");
    }
}
