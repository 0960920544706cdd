//! Catalog Query Engine
//!
//! Pure functions over the static catalog: filtered/sorted listing, ranked
//! autocomplete, category chips and the details payload. Nothing here touches
//! storage and nothing mutates the catalog.
//!
//! Filtering runs category first, then text. Text matching is a case-folded
//! substring test against `"{name} {category}"`. Autocomplete ranks prefix
//! matches on the name above infix matches, each group in catalog order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::interface::{CatalogItem, CatalogSortField, CategoryFilter, ItemDetails, QueryParameters};

/// Maximum autocomplete entries
pub const MAX_SUGGESTIONS: usize = 5;

/// Trim and case-fold user input. Empty means "no text filter".
pub(crate) fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Collation-style comparison: case-insensitive first, lowercase before
/// uppercase on ties, so "apple" < "Apple" < "banana".
pub(crate) fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn compare_by(field: CatalogSortField, a: &CatalogItem, b: &CatalogItem) -> Ordering {
    match field {
        CatalogSortField::Name => locale_cmp(&a.name, &b.name),
        CatalogSortField::Category => locale_cmp(&a.category, &b.category),
    }
}

fn matches_text(item: &CatalogItem, needle: &str) -> bool {
    format!("{} {}", item.name, item.category)
        .to_lowercase()
        .contains(needle)
}

/// Filtered, sorted view of `catalog`. Never fails; an empty result is valid.
pub fn query(catalog: &[CatalogItem], params: &QueryParameters) -> Vec<CatalogItem> {
    let needle = normalize_query(&params.search_text);

    let mut items: Vec<CatalogItem> = catalog
        .iter()
        .filter(|item| params.category.matches(&item.category))
        .filter(|item| needle.is_empty() || matches_text(item, &needle))
        .cloned()
        .collect();

    // sort_by is stable; flipping the comparator keeps equal items in catalog order
    items.sort_by(|a, b| {
        let cmp = compare_by(params.sort_field, a, b);
        if params.sort_ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });

    items
}

/// Up to [`MAX_SUGGESTIONS`] autocomplete entries: names starting with the
/// query, then names containing it elsewhere.
pub fn suggest(catalog: &[CatalogItem], search_text: &str) -> Vec<CatalogItem> {
    let needle = normalize_query(search_text);
    if needle.is_empty() {
        return Vec::new();
    }

    let (prefix, infix): (Vec<&CatalogItem>, Vec<&CatalogItem>) = catalog
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .partition(|item| item.name.to_lowercase().starts_with(&needle));

    prefix
        .into_iter()
        .chain(infix)
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Category chip labels: "All" followed by each distinct category, sorted.
pub fn categories(catalog: &[CatalogItem]) -> Vec<String> {
    let distinct: BTreeSet<&str> = catalog.iter().map(|item| item.category.as_str()).collect();

    std::iter::once(CategoryFilter::ALL_LABEL.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

/// Details screen payload for `item_id`, or `None` if it is not in the catalog.
pub fn details(catalog: &[CatalogItem], cart: &[String], item_id: &str) -> Option<ItemDetails> {
    let item = catalog.iter().find(|item| item.id == item_id)?;
    Some(ItemDetails {
        item: item.clone(),
        in_cart: cart.iter().any(|id| id == item_id),
        cart_count: cart.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, category: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    fn names(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    fn fixture() -> Vec<CatalogItem> {
        vec![
            item("1", "Milk", "Dairy"),
            item("2", "Bananas", "Produce"),
            item("3", "Apples", "Produce"),
            item("4", "Tomatoes", "Produce"),
            item("5", "Rhubarb", "Produce"),
            item("6", "Yogurt", "Dairy"),
        ]
    }

    fn params(text: &str, category: CategoryFilter, ascending: bool) -> QueryParameters {
        QueryParameters {
            search_text: text.to_string(),
            category,
            sort_field: CatalogSortField::Name,
            sort_ascending: ascending,
        }
    }

    #[test]
    fn test_sort_by_name_both_directions() {
        let catalog = vec![
            item("1", "Bananas", "Produce"),
            item("2", "Apples", "Produce"),
            item("3", "Tomatoes", "Produce"),
        ];
        let asc = query(&catalog, &params("", CategoryFilter::All, true));
        assert_eq!(names(&asc), vec!["Apples", "Bananas", "Tomatoes"]);

        let desc = query(&catalog, &params("", CategoryFilter::All, false));
        assert_eq!(names(&desc), vec!["Tomatoes", "Bananas", "Apples"]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let dairy = query(
            &fixture(),
            &params("", CategoryFilter::Named { category: "Dairy".into() }, true),
        );
        assert_eq!(names(&dairy), vec!["Milk", "Yogurt"]);
        assert!(dairy.iter().all(|i| i.category == "Dairy"));

        let lowercase = query(
            &fixture(),
            &params("", CategoryFilter::Named { category: "dairy".into() }, true),
        );
        assert!(lowercase.is_empty());
    }

    #[test]
    fn test_text_matches_name_or_category() {
        let by_category = query(&fixture(), &params("  DAIRY ", CategoryFilter::All, true));
        assert_eq!(names(&by_category), vec!["Milk", "Yogurt"]);

        // The haystack is "name category", so a query can span the separator
        let spanning = query(&fixture(), &params("milk dai", CategoryFilter::All, true));
        assert_eq!(names(&spanning), vec!["Milk"]);
    }

    #[test]
    fn test_category_and_text_combine() {
        let result = query(
            &fixture(),
            &params("a", CategoryFilter::Named { category: "Produce".into() }, true),
        );
        assert_eq!(names(&result), vec!["Apples", "Bananas", "Rhubarb", "Tomatoes"]);
    }

    #[test]
    fn test_query_never_mutates_or_duplicates() {
        let catalog = fixture();
        let before = catalog.clone();
        let result = query(&catalog, &QueryParameters::default());
        assert_eq!(catalog, before);
        assert_eq!(result.len(), catalog.len());
        for found in &result {
            assert_eq!(result.iter().filter(|i| i.id == found.id).count(), 1);
            assert!(catalog.contains(found));
        }
    }

    #[test]
    fn test_query_is_idempotent() {
        let p = params("o", CategoryFilter::All, false);
        let once = query(&fixture(), &p);
        let twice = query(&once, &p);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_by_category_is_stable() {
        let mut p = QueryParameters::default();
        p.sort_field = CatalogSortField::Category;
        let result = query(&fixture(), &p);
        assert_eq!(
            names(&result),
            vec!["Milk", "Yogurt", "Bananas", "Apples", "Tomatoes", "Rhubarb"]
        );

        p.sort_ascending = false;
        let result = query(&fixture(), &p);
        assert_eq!(
            names(&result),
            vec!["Bananas", "Apples", "Tomatoes", "Rhubarb", "Milk", "Yogurt"]
        );
    }

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("apple", "Apple"), Ordering::Less);
        assert_eq!(locale_cmp("Apple", "Apple"), Ordering::Equal);
    }

    #[test]
    fn test_suggest_ranks_prefix_before_infix() {
        let result = suggest(&fixture(), "ba");
        assert_eq!(names(&result), vec!["Bananas", "Rhubarb"]);
    }

    #[test]
    fn test_suggest_empty_query() {
        assert!(suggest(&fixture(), "").is_empty());
        assert!(suggest(&fixture(), "   ").is_empty());
    }

    #[test]
    fn test_suggest_matches_name_only_and_caps() {
        // Category text is not searched by autocomplete
        assert!(suggest(&fixture(), "dairy").is_empty());

        let many: Vec<CatalogItem> = (0..8)
            .map(|i| item(&i.to_string(), &format!("Item {}", i), "Misc"))
            .collect();
        assert_eq!(suggest(&many, "item").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_suggest_preserves_catalog_order_within_groups() {
        let catalog = vec![
            item("1", "Pear", "Produce"),
            item("2", "Grape", "Produce"),
            item("3", "Peach", "Produce"),
            item("4", "Spear Mint", "Produce"),
        ];
        let result = suggest(&catalog, "pe");
        assert_eq!(names(&result), vec!["Pear", "Peach", "Grape", "Spear Mint"]);
    }

    #[test]
    fn test_categories_sorted_with_all_first() {
        assert_eq!(categories(&fixture()), vec!["All", "Dairy", "Produce"]);
    }

    #[test]
    fn test_details_reports_cart_state() {
        let cart = vec!["2".to_string(), "6".to_string()];
        let banana = details(&fixture(), &cart, "2").unwrap();
        assert!(banana.in_cart);
        assert_eq!(banana.cart_count, 2);

        let milk = details(&fixture(), &cart, "1").unwrap();
        assert!(!milk.in_cart);

        assert!(details(&fixture(), &cart, "99").is_none());
    }
}
