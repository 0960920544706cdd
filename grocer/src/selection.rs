//! Transient screen state: the recent-searches list and the shopping list.
//!
//! Both are pure transitions. The caller keeps the returned value as the new state.

/// Recent searches kept, most recent first
pub const MAX_RECENT_SEARCHES: usize = 6;

/// Record a submitted search. Blank input leaves the list unchanged; an existing
/// entry moves to the front instead of being duplicated.
pub fn push_recent(list: &[String], text: &str) -> Vec<String> {
    let entry = text.trim();
    if entry.is_empty() {
        return list.to_vec();
    }

    std::iter::once(entry.to_string())
        .chain(list.iter().filter(|existing| existing.as_str() != entry).cloned())
        .take(MAX_RECENT_SEARCHES)
        .collect()
}

/// Add `item_id` to the cart if absent, remove it if present.
/// New ids go to the end so the list keeps insertion order.
pub fn toggle_membership(cart: &[String], item_id: &str) -> Vec<String> {
    if cart.iter().any(|id| id == item_id) {
        cart.iter().filter(|id| id.as_str() != item_id).cloned().collect()
    } else {
        let mut next = cart.to_vec();
        next.push(item_id.to_string());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_push_recent_repromotes_existing() {
        assert_eq!(push_recent(&strings(&["milk"]), "milk"), strings(&["milk"]));
        assert_eq!(
            push_recent(&strings(&["eggs", "milk", "rice"]), "milk"),
            strings(&["milk", "eggs", "rice"])
        );
    }

    #[test]
    fn test_push_recent_drops_oldest_past_cap() {
        let full = strings(&["a", "b", "c", "d", "e", "f"]);
        let next = push_recent(&full, "new");
        assert_eq!(next, strings(&["new", "a", "b", "c", "d", "e"]));
    }

    #[test]
    fn test_push_recent_ignores_blank_and_trims() {
        let list = strings(&["milk"]);
        assert_eq!(push_recent(&list, "   "), list);
        assert_eq!(push_recent(&list, ""), list);
        assert_eq!(push_recent(&list, "  eggs "), strings(&["eggs", "milk"]));
        assert_eq!(push_recent(&list, " milk\t"), strings(&["milk"]));
    }

    #[test]
    fn test_push_recent_is_case_sensitive() {
        assert_eq!(push_recent(&strings(&["milk"]), "Milk"), strings(&["Milk", "milk"]));
    }

    #[test]
    fn test_toggle_membership_adds_then_removes() {
        let added = toggle_membership(&[], "5");
        assert_eq!(added, strings(&["5"]));
        let removed = toggle_membership(&added, "5");
        assert!(removed.is_empty());
    }

    #[test]
    fn test_toggle_membership_keeps_other_ids() {
        let cart = strings(&["1", "5", "9"]);
        assert_eq!(toggle_membership(&cart, "5"), strings(&["1", "9"]));
        assert_eq!(toggle_membership(&cart, "2"), strings(&["1", "5", "9", "2"]));
    }
}
