//! Collection invariants not expressible via JSON Schema.

use std::collections::HashSet;

use super::types::{Item, ItemId};

/// Check collection invariants:
/// - No duplicate ids
/// - No empty ids
/// - No blank titles
pub fn validate_invariants(items: &[Item]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (idx, item) in items.iter().enumerate() {
        if item.id.as_str().is_empty() {
            errors.push(format!("item {}: empty id", idx));
        } else if !seen.insert(&item.id) {
            errors.push(format!("item {}: duplicate id '{}'", idx, item.id));
        }
        if item.title.trim().is_empty() {
            errors.push(format!("item {}: blank title", idx));
        }
    }
    errors
}

/// Give every repeated id after its first occurrence a fresh id.
///
/// Older data used millisecond timestamps as ids, so two items added in the
/// same millisecond share one. Returns the `(old, new)` pairs that changed.
pub fn reassign_duplicate_ids(items: &mut [Item]) -> Vec<(ItemId, ItemId)> {
    let mut seen = HashSet::new();
    let mut reassigned = Vec::new();
    for item in items.iter_mut() {
        if seen.insert(item.id.clone()) {
            continue;
        }
        let fresh = ItemId::generate();
        seen.insert(fresh.clone());
        let old = std::mem::replace(&mut item.id, fresh.clone());
        reassigned.push((old, fresh));
    }
    reassigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{done_item, item};

    #[test]
    fn valid_collection_has_no_errors() {
        let items = vec![item("a", "A"), item("b", "B")];
        assert!(validate_invariants(&items).is_empty());
    }

    #[test]
    fn reports_duplicate_ids_and_blank_titles() {
        let items = vec![item("dup", "A"), item("dup", "B"), item("c", "  ")];
        let errors = validate_invariants(&items);
        assert!(errors.iter().any(|err| err.contains("duplicate id 'dup'")));
        assert!(errors.iter().any(|err| err.contains("blank title")));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn duplicate_ids_after_the_first_get_fresh_ids() {
        let mut items = vec![
            done_item("1700000000000", "Towel"),
            item("1700000000000", "Cups"),
            item("1699", "Lamp"),
        ];
        let reassigned = reassign_duplicate_ids(&mut items);

        assert_eq!(reassigned.len(), 1);
        assert_eq!(reassigned[0].0.as_str(), "1700000000000");
        assert_eq!(items[0].id.as_str(), "1700000000000");
        assert_eq!(items[1].id, reassigned[0].1);
        assert_eq!(items[1].title, "Cups");
        assert_eq!(items[2].id.as_str(), "1699");
        assert!(validate_invariants(&items).is_empty());
    }

    #[test]
    fn unique_ids_are_left_alone() {
        let mut items = vec![item("a", "A"), item("b", "B")];
        assert!(reassign_duplicate_ids(&mut items).is_empty());
        assert_eq!(items, vec![item("a", "A"), item("b", "B")]);
    }
}
