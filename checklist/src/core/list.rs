//! Pure operations over an item collection.
//!
//! Collections are newest-first: new items go to the front. Nothing here
//! touches storage; callers decide when to persist.

use super::types::{Item, ItemId, NewItem};

/// Prepend a new item built from validated input. Returns the new id.
pub fn prepend(items: &mut Vec<Item>, input: NewItem) -> ItemId {
    let item = input.into_item();
    let id = item.id.clone();
    items.insert(0, item);
    id
}

/// Flip `done` on the item with `id`. Returns the new value, or `None` if absent.
pub fn toggle(items: &mut [Item], id: &ItemId) -> Option<bool> {
    let item = items.iter_mut().find(|item| &item.id == id)?;
    item.done = !item.done;
    Some(item.done)
}

/// Remove the item with `id`, returning it if present.
pub fn remove(items: &mut Vec<Item>, id: &ItemId) -> Option<Item> {
    let idx = position(items, id)?;
    Some(items.remove(idx))
}

pub fn find<'a>(items: &'a [Item], id: &ItemId) -> Option<&'a Item> {
    items.iter().find(|item| &item.id == id)
}

pub fn position(items: &[Item], id: &ItemId) -> Option<usize> {
    items.iter().position(|item| &item.id == id)
}

/// Resolve a user-supplied reference to an item.
///
/// Tries an exact id first, then `#N` (1-based position in display order),
/// then an id prefix that matches exactly one item.
pub fn resolve<'a>(items: &'a [Item], reference: &str) -> Option<&'a Item> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if let Some(exact) = items.iter().find(|item| item.id.as_str() == reference) {
        return Some(exact);
    }
    if let Some(index) = reference.strip_prefix('#') {
        let index: usize = index.parse().ok()?;
        return index.checked_sub(1).and_then(|idx| items.get(idx));
    }
    let mut matches = items
        .iter()
        .filter(|item| item.id.as_str().starts_with(reference));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// Number of items not yet done.
pub fn remaining_count(items: &[Item]) -> usize {
    items.iter().filter(|item| !item.done).count()
}

pub fn total_count(items: &[Item]) -> usize {
    items.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{done_item, item};
    use std::collections::HashSet;

    fn add(items: &mut Vec<Item>, title: &str) -> ItemId {
        prepend(items, NewItem::parse(title, None).expect("valid title"))
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut items = Vec::new();
        let a = add(&mut items, "A");
        let b = add(&mut items, "B");
        let ids: Vec<&ItemId> = items.iter().map(|item| &item.id).collect();
        assert_eq!(ids, vec![&b, &a]);
    }

    #[test]
    fn prepend_generates_distinct_ids() {
        let mut items = Vec::new();
        for n in 0..200 {
            add(&mut items, &format!("item {n}"));
        }
        let unique: HashSet<&ItemId> = items.iter().map(|item| &item.id).collect();
        assert_eq!(unique.len(), items.len());
    }

    #[test]
    fn toggle_twice_restores_state_and_leaves_others_alone() {
        let mut items = vec![item("a", "A"), done_item("b", "B"), item("c", "C")];
        let before = items.clone();
        let id = ItemId::from("b");

        assert_eq!(toggle(&mut items, &id), Some(false));
        assert_eq!(items[0], before[0]);
        assert_eq!(items[2], before[2]);
        assert_eq!(toggle(&mut items, &id), Some(true));
        assert_eq!(items, before);
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let mut items = vec![item("a", "A")];
        let before = items.clone();
        assert_eq!(toggle(&mut items, &ItemId::from("zzz")), None);
        assert_eq!(items, before);
    }

    #[test]
    fn remove_takes_only_the_target() {
        let mut items = vec![item("a", "A"), item("b", "B"), item("c", "C")];
        let removed = remove(&mut items, &ItemId::from("b")).expect("present");
        assert_eq!(removed.title, "B");
        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(remove(&mut items, &ItemId::from("b")).is_none());
    }

    #[test]
    fn resolve_by_position_id_and_prefix() {
        let items = vec![item("abc1", "A"), item("abd2", "B"), item("x", "C")];
        assert_eq!(resolve(&items, "#2").map(|i| i.title.as_str()), Some("B"));
        assert_eq!(resolve(&items, "x").map(|i| i.title.as_str()), Some("C"));
        assert_eq!(resolve(&items, "abd").map(|i| i.title.as_str()), Some("B"));
        assert!(resolve(&items, "ab").is_none());
        assert!(resolve(&items, "#0").is_none());
        assert!(resolve(&items, "#4").is_none());
        assert!(resolve(&items, "#x").is_none());
        assert!(resolve(&items, "  ").is_none());
    }

    #[test]
    fn exact_id_wins_over_position() {
        let items = vec![item("x", "X"), item("#1", "Hash")];
        assert_eq!(resolve(&items, "#1").map(|i| i.title.as_str()), Some("Hash"));
        assert_eq!(resolve(&items, "#2").map(|i| i.title.as_str()), Some("Hash"));
    }

    #[test]
    fn counts_follow_done_flags() {
        let mut items = vec![item("a", "A"), done_item("b", "B"), item("c", "C")];
        assert_eq!(total_count(&items), 3);
        assert_eq!(remaining_count(&items), 2);
        toggle(&mut items, &ItemId::from("a"));
        assert_eq!(remaining_count(&items), 1);
        assert_eq!(remaining_count(&[]), 0);
    }
}
