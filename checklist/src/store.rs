//! List store: the in-memory owner of the collection.
//!
//! Every mutation updates the collection synchronously and then reports the
//! new state to the injected [`PersistPolicy`]. The store never reads or
//! writes storage itself apart from the single load in [`ListStore::open`].

use tracing::{debug, warn};

use crate::confirm::{Confirm, Decision, Prompt};
use crate::core::list;
use crate::core::types::{Item, ItemId, NewItem};
use crate::io::gateway::Gateway;
use crate::persist::PersistPolicy;

/// Result of a remove request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Item),
    Cancelled,
    /// No item with that id; no prompt was shown.
    NotFound,
}

/// Result of a clear request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Number of items removed.
    Cleared(usize),
    Cancelled,
    /// Nothing to clear; no prompt was shown.
    AlreadyEmpty,
}

pub struct ListStore {
    items: Vec<Item>,
    policy: Box<dyn PersistPolicy>,
}

impl ListStore {
    /// Seed the store from storage.
    ///
    /// A successfully loaded collection counts as a state transition and is
    /// reported to the policy. An absent or malformed value starts empty and
    /// is not reported, so a malformed value stays in storage untouched.
    pub fn open(gateway: &Gateway, policy: Box<dyn PersistPolicy>) -> Self {
        match gateway.try_load() {
            Ok(Some(items)) => Self::with_items(items, policy),
            Ok(None) => Self::empty(policy),
            Err(err) => {
                warn!(key = %gateway.key(), err = %format!("{err:#}"), "load error, starting empty");
                Self::empty(policy)
            }
        }
    }

    /// Start from an empty collection without reporting it.
    pub fn empty(policy: Box<dyn PersistPolicy>) -> Self {
        Self {
            items: Vec::new(),
            policy,
        }
    }

    /// Start from `items`, reporting them as the initial state.
    pub fn with_items(items: Vec<Item>, policy: Box<dyn PersistPolicy>) -> Self {
        let mut store = Self { items, policy };
        store.changed();
        store
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        list::find(&self.items, id)
    }

    /// Look up an item by `#N`, full id, or unique id prefix.
    pub fn resolve(&self, reference: &str) -> Option<&Item> {
        list::resolve(&self.items, reference)
    }

    pub fn total_count(&self) -> usize {
        list::total_count(&self.items)
    }

    pub fn remaining_count(&self) -> usize {
        list::remaining_count(&self.items)
    }

    /// Prepend a new item. Blank titles are ignored and return `None`.
    pub fn add(&mut self, title: &str, category: Option<&str>) -> Option<ItemId> {
        let Some(input) = NewItem::parse(title, category) else {
            debug!("blank title ignored");
            return None;
        };
        let id = list::prepend(&mut self.items, input);
        debug!(id = %id, "item added");
        self.changed();
        Some(id)
    }

    /// Flip `done` on the item with `id`. Returns the new value if found.
    ///
    /// The collection is reported to the policy even when `id` is unknown.
    pub fn toggle(&mut self, id: &ItemId) -> Option<bool> {
        let done = list::toggle(&mut self.items, id);
        debug!(id = %id, done = ?done, "item toggled");
        self.changed();
        done
    }

    /// Remove the item with `id` after confirmation.
    pub fn remove(&mut self, id: &ItemId, confirm: &mut dyn Confirm) -> RemoveOutcome {
        let Some(target) = self.find(id) else {
            return RemoveOutcome::NotFound;
        };
        let prompt = Prompt::remove_item(&target.title);
        if confirm.confirm(&prompt) == Decision::Cancel {
            debug!(id = %id, "remove cancelled");
            return RemoveOutcome::Cancelled;
        }
        match list::remove(&mut self.items, id) {
            Some(removed) => {
                debug!(id = %id, "item removed");
                self.changed();
                RemoveOutcome::Removed(removed)
            }
            None => RemoveOutcome::NotFound,
        }
    }

    /// Empty the collection after confirmation.
    pub fn clear_all(&mut self, confirm: &mut dyn Confirm) -> ClearOutcome {
        if self.items.is_empty() {
            return ClearOutcome::AlreadyEmpty;
        }
        if confirm.confirm(&Prompt::clear_all()) == Decision::Cancel {
            debug!("clear cancelled");
            return ClearOutcome::Cancelled;
        }
        let removed = self.items.len();
        self.items.clear();
        debug!(removed, "collection cleared");
        self.changed();
        ClearOutcome::Cleared(removed)
    }

    /// Ask the policy to make all reported changes durable.
    pub fn flush(&mut self) {
        self.policy.flush();
    }

    fn changed(&mut self) {
        self.policy.on_change(&self.items);
    }
}

impl Drop for ListStore {
    fn drop(&mut self) {
        self.policy.flush();
    }
}
