//! Test-only helpers: item builders, a failure-injecting store, a scripted
//! confirmer, and a policy that records snapshots.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, bail};

use crate::confirm::{Confirm, Decision, Prompt};
use crate::core::types::{Item, ItemId};
use crate::io::gateway::{DEFAULT_STORAGE_KEY, Gateway};
use crate::io::init::ChecklistPaths;
use crate::io::kv::{FileStore, KeyValueStore};
use crate::persist::PersistPolicy;

/// Uncategorized, not-done item with a fixed id.
pub fn item(id: &str, title: &str) -> Item {
    Item {
        id: ItemId::from(id),
        title: title.to_string(),
        category: None,
        done: false,
    }
}

pub fn done_item(id: &str, title: &str) -> Item {
    Item {
        done: true,
        ..item(id, title)
    }
}

pub fn item_in(id: &str, title: &str, category: &str) -> Item {
    Item {
        category: Some(category.to_string()),
        ..item(id, title)
    }
}

/// Write `items` where the CLI will find them under `root` with default config.
pub fn seed_root(root: &Path, items: &[Item]) -> Result<()> {
    let paths = ChecklistPaths::new(root);
    let store = Arc::new(FileStore::new(paths.default_store_dir()));
    Gateway::new(store, DEFAULT_STORAGE_KEY)
        .with_pretty(true)
        .try_save(items)
}

/// Fresh temp root already holding `items`.
pub fn seeded_tempdir(items: &[Item]) -> Result<tempfile::TempDir> {
    let temp = tempfile::tempdir()?;
    seed_root(temp.path(), items)?;
    Ok(temp)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory store with switchable read/write failures, a write gate, and a
/// write log.
#[derive(Debug, Default)]
pub struct FlakyStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<String>>,
    write_gate: Mutex<()>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Block every write until the returned guard is dropped.
    pub fn hold_writes(&self) -> MutexGuard<'_, ()> {
        lock(&self.write_gate)
    }

    /// Values of every successful write, oldest first.
    pub fn writes(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("injected read failure");
        }
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _gate = lock(&self.write_gate);
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("injected write failure");
        }
        lock(&self.values).insert(key.to_string(), value.to_string());
        lock(&self.writes).push(value.to_string());
        Ok(())
    }
}

/// Answers prompts from a fixed script and records what was asked.
///
/// Panics if asked more often than scripted.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    decisions: VecDeque<Decision>,
    prompts: Vec<Prompt>,
}

impl ScriptedConfirm {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &Prompt) -> Decision {
        self.prompts.push(prompt.clone());
        self.decisions
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {}", prompt.title))
    }
}

/// Records every snapshot the store reports. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPolicy {
    snapshots: Arc<Mutex<Vec<Vec<Item>>>>,
    flushes: Arc<Mutex<usize>>,
}

impl RecordingPolicy {
    pub fn snapshots(&self) -> Vec<Vec<Item>> {
        lock(&self.snapshots).clone()
    }

    pub fn flushes(&self) -> usize {
        *lock(&self.flushes)
    }

    pub fn reset(&self) {
        lock(&self.snapshots).clear();
        *lock(&self.flushes) = 0;
    }
}

impl PersistPolicy for RecordingPolicy {
    fn on_change(&mut self, items: &[Item]) {
        lock(&self.snapshots).push(items.to_vec());
    }

    fn flush(&mut self) {
        *lock(&self.flushes) += 1;
    }
}
