//! Persistence policies: when the collection is written.
//!
//! The list store reports every state transition to a policy and never talks
//! to storage directly. Policies differ only in timing; each one guarantees
//! that the latest snapshot it has seen is written by the time `flush`
//! returns.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::Item;
use crate::io::gateway::Gateway;

/// Receives collection snapshots from the list store.
pub trait PersistPolicy {
    /// Called after every observed state transition with the full collection.
    fn on_change(&mut self, items: &[Item]);

    /// Make every snapshot seen so far durable before returning.
    fn flush(&mut self);
}

/// Which policy to build from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Write synchronously on every change.
    Auto,
    /// Hand snapshots to a single background writer.
    #[default]
    Queued,
    /// Write only on flush.
    Manual,
}

pub fn build_policy(mode: PersistMode, gateway: Gateway) -> Box<dyn PersistPolicy> {
    match mode {
        PersistMode::Auto => Box::new(AutoSave::new(gateway)),
        PersistMode::Queued => Box::new(WriterQueue::spawn(gateway)),
        PersistMode::Manual => Box::new(Manual::new(gateway)),
    }
}

/// Saves the full collection on every change.
///
/// The write happens inside `on_change`, so the caller waits on storage.
/// Use [`WriterQueue`] where mutations must not block.
pub struct AutoSave {
    gateway: Gateway,
}

impl AutoSave {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

impl PersistPolicy for AutoSave {
    fn on_change(&mut self, items: &[Item]) {
        self.gateway.save(items);
    }

    fn flush(&mut self) {}
}

/// Keeps the latest snapshot and writes it on flush.
pub struct Manual {
    gateway: Gateway,
    pending: Option<Vec<Item>>,
}

impl Manual {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            pending: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }
}

impl PersistPolicy for Manual {
    fn on_change(&mut self, items: &[Item]) {
        self.pending = Some(items.to_vec());
    }

    fn flush(&mut self) {
        if let Some(items) = self.pending.take() {
            self.gateway.save(&items);
        }
    }
}

enum Message {
    Snapshot(Vec<Item>),
    Flush(Sender<()>),
}

/// Single background writer fed through a channel.
///
/// `on_change` never blocks on storage. Snapshots are written in the order
/// they were issued; a backlog collapses to its newest snapshot. Dropping the
/// queue drains it and joins the writer.
pub struct WriterQueue {
    tx: Option<Sender<Message>>,
    handle: Option<JoinHandle<()>>,
}

impl WriterQueue {
    pub fn spawn(gateway: Gateway) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || run_writer(&gateway, &rx));
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }
}

fn run_writer(gateway: &Gateway, rx: &Receiver<Message>) {
    while let Ok(message) = rx.recv() {
        let mut latest = None;
        let mut acks = Vec::new();
        let mut next = Some(message);
        while let Some(message) = next {
            match message {
                Message::Snapshot(items) => latest = Some(items),
                Message::Flush(ack) => acks.push(ack),
            }
            next = rx.try_recv().ok();
        }
        if let Some(items) = latest {
            gateway.save(&items);
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }
    debug!("writer queue closed");
}

impl PersistPolicy for WriterQueue {
    fn on_change(&mut self, items: &[Item]) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(Message::Snapshot(items.to_vec())).is_err() {
            warn!("writer thread gone, snapshot dropped");
        }
    }

    fn flush(&mut self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(Message::Flush(ack_tx)).is_err() || ack_rx.recv().is_err() {
            warn!("writer thread gone, flush skipped");
        }
    }
}

impl Drop for WriterQueue {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("writer thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::io::gateway::{DEFAULT_STORAGE_KEY, decode};
    use crate::test_support::{FlakyStore, item};

    fn gateway(store: &Arc<FlakyStore>) -> Gateway {
        Gateway::new(store.clone(), DEFAULT_STORAGE_KEY)
    }

    fn stored(store: &FlakyStore) -> Vec<Item> {
        let raw = store.writes().last().cloned().expect("at least one write");
        decode(&raw).expect("decode")
    }

    #[test]
    fn auto_save_writes_every_change() {
        let store = Arc::new(FlakyStore::new());
        let mut policy = AutoSave::new(gateway(&store));
        policy.on_change(&[item("a", "A")]);
        policy.on_change(&[]);
        assert_eq!(store.writes().len(), 2);
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn auto_save_survives_write_failures() {
        let store = Arc::new(FlakyStore::new());
        let mut policy = AutoSave::new(gateway(&store));
        store.fail_writes(true);
        policy.on_change(&[item("a", "A")]);
        assert!(store.writes().is_empty());
        store.fail_writes(false);
        policy.on_change(&[item("a", "A"), item("b", "B")]);
        assert_eq!(stored(&store).len(), 2);
    }

    #[test]
    fn manual_writes_latest_snapshot_on_flush_only() {
        let store = Arc::new(FlakyStore::new());
        let mut policy = Manual::new(gateway(&store));
        policy.on_change(&[item("a", "A")]);
        policy.on_change(&[item("b", "B")]);
        assert!(policy.is_dirty());
        assert!(store.writes().is_empty());

        policy.flush();
        assert!(!policy.is_dirty());
        assert_eq!(store.writes().len(), 1);
        assert_eq!(stored(&store), vec![item("b", "B")]);

        policy.flush();
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn writer_queue_ends_on_the_last_snapshot() {
        let store = Arc::new(FlakyStore::new());
        let mut policy = WriterQueue::spawn(gateway(&store));
        let mut items = Vec::new();
        for n in 0..50 {
            items.insert(0, item(&n.to_string(), &format!("item {n}")));
            policy.on_change(&items);
        }
        policy.flush();
        assert_eq!(stored(&store), items);
        assert!(store.writes().len() <= 50);
    }

    #[test]
    fn writer_queue_does_not_wait_on_storage() {
        let store = Arc::new(FlakyStore::new());
        let mut policy = WriterQueue::spawn(gateway(&store));
        let gate = store.hold_writes();
        policy.on_change(&[item("a", "A")]);
        policy.on_change(&[item("b", "B")]);
        assert!(store.writes().is_empty());
        drop(gate);
        policy.flush();
        assert_eq!(stored(&store), vec![item("b", "B")]);
    }

    #[test]
    fn writer_queue_drains_on_drop() {
        let store = Arc::new(FlakyStore::new());
        {
            let mut policy = WriterQueue::spawn(gateway(&store));
            policy.on_change(&[item("a", "A")]);
        }
        assert_eq!(stored(&store), vec![item("a", "A")]);
    }

    #[test]
    fn mode_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: PersistMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"queued\"").expect("parse");
        assert_eq!(parsed.mode, PersistMode::Queued);
        assert_eq!(PersistMode::default(), PersistMode::Queued);
    }
}
