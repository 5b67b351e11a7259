//! Persistence gateway: the whole collection under one storage key.
//!
//! Loading never fails from the caller's point of view. An absent key and a
//! malformed value both yield an empty collection; the malformed value is
//! logged and left in place. Saving overwrites the full collection and logs
//! failures instead of returning them.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::{debug, warn};

use super::kv::KeyValueStore;
use crate::core::invariants::{reassign_duplicate_ids, validate_invariants};
use crate::core::types::Item;

/// JSON Schema for the stored value.
pub const ITEMS_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/items.v1.schema.json"
));

/// Default storage key for the collection.
pub const DEFAULT_STORAGE_KEY: &str = "CHECKLIST_ITEMS_V1";

/// Load/save boundary between the list store and durable storage.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn KeyValueStore>,
    key: String,
    pretty: bool,
}

impl Gateway {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            pretty: false,
        }
    }

    /// Pretty-print stored JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored collection, treating absent or malformed data as empty.
    pub fn load(&self) -> Vec<Item> {
        match self.try_load() {
            Ok(Some(items)) => items,
            Ok(None) => {
                debug!(key = %self.key, "no stored collection, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(key = %self.key, err = %format!("{err:#}"), "load error, starting empty");
                Vec::new()
            }
        }
    }

    /// Load the stored collection. `Ok(None)` means nothing was stored yet.
    pub fn try_load(&self) -> Result<Option<Vec<Item>>> {
        let raw = self
            .store
            .get(&self.key)
            .with_context(|| format!("read key {}", self.key))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let items = decode(&raw).with_context(|| format!("decode key {}", self.key))?;
        debug!(key = %self.key, count = items.len(), "collection loaded");
        Ok(Some(items))
    }

    /// Overwrite the stored collection, logging any failure.
    ///
    /// Returns whether the write succeeded. Callers are not expected to act on
    /// a failure; the next successful save supersedes it.
    pub fn save(&self, items: &[Item]) -> bool {
        match self.try_save(items) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %self.key, err = %format!("{err:#}"), "save error, keeping in-memory state");
                false
            }
        }
    }

    pub fn try_save(&self, items: &[Item]) -> Result<()> {
        let payload = encode(items, self.pretty)?;
        self.store
            .set(&self.key, &payload)
            .with_context(|| format!("write key {}", self.key))?;
        debug!(key = %self.key, count = items.len(), "collection saved");
        Ok(())
    }
}

/// Serialize a collection to its stored JSON form.
pub fn encode(items: &[Item], pretty: bool) -> Result<String> {
    let payload = if pretty {
        let mut buf = serde_json::to_string_pretty(items)?;
        buf.push('\n');
        buf
    } else {
        serde_json::to_string(items)?
    };
    Ok(payload)
}

/// Parse and validate a stored value.
///
/// Only JSON and schema failures reject the value. Repeated ids are repaired
/// in memory and other invariant breaks are logged; every stored item loads.
pub fn decode(raw: &str) -> Result<Vec<Item>> {
    let value: Value = serde_json::from_str(raw).context("parse stored json")?;
    validate_schema(&value)?;
    let mut items: Vec<Item> = serde_json::from_value(value).context("deserialize items")?;
    for (old, new) in reassign_duplicate_ids(&mut items) {
        warn!(old = %old, new = %new, "duplicate stored id reassigned");
    }
    let errors = validate_invariants(&items);
    if !errors.is_empty() {
        warn!(errors = %errors.join("; "), "stored items loaded with invariant violations");
    }
    Ok(items)
}

fn validate_schema(value: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(ITEMS_SCHEMA).context("parse items schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    let messages = compiled
        .iter_errors(value)
        .map(|err| err.to_string())
        .collect::<Vec<_>>();
    if !messages.is_empty() {
        return Err(anyhow!(
            "items schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
