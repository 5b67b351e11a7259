//! Personal checklist with durable local storage.
//!
//! The crate keeps a strict split between:
//!
//! - **[`core`]**: Pure item and collection logic. No I/O.
//! - **[`io`]**: Key-value storage, the persistence gateway, and config.
//!
//! [`store::ListStore`] owns the in-memory collection and reports each change
//! to an injected [`persist::PersistPolicy`], which decides when the gateway
//! writes. Destructive operations go through a [`confirm::Confirm`] gate.

pub mod confirm;
pub mod core;
pub mod io;
pub mod logging;
pub mod persist;
pub mod render;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
