//! I/O helpers: key-value storage, the persistence gateway, and config.

mod atomic;
pub mod config;
pub mod gateway;
pub mod init;
pub mod kv;
