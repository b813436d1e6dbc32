//! # SchemaDB KV
//!
//! Transactional ordered key-value engine contract for SchemaDB.
//!
//! This crate defines the storage contract the mapping layer consumes.
//! Engines are **opaque ordered byte stores** grouped into namespaces.
//! They provide ACID transactions, byte-ordered forward cursors, and a
//! monotonic sequence per namespace. SchemaDB owns all record
//! interpretation - engines never see schemas or wire documents.
//!
//! ## Contract
//!
//! - Read-write transactions are exclusive (single writer); a failed or
//!   dropped write transaction leaves the store unchanged
//! - Read-only transactions see a consistent snapshot
//! - Cursors yield entries in byte-lexicographic key order
//! - `next_sequence` never repeats a value for a namespace
//!
//! ## Available Engines
//!
//! - [`MemoryEngine`] - For testing and ephemeral storage
//!
//! Persistent engines (B-tree or LSM based) live outside this
//! workspace; they implement [`KvEngine`] and plug in unchanged.
//!
//! ## Example
//!
//! ```rust
//! use schemadb_kv::{KvEngine, MemoryEngine};
//!
//! let engine = MemoryEngine::new();
//!
//! let mut txn = engine.begin_write().unwrap();
//! let ns = txn.create_namespace(b"users").unwrap();
//! ns.put(b"0000000001", b"{}").unwrap();
//! txn.commit().unwrap();
//!
//! let txn = engine.begin_read().unwrap();
//! let ns = txn.namespace(b"users").unwrap();
//! assert_eq!(ns.get(b"0000000001"), Some(b"{}".to_vec()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod memory;

pub use engine::{Cursor, KvEngine, NamespaceRead, NamespaceWrite, ReadTxn, WriteTxn};
pub use error::{KvError, KvResult};
pub use memory::MemoryEngine;
