//! # SchemaDB Core
//!
//! Schema-driven object mapping over an embedded, transactional,
//! ordered key-value store.
//!
//! This crate lets an application persist arbitrary typed records
//! without per-type marshalling, indexing, or referential-integrity
//! code. Each record kind supplies a static [`Schema`] descriptor and
//! implements the small [`Record`] trait; the engine supplies:
//!
//! - Namespace addressing (scope-qualified bucket keys)
//! - Identifier assignment (sequence-backed, optionally inverted)
//! - A generic wire codec driven by schema metadata
//! - Ordered iteration with filter, stable sort, and pagination
//! - Referential-integrity checks gating deletion
//! - Referrer summaries for display/audit use
//!
//! The underlying store is any implementation of
//! [`schemadb_kv::KvEngine`]; durability, paging, and locking are its
//! concern, not this crate's.
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemadb_core::{ListParams, ObjectId, ObjectStore};
//! use schemadb_kv::MemoryEngine;
//!
//! let store = ObjectStore::new(Box::new(MemoryEngine::new()))
//!     .with_integrity_guards(&[&TEMPLATE, &ENVIRONMENT, &INVENTORY, &REPOSITORY]);
//!
//! // Identifier assigned from the namespace sequence.
//! let project = store.create(&[], Project { name: "alpha".into(), ..Default::default() })?;
//!
//! // Scoped kinds get one namespace per parent id.
//! let env = store.create(&[project.id], Environment::named("staging"))?;
//!
//! // Windowed, filtered, sorted listing.
//! let params = ListParams::new().limit(20).sort_by("name");
//! let envs: Vec<Environment> = store.list(&[project.id], &params, None)?;
//!
//! // Deleting a referenced record fails with DbError::InUse.
//! store.delete::<Environment>(&[project.id], &ObjectId::Int(env.id))?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bucket;
mod codec;
mod error;
mod id;
mod integrity;
mod query;
mod record;
mod schema;
mod store;
mod value;

pub use bucket::bucket_id;
pub use codec::{decode, decode_into, encode};
pub use error::{DbError, DbResult};
pub use id::{ObjectId, MAX_ID};
pub use integrity::{IndirectReferrer, Referrer, ReferrerConfig, ReferrerGroup, ReferrerSummary};
pub use query::ListParams;
pub use record::Record;
pub use schema::{FieldKind, FieldSpec, Schema};
pub use store::ObjectStore;
pub use value::FieldValue;
