//! The object store facade.

use crate::bucket::bucket_id;
use crate::codec;
use crate::error::{DbError, DbResult};
use crate::id::{assign_id, primary_id, ObjectId};
use crate::integrity::{collect_referrers, find_blocking_kind, ReferrerConfig, ReferrerSummary};
use crate::query::{collect_records, EmptyCursor, ListParams};
use crate::record::Record;
use crate::schema::Schema;
use schemadb_kv::{Cursor, KvEngine};
use tracing::{debug, warn};

/// The mapping layer's entry point.
///
/// An `ObjectStore` owns a handle to the underlying key-value engine
/// and exposes schema-driven CRUD, listing, and referential-integrity
/// operations for any [`Record`] kind. It holds no cross-call mutable
/// state: every operation opens its own engine transaction, so a single
/// store may be shared freely between callers.
///
/// # Example
///
/// ```rust,ignore
/// use schemadb_core::{ListParams, ObjectStore};
/// use schemadb_kv::MemoryEngine;
///
/// let store = ObjectStore::new(Box::new(MemoryEngine::new()))
///     .with_integrity_guards(&[&TEMPLATE, &ENVIRONMENT]);
///
/// let project = store.create(&[], Project { name: "alpha".into(), ..Default::default() })?;
/// let projects: Vec<Project> = store.list(&[], &ListParams::new(), None)?;
/// ```
pub struct ObjectStore {
    engine: Box<dyn KvEngine>,
    guards: Vec<&'static Schema>,
    referrers: ReferrerConfig,
}

impl ObjectStore {
    /// Creates a store over an engine, with no guarded kinds and no
    /// referrer configuration.
    #[must_use]
    pub fn new(engine: Box<dyn KvEngine>) -> Self {
        Self {
            engine,
            guards: Vec::new(),
            referrers: ReferrerConfig::default(),
        }
    }

    /// Sets the closed list of kinds probed before any delete.
    ///
    /// Kinds outside this list never block a deletion.
    #[must_use]
    pub fn with_integrity_guards(mut self, guards: &[&'static Schema]) -> Self {
        self.guards = guards.to_vec();
        self
    }

    /// Sets the closed list of kinds summarized by
    /// [`referrers`](Self::referrers).
    #[must_use]
    pub fn with_referrer_config(mut self, config: ReferrerConfig) -> Self {
        self.referrers = config;
        self
    }

    /// Returns `true` if any record has ever been written.
    ///
    /// Used by bootstrap code to distinguish a fresh store from an
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Storage`] if the engine fails.
    pub fn is_initialized(&self) -> DbResult<bool> {
        Ok(self.engine.begin_read()?.has_namespaces())
    }

    /// Closes the underlying engine.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Storage`] if the engine fails to close.
    pub fn close(&self) -> DbResult<()> {
        self.engine.close()?;
        Ok(())
    }

    /// Creates a record, assigning its identifier per the kind's
    /// identifier policy, and returns the stored record.
    ///
    /// # Errors
    ///
    /// - [`DbError::InvalidIdentifier`] for an empty string primary key
    /// - [`DbError::UnsupportedIdentifierType`] if the primary field's
    ///   kind is not integer or string
    /// - [`DbError::Storage`] / [`DbError::Codec`] pass-through
    pub fn create<T: Record>(&self, scope: &[i64], mut record: T) -> DbResult<T> {
        let schema = T::schema();
        let bucket = bucket_id(schema, scope);

        let mut txn = self.engine.begin_write()?;
        let ns = txn.create_namespace(&bucket)?;
        let id = assign_id(&mut record, ns)?;
        let bytes = codec::encode(&record)?;
        ns.put(&id.to_bytes(), &bytes)?;
        txn.commit()?;

        debug!(namespace = schema.namespace, id = %id, "created record");
        Ok(record)
    }

    /// Fetches a record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the namespace or the key is
    /// absent.
    pub fn get<T: Record>(&self, scope: &[i64], id: &ObjectId) -> DbResult<T> {
        let txn = self.engine.begin_read()?;
        let ns = txn
            .namespace(&bucket_id(T::schema(), scope))
            .ok_or(DbError::NotFound)?;
        let bytes = ns.get(&id.to_bytes()).ok_or(DbError::NotFound)?;
        codec::decode(&bytes)
    }

    /// Lists records in namespace key order, windowed, filtered, and
    /// sorted per `params`.
    ///
    /// A namespace that does not exist yields an empty result. The
    /// filter is evaluated per decoded record; rejected records do not
    /// count against the cap.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::SchemaMismatch`] if `params.sort_by` names a
    /// field not declared sortable.
    pub fn list<T: Record>(
        &self,
        scope: &[i64],
        params: &ListParams,
        filter: Option<&dyn Fn(&T) -> bool>,
    ) -> DbResult<Vec<T>> {
        let txn = self.engine.begin_read()?;

        let mut empty = EmptyCursor;
        let mut boxed;
        let cursor: &mut dyn Cursor = match txn.namespace(&bucket_id(T::schema(), scope)) {
            Some(ns) => {
                boxed = ns.cursor();
                boxed.as_mut()
            }
            None => &mut empty,
        };

        collect_records(cursor, params, filter)
    }

    /// Replaces an existing record, located by the identifier read from
    /// its primary field. The identifier and namespace never change on
    /// update; callers must not mutate the primary field between read
    /// and update.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no record exists at that
    /// identifier.
    pub fn update<T: Record>(&self, scope: &[i64], record: &T) -> DbResult<()> {
        let schema = T::schema();
        let id = primary_id(record)?;
        let bytes = codec::encode(record)?;

        let mut txn = self.engine.begin_write()?;
        let ns = txn
            .namespace_mut(&bucket_id(schema, scope))
            .ok_or(DbError::NotFound)?;
        if ns.get(&id.to_bytes()).is_none() {
            return Err(DbError::NotFound);
        }
        ns.put(&id.to_bytes(), &bytes)?;
        txn.commit()?;

        debug!(namespace = schema.namespace, id = %id, "updated record");
        Ok(())
    }

    /// Deletes a record, unless a guarded kind still references it.
    ///
    /// # Errors
    ///
    /// - [`DbError::InUse`] if the referential-integrity gate finds a
    ///   referrer; the record persists unchanged
    /// - [`DbError::NotFound`] if the namespace or the key is absent
    pub fn delete<T: Record>(&self, scope: &[i64], id: &ObjectId) -> DbResult<()> {
        let schema = T::schema();

        let mut txn = self.engine.begin_write()?;
        if let Some(kind) = find_blocking_kind(txn.as_ref(), &self.guards, scope, schema, id)? {
            warn!(
                namespace = schema.namespace,
                id = %id,
                referrer = kind,
                "delete blocked by referential-integrity gate"
            );
            return Err(DbError::InUse { kind });
        }

        let ns = txn
            .namespace_mut(&bucket_id(schema, scope))
            .ok_or(DbError::NotFound)?;
        if !ns.delete(&id.to_bytes())? {
            return Err(DbError::NotFound);
        }
        txn.commit()?;

        debug!(namespace = schema.namespace, id = %id, "deleted record");
        Ok(())
    }

    /// Collects the summarized referrers of a record across the
    /// configured referrer kinds.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::SchemaMismatch`] if the kind declares no
    /// reference suffix, or if a configured referrer kind has no field
    /// matching it.
    pub fn referrers<T: Record>(&self, scope: &[i64], id: &ObjectId) -> DbResult<ReferrerSummary> {
        let txn = self.engine.begin_read()?;
        collect_referrers(txn.as_ref(), &self.referrers, scope, T::schema(), id)
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field(
                "guards",
                &self.guards.iter().map(|s| s.namespace).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
