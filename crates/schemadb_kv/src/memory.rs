//! In-memory engine for testing and ephemeral storage.

use crate::engine::{Cursor, KvEngine, NamespaceRead, NamespaceWrite, ReadTxn, WriteTxn};
use crate::error::{KvError, KvResult};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::BTreeMap;

/// One namespace's entries and sequence counter.
#[derive(Debug, Default, Clone)]
struct NamespaceData {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    sequence: u64,
}

/// The committed state of the engine.
#[derive(Debug, Default, Clone)]
struct EngineState {
    namespaces: BTreeMap<Vec<u8>, NamespaceData>,
}

/// An in-memory key-value engine.
///
/// This engine keeps all data in `BTreeMap`s and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral databases that don't need persistence
///
/// # Transaction Semantics
///
/// Readers share a lock on the committed state. A write transaction
/// takes the exclusive lock, mutates a working copy, and swaps it in on
/// commit; dropping the transaction discards the copy. This gives the
/// atomicity and single-writer guarantees the [`KvEngine`] contract
/// requires.
///
/// # Example
///
/// ```rust
/// use schemadb_kv::{KvEngine, MemoryEngine};
///
/// let engine = MemoryEngine::new();
/// let mut txn = engine.begin_write().unwrap();
/// txn.create_namespace(b"ns").unwrap().put(b"k", b"v").unwrap();
/// txn.commit().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MemoryEngine {
    state: RwLock<EngineState>,
    closed: RwLock<bool>,
}

impl MemoryEngine {
    /// Creates a new empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> KvResult<()> {
        if *self.closed.read() {
            Err(KvError::Closed)
        } else {
            Ok(())
        }
    }
}

impl KvEngine for MemoryEngine {
    fn begin_read(&self) -> KvResult<Box<dyn ReadTxn + '_>> {
        self.check_open()?;
        Ok(Box::new(MemoryReadTxn {
            state: self.state.read(),
        }))
    }

    fn begin_write(&self) -> KvResult<Box<dyn WriteTxn + '_>> {
        self.check_open()?;
        let state = self.state.write();
        let work = state.clone();
        Ok(Box::new(MemoryWriteTxn { state, work }))
    }

    fn close(&self) -> KvResult<()> {
        *self.closed.write() = true;
        Ok(())
    }
}

/// Read-only transaction holding the shared lock.
struct MemoryReadTxn<'e> {
    state: RwLockReadGuard<'e, EngineState>,
}

impl ReadTxn for MemoryReadTxn<'_> {
    fn namespace(&self, name: &[u8]) -> Option<&dyn NamespaceRead> {
        self.state.namespaces.get(name).map(|ns| ns as _)
    }

    fn has_namespaces(&self) -> bool {
        !self.state.namespaces.is_empty()
    }
}

/// Write transaction holding the exclusive lock and a working copy.
struct MemoryWriteTxn<'e> {
    state: RwLockWriteGuard<'e, EngineState>,
    work: EngineState,
}

impl WriteTxn for MemoryWriteTxn<'_> {
    fn namespace(&self, name: &[u8]) -> Option<&dyn NamespaceRead> {
        self.work.namespaces.get(name).map(|ns| ns as _)
    }

    fn namespace_mut(&mut self, name: &[u8]) -> Option<&mut dyn NamespaceWrite> {
        self.work.namespaces.get_mut(name).map(|ns| ns as _)
    }

    fn create_namespace(&mut self, name: &[u8]) -> KvResult<&mut dyn NamespaceWrite> {
        Ok(self.work.namespaces.entry(name.to_vec()).or_default() as _)
    }

    fn commit(mut self: Box<Self>) -> KvResult<()> {
        *self.state = std::mem::take(&mut self.work);
        Ok(())
    }
}

impl NamespaceRead for NamespaceData {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn cursor(&self) -> Box<dyn Cursor + '_> {
        Box::new(MemoryCursor {
            iter: self.entries.iter(),
        })
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl NamespaceWrite for NamespaceData {
    fn put(&mut self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> KvResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn next_sequence(&mut self) -> KvResult<u64> {
        self.sequence += 1;
        Ok(self.sequence)
    }
}

struct MemoryCursor<'a> {
    iter: std::collections::btree_map::Iter<'a, Vec<u8>, Vec<u8>>,
}

impl Cursor for MemoryCursor<'_> {
    fn next(&mut self) -> Option<(&[u8], &[u8])> {
        self.iter.next().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_engine_has_no_namespaces() {
        let engine = MemoryEngine::new();
        let txn = engine.begin_read().unwrap();
        assert!(!txn.has_namespaces());
        assert!(txn.namespace(b"missing").is_none());
    }

    #[test]
    fn put_and_get() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        let ns = txn.create_namespace(b"ns").unwrap();
        ns.put(b"key", b"value").unwrap();
        txn.commit().unwrap();

        let txn = engine.begin_read().unwrap();
        let ns = txn.namespace(b"ns").unwrap();
        assert_eq!(ns.get(b"key"), Some(b"value".to_vec()));
        assert_eq!(ns.get(b"other"), None);
    }

    #[test]
    fn cursor_yields_key_order() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        let ns = txn.create_namespace(b"ns").unwrap();
        ns.put(b"0000000003", b"c").unwrap();
        ns.put(b"0000000001", b"a").unwrap();
        ns.put(b"0000000002", b"b").unwrap();
        txn.commit().unwrap();

        let txn = engine.begin_read().unwrap();
        let ns = txn.namespace(b"ns").unwrap();
        let mut cursor = ns.cursor();
        let mut keys = Vec::new();
        while let Some((k, _)) = cursor.next() {
            keys.push(k.to_vec());
        }
        assert_eq!(
            keys,
            vec![
                b"0000000001".to_vec(),
                b"0000000002".to_vec(),
                b"0000000003".to_vec()
            ]
        );
    }

    #[test]
    fn sequence_is_monotonic() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        let ns = txn.create_namespace(b"ns").unwrap();
        assert_eq!(ns.next_sequence().unwrap(), 1);
        assert_eq!(ns.next_sequence().unwrap(), 2);
        txn.commit().unwrap();

        // Persists across transactions
        let mut txn = engine.begin_write().unwrap();
        let ns = txn.namespace_mut(b"ns").unwrap();
        assert_eq!(ns.next_sequence().unwrap(), 3);
    }

    #[test]
    fn sequences_are_per_namespace() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        assert_eq!(
            txn.create_namespace(b"a").unwrap().next_sequence().unwrap(),
            1
        );
        assert_eq!(
            txn.create_namespace(b"b").unwrap().next_sequence().unwrap(),
            1
        );
    }

    #[test]
    fn dropped_write_txn_is_discarded() {
        let engine = MemoryEngine::new();

        {
            let mut txn = engine.begin_write().unwrap();
            let ns = txn.create_namespace(b"ns").unwrap();
            ns.put(b"key", b"value").unwrap();
            // no commit
        }

        let txn = engine.begin_read().unwrap();
        assert!(txn.namespace(b"ns").is_none());
    }

    #[test]
    fn write_txn_sees_own_writes() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        txn.create_namespace(b"ns")
            .unwrap()
            .put(b"key", b"value")
            .unwrap();

        let ns = txn.namespace(b"ns").unwrap();
        assert_eq!(ns.get(b"key"), Some(b"value".to_vec()));
    }

    #[test]
    fn delete_reports_existence() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        let ns = txn.create_namespace(b"ns").unwrap();
        ns.put(b"key", b"value").unwrap();
        assert!(ns.delete(b"key").unwrap());
        assert!(!ns.delete(b"key").unwrap());
    }

    #[test]
    fn closed_engine_rejects_transactions() {
        let engine = MemoryEngine::new();
        engine.close().unwrap();

        assert!(matches!(engine.begin_read(), Err(KvError::Closed)));
        assert!(matches!(engine.begin_write(), Err(KvError::Closed)));
    }

    #[test]
    fn create_namespace_is_idempotent() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin_write().unwrap();
        txn.create_namespace(b"ns")
            .unwrap()
            .put(b"key", b"value")
            .unwrap();
        // Re-creating must keep existing entries
        let ns = txn.create_namespace(b"ns").unwrap();
        assert_eq!(ns.get(b"key"), Some(b"value".to_vec()));
    }
}
