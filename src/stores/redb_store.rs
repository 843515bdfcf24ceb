use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableError};
use std::fmt::Display;
use std::path::Path;
use tracing::debug;

use crate::core::error::StoreError;
use crate::stores::kv::{KvStore, UpdateFn};

fn storage_err(err: impl Display) -> StoreError {
    StoreError::Storage(err.to_string())
}

fn table_def(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// KvStore backed by a redb file
///
/// redb allows a single writer at a time while readers work on consistent
/// snapshots, which is all the isolation the user store needs.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database file and make sure `tables` exist
    pub fn open(path: &Path, tables: &[&str]) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(storage_err)?;

        let txn = db.begin_write().map_err(storage_err)?;
        for name in tables {
            txn.open_table(table_def(name)).map_err(storage_err)?;
        }
        txn.commit().map_err(storage_err)?;

        debug!(path = %path.display(), tables = ?tables, "redb store opened");

        Ok(Self { db })
    }
}

impl KvStore for RedbStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read().map_err(storage_err)?;
        let table = match txn.open_table(table_def(table)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(storage_err(e)),
        };

        let value = table.get(key).map_err(storage_err)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn put(&self, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = txn.open_table(table_def(table)).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        txn.commit().map_err(storage_err)
    }

    fn update(&self, table: &str, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = txn.open_table(table_def(table)).map_err(storage_err)?;
            let current = table
                .get(key)
                .map_err(storage_err)?
                .map(|guard| guard.value().to_vec());

            // Dropping an uncommitted transaction aborts it
            let next = f(current.as_deref())?;
            table.insert(key, next.as_slice()).map_err(storage_err)?;
        }
        txn.commit().map_err(storage_err)
    }

    fn len(&self, table: &str) -> Result<usize, StoreError> {
        let txn = self.db.begin_read().map_err(storage_err)?;
        match txn.open_table(table_def(table)) {
            Ok(table) => Ok(table.len().map_err(storage_err)? as usize),
            Err(TableError::TableDoesNotExist(_)) => Ok(0),
            Err(e) => Err(storage_err(e)),
        }
    }
}
