use crate::core::error::StoreError;

/// Read-modify-write callback: receives the current value (if any) and
/// returns the value to store. Returning an error aborts the write.
pub type UpdateFn<'a> = dyn FnMut(Option<&[u8]>) -> Result<Vec<u8>, StoreError> + 'a;

/// Embedded key-value storage with named tables
///
/// Every method runs as its own transaction. Implementations must make
/// `put` and `update` atomic: readers never observe a partially applied write,
/// and no other writer can interleave between the read and the write of
/// `update`.
pub trait KvStore: Send + Sync {
    /// Get the value stored under `key`. A table that was never written to
    /// reads as empty.
    fn get(&self, table: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or overwrite `key`.
    fn put(&self, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Atomically replace the value under `key` with the result of `f`.
    fn update(&self, table: &str, key: &str, f: &mut UpdateFn<'_>) -> Result<(), StoreError>;

    /// Number of keys in `table`.
    fn len(&self, table: &str) -> Result<usize, StoreError>;

    fn is_empty(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.len(table)? == 0)
    }
}
