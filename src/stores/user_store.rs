use std::sync::Arc;
use tracing::debug;

use crate::core::error::StoreError;
use crate::models::user::{UserInfo, UserRecord};
use crate::stores::kv::KvStore;
use crate::utils::object_id::ObjectId;

/// Table holding serialized user records keyed by id
pub const USER_TABLE: &str = "user";

/// Durable id -> user record mapping
///
/// Ids are validated before the store is touched, so a malformed id never
/// causes a read or a write.
pub struct UserStore {
    kv: Arc<dyn KvStore>,
}

impl UserStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Look a user up by its 24-hex id
    pub fn get_by_id(&self, id: &str) -> Result<UserRecord, StoreError> {
        let oid = ObjectId::parse_hex(id)?;
        let key = oid.to_hex();

        let bytes = self
            .kv
            .get(USER_TABLE, &key)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write a fresh record with class 0, replacing whatever was stored under `id`
    pub fn create(
        &self,
        id: &str,
        token: &str,
        email: &str,
        info: UserInfo,
    ) -> Result<UserRecord, StoreError> {
        let oid = ObjectId::parse_hex(id)?;
        let record = UserRecord::new(oid, token.to_string(), email.to_string(), info);

        let bytes = serde_json::to_vec(&record)?;
        self.kv.put(USER_TABLE, &oid.to_hex(), &bytes)?;

        debug!(user_id = %oid, "User record written");
        Ok(record)
    }

    /// Replace the access token of an existing user in one transaction
    pub fn set_token(&self, id: &str, token: &str) -> Result<(), StoreError> {
        let oid = ObjectId::parse_hex(id)?;
        let key = oid.to_hex();

        self.kv.update(USER_TABLE, &key, &mut |current| {
            let bytes = current.ok_or_else(|| StoreError::NotFound(key.clone()))?;
            let mut record: UserRecord = serde_json::from_slice(bytes)?;
            record.token = token.to_string();
            Ok(serde_json::to_vec(&record)?)
        })?;

        debug!(user_id = %oid, "User token updated");
        Ok(())
    }

    /// Number of stored users
    pub fn count(&self) -> Result<usize, StoreError> {
        self.kv.len(USER_TABLE)
    }
}
