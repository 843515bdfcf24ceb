pub mod kv;
pub mod memory_store;
pub mod redb_store;
pub mod session_store;
pub mod user_store;
