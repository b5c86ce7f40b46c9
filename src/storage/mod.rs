//! Storage abstraction layer
//!
//! Provides a unified interface over MongoDB and an in-process store

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::types::{Employee, EmployeeFields};
use crate::Result;

pub mod memory;
pub mod mongo;

/// Employee store trait
///
/// Each method maps to a single operation against the backing collection,
/// except `insert`, which re-reads the stored record after writing it.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fetch every employee, in no particular order
    async fn list(&self) -> Result<Vec<Employee>>;

    /// Insert a new employee and return the stored record with its assigned id
    async fn insert(&self, employee: Employee) -> Result<Employee>;

    /// Overwrite name, salary and age. Returns false when no record matched.
    async fn update(&self, id: ObjectId, fields: &EmployeeFields) -> Result<bool>;

    /// Remove one employee. Returns false when no record matched.
    async fn delete(&self, id: ObjectId) -> Result<bool>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Mongo {
        uri: String,
        database: String,
        collection: String,
        connect_timeout: Duration,
    },
    Memory,
}

/// Create store backend from config
pub async fn create_store(config: StoreConfig) -> Result<Box<dyn EmployeeStore>> {
    match config {
        StoreConfig::Mongo {
            uri,
            database,
            collection,
            connect_timeout,
        } => {
            let backend =
                mongo::MongoStore::connect(&uri, &database, &collection, connect_timeout).await?;
            Ok(Box::new(backend))
        }
        StoreConfig::Memory => Ok(Box::new(memory::MemoryStore::new())),
    }
}
