//! In-process storage backend

use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use crate::types::{Employee, EmployeeDocument, EmployeeFields};
use crate::{Error, Result};

use super::EmployeeStore;

/// Employees held in memory, keyed by ObjectId. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    documents: DashMap<ObjectId, EmployeeDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the stored document directly
    pub fn get(&self, id: &ObjectId) -> Option<EmployeeDocument> {
        self.documents.get(id).map(|entry| entry.value().clone())
    }

    /// Number of stored employees
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when no employee is stored
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        let mut documents: Vec<EmployeeDocument> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by_key(|doc| doc.id);
        Ok(documents.into_iter().map(Employee::from).collect())
    }

    async fn insert(&self, employee: Employee) -> Result<Employee> {
        let mut document = EmployeeDocument::for_insert(employee);
        let id = ObjectId::new();
        document.id = Some(id);
        self.documents.insert(id, document);

        let stored = self
            .get(&id)
            .ok_or_else(|| Error::internal(format!("employee {} missing after insert", id)))?;
        Ok(stored.into())
    }

    async fn update(&self, id: ObjectId, fields: &EmployeeFields) -> Result<bool> {
        match self.documents.get_mut(&id) {
            Some(mut entry) => {
                entry.apply(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        Ok(self.documents.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
