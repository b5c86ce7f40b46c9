//! Employee record types and the wire <-> document mapping

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Employee as it travels over HTTP.
///
/// `id` is the hex form of the stored ObjectId. Missing fields fall back to
/// their zero values; nothing beyond type coercion is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "id_is_empty")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub age: i64,
}

fn id_is_empty(id: &Option<String>) -> bool {
    id.as_deref().map_or(true, str::is_empty)
}

impl Employee {
    /// The mutable part of the record, as written by an update.
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            name: self.name.clone(),
            salary: self.salary,
            age: self.age,
        }
    }

    /// Same record carrying `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Fields overwritten by an update. The id is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeFields {
    pub name: String,
    pub salary: f64,
    pub age: i64,
}

/// Employee as stored in the `employees` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub age: i64,
}

impl EmployeeDocument {
    /// Build a document for insertion. Any client-supplied id is dropped so
    /// the store assigns a fresh one.
    pub fn for_insert(employee: Employee) -> Self {
        Self {
            id: None,
            name: employee.name,
            salary: employee.salary,
            age: employee.age,
        }
    }

    pub fn apply(&mut self, fields: &EmployeeFields) {
        self.name = fields.name.clone();
        self.salary = fields.salary;
        self.age = fields.age;
    }
}

impl From<EmployeeDocument> for Employee {
    fn from(doc: EmployeeDocument) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            name: doc.name,
            salary: doc.salary,
            age: doc.age,
        }
    }
}

/// Parse an external hex id into the store's ObjectId.
pub fn parse_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|e| Error::invalid_id(format!("{raw}: {e}")))
}
