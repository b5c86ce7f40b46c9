//! MongoDB storage backend

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::types::{Employee, EmployeeDocument, EmployeeFields};
use crate::{Error, Result};

use super::EmployeeStore;

/// Long-lived client bound to one database and collection
pub struct MongoStore {
    client: Client,
    database_name: String,
    collection: Collection<EmployeeDocument>,
}

impl MongoStore {
    /// Open the client and confirm the server answers a `ping`.
    ///
    /// The whole handshake, URI resolution included, is bounded by
    /// `connect_timeout`. There is no retry.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let handshake = async {
            let mut options = ClientOptions::parse(uri).await?;
            options.connect_timeout = Some(connect_timeout);
            options.server_selection_timeout = Some(connect_timeout);

            let client = Client::with_options(options)?;
            let database = client.database(database);
            database.run_command(doc! { "ping": 1 }).await?;
            Ok::<_, Error>((client, database))
        };

        let (client, database) = tokio::time::timeout(connect_timeout, handshake)
            .await
            .map_err(|_| Error::ConnectTimeout(connect_timeout.as_secs()))??;

        tracing::info!(
            database = database.name(),
            collection,
            "Connected to MongoDB"
        );

        let collection = database.collection::<EmployeeDocument>(collection);

        Ok(Self {
            client,
            database_name: database.name().to_string(),
            collection,
        })
    }
}

#[async_trait]
impl EmployeeStore for MongoStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<EmployeeDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Employee::from).collect())
    }

    async fn insert(&self, employee: Employee) -> Result<Employee> {
        let document = EmployeeDocument::for_insert(employee);
        let inserted = self.collection.insert_one(document).await?;

        let id = inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Error::internal("inserted id is not an ObjectId"))?;

        let stored = self
            .collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| Error::internal(format!("employee {} missing after insert", id)))?;

        Ok(stored.into())
    }

    async fn update(&self, id: ObjectId, fields: &EmployeeFields) -> Result<bool> {
        let update = doc! {
            "$set": {
                "name": fields.name.as_str(),
                "age": fields.age,
                "salary": fields.salary,
            }
        };

        let previous = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update)
            .await?;

        Ok(previous.is_some())
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Needs a reachable server, e.g.
    /// `HRMS_TEST_MONGO_URI=mongodb://localhost:27017 cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_mongo_store_crud() {
        let uri = std::env::var("HRMS_TEST_MONGO_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let store = MongoStore::connect(
            &uri,
            "hrms-test",
            "employees_crud_test",
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        store.collection.drop().await.unwrap();

        let created = store
            .insert(Employee {
                id: Some("forced".into()),
                name: "Ann".into(),
                salary: 50000.0,
                age: 30,
            })
            .await
            .unwrap();
        let id = created.id.clone().unwrap();
        assert_ne!(id, "forced");

        let oid = ObjectId::parse_str(&id).unwrap();
        let fields = EmployeeFields {
            name: "Ann".into(),
            salary: 60000.0,
            age: 31,
        };
        assert!(store.update(oid, &fields).await.unwrap());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].salary, 60000.0);

        assert!(store.delete(oid).await.unwrap());
        assert!(!store.delete(oid).await.unwrap());
        assert!(!store.update(oid, &fields).await.unwrap());

        store.collection.drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_fails_on_bad_uri() {
        let result = MongoStore::connect(
            "not-a-mongo-uri",
            "hrms-test",
            "employees",
            Duration::from_secs(1),
        )
        .await;
        assert!(result.is_err());
    }
}
