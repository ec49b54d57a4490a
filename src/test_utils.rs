//! Test utilities for running against a disposable MongoDB server
//!
//! A single MongoDB container is started on first use and shared by every
//! test in the process. Each [`TestContext`] gets its own database so tests
//! never see each other's documents. Set `MONGO_TEST_URL` to reuse an already
//! running server instead of starting a container.

use std::sync::Arc;
use std::time::Duration;

use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::db::Database;
use crate::models::{CreatePerson, Person};

/// Shared MongoDB server reused across tests
static SHARED_MONGO: OnceCell<SharedMongo> = OnceCell::const_new();

struct SharedMongo {
    // Keeps the container alive for the lifetime of the test binary.
    _container: Option<Arc<ContainerAsync<Mongo>>>,
    mongo_url: String,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

impl SharedMongo {
    async fn get_or_create() -> Result<&'static SharedMongo, BoxError> {
        SHARED_MONGO.get_or_try_init(SharedMongo::start).await
    }

    async fn start() -> Result<SharedMongo, BoxError> {
        if let Ok(url) = std::env::var("MONGO_TEST_URL") {
            return Ok(SharedMongo {
                _container: None,
                mongo_url: url,
            });
        }

        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .map_err(|e| format!("Failed to start shared mongo container: {}", e))?;

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .map_err(|e| format!("Failed to get mongo port: {}", e))?;

        Ok(SharedMongo {
            _container: Some(Arc::new(container)),
            mongo_url: format!("mongodb://localhost:{}", port),
        })
    }
}

/// Per-test database on the shared server
pub struct TestContext {
    pub db: Database,
    pub config: Config,
}

impl TestContext {
    pub async fn new() -> Self {
        let shared = SharedMongo::get_or_create()
            .await
            .expect("Failed to create shared mongo server");

        let database_name = format!("peopledb_test_{}", uuid::Uuid::new_v4().simple());
        let config = Config::for_url(shared.mongo_url.clone(), database_name);

        // The container may still be starting up
        let mut retries = 0;
        const MAX_RETRIES: u32 = 30;
        let db = loop {
            match Database::connect_with(
                &config.mongo_url,
                &config.database_name,
                &config.collection_name,
                Duration::from_secs(2),
            )
            .await
            {
                Ok(db) => break db,
                Err(e) => {
                    retries += 1;
                    if retries >= MAX_RETRIES {
                        panic!("Failed to connect to test mongo after {} retries: {}", MAX_RETRIES, e);
                    }
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
            }
        };

        Self { db, config }
    }

    /// Inserts the given people and returns them as stored.
    pub async fn seed_people(&self, people: Vec<CreatePerson>) -> Vec<Person> {
        self.db
            .insert_people(people)
            .await
            .expect("Failed to seed people")
    }

    /// Drop this context's database and close the client
    pub async fn cleanup_and_close(&self) -> Result<(), BoxError> {
        self.db.drop_database().await?;
        self.db.close().await;
        Ok(())
    }
}

/// People who like burritos, inserted in non-alphabetical order
pub fn burrito_lovers() -> Vec<CreatePerson> {
    vec![
        CreatePerson::new("Ann").with_age(31).with_favorite_foods(["burrito"]),
        CreatePerson::new("Zane").with_age(22).with_favorite_foods(["burrito", "tacos"]),
        CreatePerson::new("Mia").with_age(27).with_favorite_foods(["salad", "burrito"]),
    ]
}
