use bson::doc;
use mongodb::{options::ClientOptions, Client, Collection};
use std::time::Duration;

use crate::config::Config;
use crate::errors::{PersonError, PersonResult};
use crate::models::Person;

pub mod people;

#[derive(Clone, Debug)]
pub struct Database {
    pub client: Client,
    pub db: mongodb::Database,
    collection_name: String,
}

impl Database {
    /// Connects and pings the server; no operation is issued before this returns.
    pub async fn connect(config: &Config) -> PersonResult<Self> {
        Self::connect_with(
            &config.mongo_url,
            &config.database_name,
            &config.collection_name,
            Duration::from_secs(config.connect_timeout_secs),
        )
        .await
    }

    pub async fn connect_with(
        mongo_url: &str,
        database_name: &str,
        collection_name: &str,
        connect_timeout: Duration,
    ) -> PersonResult<Self> {
        let mut options = ClientOptions::parse(mongo_url)
            .await
            .map_err(PersonError::connection)?;
        options.app_name = Some("peopledb".to_string());
        options.connect_timeout = Some(connect_timeout);
        options.server_selection_timeout = Some(connect_timeout);

        let client = Client::with_options(options).map_err(PersonError::connection)?;
        let database = Self {
            db: client.database(database_name),
            client,
            collection_name: collection_name.to_string(),
        };

        database.ping().await.map_err(|e| match e {
            PersonError::Database { source } => PersonError::connection(source),
            other => other,
        })?;
        tracing::info!("Connected to MongoDB database '{}'", database_name);

        Ok(database)
    }

    pub async fn ping(&self) -> PersonResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn people(&self) -> Collection<Person> {
        self.db.collection::<Person>(&self.collection_name)
    }

    /// Drops the person collection and everything in it.
    pub async fn drop_people(&self) -> PersonResult<()> {
        self.people().drop().await?;
        Ok(())
    }

    /// Drops the whole database; only test contexts call this.
    pub async fn drop_database(&self) -> PersonResult<()> {
        self.db.drop().await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::debug!("MongoDB client shut down");
    }
}
