use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use peopledb::{
    config::Config,
    db::Database,
    errors::AppError,
    scenario::{DispatchPolicy, Scenario},
};

/// Runs the person CRUD walkthrough against a MongoDB server
#[derive(Parser, Debug)]
#[command(name = "peopledb", version, about)]
struct Cli {
    /// Connection string, overrides MONGO_URL
    #[arg(long, value_name = "URL")]
    mongo_url: Option<String>,

    /// Database name, overrides MONGO_DATABASE
    #[arg(long)]
    database: Option<String>,

    /// Collection name, overrides PEOPLE_COLLECTION
    #[arg(long)]
    collection: Option<String>,

    /// Id used by the find/update/delete-by-id steps, overrides TARGET_PERSON_ID
    #[arg(long, value_name = "OBJECT_ID")]
    person_id: Option<String>,

    /// How independent operations are dispatched, overrides DISPATCH_POLICY
    #[arg(long, value_enum)]
    policy: Option<DispatchPolicy>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(url) = self.mongo_url {
            config.mongo_url = url;
        }
        if let Some(database) = self.database {
            config.database_name = database;
        }
        if let Some(collection) = self.collection {
            config.collection_name = collection;
        }
        if let Some(id) = self.person_id {
            config.target_person_id = id;
        }
        if let Some(policy) = self.policy {
            config.dispatch_policy = policy;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info")
                .add_directive("mongodb=warn".parse().unwrap())
        });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    let db = match Database::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!(code = e.error_code(), "Error connecting to Mongo: {}", e);
            return Err(e.into());
        }
    };

    let scenario = Scenario::from_config(&config);
    let report = scenario.run(&db, config.dispatch_policy).await;
    if report.failures() > 0 {
        info!("{} operation(s) failed, see log above", report.failures());
    }

    db.close().await;
    Ok(())
}
