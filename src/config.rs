use anyhow::{anyhow, Result};
use std::env;

use crate::scenario::DispatchPolicy;

pub const DEFAULT_TARGET_PERSON_ID: &str = "6436af498dcda3c126fa9a4f";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_url: String,
    pub database_name: String,
    pub collection_name: String,
    pub target_person_id: String,
    pub dispatch_policy: DispatchPolicy,
    pub connect_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            mongo_url: env::var("MONGO_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("MONGO_DATABASE")
                .unwrap_or_else(|_| "peopledb".to_string()),
            collection_name: env::var("PEOPLE_COLLECTION")
                .unwrap_or_else(|_| "people".to_string()),
            target_person_id: env::var("TARGET_PERSON_ID")
                .unwrap_or_else(|_| DEFAULT_TARGET_PERSON_ID.to_string()),
            dispatch_policy: match env::var("DISPATCH_POLICY") {
                Ok(value) => value.parse()?,
                Err(_) => DispatchPolicy::default(),
            },
            connect_timeout_secs: parse_connect_timeout(
                env::var("MONGO_CONNECT_TIMEOUT_SECS").ok(),
            )?,
        })
    }

    /// Config pointing at an explicit server, used by tests and tooling.
    pub fn for_url(mongo_url: impl Into<String>, database_name: impl Into<String>) -> Self {
        Config {
            mongo_url: mongo_url.into(),
            database_name: database_name.into(),
            collection_name: "people".to_string(),
            target_person_id: DEFAULT_TARGET_PERSON_ID.to_string(),
            dispatch_policy: DispatchPolicy::default(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Unset means the default; anything else must be a positive number of seconds.
fn parse_connect_timeout(value: Option<String>) -> Result<u64> {
    let Some(value) = value else {
        return Ok(DEFAULT_CONNECT_TIMEOUT_SECS);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(anyhow!(
            "Invalid MONGO_CONNECT_TIMEOUT_SECS '{}': expected a positive number of seconds",
            value
        )),
    }
}
