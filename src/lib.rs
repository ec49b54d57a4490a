pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod scenario;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use db::Database;
