//! The fixed CRUD walkthrough run by the `peopledb` binary.
//!
//! Every operation logs its own outcome and never aborts the others. How the
//! operations are scheduled relative to each other is chosen explicitly with
//! [`DispatchPolicy`]; the burrito query always runs after everything else.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::errors::{AppError, ErrorSeverity, PersonError, PersonResult};
use crate::models::{
    CreatePerson, Person, PersonField, PersonFilter, PersonQuery, PersonUpdate, SortOrder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DispatchPolicy {
    /// Await each operation before issuing the next
    #[default]
    Sequential,
    /// Issue all independent operations at once; completion order is unspecified
    Concurrent,
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown dispatch policy '{value}'. Valid policies are: sequential, concurrent")]
pub struct ParsePolicyError {
    pub value: String,
}

impl FromStr for DispatchPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(DispatchPolicy::Sequential),
            "concurrent" => Ok(DispatchPolicy::Concurrent),
            _ => Err(ParsePolicyError { value: s.to_string() }),
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPolicy::Sequential => write!(f, "sequential"),
            DispatchPolicy::Concurrent => write!(f, "concurrent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InsertOne,
    InsertMany,
    FindByName,
    FindOneByFavoriteFood,
    FindById,
    UpdateById,
    UpdateByName,
    DeleteById,
    DeleteByName,
    FindBurritoLovers,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::InsertOne => "insert_one",
            Operation::InsertMany => "insert_many",
            Operation::FindByName => "find_by_name",
            Operation::FindOneByFavoriteFood => "find_one_by_favorite_food",
            Operation::FindById => "find_by_id",
            Operation::UpdateById => "update_by_id",
            Operation::UpdateByName => "update_by_name",
            Operation::DeleteById => "delete_by_id",
            Operation::DeleteByName => "delete_by_name",
            Operation::FindBurritoLovers => "find_burrito_lovers",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus {
    Succeeded(String),
    NotFound,
    Failed { code: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub status: OperationStatus,
}

impl OperationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, OperationStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
    /// Outcomes in completion order.
    pub outcomes: Vec<OperationOutcome>,
}

impl ScenarioReport {
    pub fn outcome(&self, operation: Operation) -> Option<&OperationOutcome> {
        self.outcomes.iter().find(|o| o.operation == operation)
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Literal inputs for each step of the walkthrough
#[derive(Debug, Clone)]
pub struct Scenario {
    pub person: CreatePerson,
    pub people: Vec<CreatePerson>,
    pub search_name: String,
    pub favorite_food: String,
    pub target_person_id: String,
    pub pushed_food: String,
    pub rename_target: String,
    pub new_age: i32,
    pub delete_name: String,
    pub burrito_query: PersonQuery,
}

impl Scenario {
    pub fn new(target_person_id: impl Into<String>) -> Self {
        Self {
            person: CreatePerson::new("John")
                .with_age(25)
                .with_favorite_foods(["pizza", "burger", "sushi"]),
            people: vec![
                CreatePerson::new("Alice")
                    .with_age(30)
                    .with_favorite_foods(["sushi", "ramen"]),
                CreatePerson::new("Bob")
                    .with_age(35)
                    .with_favorite_foods(["burger", "fries"]),
                CreatePerson::new("Charlie")
                    .with_age(40)
                    .with_favorite_foods(["pizza", "pasta"]),
            ],
            search_name: "John".to_string(),
            favorite_food: "burger".to_string(),
            target_person_id: target_person_id.into(),
            pushed_food: "hamburger".to_string(),
            rename_target: "Alice".to_string(),
            new_age: 20,
            delete_name: "Mary".to_string(),
            burrito_query: PersonQuery::new(PersonFilter::by_favorite_food("burrito"))
                .sort_by(PersonField::Name, SortOrder::Ascending)
                .limit(2)
                .exclude(PersonField::Age),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.target_person_id.clone())
    }

    pub async fn run(&self, db: &Database, policy: DispatchPolicy) -> ScenarioReport {
        info!("Running scenario with {} dispatch", policy);
        let operations = self.independent_operations(db);

        let mut outcomes = match policy {
            DispatchPolicy::Sequential => {
                let mut outcomes = Vec::with_capacity(operations.len());
                for operation in operations {
                    outcomes.push(operation.await);
                }
                outcomes
            }
            DispatchPolicy::Concurrent => {
                operations
                    .into_iter()
                    .collect::<FuturesUnordered<_>>()
                    .collect::<Vec<_>>()
                    .await
            }
        };

        outcomes.push(self.find_burrito_lovers(db).await);

        let report = ScenarioReport { outcomes };
        info!(
            "Scenario finished: {} operations, {} failed",
            report.outcomes.len(),
            report.failures()
        );
        report
    }

    fn independent_operations<'a>(
        &'a self,
        db: &'a Database,
    ) -> Vec<BoxFuture<'a, OperationOutcome>> {
        let id = self.target_person_id.as_str();
        vec![
            async move {
                let result = db.insert_person(self.person.clone()).await;
                record(Operation::InsertOne, result, |p| format!("Person saved: {}", p))
            }
            .boxed(),
            async move {
                let result = db.insert_people(self.people.clone()).await;
                record(Operation::InsertMany, result, |people| {
                    format!("People created: {}", describe_all(people))
                })
            }
            .boxed(),
            async move {
                let result = db.find_people_by_name(&self.search_name).await;
                record(Operation::FindByName, result, |people| {
                    format!("People found by name: {}", describe_all(people))
                })
            }
            .boxed(),
            async move {
                let result = db.find_person_by_favorite_food(&self.favorite_food).await;
                record_optional(Operation::FindOneByFavoriteFood, None, result, |p| {
                    format!("Person found by favorite food \"{}\": {}", self.favorite_food, p)
                })
            }
            .boxed(),
            async move {
                let result = db.get_person_by_id(id).await;
                record_optional(Operation::FindById, Some(id), result, |p| {
                    format!("Person found by _id \"{}\": {}", id, p)
                })
            }
            .boxed(),
            async move {
                let update = PersonUpdate::new().push_favorite_food(self.pushed_food.clone());
                let result = db.update_person_by_id(id, update).await;
                record_optional(Operation::UpdateById, Some(id), result, |p| {
                    format!("Person updated: {}", p)
                })
            }
            .boxed(),
            async move {
                let update = PersonUpdate::new().set_age(self.new_age);
                let result = db.update_person_by_name(&self.rename_target, update).await;
                record_optional(Operation::UpdateByName, None, result, |p| {
                    format!("Person \"{}\" updated: {}", self.rename_target, p)
                })
            }
            .boxed(),
            async move {
                let result = db.delete_person_by_id(id).await;
                record_optional(Operation::DeleteById, Some(id), result, |p| {
                    format!("Person \"{}\" removed: {}", id, p)
                })
            }
            .boxed(),
            async move {
                let result = db.delete_people_by_name(&self.delete_name).await;
                record(Operation::DeleteByName, result, |report| {
                    format!(
                        "People with name \"{}\" deleted: {}",
                        self.delete_name, report.deleted_count
                    )
                })
            }
            .boxed(),
        ]
    }

    async fn find_burrito_lovers(&self, db: &Database) -> OperationOutcome {
        let result = db.find_people(&self.burrito_query).await;
        record(Operation::FindBurritoLovers, result, |people| {
            format!("People who like burritos: {}", describe_all(people))
        })
    }
}

fn describe_all(people: &[Person]) -> String {
    let described: Vec<String> = people.iter().map(ToString::to_string).collect();
    format!("[{}]", described.join("; "))
}

fn record<T>(
    operation: Operation,
    result: PersonResult<T>,
    describe: impl FnOnce(&T) -> String,
) -> OperationOutcome {
    match result {
        Ok(value) => {
            let summary = describe(&value);
            info!(operation = %operation, "{}", summary);
            OperationOutcome {
                operation,
                status: OperationStatus::Succeeded(summary),
            }
        }
        Err(e) => failed(operation, e),
    }
}

/// Like [`record`], but a missing document is reported as not found.
fn record_optional(
    operation: Operation,
    target_id: Option<&str>,
    result: PersonResult<Option<Person>>,
    describe: impl FnOnce(&Person) -> String,
) -> OperationOutcome {
    match result {
        Ok(Some(person)) => record(operation, Ok(person), describe),
        Ok(None) => {
            match target_id {
                Some(id) => {
                    let not_found = PersonError::not_found_by_id(id);
                    warn!(operation = %operation, code = not_found.error_code(), "{}", not_found);
                }
                None => warn!(operation = %operation, "No matching person"),
            }
            OperationOutcome {
                operation,
                status: OperationStatus::NotFound,
            }
        }
        Err(e) => failed(operation, e),
    }
}

fn failed(operation: Operation, e: PersonError) -> OperationOutcome {
    let code = e.error_code();
    match e.error_severity() {
        ErrorSeverity::Critical | ErrorSeverity::Important => {
            error!(operation = %operation, code, "{}", e)
        }
        ErrorSeverity::Minor => warn!(operation = %operation, code, "{}", e),
        ErrorSeverity::Expected => info!(operation = %operation, code, "{}", e),
    }
    if let Some(action) = e.suggested_action() {
        info!(operation = %operation, "{}", action);
    }

    OperationOutcome {
        operation,
        status: OperationStatus::Failed {
            code,
            message: e.to_string(),
        },
    }
}
