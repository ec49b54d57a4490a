use bson::{oid::ObjectId, Bson, Document};
use mongodb::options::FindOptions;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::errors::{PersonError, PersonResult};

/// A stored person document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Absent when a query excluded it.
    #[serde(
        default,
        deserialize_with = "deserialize_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i32>,
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl Person {
    pub fn id_hex(&self) -> String {
        self.id.to_hex()
    }
}

/// Accepts any whole BSON number; mongoose writes `Number` fields as doubles.
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::Int32(age)) => Ok(Some(age)),
        Some(Bson::Int64(age)) => i32::try_from(age)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("age {} is out of range", age))),
        Some(Bson::Double(age))
            if age.fract() == 0.0 && age >= i32::MIN as f64 && age <= i32::MAX as f64 =>
        {
            Ok(Some(age as i32))
        }
        Some(other) => Err(D::Error::custom(format!(
            "age must be a whole number, got {}",
            other
        ))),
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}", self.name, self.id.to_hex())?;
        if let Some(age) = self.age {
            write!(f, ", age {}", age)?;
        }
        write!(f, ", favoriteFoods [{}])", self.favorite_foods.join(", "))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreatePerson {
    pub name: String,
    pub age: Option<i32>,
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl CreatePerson {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> PersonResult<()> {
        if self.name.is_empty() {
            return Err(PersonError::MissingName);
        }
        Ok(())
    }

    /// Validates and assigns a fresh id, filling in defaults for omitted fields.
    pub fn into_person(self) -> PersonResult<Person> {
        self.validate()?;
        Ok(Person {
            id: ObjectId::new(),
            name: self.name,
            age: Some(self.age.unwrap_or(0)),
            favorite_foods: self.favorite_foods,
        })
    }
}

/// Partial update applied to a single person
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonUpdate {
    pub set_name: Option<String>,
    pub set_age: Option<i32>,
    pub push_favorite_food: Option<String>,
}

impl PersonUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.set_name = Some(name.into());
        self
    }

    pub fn set_age(mut self, age: i32) -> Self {
        self.set_age = Some(age);
        self
    }

    pub fn push_favorite_food(mut self, food: impl Into<String>) -> Self {
        self.push_favorite_food = Some(food.into());
        self
    }

    pub fn to_document(&self) -> PersonResult<Document> {
        let mut set = Document::new();
        if let Some(name) = &self.set_name {
            if name.is_empty() {
                return Err(PersonError::MissingName);
            }
            set.insert(PersonField::Name.as_str(), name.as_str());
        }
        if let Some(age) = self.set_age {
            set.insert(PersonField::Age.as_str(), age);
        }

        let mut update = Document::new();
        if !set.is_empty() {
            update.insert("$set", set);
        }
        if let Some(food) = &self.push_favorite_food {
            let mut push = Document::new();
            push.insert(PersonField::FavoriteFoods.as_str(), food.as_str());
            update.insert("$push", push);
        }

        if update.is_empty() {
            return Err(PersonError::EmptyUpdate);
        }
        Ok(update)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonField {
    Id,
    Name,
    Age,
    FavoriteFoods,
}

impl PersonField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonField::Id => "_id",
            PersonField::Name => "name",
            PersonField::Age => "age",
            PersonField::FavoriteFoods => "favoriteFoods",
        }
    }

    /// Fields the read model can do without.
    pub fn is_excludable(&self) -> bool {
        matches!(self, PersonField::Age | PersonField::FavoriteFoods)
    }
}

impl std::fmt::Display for PersonField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Field-value predicate; every set condition must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonFilter {
    pub name: Option<String>,
    pub favorite_food: Option<String>,
}

impl PersonFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Matches documents whose `favoriteFoods` array contains `food`.
    pub fn by_favorite_food(food: impl Into<String>) -> Self {
        Self {
            favorite_food: Some(food.into()),
            ..Default::default()
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(name) = &self.name {
            filter.insert(PersonField::Name.as_str(), name.as_str());
        }
        if let Some(food) = &self.favorite_food {
            filter.insert(PersonField::FavoriteFoods.as_str(), food.as_str());
        }
        filter
    }
}

/// Filtered, sorted, limited and projected find
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonQuery {
    pub filter: PersonFilter,
    pub sort: Option<(PersonField, SortOrder)>,
    pub limit: Option<i64>,
    pub exclude: Vec<PersonField>,
}

impl PersonQuery {
    pub fn new(filter: PersonFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn sort_by(mut self, field: PersonField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn exclude(mut self, field: PersonField) -> Self {
        if !self.exclude.contains(&field) {
            self.exclude.push(field);
        }
        self
    }

    pub fn projection(&self) -> PersonResult<Option<Document>> {
        if self.exclude.is_empty() {
            return Ok(None);
        }
        let mut projection = Document::new();
        for field in &self.exclude {
            if !field.is_excludable() {
                return Err(PersonError::InvalidProjection { field: *field });
            }
            projection.insert(field.as_str(), 0);
        }
        Ok(Some(projection))
    }

    pub fn find_options(&self) -> PersonResult<FindOptions> {
        let mut options = FindOptions::default();
        if let Some((field, order)) = self.sort {
            let mut sort = Document::new();
            sort.insert(field.as_str(), order.direction());
            options.sort = Some(sort);
        }
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(PersonError::InvalidLimit { limit });
            }
            options.limit = Some(limit);
        }
        options.projection = self.projection()?;
        Ok(options)
    }
}

/// Outcome of a predicate delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted_count: u64,
}

/// Parses a hex document id, rejecting anything that is not a valid ObjectId.
pub fn parse_person_id(id: &str) -> PersonResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| PersonError::invalid_id(id))
}
