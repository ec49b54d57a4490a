use bson::doc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;

use crate::errors::PersonResult;
use crate::models::{
    parse_person_id, CreatePerson, DeleteReport, Person, PersonFilter, PersonQuery, PersonUpdate,
};
use super::Database;

impl Database {
    pub async fn insert_person(&self, person: CreatePerson) -> PersonResult<Person> {
        let person = person.into_person()?;
        self.people().insert_one(&person).await?;
        Ok(person)
    }

    /// Validates the whole batch before writing so a bad entry rejects all of it.
    pub async fn insert_people(&self, people: Vec<CreatePerson>) -> PersonResult<Vec<Person>> {
        let people = people
            .into_iter()
            .map(CreatePerson::into_person)
            .collect::<PersonResult<Vec<_>>>()?;
        if people.is_empty() {
            return Ok(people);
        }

        self.people().insert_many(&people).await?;
        Ok(people)
    }

    pub async fn find_people_by_name(&self, name: &str) -> PersonResult<Vec<Person>> {
        let cursor = self
            .people()
            .find(PersonFilter::by_name(name).to_document())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_person_by_favorite_food(&self, food: &str) -> PersonResult<Option<Person>> {
        Ok(self
            .people()
            .find_one(PersonFilter::by_favorite_food(food).to_document())
            .await?)
    }

    pub async fn get_person_by_id(&self, id: &str) -> PersonResult<Option<Person>> {
        let id = parse_person_id(id)?;
        Ok(self.people().find_one(doc! { "_id": id }).await?)
    }

    /// Returns the document as it is after the update, or `None` if no id matched.
    pub async fn update_person_by_id(
        &self,
        id: &str,
        update: PersonUpdate,
    ) -> PersonResult<Option<Person>> {
        let id = parse_person_id(id)?;
        let update = update.to_document()?;

        Ok(self
            .people()
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Updates the first person with this name.
    pub async fn update_person_by_name(
        &self,
        name: &str,
        update: PersonUpdate,
    ) -> PersonResult<Option<Person>> {
        let update = update.to_document()?;

        Ok(self
            .people()
            .find_one_and_update(PersonFilter::by_name(name).to_document(), update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_person_by_id(&self, id: &str) -> PersonResult<Option<Person>> {
        let id = parse_person_id(id)?;
        Ok(self.people().find_one_and_delete(doc! { "_id": id }).await?)
    }

    pub async fn delete_people_by_name(&self, name: &str) -> PersonResult<DeleteReport> {
        let result = self
            .people()
            .delete_many(PersonFilter::by_name(name).to_document())
            .await?;

        Ok(DeleteReport {
            deleted_count: result.deleted_count,
        })
    }

    pub async fn find_people(&self, query: &PersonQuery) -> PersonResult<Vec<Person>> {
        let options = query.find_options()?;
        let cursor = self
            .people()
            .find(query.filter.to_document())
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_people(&self, filter: &PersonFilter) -> PersonResult<u64> {
        Ok(self.people().count_documents(filter.to_document()).await?)
    }
}
