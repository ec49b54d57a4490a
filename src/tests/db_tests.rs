#[cfg(test)]
mod tests {
    use crate::errors::PersonError;
    use crate::models::{CreatePerson, PersonFilter, PersonUpdate};
    use crate::test_utils::TestContext;
    use std::collections::HashSet;

    fn create_test_person(name: &str) -> CreatePerson {
        CreatePerson::new(name)
            .with_age(25)
            .with_favorite_foods(["pizza", "burger", "sushi"])
    }

    #[tokio::test]
    async fn test_insert_person_defaults_age() {
        let ctx = TestContext::new().await;

        let person = ctx
            .db
            .insert_person(CreatePerson::new("John").with_favorite_foods(["pizza", "sushi"]))
            .await
            .unwrap();

        let stored = ctx.db.get_person_by_id(&person.id_hex()).await.unwrap().unwrap();
        assert_eq!(stored.name, "John");
        assert_eq!(stored.favorite_foods, vec!["pizza".to_string(), "sushi".to_string()]);
        assert_eq!(stored.age, Some(0));

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_person_without_name_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.db.insert_person(CreatePerson::new("").with_age(4)).await;
        assert!(matches!(result, Err(PersonError::MissingName)));
        assert_eq!(ctx.db.count_people(&PersonFilter::all()).await.unwrap(), 0);

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_people_generates_unique_ids() {
        let ctx = TestContext::new().await;

        let people = ctx
            .db
            .insert_people(vec![
                create_test_person("Alice"),
                create_test_person("Bob"),
                create_test_person("Charlie"),
            ])
            .await
            .unwrap();

        assert_eq!(people.len(), 3);
        let ids: HashSet<_> = people.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ctx.db.count_people(&PersonFilter::all()).await.unwrap(), 3);

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_people_rejects_whole_batch_on_invalid_entry() {
        let ctx = TestContext::new().await;

        let result = ctx
            .db
            .insert_people(vec![create_test_person("Alice"), CreatePerson::new("")])
            .await;

        assert!(matches!(result, Err(PersonError::MissingName)));
        assert_eq!(ctx.db.count_people(&PersonFilter::all()).await.unwrap(), 0);

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_reinserting_creates_duplicates() {
        let ctx = TestContext::new().await;

        ctx.db.insert_person(create_test_person("John")).await.unwrap();
        ctx.db.insert_person(create_test_person("John")).await.unwrap();

        let found = ctx.db.find_people_by_name("John").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_ne!(found[0].id, found[1].id);

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_by_name_sets_age() {
        let ctx = TestContext::new().await;
        ctx.seed_people(vec![create_test_person("Alice")]).await;

        let updated = ctx
            .db
            .update_person_by_name("Alice", PersonUpdate::new().set_age(20))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.age, Some(20));
        assert_eq!(updated.favorite_foods.len(), 3);

        let missing = ctx
            .db
            .update_person_by_name("Nobody", PersonUpdate::new().set_age(20))
            .await
            .unwrap();
        assert!(missing.is_none());

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_rejects_empty_name() {
        let ctx = TestContext::new().await;
        let people = ctx.seed_people(vec![create_test_person("Alice")]).await;

        let result = ctx
            .db
            .update_person_by_id(&people[0].id_hex(), PersonUpdate::new().set_name(""))
            .await;
        assert!(matches!(result, Err(PersonError::MissingName)));

        let stored = ctx.db.get_person_by_id(&people[0].id_hex()).await.unwrap().unwrap();
        assert_eq!(stored.name, "Alice");

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_id_is_an_error() {
        let ctx = TestContext::new().await;

        assert!(matches!(
            ctx.db.get_person_by_id("12345").await,
            Err(PersonError::InvalidId { .. })
        ));
        assert!(matches!(
            ctx.db.delete_person_by_id("not-hex").await,
            Err(PersonError::InvalidId { .. })
        ));

        ctx.cleanup_and_close().await.unwrap();
    }
}
