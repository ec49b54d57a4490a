#[cfg(test)]
mod tests {
    use peopledb::config::DEFAULT_TARGET_PERSON_ID;
    use peopledb::models::{CreatePerson, PersonFilter};
    use peopledb::scenario::{DispatchPolicy, Operation, OperationStatus, Scenario};
    use peopledb::test_utils::TestContext;

    fn status_of(report: &peopledb::scenario::ScenarioReport, operation: Operation) -> OperationStatus {
        report
            .outcome(operation)
            .unwrap_or_else(|| panic!("missing outcome for {}", operation))
            .status
            .clone()
    }

    #[tokio::test]
    async fn test_sequential_scenario_against_empty_collection() {
        let ctx = TestContext::new().await;

        let report = Scenario::new(DEFAULT_TARGET_PERSON_ID)
            .run(&ctx.db, DispatchPolicy::Sequential)
            .await;

        assert_eq!(report.outcomes.len(), 10);
        assert_eq!(report.failures(), 0);

        // Sequential dispatch keeps the listed order
        let order: Vec<Operation> = report.outcomes.iter().map(|o| o.operation).collect();
        assert_eq!(order.first(), Some(&Operation::InsertOne));
        assert_eq!(order.last(), Some(&Operation::FindBurritoLovers));

        assert_eq!(status_of(&report, Operation::FindById), OperationStatus::NotFound);
        assert_eq!(status_of(&report, Operation::UpdateById), OperationStatus::NotFound);
        assert_eq!(status_of(&report, Operation::DeleteById), OperationStatus::NotFound);
        assert!(matches!(
            status_of(&report, Operation::UpdateByName),
            OperationStatus::Succeeded(_)
        ));
        assert!(matches!(
            status_of(&report, Operation::FindByName),
            OperationStatus::Succeeded(ref summary) if summary.contains("John")
        ));

        // John plus Alice, Bob and Charlie
        assert_eq!(ctx.db.count_people(&PersonFilter::all()).await.unwrap(), 4);
        let alice = ctx.db.find_people_by_name("Alice").await.unwrap();
        assert_eq!(alice[0].age, Some(20));

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_sequential_scenario_with_existing_target() {
        let ctx = TestContext::new().await;
        let target = ctx
            .db
            .insert_person(CreatePerson::new("Target").with_favorite_foods(["burrito"]))
            .await
            .unwrap();

        let report = Scenario::new(target.id_hex())
            .run(&ctx.db, DispatchPolicy::Sequential)
            .await;

        assert_eq!(report.failures(), 0);
        assert!(matches!(
            status_of(&report, Operation::FindById),
            OperationStatus::Succeeded(_)
        ));
        assert!(matches!(
            status_of(&report, Operation::UpdateById),
            OperationStatus::Succeeded(ref summary) if summary.contains("hamburger")
        ));
        assert!(matches!(
            status_of(&report, Operation::DeleteById),
            OperationStatus::Succeeded(_)
        ));
        assert!(ctx.db.get_person_by_id(&target.id_hex()).await.unwrap().is_none());

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_scenario_settles_every_operation() {
        let ctx = TestContext::new().await;

        let report = Scenario::new(DEFAULT_TARGET_PERSON_ID)
            .run(&ctx.db, DispatchPolicy::Concurrent)
            .await;

        assert_eq!(report.outcomes.len(), 10);
        assert_eq!(report.failures(), 0);
        assert_eq!(
            report.outcomes.last().map(|o| o.operation),
            Some(Operation::FindBurritoLovers)
        );

        // Both inserts complete regardless of interleaving
        assert_eq!(ctx.db.count_people(&PersonFilter::all()).await.unwrap(), 4);

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_target_id_does_not_block_other_operations() {
        let ctx = TestContext::new().await;

        let report = Scenario::new("not-an-object-id")
            .run(&ctx.db, DispatchPolicy::Sequential)
            .await;

        assert_eq!(report.outcomes.len(), 10);
        assert_eq!(report.failures(), 3);
        for operation in [Operation::FindById, Operation::UpdateById, Operation::DeleteById] {
            assert!(matches!(
                status_of(&report, operation),
                OperationStatus::Failed { code: "PERSON_INVALID_ID", .. }
            ));
        }
        assert!(matches!(
            status_of(&report, Operation::InsertMany),
            OperationStatus::Succeeded(_)
        ));

        ctx.cleanup_and_close().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_target_id_does_not_block_concurrent_operations() {
        let ctx = TestContext::new().await;

        let report = Scenario::new("not-an-object-id")
            .run(&ctx.db, DispatchPolicy::Concurrent)
            .await;

        assert_eq!(report.outcomes.len(), 10);
        assert_eq!(report.failures(), 3);
        for operation in [Operation::FindById, Operation::UpdateById, Operation::DeleteById] {
            assert!(matches!(
                status_of(&report, operation),
                OperationStatus::Failed { code: "PERSON_INVALID_ID", .. }
            ));
        }
        for operation in [Operation::InsertOne, Operation::InsertMany, Operation::DeleteByName] {
            assert!(matches!(
                status_of(&report, operation),
                OperationStatus::Succeeded(_)
            ));
        }
        assert!(matches!(
            status_of(&report, Operation::FindBurritoLovers),
            OperationStatus::Succeeded(_)
        ));
        assert_eq!(ctx.db.count_people(&PersonFilter::all()).await.unwrap(), 4);

        ctx.cleanup_and_close().await.unwrap();
    }
}
