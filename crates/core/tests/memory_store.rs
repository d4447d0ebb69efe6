mod common;

use batchlens_api::{ApiError, ExecutionStore, StoreSnapshot};
use batchlens_core::BatchlensError;
use batchlens_core::store::InMemoryExecutionStore;
use common::*;

fn seeded() -> InMemoryExecutionStore {
    let snapshot = StoreSnapshot {
        job_executions: vec![
            with_steps(
                1,
                "import",
                vec![
                    completed_step(10, 1, "read", 1000, 10),
                    completed_step(11, 1, "load:partition0", 500, 5),
                    completed_step(12, 1, "load:partition1", 700, 7),
                ],
            ),
            with_steps(
                2,
                "import",
                vec![
                    completed_step(20, 2, "read", 2000, 20),
                    running_step(21, 2, "load:partition0", 3),
                ],
            ),
            with_steps(3, "export", vec![completed_step(30, 3, "read", 100, 1)]),
        ],
    };
    InMemoryExecutionStore::from_snapshot(snapshot).unwrap()
}

#[tokio::test]
async fn counts_only_completed_steps_of_the_job() {
    let store = seeded();
    assert_eq!(
        store.count_completed_step_executions("import", "read").await.unwrap(),
        2
    );
    assert_eq!(
        store
            .count_completed_step_executions("import", "load:partition*")
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        store.count_completed_step_executions("nothing", "read").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn pages_newest_first() {
    let store = seeded();
    let first = store
        .fetch_step_executions_page("import", "*", 0, 2)
        .await
        .unwrap();
    let ids: Vec<i64> = first.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![20, 12]);

    let second = store
        .fetch_step_executions_page("import", "*", 2, 2)
        .await
        .unwrap();
    let ids: Vec<i64> = second.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![11, 10]);

    let past_end = store
        .fetch_step_executions_page("import", "*", 4, 2)
        .await
        .unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn step_lookup_errors_name_the_missing_entity() {
    let store = seeded();
    assert_eq!(
        store.get_step_execution(99, 10).await.unwrap_err(),
        ApiError::NoSuchJobExecution(99)
    );
    assert_eq!(
        store.get_step_execution(1, 20).await.unwrap_err(),
        ApiError::NoSuchStepExecution {
            job_execution_id: 1,
            step_execution_id: 20,
        }
    );
    assert_eq!(store.get_step_execution(2, 21).await.unwrap().read_count, 3);
}

#[tokio::test]
async fn job_listings() {
    let store = seeded();
    assert_eq!(store.job_names().await.unwrap(), vec!["export", "import"]);
    assert_eq!(store.count_job_executions().await.unwrap(), 3);

    let ids: Vec<i64> = store
        .list_job_executions(0, 10)
        .await
        .unwrap()
        .iter()
        .map(|je| je.id)
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);

    assert_eq!(store.count_job_executions_for_job("import").await.unwrap(), 2);
    assert_eq!(
        store.count_job_executions_for_job("missing").await.unwrap_err(),
        ApiError::NoSuchJob("missing".to_string())
    );
    assert!(
        store
            .list_job_executions_for_job("missing", 0, 10)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn upserting_a_step_replaces_it_in_place() {
    let store = seeded();
    let mut step = store.get_step_execution(2, 21).await.unwrap();
    step.read_count = 42;
    store.upsert_step_execution(step).await.unwrap();

    let steps = store.get_step_executions(2).await.unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].read_count, 42);

    let orphan = running_step(77, 404, "read", 0);
    assert_eq!(
        store.upsert_step_execution(orphan).await.unwrap_err(),
        ApiError::NoSuchJobExecution(404)
    );
}

#[test]
fn snapshot_with_misplaced_step_is_rejected() {
    let snapshot = StoreSnapshot {
        job_executions: vec![with_steps(1, "import", vec![completed_step(10, 2, "read", 1, 1)])],
    };
    assert!(matches!(
        InMemoryExecutionStore::from_snapshot(snapshot),
        Err(ApiError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn loads_snapshot_from_disk() {
    let store = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::to_string(&store.snapshot().await).unwrap()).unwrap();

    let loaded = InMemoryExecutionStore::load(&path).await.unwrap();
    assert_eq!(loaded.snapshot().await, store.snapshot().await);

    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        InMemoryExecutionStore::load(&path).await,
        Err(BatchlensError::Json(_))
    ));
}

#[tokio::test]
async fn lists_distinct_job_instances_newest_first() {
    let mut rerun = job_execution(4, "import");
    rerun.job_instance.id = 1;
    let store = seeded();
    store.upsert_job_execution(rerun).await.unwrap();

    let instances = store.list_job_instances("import", 0, 20).await.unwrap();
    let ids: Vec<i64> = instances.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![2, 1]);

    let page = store.list_job_instances("import", 1, 1).await.unwrap();
    assert_eq!(page[0].id, 1);

    assert_eq!(
        store.list_job_instances("missing", 0, 20).await.unwrap_err(),
        ApiError::NoSuchJob("missing".to_string())
    );
}

#[tokio::test]
async fn job_instance_lookup_and_executions() {
    let mut rerun = job_execution(4, "import");
    rerun.job_instance.id = 1;
    let store = seeded();
    store.upsert_job_execution(rerun).await.unwrap();

    let instance = store.get_job_instance(1).await.unwrap();
    assert_eq!(instance.job_name, "import");
    assert_eq!(
        store.get_job_instance(77).await.unwrap_err(),
        ApiError::NoSuchJobInstance(77)
    );

    let executions = store
        .get_job_executions_for_job_instance("import", 1)
        .await
        .unwrap();
    let ids: Vec<i64> = executions.iter().map(|je| je.id).collect();
    assert_eq!(ids, vec![4, 1]);

    assert!(
        store
            .get_job_executions_for_job_instance("export", 1)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        store.get_job_executions_for_job_instance("missing", 1).await,
        Err(ApiError::NoSuchJob(_))
    ));
}
