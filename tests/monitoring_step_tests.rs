//! Integration tests for the monitoring-update step of the channel process.

mod fixtures;

use fixtures::{instance, new_journal, status_row, Event, FakeGateway, FakeStore};
use tag_provision::element::{CHANNEL_MATCH_COLUMN, CHANNEL_STATUS_TABLE, MONITORING_PARAMETER};
use tag_provision::{
    ChannelInput, InstanceId, InstanceStatus, MonitoringStep, StepError, StepOutcome, Transition,
};
use uuid::Uuid;

fn channel_input(instance_id: InstanceId) -> ChannelInput {
    ChannelInput {
        instance_id,
        element_name: "TAG East".to_string(),
        channel_name: "News HD".to_string(),
        channel_match: "news-hd".to_string(),
        monitoring_mode: "full".to_string(),
        threshold: String::new(),
        notification: String::new(),
        encryption: String::new(),
        kms: String::new(),
    }
}

#[tokio::test]
async fn ready_channel_moves_to_in_progress_and_enables_monitoring() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    store.insert(instance(id, InstanceStatus::Ready));
    gateway.set_table(CHANNEL_STATUS_TABLE, vec![status_row("42")]);

    let outcome = MonitoringStep::new(&store, &gateway)
        .run(&channel_input(id))
        .await
        .unwrap();

    assert_eq!(outcome, StepOutcome::Continue);
    assert_eq!(store.transitions(), vec![(id, Transition::ReadyToInProgress)]);
    assert_eq!(
        gateway.keyed_writes(),
        vec![(
            "TAG East".to_string(),
            MONITORING_PARAMETER,
            "42".to_string(),
            "1".to_string()
        )]
    );
}

#[tokio::test]
async fn status_rows_are_filtered_by_channel_match() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    store.insert(instance(id, InstanceStatus::InProgress));

    MonitoringStep::new(&store, &gateway)
        .run(&channel_input(id))
        .await
        .unwrap();

    let query = fixtures::events(&journal)
        .into_iter()
        .find(|event| matches!(event, Event::TableQuery { .. }))
        .expect("step should query the channel-status table");
    assert_eq!(
        query,
        Event::TableQuery {
            table: CHANNEL_STATUS_TABLE,
            filters: vec![(CHANNEL_MATCH_COLUMN, "news-hd".to_string())],
        }
    );
}

#[tokio::test]
async fn in_progress_channel_is_left_alone_and_idempotent() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    store.insert(instance(id, InstanceStatus::InProgress));
    gateway.set_table(CHANNEL_STATUS_TABLE, vec![status_row("42")]);

    let step = MonitoringStep::new(&store, &gateway);
    let first = step.run(&channel_input(id)).await.unwrap();
    let second = step.run(&channel_input(id)).await.unwrap();

    assert_eq!(first, StepOutcome::Continue);
    assert_eq!(second, StepOutcome::Continue);
    assert!(store.transitions().is_empty());
    assert_eq!(store.status_of(id), Some(InstanceStatus::InProgress));
}

#[tokio::test]
async fn deactivating_channel_disables_monitoring_and_finishes() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    store.insert(instance(id, InstanceStatus::Deactivating));
    gateway.set_table(
        CHANNEL_STATUS_TABLE,
        vec![status_row("42"), status_row("43")],
    );

    let outcome = MonitoringStep::new(&store, &gateway)
        .run(&channel_input(id))
        .await
        .unwrap();

    assert_eq!(outcome, StepOutcome::Finish);
    assert_eq!(
        store.transitions(),
        vec![(id, Transition::DeactivatingToComplete)]
    );

    let writes = gateway.keyed_writes();
    assert_eq!(writes.len(), 2);
    assert!(writes
        .iter()
        .all(|(_, pid, _, value)| *pid == MONITORING_PARAMETER && value == "0"));
    assert_eq!(writes[0].2, "42");
    assert_eq!(writes[1].2, "43");
}

#[tokio::test]
async fn unknown_status_is_tolerated_without_transitions() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    store.insert(instance(id, InstanceStatus::Other("frozen".to_string())));
    gateway.set_table(CHANNEL_STATUS_TABLE, vec![status_row("42")]);

    let outcome = MonitoringStep::new(&store, &gateway)
        .run(&channel_input(id))
        .await
        .unwrap();

    assert_eq!(outcome, StepOutcome::Continue);
    assert!(store.transitions().is_empty());
}

#[tokio::test]
async fn missing_status_rows_still_advance_the_workflow() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    store.insert(instance(id, InstanceStatus::Ready));
    // No channel-status rows configured: warning path, no writes.

    let outcome = MonitoringStep::new(&store, &gateway)
        .run(&channel_input(id))
        .await
        .unwrap();

    assert_eq!(outcome, StepOutcome::Continue);
    assert!(gateway.keyed_writes().is_empty());
    assert_eq!(store.transitions(), vec![(id, Transition::ReadyToInProgress)]);
}

#[tokio::test]
async fn missing_instance_is_fatal() {
    let journal = new_journal();
    let store = FakeStore::new(journal.clone());
    let gateway = FakeGateway::new(journal.clone());

    let id = InstanceId(Uuid::new_v4());
    let err = MonitoringStep::new(&store, &gateway)
        .run(&channel_input(id))
        .await
        .unwrap_err();

    assert!(matches!(err, StepError::InstanceNotFound(missing) if missing == id));
    assert!(store.transitions().is_empty());
    assert!(gateway.keyed_writes().is_empty());
}
