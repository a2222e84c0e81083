//! Recording fakes for the two collaborator seams.
//!
//! Both fakes append to a shared journal so tests can assert the ordering of
//! store transitions relative to element writes, not just their counts.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tag_provision::element::SCAN_TITLE_COLUMN;
use tag_provision::{
    ColumnFilter, ElementGateway, GatewayError, Instance, InstanceId, InstanceStatus,
    InstanceStore, Manifest, StoreError, TableRow, Transition,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InstanceRead(InstanceId),
    Transition(InstanceId, Transition),
    TableQuery {
        table: u32,
        filters: Vec<(u32, String)>,
    },
    ParameterWrite {
        element: String,
        pid: u32,
        value: String,
    },
    KeyedParameterWrite {
        element: String,
        pid: u32,
        key: String,
        value: String,
    },
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(journal: &Journal) -> Vec<Event> {
    journal.lock().unwrap().clone()
}

/// Resulting status a well-behaved store applies for each named transition.
fn transition_target(transition: Transition) -> InstanceStatus {
    match transition {
        Transition::DeactivateToDeactivating => InstanceStatus::Deactivating,
        Transition::DeactivatingToComplete => InstanceStatus::Complete,
        Transition::CompleteToReady => InstanceStatus::Ready,
        Transition::ReadyToInProgress => InstanceStatus::InProgress,
        Transition::ActiveToComplete => InstanceStatus::Complete,
        Transition::ActiveToDraft => InstanceStatus::Draft,
    }
}

/// In-memory instance store that applies transitions like the real one and
/// records every call in the shared journal.
pub struct FakeStore {
    journal: Journal,
    instances: Mutex<HashMap<InstanceId, Instance>>,
    transition_results: Mutex<HashMap<Transition, InstanceStatus>>,
}

impl FakeStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            instances: Mutex::new(HashMap::new()),
            transition_results: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, instance: Instance) {
        self.instances.lock().unwrap().insert(instance.id, instance);
    }

    /// Override the status a transition lands on, to model a store that
    /// normalizes a requested transition differently than expected.
    pub fn set_transition_result(&self, transition: Transition, status: InstanceStatus) {
        self.transition_results
            .lock()
            .unwrap()
            .insert(transition, status);
    }

    pub fn status_of(&self, id: InstanceId) -> Option<InstanceStatus> {
        self.instances
            .lock()
            .unwrap()
            .get(&id)
            .map(|instance| instance.status.clone())
    }

    /// All transitions requested so far, in order.
    pub fn transitions(&self) -> Vec<(InstanceId, Transition)> {
        events(&self.journal)
            .into_iter()
            .filter_map(|event| match event {
                Event::Transition(id, transition) => Some((id, transition)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl InstanceStore for FakeStore {
    async fn read_by_id(&self, id: InstanceId) -> Result<Option<Instance>, StoreError> {
        self.journal.lock().unwrap().push(Event::InstanceRead(id));
        Ok(self.instances.lock().unwrap().get(&id).cloned())
    }

    async fn request_transition(
        &self,
        id: InstanceId,
        transition: Transition,
    ) -> Result<(), StoreError> {
        self.journal
            .lock()
            .unwrap()
            .push(Event::Transition(id, transition));

        let mut instances = self.instances.lock().unwrap();
        let instance = instances.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let target = self
            .transition_results
            .lock()
            .unwrap()
            .get(&transition)
            .cloned()
            .unwrap_or_else(|| transition_target(transition));
        instance.status = target;
        Ok(())
    }
}

/// In-memory element gateway serving configured table rows and recording
/// every call in the shared journal.
pub struct FakeGateway {
    journal: Journal,
    tables: Mutex<HashMap<u32, Vec<TableRow>>>,
}

impl FakeGateway {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_table(&self, table_id: u32, rows: Vec<TableRow>) {
        self.tables.lock().unwrap().insert(table_id, rows);
    }

    /// Standalone parameter writes recorded so far, in order.
    pub fn parameter_writes(&self) -> Vec<(String, u32, String)> {
        events(&self.journal)
            .into_iter()
            .filter_map(|event| match event {
                Event::ParameterWrite {
                    element,
                    pid,
                    value,
                } => Some((element, pid, value)),
                _ => None,
            })
            .collect()
    }

    /// Keyed parameter writes recorded so far, in order.
    pub fn keyed_writes(&self) -> Vec<(String, u32, String, String)> {
        events(&self.journal)
            .into_iter()
            .filter_map(|event| match event {
                Event::KeyedParameterWrite {
                    element,
                    pid,
                    key,
                    value,
                } => Some((element, pid, key, value)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ElementGateway for FakeGateway {
    async fn query_table(
        &self,
        _element: &str,
        table_id: u32,
        filters: &[ColumnFilter],
    ) -> Result<Vec<TableRow>, GatewayError> {
        self.journal.lock().unwrap().push(Event::TableQuery {
            table: table_id,
            filters: filters
                .iter()
                .map(|filter| (filter.pid, filter.value.clone()))
                .collect(),
        });
        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(&table_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_parameter(
        &self,
        element: &str,
        parameter_id: u32,
        value: &str,
    ) -> Result<(), GatewayError> {
        self.journal.lock().unwrap().push(Event::ParameterWrite {
            element: element.to_string(),
            pid: parameter_id,
            value: value.to_string(),
        });
        Ok(())
    }

    async fn set_parameter_by_key(
        &self,
        element: &str,
        parameter_id: u32,
        key: &str,
        value: &str,
    ) -> Result<(), GatewayError> {
        self.journal
            .lock()
            .unwrap()
            .push(Event::KeyedParameterWrite {
                element: element.to_string(),
                pid: parameter_id,
                key: key.to_string(),
                value: value.to_string(),
            });
        Ok(())
    }
}

pub fn instance(id: InstanceId, status: InstanceStatus) -> Instance {
    Instance {
        id,
        status,
        manifests: Vec::new(),
    }
}

pub fn scan_instance(id: InstanceId, status: InstanceStatus, manifests: Vec<Manifest>) -> Instance {
    Instance {
        id,
        status,
        manifests,
    }
}

pub fn manifest(name: &str, url: &str) -> Manifest {
    Manifest {
        name: name.to_string(),
        url: url.to_string(),
    }
}

/// A channel-status row with the given primary key.
pub fn status_row(key: &str) -> TableRow {
    TableRow(vec![key.to_string()])
}

/// A scan-channels row carrying the given title in the title column.
pub fn scan_row(title: &str) -> TableRow {
    let mut cells = vec![String::new(); SCAN_TITLE_COLUMN + 1];
    cells[SCAN_TITLE_COLUMN] = title.to_string();
    TableRow(cells)
}
