//! In-memory record store.
//!
//! Keeps drivers in insertion order (the "store order" the reconciler sees),
//! logs every write, and can be told to fail reads or specific updates.

use std::collections::HashSet;
use std::future::ready;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::fleet::{DriverPatch, DriverRecord, Vehicle, VehicleKind, VehicleStatus};
use crate::ports::{RecordStore, StoreFuture};

/// A write the store accepted or rejected, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    /// `insert_driver`.
    Insert(DriverPatch),
    /// `update_driver`.
    Update {
        /// Target row.
        id: String,
        /// Patch sent.
        patch: DriverPatch,
    },
    /// `delete_driver`.
    Delete {
        /// Target row.
        id: String,
    },
}

/// Seed data for a [`MemoryStore`], loadable from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Driver rows in store order.
    #[serde(default)]
    pub drivers: Vec<DriverRecord>,
    /// Truck rows.
    #[serde(default)]
    pub trucks: Vec<Vehicle>,
    /// Trailer rows.
    #[serde(default)]
    pub trailers: Vec<Vehicle>,
}

#[derive(Default)]
struct MemoryState {
    snapshot: FleetSnapshot,
    failing_updates: HashSet<String>,
    fail_reads: bool,
    uuid_ids: bool,
    reads: usize,
    writes: Vec<WriteCall>,
}

/// Record store held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: FleetSnapshot) -> Self {
        Self { state: Mutex::new(MemoryState { snapshot, ..MemoryState::default() }) }
    }

    /// Appends a driver row.
    #[must_use]
    pub fn with_driver(self, record: DriverRecord) -> Self {
        self.lock().snapshot.drivers.push(record);
        self
    }

    /// Appends a vehicle row.
    #[must_use]
    pub fn with_vehicle(self, kind: VehicleKind, vehicle: Vehicle) -> Self {
        let mut state = self.lock();
        match kind {
            VehicleKind::Truck => state.snapshot.trucks.push(vehicle),
            VehicleKind::Trailer => state.snapshot.trailers.push(vehicle),
        }
        drop(state);
        self
    }

    /// Makes every later `update_driver` for `id` fail.
    pub fn fail_updates_for(&self, id: &str) {
        self.lock().failing_updates.insert(id.to_string());
    }

    /// Lets updates for `id` succeed again.
    pub fn heal_updates_for(&self, id: &str) {
        self.lock().failing_updates.remove(id);
    }

    /// Makes every later read fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Makes `get_driver` reject keys that are not uuids, as a backend with
    /// uuid primary keys does.
    pub fn require_uuid_ids(&self, require: bool) {
        self.lock().uuid_ids = require;
    }

    /// Current row for a driver, bypassing read accounting.
    #[must_use]
    pub fn driver(&self, id: &str) -> Option<DriverRecord> {
        self.lock().snapshot.drivers.iter().find(|d| d.id == id).cloned()
    }

    /// Copy of all rows.
    #[must_use]
    pub fn snapshot(&self) -> FleetSnapshot {
        self.lock().snapshot.clone()
    }

    /// Every write call so far, including rejected ones.
    #[must_use]
    pub fn writes(&self) -> Vec<WriteCall> {
        self.lock().writes.clone()
    }

    /// Number of read calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store lock poisoned")
    }

    fn read<T>(&self, f: impl FnOnce(&FleetSnapshot) -> T) -> Result<T, StoreError> {
        let mut state = self.lock();
        state.reads += 1;
        if state.fail_reads {
            return Err(StoreError::Request("connection reset".into()));
        }
        Ok(f(&state.snapshot))
    }
}

fn missing_column(column: &str) -> StoreError {
    StoreError::Status {
        status: 400,
        message: format!("null value in column \"{column}\" violates not-null constraint"),
    }
}

impl RecordStore for MemoryStore {
    fn find_holders<'a>(
        &'a self,
        kind: VehicleKind,
        vehicle_id: &'a str,
        exclude_driver_id: Option<&'a str>,
    ) -> StoreFuture<'a, Vec<DriverRecord>> {
        let result = self.read(|s| {
            s.drivers
                .iter()
                .filter(|d| d.link(kind) == Some(vehicle_id))
                .filter(|d| Some(d.id.as_str()) != exclude_driver_id)
                .cloned()
                .collect()
        });
        Box::pin(ready(result))
    }

    fn get_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<DriverRecord>> {
        let result = self.read(|s| s.drivers.iter().find(|d| d.id == id).cloned());
        let result = if self.lock().uuid_ids && Uuid::parse_str(id).is_err() {
            result.and(Err(StoreError::Status {
                status: 400,
                message: format!("invalid input syntax for type uuid: \"{id}\""),
            }))
        } else {
            result
        };
        Box::pin(ready(result))
    }

    fn list_drivers(&self) -> StoreFuture<'_, Vec<DriverRecord>> {
        let result = self.read(|s| s.drivers.iter().rev().cloned().collect());
        Box::pin(ready(result))
    }

    fn insert_driver<'a>(&'a self, patch: &'a DriverPatch) -> StoreFuture<'a, DriverRecord> {
        let mut state = self.lock();
        state.writes.push(WriteCall::Insert(patch.clone()));
        let result = match (&patch.code, &patch.full_name) {
            (None, _) => Err(missing_column("code")),
            (_, None) => Err(missing_column("full_name")),
            (Some(code), Some(full_name)) => {
                let mut record = DriverRecord {
                    id: Uuid::new_v4().to_string(),
                    code: code.clone(),
                    full_name: full_name.clone(),
                    phone: None,
                    gatepass: None,
                    waqala: None,
                    truck_id: None,
                    trailer_id: None,
                    company_id: None,
                    status: patch.status.unwrap_or_default(),
                };
                record.apply(patch);
                state.snapshot.drivers.push(record.clone());
                Ok(record)
            }
        };
        Box::pin(ready(result))
    }

    fn update_driver<'a>(&'a self, id: &'a str, patch: &'a DriverPatch) -> StoreFuture<'a, ()> {
        let mut state = self.lock();
        state.writes.push(WriteCall::Update { id: id.to_string(), patch: patch.clone() });
        let result = if state.failing_updates.contains(id) {
            Err(StoreError::Status { status: 503, message: "service unavailable".into() })
        } else if let Some(record) = state.snapshot.drivers.iter_mut().find(|d| d.id == id) {
            record.apply(patch);
            Ok(())
        } else {
            Err(StoreError::NotFound { table: "drivers", id: id.to_string() })
        };
        Box::pin(ready(result))
    }

    fn delete_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        let mut state = self.lock();
        state.writes.push(WriteCall::Delete { id: id.to_string() });
        state.snapshot.drivers.retain(|d| d.id != id);
        Box::pin(ready(Ok(())))
    }

    fn list_vehicles(&self, kind: VehicleKind) -> StoreFuture<'_, Vec<Vehicle>> {
        let result = self.read(|s| {
            let rows = match kind {
                VehicleKind::Truck => &s.trucks,
                VehicleKind::Trailer => &s.trailers,
            };
            let mut active: Vec<Vehicle> =
                rows.iter().filter(|v| v.status == VehicleStatus::Active).cloned().collect();
            active.sort_by(|a, b| a.number.cmp(&b.number));
            active
        });
        Box::pin(ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::DriverStatus;

    fn driver(id: &str, truck: Option<&str>) -> DriverRecord {
        DriverRecord {
            id: id.into(),
            code: id.to_uppercase(),
            full_name: format!("Driver {id}"),
            phone: None,
            gatepass: None,
            waqala: None,
            truck_id: truck.map(Into::into),
            trailer_id: None,
            company_id: None,
            status: DriverStatus::Active,
        }
    }

    #[tokio::test]
    async fn find_holders_filters_and_excludes() {
        let store = MemoryStore::new()
            .with_driver(driver("a1", Some("t1")))
            .with_driver(driver("b1", Some("t1")))
            .with_driver(driver("c1", None));

        let all = store.find_holders(VehicleKind::Truck, "t1", None).await.unwrap();
        assert_eq!(all.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), ["a1", "b1"]);

        let others = store.find_holders(VehicleKind::Truck, "t1", Some("a1")).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, "b1");
    }

    #[tokio::test]
    async fn insert_requires_code_and_name() {
        let store = MemoryStore::new();
        let err = store.insert_driver(&DriverPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 400, .. }));

        let patch = DriverPatch {
            code: Some("D9".into()),
            full_name: Some("Nadia".into()),
            truck_id: Some(Some("t4".into())),
            ..DriverPatch::default()
        };
        let record = store.insert_driver(&patch).await.unwrap();
        assert_eq!(record.truck_id.as_deref(), Some("t4"));
        assert_eq!(store.writes().len(), 2);
    }

    #[tokio::test]
    async fn update_of_unknown_driver_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_driver("ghost", &DriverPatch::clear_link(VehicleKind::Truck))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound { table: "drivers", id: "ghost".into() });
    }

    #[tokio::test]
    async fn vehicles_listed_active_and_sorted() {
        let store = MemoryStore::new()
            .with_vehicle(
                VehicleKind::Truck,
                Vehicle { id: "t2".into(), number: "T-200".into(), status: VehicleStatus::Active },
            )
            .with_vehicle(
                VehicleKind::Truck,
                Vehicle { id: "t3".into(), number: "T-050".into(), status: VehicleStatus::Empty },
            )
            .with_vehicle(
                VehicleKind::Truck,
                Vehicle { id: "t1".into(), number: "T-100".into(), status: VehicleStatus::Active },
            );
        let trucks = store.list_vehicles(VehicleKind::Truck).await.unwrap();
        assert_eq!(trucks.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), ["t1", "t2"]);
        assert!(store.list_vehicles(VehicleKind::Trailer).await.unwrap().is_empty());
    }

    #[test]
    fn snapshot_loads_from_yaml() {
        let yaml = "drivers:\n  - id: a1\n    code: D01\n    full_name: Amal\n    truck_id: t1\n";
        let snapshot: FleetSnapshot = serde_yaml::from_str(yaml).unwrap();
        let store = MemoryStore::from_snapshot(snapshot);
        assert_eq!(store.driver("a1").unwrap().truck_id.as_deref(), Some("t1"));
    }
}
