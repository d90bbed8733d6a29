//! Replaying adapter for the `RecordStore` port.

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::StoreError;
use crate::fleet::{DriverPatch, DriverRecord, Vehicle, VehicleKind};
use crate::ports::{RecordStore, StoreFuture};

/// Serves recorded store results from a cassette.
///
/// Calls are matched by method and order only; the arguments are not
/// compared against what was recorded.
pub struct ReplayingStore {
    replayer: Option<Mutex<CassetteReplayer>>,
}

impl ReplayingStore {
    /// Creates a replaying store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Some(Mutex::new(replayer)) }
    }

    /// A store with no cassette. Every call fails.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn replay<T: DeserializeOwned>(&self, method: &str) -> Result<T, StoreError> {
        let replayer = self
            .replayer
            .as_ref()
            .ok_or_else(|| StoreError::Replayed("no store cassette configured".into()))?;
        let output = next_output(replayer, "store", method)
            .map_err(|e| StoreError::Replayed(e.to_string()))?;
        replay_result(output)
    }
}

impl RecordStore for ReplayingStore {
    fn find_holders<'a>(
        &'a self,
        _kind: VehicleKind,
        _vehicle_id: &'a str,
        _exclude_driver_id: Option<&'a str>,
    ) -> StoreFuture<'a, Vec<DriverRecord>> {
        Box::pin(std::future::ready(self.replay("find_holders")))
    }

    fn get_driver<'a>(&'a self, _id: &'a str) -> StoreFuture<'a, Option<DriverRecord>> {
        Box::pin(std::future::ready(self.replay("get_driver")))
    }

    fn list_drivers(&self) -> StoreFuture<'_, Vec<DriverRecord>> {
        Box::pin(std::future::ready(self.replay("list_drivers")))
    }

    fn insert_driver<'a>(&'a self, _patch: &'a DriverPatch) -> StoreFuture<'a, DriverRecord> {
        Box::pin(std::future::ready(self.replay("insert_driver")))
    }

    fn update_driver<'a>(&'a self, _id: &'a str, _patch: &'a DriverPatch) -> StoreFuture<'a, ()> {
        Box::pin(std::future::ready(self.replay("update_driver")))
    }

    fn delete_driver<'a>(&'a self, _id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(std::future::ready(self.replay("delete_driver")))
    }

    fn list_vehicles(&self, _kind: VehicleKind) -> StoreFuture<'_, Vec<Vehicle>> {
        Box::pin(std::future::ready(self.replay("list_vehicles")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn store(interactions: Vec<(&str, serde_json::Value)>) -> ReplayingStore {
        let interactions = interactions
            .into_iter()
            .zip(0..)
            .map(|((method, output), seq)| Interaction {
                seq,
                port: "store".into(),
                method: method.into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            source: "memory".into(),
            interactions,
        };
        ReplayingStore::new(CassetteReplayer::new(&cassette))
    }

    #[tokio::test]
    async fn serves_rows_and_errors_in_recorded_order() {
        let store = store(vec![
            ("find_holders", json!({"ok": [{"id": "a1", "code": "D01", "full_name": "Amal", "truck_id": "t1"}]})),
            ("update_driver", json!({"err": "backend returned 503: service unavailable"})),
        ]);

        let holders = store.find_holders(VehicleKind::Truck, "t1", Some("b1")).await.unwrap();
        assert_eq!(holders[0].id, "a1");

        let err = store
            .update_driver("a1", &DriverPatch::clear_link(VehicleKind::Truck))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Replayed("backend returned 503: service unavailable".into()));
    }

    #[tokio::test]
    async fn exhausted_or_unconfigured_store_fails_instead_of_panicking() {
        let store = store(vec![]);
        assert!(matches!(store.list_drivers().await, Err(StoreError::Replayed(_))));

        let err = ReplayingStore::unconfigured().list_drivers().await.unwrap_err();
        assert!(err.to_string().contains("no store cassette"));
    }
}
