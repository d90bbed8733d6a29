//! Recording adapter for the `RecordStore` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::fleet::{DriverPatch, DriverRecord, Vehicle, VehicleKind};
use crate::ports::{RecordStore, StoreFuture};

/// Records store calls while delegating to an inner store.
pub struct RecordingStore {
    inner: Box<dyn RecordStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingStore {
    /// Creates a new recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn RecordStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct HoldersInput<'a> {
    kind: VehicleKind,
    vehicle_id: &'a str,
    exclude_driver_id: Option<&'a str>,
}

#[derive(Serialize)]
struct IdInput<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct UpdateInput<'a> {
    id: &'a str,
    patch: &'a DriverPatch,
}

#[derive(Serialize)]
struct KindInput {
    kind: VehicleKind,
}

impl RecordStore for RecordingStore {
    fn find_holders<'a>(
        &'a self,
        kind: VehicleKind,
        vehicle_id: &'a str,
        exclude_driver_id: Option<&'a str>,
    ) -> StoreFuture<'a, Vec<DriverRecord>> {
        Box::pin(async move {
            let result = self.inner.find_holders(kind, vehicle_id, exclude_driver_id).await;
            let input = HoldersInput { kind, vehicle_id, exclude_driver_id };
            record_result(&self.recorder, "store", "find_holders", &input, &result);
            result
        })
    }

    fn get_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<DriverRecord>> {
        Box::pin(async move {
            let result = self.inner.get_driver(id).await;
            record_result(&self.recorder, "store", "get_driver", &IdInput { id }, &result);
            result
        })
    }

    fn list_drivers(&self) -> StoreFuture<'_, Vec<DriverRecord>> {
        Box::pin(async move {
            let result = self.inner.list_drivers().await;
            record_result(&self.recorder, "store", "list_drivers", &(), &result);
            result
        })
    }

    fn insert_driver<'a>(&'a self, patch: &'a DriverPatch) -> StoreFuture<'a, DriverRecord> {
        Box::pin(async move {
            let result = self.inner.insert_driver(patch).await;
            record_result(&self.recorder, "store", "insert_driver", patch, &result);
            result
        })
    }

    fn update_driver<'a>(&'a self, id: &'a str, patch: &'a DriverPatch) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.update_driver(id, patch).await;
            let input = UpdateInput { id, patch };
            record_result(&self.recorder, "store", "update_driver", &input, &result);
            result
        })
    }

    fn delete_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.delete_driver(id).await;
            record_result(&self.recorder, "store", "delete_driver", &IdInput { id }, &result);
            result
        })
    }

    fn list_vehicles(&self, kind: VehicleKind) -> StoreFuture<'_, Vec<Vehicle>> {
        Box::pin(async move {
            let result = self.inner.list_vehicles(kind).await;
            record_result(&self.recorder, "store", "list_vehicles", &KindInput { kind }, &result);
            result
        })
    }
}
