//! Record store port for driver, truck and trailer rows.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::StoreError;
use crate::fleet::{DriverPatch, DriverRecord, Vehicle, VehicleKind};

/// Boxed future type alias used by [`RecordStore`] to keep the trait dyn-compatible.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Reads and writes fleet rows in the hosted backend.
///
/// The store offers equality filtering and single-row writes only. There is
/// no transaction spanning several calls and no uniqueness constraint on the
/// driver link fields.
pub trait RecordStore: Send + Sync {
    /// Drivers whose `kind` link equals `vehicle_id`, skipping `exclude_driver_id`.
    ///
    /// Rows come back in the store's default order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_holders<'a>(
        &'a self,
        kind: VehicleKind,
        vehicle_id: &'a str,
        exclude_driver_id: Option<&'a str>,
    ) -> StoreFuture<'a, Vec<DriverRecord>>;

    /// Fetches one driver by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<DriverRecord>>;

    /// Lists every driver, newest first where the backend records creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_drivers(&self) -> StoreFuture<'_, Vec<DriverRecord>>;

    /// Inserts a driver and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected.
    fn insert_driver<'a>(&'a self, patch: &'a DriverPatch) -> StoreFuture<'a, DriverRecord>;

    /// Applies a partial update to one driver.
    ///
    /// Writing a value the row already holds succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the row does not exist.
    fn update_driver<'a>(&'a self, id: &'a str, patch: &'a DriverPatch) -> StoreFuture<'a, ()>;

    /// Deletes one driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected.
    fn delete_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;

    /// Active vehicles of one kind, ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_vehicles(&self, kind: VehicleKind) -> StoreFuture<'_, Vec<Vehicle>>;
}

/// Shared stores forward every call, so a caller can keep a handle for
/// inspection while the context owns another.
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn find_holders<'a>(
        &'a self,
        kind: VehicleKind,
        vehicle_id: &'a str,
        exclude_driver_id: Option<&'a str>,
    ) -> StoreFuture<'a, Vec<DriverRecord>> {
        (**self).find_holders(kind, vehicle_id, exclude_driver_id)
    }

    fn get_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<DriverRecord>> {
        (**self).get_driver(id)
    }

    fn list_drivers(&self) -> StoreFuture<'_, Vec<DriverRecord>> {
        (**self).list_drivers()
    }

    fn insert_driver<'a>(&'a self, patch: &'a DriverPatch) -> StoreFuture<'a, DriverRecord> {
        (**self).insert_driver(patch)
    }

    fn update_driver<'a>(&'a self, id: &'a str, patch: &'a DriverPatch) -> StoreFuture<'a, ()> {
        (**self).update_driver(id, patch)
    }

    fn delete_driver<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        (**self).delete_driver(id)
    }

    fn list_vehicles(&self, kind: VehicleKind) -> StoreFuture<'_, Vec<Vehicle>> {
        (**self).list_vehicles(kind)
    }
}
